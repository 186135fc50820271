//! # Mongo Guide
//!
//! A static documentation site generator for long-form MongoDB articles.
//! Articles are markdown files grouped into levels (beginner, intermediate,
//! advanced); every article page gets a sidebar, the rendered article, and an
//! "On this page" table of contents that follows the reader while scrolling.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Scan      content/  →  manifest.json    (filesystem → structured data)
//! 2. Generate  manifest  →  dist/            (final HTML site)
//! ```
//!
//! The manifest is human-readable JSON and holds every article body with its
//! heading index, so the generate stage never touches the content directory
//! except to copy `assets/`.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: walks the content directory, produces the manifest, resolves `(level, topic)` |
//! | [`generate`] | Stage 2: renders the HTML site from the manifest using Maud |
//! | [`headings`] | Heading extraction and slug ids, the single source of anchor ids |
//! | [`markdown`] | Front matter and markdown rendering with indexed heading ids |
//! | [`tracker`] | Active-section tracking and retried anchor navigation |
//! | [`view`] | A document view binding headings, tracker and viewport together |
//! | [`search`] | Case-insensitive substring search and the browser search index |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`types`] | Shared types serialized in the manifest (`Heading`, `NavItem`) |
//! | [`naming`] | `NNN-name` filename convention parser for levels and topics |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One Slug Function
//!
//! Heading ids are assigned once, by [`headings::extract_headings`], and stored
//! in the manifest. The renderer attaches those ids to heading tags by source
//! position instead of computing its own, and the browser script reads them
//! back from `data-target`. A TOC link therefore always has a target.
//!
//! ## Tracker Without Timers
//!
//! [`tracker::SectionTracker`] never sleeps or spawns. The host passes the
//! current [`std::time::Instant`] to `navigate_to` and `poll`, and supplies
//! layout through the [`tracker::Viewport`] trait. Starting a new navigation
//! replaces the pending one, so a stale retry can never scroll the page.
//! `static/toc.js` follows the same rules in the browser.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time
//! HTML macro system. Malformed HTML is a build error and every
//! interpolation is escaped, which matters for heading text written by hand.
//!
//! ## NNN-Prefix Ordering
//!
//! Levels and topics use a numeric prefix (`010-`, `020-`) for explicit
//! ordering, parsed by [`naming::parse_entry_name`]. Items without a prefix
//! are built but hidden from navigation.

pub mod config;
pub mod generate;
pub mod headings;
pub mod markdown;
pub mod naming;
pub mod output;
pub mod scan;
pub mod search;
pub mod tracker;
pub mod types;
pub mod view;

#[cfg(test)]
pub(crate) mod test_helpers;
