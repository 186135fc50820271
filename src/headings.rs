//! Heading extraction and anchor-id assignment.
//!
//! Every id that appears on a generated page comes from this module: the
//! table of contents, the `id` attributes stamped on rendered `<hN>` elements
//! (see [`crate::markdown::render_markdown`]) and the active-section tracker
//! all consume the same [`Heading`] list. Nothing else derives slugs.
//!
//! ## Recognised headings
//!
//! Headings come from the same `pulldown-cmark` event stream the renderer
//! walks, so code blocks, HTML blocks and container markup never produce an
//! entry the page does not have. Of those, only ATX headings whose source
//! line starts (column 0) with one to four `#` markers, then spaces or tabs,
//! then a label are indexed:
//!
//! ```text
//! # Overview            → level 1, "Overview"
//! ####   Deep dive      → level 4, "Deep dive"
//! ##### Too deep        → ignored (five markers)
//! #NoSpace              → ignored
//!   # Indented          → ignored
//! ```
//!
//! ## Slugs
//!
//! [`slugify`] lowercases, trims, turns whitespace runs into `-`, drops
//! everything that is not a word character or `-`, then collapses repeated
//! hyphens. Repeats within one document are disambiguated by
//! [`SlugRegistry`]: `overview`, `overview-1`, `overview-2`, ...

use crate::markdown::parser_options;
use crate::types::Heading;
use pulldown_cmark::{Event, Parser, Tag};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

static HEADING_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,4})[ \t]+(.+)$").expect("heading pattern must compile"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern must compile"));
static NON_SLUG_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w-]").expect("slug charset pattern must compile"));
static HYPHEN_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-{2,}").expect("hyphen pattern must compile"));

/// Scan `raw` and return its headings in document order, each with a unique id.
///
/// Never fails: text without headings yields an empty list and malformed
/// heading lines are treated as ordinary text. The output depends only on
/// `raw`, so re-indexing unchanged text gives identical ids.
pub fn extract_headings(raw: &str) -> Vec<Heading> {
    let mut registry = SlugRegistry::new();
    let mut headings = Vec::new();

    for (event, range) in Parser::new_ext(raw, parser_options()).into_offset_iter() {
        let Event::Start(Tag::Heading { .. }) = event else {
            continue;
        };
        let offset = range.start;
        if offset > 0 && !raw[..offset].ends_with('\n') {
            continue;
        }
        let line = raw[offset..].lines().next().unwrap_or_default();
        let Some(caps) = HEADING_LINE.captures(line) else {
            continue;
        };
        let level = caps[1].len() as u8;
        let text = caps[2].trim().to_string();

        let position = headings.len() + 1;
        let mut base = slugify(&text);
        if base.is_empty() {
            log::warn!("heading {position} ({text:?}) has no slug characters, using section-{position}");
            base = format!("section-{position}");
        }

        headings.push(Heading {
            level,
            id: registry.assign(&base),
            text,
            offset,
        });
    }

    headings
}

/// Derive the base anchor slug for a heading label.
///
/// Does not disambiguate; see [`SlugRegistry`] for that.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let hyphenated = WHITESPACE_RUN.replace_all(lowered.trim(), "-");
    let stripped = NON_SLUG_CHAR.replace_all(&hyphenated, "");
    HYPHEN_RUN.replace_all(&stripped, "-").into_owned()
}

/// Per-document bookkeeping that turns base slugs into unique ids.
///
/// The first occurrence of a base keeps it as-is; later ones get `-1`, `-2`,
/// and so on. A generated suffix never reuses an id already handed out, so a
/// literal `Overview 1` heading cannot collide with the second `Overview`.
#[derive(Debug, Default)]
pub struct SlugRegistry {
    seen: HashMap<String, usize>,
    taken: HashSet<String>,
}

impl SlugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the unique id for the next heading with this base slug.
    pub fn assign(&mut self, base: &str) -> String {
        let count = self.seen.entry(base.to_string()).or_insert(0);
        let mut candidate = if *count == 0 {
            base.to_string()
        } else {
            format!("{base}-{count}")
        };
        while self.taken.contains(&candidate) {
            *count += 1;
            candidate = format!("{base}-{count}");
        }
        *count += 1;
        self.taken.insert(candidate.clone());
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(headings: &[Heading]) -> Vec<&str> {
        headings.iter().map(|h| h.id.as_str()).collect()
    }

    // =========================================================================
    // slugify
    // =========================================================================

    #[test]
    fn slugify_strips_operator_sigils() {
        assert_eq!(slugify("  $in and $nin Operators  "), "in-and-nin-operators");
    }

    #[test]
    fn slugify_lowercases_and_hyphenates() {
        assert_eq!(slugify("Working With Indexes"), "working-with-indexes");
    }

    #[test]
    fn slugify_collapses_whitespace_runs() {
        assert_eq!(slugify("Read \t  Concern"), "read-concern");
    }

    #[test]
    fn slugify_collapses_hyphen_runs_left_by_punctuation() {
        assert_eq!(slugify("Insert - Update - Delete"), "insert-update-delete");
    }

    #[test]
    fn slugify_keeps_underscores_and_digits() {
        assert_eq!(slugify("The _id Field in v4.2"), "the-_id-field-in-v42");
    }

    #[test]
    fn slugify_of_punctuation_only_is_empty() {
        assert_eq!(slugify("?!"), "");
    }

    // =========================================================================
    // extract_headings
    // =========================================================================

    #[test]
    fn headings_in_document_order_with_levels() {
        let text = "# Intro\n\nbody\n\n## Setup\n### Install\n#### Verify\n## Usage\n";
        let headings = extract_headings(text);

        let levels: Vec<u8> = headings.iter().map(|h| h.level).collect();
        assert_eq!(levels, vec![1, 2, 3, 4, 2]);
        assert_eq!(ids(&headings), vec!["intro", "setup", "install", "verify", "usage"]);
    }

    #[test]
    fn repeated_titles_get_numbered_suffixes() {
        let headings = extract_headings("## Overview\ntext\n## Overview\n## Overview\n");
        assert_eq!(ids(&headings), vec!["overview", "overview-1", "overview-2"]);
    }

    #[test]
    fn generated_suffix_never_reuses_a_literal_id() {
        let headings = extract_headings("# Overview\n# Overview\n# Overview 1\n");
        assert_eq!(ids(&headings), vec!["overview", "overview-1", "overview-1-1"]);
    }

    #[test]
    fn literal_suffix_first_pushes_repeat_further() {
        let headings = extract_headings("# Overview 1\n# Overview\n# Overview\n");
        assert_eq!(ids(&headings), vec!["overview-1", "overview", "overview-2"]);
    }

    #[test]
    fn ids_are_unique_across_many_repeats() {
        let text = "## Step\n".repeat(25);
        let headings = extract_headings(&text);
        let unique: HashSet<&str> = headings.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(headings.len(), 25);
        assert_eq!(unique.len(), 25);
    }

    #[test]
    fn no_heading_lines_yields_empty_list() {
        assert!(extract_headings("Just prose.\n\nMore prose.").is_empty());
        assert!(extract_headings("").is_empty());
    }

    #[test]
    fn marker_without_space_is_not_a_heading() {
        assert!(extract_headings("#hashtag\n##also-not\n").is_empty());
    }

    #[test]
    fn five_markers_are_ignored() {
        let headings = extract_headings("##### Too deep\n#### Deep enough\n");
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].level, 4);
    }

    #[test]
    fn heading_must_start_at_line_boundary() {
        assert!(extract_headings("text # not a heading\n  # indented\n").is_empty());
    }

    #[test]
    fn text_is_trimmed_but_markup_kept() {
        let headings = extract_headings("##   Using `$lookup`   \n");
        assert_eq!(headings[0].text, "Using `$lookup`");
        assert_eq!(headings[0].id, "using-lookup");
    }

    #[test]
    fn crlf_line_endings_are_handled() {
        let headings = extract_headings("# One\r\ntext\r\n## Two\r\n");
        assert_eq!(ids(&headings), vec!["one", "two"]);
        assert_eq!(headings[1].text, "Two");
    }

    #[test]
    fn empty_slug_falls_back_to_position() {
        let headings = extract_headings("# Intro\n## ???\n## !!!\n");
        assert_eq!(ids(&headings), vec!["intro", "section-2", "section-3"]);
    }

    #[test]
    fn fenced_code_is_skipped() {
        let text = "# Install\n```bash\n# start the server\nmongod --dbpath /data\n```\n## Connect\n";
        let headings = extract_headings(text);
        assert_eq!(ids(&headings), vec!["install", "connect"]);
    }

    #[test]
    fn indented_fence_in_list_closes_with_the_list() {
        let text = "- step\n\n  ```\n# Real heading\n  ```\n\n## After\n";
        let headings = extract_headings(text);
        assert_eq!(ids(&headings), vec!["real-heading"]);
    }

    #[test]
    fn html_block_lines_are_not_headings() {
        let headings = extract_headings("<div>\n# Inside\n</div>\n\n## Out\n");
        assert_eq!(ids(&headings), vec!["out"]);
    }

    #[test]
    fn non_breaking_space_does_not_separate_marker() {
        let headings = extract_headings("#\u{a0}Nbsp\n\n## Ok\n");
        assert_eq!(ids(&headings), vec!["ok"]);
    }

    #[test]
    fn tilde_fence_needs_matching_close() {
        let text = "~~~~\n# inside\n~~~\n# still inside\n~~~~\n# Outside\n";
        let headings = extract_headings(text);
        assert_eq!(ids(&headings), vec!["outside"]);
    }

    #[test]
    fn offsets_point_at_heading_lines() {
        let text = "intro\n## Setup\nbody\n### Step\n";
        let headings = extract_headings(text);
        for heading in &headings {
            assert!(text[heading.offset..].starts_with('#'));
        }
        assert_eq!(headings[0].offset, 6);
    }

    #[test]
    fn extraction_is_deterministic() {
        let text = "# A\n## B\n## B\n### ?\n# A\n";
        assert_eq!(extract_headings(text), extract_headings(text));
    }

    // =========================================================================
    // SlugRegistry
    // =========================================================================

    #[test]
    fn registry_is_per_instance() {
        let mut first = SlugRegistry::new();
        let mut second = SlugRegistry::new();
        assert_eq!(first.assign("overview"), "overview");
        assert_eq!(first.assign("overview"), "overview-1");
        assert_eq!(second.assign("overview"), "overview");
    }
}
