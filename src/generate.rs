//! HTML site generation.
//!
//! Stage 2 of the build. Reads the scan manifest and writes the static site.
//!
//! ## Generated Pages
//!
//! - **Home** (`/index.html`): site intro and every level with its topics
//! - **Level pages** (`/{level}/index.html`): level intro and topic list
//! - **Document pages** (`/{level}/{topic}/index.html`): sidebar navigation,
//!   the rendered article, and an "On this page" table of contents
//! - **Not found** (`/404.html`): served for unknown `(level, topic)` pairs
//! - **Search index** (`/search-index.json`): sections for the search box
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── 404.html
//! ├── search-index.json
//! ├── beginner/
//! │   ├── index.html
//! │   ├── introduction/index.html
//! │   └── crud-operations/index.html
//! └── intermediate/
//!     └── ...
//! ```
//!
//! ## Table of Contents
//!
//! The TOC is the document's [`Heading`] list. Article headings get their
//! `id` from the same list (see [`crate::markdown::render_markdown`]), so
//! every TOC link has a target. `static/toc.js` tracks the active entry with
//! the `[toc]` settings, which are written onto `<main>` as `data-*`
//! attributes. The first heading is marked active in the static HTML, which
//! is the tracker's state on load.
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time and inlined into each page:
//! - `static/style.css`: base styles (colors and sizes injected from config)
//! - `static/theme.js`: light/dark toggle
//! - `static/toc.js`: active-section tracking and TOC navigation
//! - `static/search.js`: search box over `search-index.json`

use crate::config::{self, SiteConfig};
use crate::markdown::render_markdown;
use crate::scan::{Document, Level, Manifest};
use crate::search::build_index;
use crate::tracker::{SectionTracker, TrackerSettings};
use crate::types::{Heading, NavItem};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const THEME_JS: &str = include_str!("../static/theme.js");
const TOC_JS: &str = include_str!("../static/toc.js");
const SEARCH_JS: &str = include_str!("../static/search.js");

const SEARCH_INDEX_FILE: &str = "search-index.json";

/// Neighbours of a document in reading order within its level.
struct Siblings<'a> {
    prev: Option<&'a Document>,
    next: Option<&'a Document>,
}

/// Write the site for `manifest` into `output_dir`, copying `source_dir/assets`.
pub fn generate(
    manifest: &Manifest,
    source_dir: &Path,
    output_dir: &Path,
) -> Result<(), GenerateError> {
    let css = format!(
        "{}\n\n{}\n\n{}",
        config::generate_color_css(&manifest.config.colors),
        config::generate_theme_css(&manifest.config.theme),
        CSS_STATIC
    );

    fs::create_dir_all(output_dir)?;

    let assets = source_dir.join("assets");
    if assets.is_dir() {
        copy_dir_recursive(&assets, output_dir)?;
    }

    fs::write(
        output_dir.join("index.html"),
        render_index(manifest, &css).into_string(),
    )?;
    fs::write(
        output_dir.join("404.html"),
        render_not_found(manifest, &css).into_string(),
    )?;

    let index = build_index(manifest);
    fs::write(
        output_dir.join(SEARCH_INDEX_FILE),
        serde_json::to_string(&index)?,
    )?;

    for level in &manifest.levels {
        let level_dir = output_dir.join(&level.slug);
        fs::create_dir_all(&level_dir)?;
        fs::write(
            level_dir.join("index.html"),
            render_level_page(level, manifest, &css).into_string(),
        )?;
    }

    let pages: Vec<(&Level, &Document, Siblings)> = manifest
        .levels
        .iter()
        .flat_map(|level| {
            level
                .documents
                .iter()
                .map(move |doc| (level, doc, siblings(level, doc)))
        })
        .collect();

    pages
        .par_iter()
        .try_for_each(|(level, doc, siblings)| -> Result<(), GenerateError> {
            let page_dir = output_dir.join(&doc.level).join(&doc.topic);
            fs::create_dir_all(&page_dir)?;
            let page = render_document_page(doc, level, siblings, manifest, &css);
            fs::write(page_dir.join("index.html"), page.into_string())?;
            log::debug!("rendered {}", doc.path());
            Ok(())
        })?;

    Ok(())
}

fn siblings<'a>(level: &'a Level, doc: &Document) -> Siblings<'a> {
    if !doc.in_nav {
        return Siblings {
            prev: None,
            next: None,
        };
    }
    let listed: Vec<&Document> = level.documents.iter().filter(|d| d.in_nav).collect();
    let pos = listed.iter().position(|d| d.topic == doc.topic);
    Siblings {
        prev: pos.and_then(|p| p.checked_sub(1)).map(|p| listed[p]),
        next: pos.and_then(|p| listed.get(p + 1).copied()),
    }
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, css: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
                script { (PreEscaped(THEME_JS)) }
            }
            body {
                (content)
                script { (PreEscaped(SEARCH_JS)) }
            }
        }
    }
}

/// Renders the sticky header: site title, breadcrumb, search and theme toggle
fn site_header(config: &SiteConfig, breadcrumb: Markup) -> Markup {
    html! {
        header.site-header {
            a.site-title href="/" { (config.site_title) }
            nav.breadcrumb { (breadcrumb) }
            form.search role="search"
                data-index={ "/" (SEARCH_INDEX_FILE) }
                data-min-length=(config.search.min_query_len)
                data-max-results=(config.search.max_results) {
                input id="search-input" type="search" placeholder="Search" autocomplete="off" aria-label="Search";
                ul id="search-results" hidden {}
            }
            button.theme-toggle type="button" aria-label="Toggle dark mode" { "◐" }
        }
    }
}

/// Renders the level/topic navigation sidebar
pub fn render_sidebar(items: &[NavItem], current_path: &str) -> Markup {
    html! {
        nav.sidebar aria-label="Topics" {
            ul {
                @for item in items {
                    (render_nav_item(item, current_path))
                }
            }
        }
    }
}

/// Renders a single navigation item (a level with topic children, or a topic)
fn render_nav_item(item: &NavItem, current_path: &str) -> Markup {
    let is_current =
        item.path == current_path || current_path.starts_with(&format!("{}/", item.path));

    html! {
        li class=[is_current.then_some("current")] {
            a href={ "/" (item.path) "/" } { (item.title) }
            @if !item.children.is_empty() {
                ul {
                    @for child in &item.children {
                        (render_nav_item(child, current_path))
                    }
                }
            }
        }
    }
}

/// Renders the "On this page" panel from a document's headings
pub fn render_toc(headings: &[Heading], active: Option<&str>) -> Markup {
    html! {
        aside.toc aria-label="On this page" {
            p.toc-title { "On this page" }
            @if headings.is_empty() {
                p.toc-empty { "No headings found" }
            } @else {
                ul {
                    @for heading in headings {
                        @let is_active = active == Some(heading.id.as_str());
                        li class={ "toc-level-" (heading.level) } {
                            a class=[is_active.then_some("active")]
                                href={ "#" (heading.id) }
                                data-target=(heading.id) {
                                (heading.text)
                            }
                        }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the home page with every level and its topics
fn render_index(manifest: &Manifest, css: &str) -> Markup {
    let config = &manifest.config;
    let breadcrumb = html! { a href="/" { "Home" } };
    let intro = manifest
        .home_intro
        .as_deref()
        .map(|body| render_markdown(body, &[]));

    let content = html! {
        (site_header(config, breadcrumb))
        main.index-page {
            @if let Some(intro) = intro {
                section.intro { (PreEscaped(intro)) }
            } @else {
                h1 { (config.site_title) }
            }
            div.level-grid {
                @for level in manifest.levels.iter().filter(|l| l.in_nav) {
                    section.level-card {
                        h2 { a href={ "/" (level.slug) "/" } { (level.title) } }
                        @if let Some(desc) = &level.description {
                            p.level-description { (desc) }
                        }
                        ul {
                            @for doc in level.documents.iter().filter(|d| d.in_nav) {
                                li { a href={ "/" (doc.path()) "/" } { (doc.title) } }
                            }
                        }
                    }
                }
            }
        }
    };

    base_document(&config.site_title, css, content)
}

/// Renders a level page with its intro and topic list
fn render_level_page(level: &Level, manifest: &Manifest, css: &str) -> Markup {
    let config = &manifest.config;
    let breadcrumb = html! {
        a href="/" { "Home" }
        " › "
        (level.title)
    };
    let intro = level.intro.as_deref().map(|body| render_markdown(body, &[]));

    let content = html! {
        (site_header(config, breadcrumb))
        div.layout {
            (render_sidebar(&manifest.navigation, &level.slug))
            main.level-page {
                h1 { (level.title) }
                @if let Some(intro) = intro {
                    section.intro { (PreEscaped(intro)) }
                } @else if let Some(desc) = &level.description {
                    p.level-description { (desc) }
                }
                ol.topic-list {
                    @for doc in &level.documents {
                        li {
                            a href={ "/" (doc.path()) "/" } { (doc.title) }
                            @if let Some(desc) = &doc.description {
                                p.topic-description { (desc) }
                            }
                        }
                    }
                }
            }
        }
    };

    let title = format!("{} · {}", level.title, config.site_title);
    base_document(&title, css, content)
}

/// Renders a document page: sidebar, article, table of contents
fn render_document_page(
    doc: &Document,
    level: &Level,
    siblings: &Siblings,
    manifest: &Manifest,
    css: &str,
) -> Markup {
    let config = &manifest.config;
    let tracker = SectionTracker::new(&doc.headings, TrackerSettings::from(&config.toc));
    let settings = tracker.settings();
    let article = render_markdown(&doc.body, &doc.headings);

    let breadcrumb = html! {
        a href="/" { "Home" }
        " › "
        a href={ "/" (level.slug) "/" } { (level.title) }
        " › "
        (doc.title)
    };

    let content = html! {
        (site_header(config, breadcrumb))
        div.layout.with-toc {
            (render_sidebar(&manifest.navigation, &doc.path()))
            main.document-page
                data-scroll-threshold=(settings.scroll_threshold.to_string())
                data-retry-interval=(settings.retry_interval.as_millis())
                data-max-retries=(settings.max_retries) {
                article.document {
                    (PreEscaped(article))
                }
                nav.pager {
                    @if let Some(prev) = siblings.prev {
                        a.prev href={ "/" (prev.path()) "/" } rel="prev" { "← " (prev.title) }
                    }
                    @if let Some(next) = siblings.next {
                        a.next href={ "/" (next.path()) "/" } rel="next" { (next.title) " →" }
                    }
                }
            }
            (render_toc(&doc.headings, tracker.active()))
        }
        script { (PreEscaped(TOC_JS)) }
    };

    let title = format!("{} · {}", doc.title, config.site_title);
    base_document(&title, css, content)
}

/// Renders the page served for unknown documents
fn render_not_found(manifest: &Manifest, css: &str) -> Markup {
    let config = &manifest.config;
    let breadcrumb = html! { a href="/" { "Home" } };

    let content = html! {
        (site_header(config, breadcrumb))
        div.layout {
            (render_sidebar(&manifest.navigation, ""))
            main.not-found {
                h1 { "Page not found" }
                p { "There is no article at this address. Pick a topic from the list or search above." }
            }
        }
    };

    let title = format!("Not found · {}", config.site_title);
    base_document(&title, css, content)
}

// ============================================================================
// Tests
// ============================================================================
