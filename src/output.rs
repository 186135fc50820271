//! CLI output formatting for the build stages and lookup commands.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Each level and topic
//! leads with its positional index and title; source paths follow as
//! indented `Source:` lines so the output reads as a table of contents that
//! can still be traced back to files.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Levels
//! 001 Getting Started (2 topics)
//!     Source: 010-beginner/
//!     001 What is MongoDB? (4 headings)
//!         Source: 010-beginner/010-introduction.md
//!     002 CRUD Operations (11 headings)
//!         Source: 010-beginner/020-crud-operations.md
//!     scratch-notes (hidden)
//!
//! Config
//!     config.toml
//! ```
//!
//! ## Generate
//!
//! ```text
//! Home → index.html
//! 001 Getting Started → beginner/index.html
//!     001 What is MongoDB? → beginner/introduction/index.html
//! Not found → 404.html
//! Search → search-index.json
//!
//! Generated 3 levels, 6 documents
//! ```
//!
//! ## Toc
//!
//! ```text
//! CRUD Operations (beginner/crud-operations)
//! CRUD Operations  #crud-operations
//!     Overview  #overview
//!     Create  #create
//!         Inserting one document  #inserting-one-document
//! ```
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::scan::{Document, Level, Manifest};
use crate::search::SearchHit;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Level header: index, title and topic count.
///
/// ```text
/// 001 Getting Started (2 topics)
/// ```
fn level_header(index: usize, level: &Level) -> String {
    format!(
        "{} {} ({})",
        format_index(index),
        level.title,
        plural(level.documents.len(), "topic", "topics")
    )
}

/// Topic line: numbered topics show their position, hidden ones their slug.
///
/// ```text
/// 002 CRUD Operations (11 headings)
/// scratch-notes (hidden)
/// ```
fn document_line(index: Option<usize>, doc: &Document) -> String {
    match index {
        Some(i) => format!(
            "{} {} ({})",
            format_index(i),
            doc.title,
            plural(doc.headings.len(), "heading", "headings")
        ),
        None => format!("{} (hidden)", doc.topic),
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Documents of a level with their navigation position; hidden ones last.
fn numbered(level: &Level) -> impl Iterator<Item = (Option<usize>, &Document)> {
    let listed = level.documents.iter().filter(|d| d.in_nav);
    let hidden = level.documents.iter().filter(|d| !d.in_nav);
    listed
        .enumerate()
        .map(|(i, d)| (Some(i + 1), d))
        .chain(hidden.map(|d| (None, d)))
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format scan stage output showing the discovered levels and topics.
pub fn format_scan_output(manifest: &Manifest, source_root: &Path) -> Vec<String> {
    let mut lines = vec!["Levels".to_string()];

    let mut position = 0;
    for level in &manifest.levels {
        let header = if level.in_nav {
            position += 1;
            level_header(position, level)
        } else {
            format!("{} (hidden)", level.slug)
        };
        lines.push(header);
        lines.push(format!("{}Source: {}/", indent(1), level.source_dir));
        if let Some(desc) = &level.description {
            lines.push(format!("{}{}", indent(1), truncate_desc(desc.trim(), 60)));
        }

        for (index, doc) in numbered(level) {
            lines.push(format!("{}{}", indent(1), document_line(index, doc)));
            lines.push(format!("{}Source: {}", indent(2), doc.source_path));
        }
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join("config.toml").exists() {
        lines.push(format!("{}config.toml", indent(1)));
    }
    if source_root.join("index.md").exists() {
        lines.push(format!("{}index.md", indent(1)));
    }
    if source_root.join("assets").is_dir() {
        lines.push(format!("{}assets/", indent(1)));
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest, source_root: &Path) {
    for line in format_scan_output(manifest, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Generate output
// ============================================================================

/// Format generate stage output: every page with the file it was written to.
pub fn format_generate_output(manifest: &Manifest) -> Vec<String> {
    let mut lines = vec!["Home → index.html".to_string()];

    let mut position = 0;
    for level in &manifest.levels {
        let header = if level.in_nav {
            position += 1;
            format!("{} {}", format_index(position), level.title)
        } else {
            level.slug.clone()
        };
        lines.push(format!("{} → {}/index.html", header, level.slug));

        for (index, doc) in numbered(level) {
            let label = match index {
                Some(i) => format!("{} {}", format_index(i), doc.title),
                None => doc.topic.clone(),
            };
            lines.push(format!("{}{} → {}/index.html", indent(1), label, doc.path()));
        }
    }

    lines.push("Not found → 404.html".to_string());
    lines.push("Search → search-index.json".to_string());
    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {}",
        plural(manifest.levels.len(), "level", "levels"),
        plural(manifest.documents().count(), "document", "documents")
    ));

    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(manifest: &Manifest) {
    for line in format_generate_output(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Lookups
// ============================================================================

/// Format a document's heading outline, indented by heading level.
pub fn format_toc(doc: &Document) -> Vec<String> {
    let mut lines = vec![format!("{} ({})", doc.title, doc.path())];
    if doc.headings.is_empty() {
        lines.push(format!("{}No headings found", indent(1)));
        return lines;
    }
    for heading in &doc.headings {
        let depth = usize::from(heading.level.saturating_sub(1));
        lines.push(format!("{}{}  #{}", indent(depth), heading.text, heading.id));
    }
    lines
}

pub fn print_toc(doc: &Document) {
    for line in format_toc(doc) {
        println!("{}", line);
    }
}

/// Format search hits grouped under the document they came from.
pub fn format_search_hits(query: &str, hits: &[SearchHit]) -> Vec<String> {
    if hits.is_empty() {
        return vec![format!("No matches for \"{}\"", query)];
    }

    let mut lines = Vec::new();
    let mut current: Option<(&str, &str)> = None;
    for hit in hits {
        let key = (hit.level.as_str(), hit.topic.as_str());
        if current != Some(key) {
            current = Some(key);
            lines.push(format!("{} ({}/{})", hit.title, hit.level, hit.topic));
        }
        lines.push(format!(
            "{}{:>4}: {}",
            indent(1),
            hit.line_number,
            truncate_desc(&hit.line, 80)
        ));
        lines.push(format!("{}{}", indent(2), hit.url()));
    }
    lines.push(String::new());
    lines.push(plural(hits.len(), "match", "matches"));
    lines
}

pub fn print_search_hits(query: &str, hits: &[SearchHit]) {
    for line in format_search_hits(query, hits) {
        println!("{}", line);
    }
}
