//! Shared test utilities.
//!
//! Fixture setup and lookups over scan-stage data, plus [`PageLayout`], an
//! in-memory [`Viewport`] for driving the section tracker without a browser.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = scan(tmp.path()).unwrap();
//! let doc = find_document(&manifest, "beginner", "crud-operations");
//!
//! let mut layout = PageLayout::new(&[("overview", 0.0), ("overview-1", 900.0)]);
//! layout.scroll_to(850.0);
//! ```

use std::collections::HashMap;
use std::path::Path;
use tempfile::TempDir;

use crate::scan::{Document, Manifest};
use crate::tracker::Viewport;
use crate::types::Heading;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Lookups
// =========================================================================

/// Find a document or panic with the available paths.
pub fn find_document<'a>(manifest: &'a Manifest, level: &str, topic: &str) -> &'a Document {
    manifest.document(level, topic).unwrap_or_else(|| {
        let available: Vec<String> = manifest.documents().map(|d| d.path()).collect();
        panic!("document '{level}/{topic}' not found; available: {available:?}")
    })
}

pub fn heading_ids(document: &Document) -> Vec<&str> {
    document.headings.iter().map(|h| h.id.as_str()).collect()
}

/// Level-2 headings with the given ids, in order.
pub fn headings_with_ids(ids: &[&str]) -> Vec<Heading> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| Heading {
            level: 2,
            text: id.to_string(),
            id: id.to_string(),
            offset: i * 10,
        })
        .collect()
}

/// Assert the navigation tree: level titles, each with its topic titles.
pub fn assert_nav_shape(manifest: &Manifest, expected: &[(&str, &[&str])]) {
    let actual: Vec<(&str, Vec<&str>)> = manifest
        .navigation
        .iter()
        .map(|item| {
            (
                item.title.as_str(),
                item.children.iter().map(|c| c.title.as_str()).collect(),
            )
        })
        .collect();
    let expected: Vec<(&str, Vec<&str>)> = expected
        .iter()
        .map(|(title, children)| (*title, children.to_vec()))
        .collect();
    assert_eq!(actual, expected);
}

// =========================================================================
// PageLayout
// =========================================================================

/// Anchors at fixed document positions inside a scrollable window.
#[derive(Debug, Default)]
pub struct PageLayout {
    positions: HashMap<String, f64>,
    scroll_y: f64,
    scrolled_to: Vec<String>,
}

impl PageLayout {
    /// Anchors at absolute document offsets, scrolled to the top.
    pub fn new(anchors: &[(&str, f64)]) -> Self {
        Self {
            positions: anchors
                .iter()
                .map(|(id, y)| (id.to_string(), *y))
                .collect(),
            ..Self::default()
        }
    }

    /// Anchors given directly as viewport-relative tops.
    pub fn with_tops(tops: &[(&str, f64)]) -> Self {
        Self::new(tops)
    }

    pub fn scroll_to(&mut self, y: f64) {
        self.scroll_y = y;
    }

    /// Make an anchor appear, as when late content finishes rendering.
    pub fn render(&mut self, id: &str, y: f64) {
        self.positions.insert(id.to_string(), y);
    }

    /// Ids passed to `scroll_into_view`, in call order.
    pub fn scrolled_to(&self) -> &[String] {
        &self.scrolled_to
    }
}

impl Viewport for PageLayout {
    fn anchor_top(&self, id: &str) -> Option<f64> {
        self.positions.get(id).map(|y| y - self.scroll_y)
    }

    fn scroll_into_view(&mut self, id: &str) {
        if let Some(y) = self.positions.get(id) {
            self.scroll_y = *y;
        }
        self.scrolled_to.push(id.to_string());
    }
}
