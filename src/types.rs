//! Shared types used across the scan and generate stages.
//!
//! These types are serialized into `manifest.json` between stages and are
//! read back unchanged by the generator.

use serde::{Deserialize, Serialize};

/// One heading line found in a document body.
///
/// `id` is unique among the headings of a single document and is the value
/// stamped on the rendered `<hN>` element, the table-of-contents link target
/// and the active-section tracker's lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Number of leading `#` markers (1-4).
    pub level: u8,
    /// Heading label, trimmed of surrounding whitespace. Inline markup is kept.
    pub text: String,
    /// URL-safe anchor id derived from `text`.
    pub id: String,
    /// Byte offset of the heading line within the body it was extracted from.
    pub offset: usize,
}

/// Navigation tree item: a level with its topics as children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavItem {
    pub title: String,
    /// Site-relative path without leading or trailing slash (`beginner/crud`).
    pub path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavItem>,
}
