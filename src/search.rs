//! Substring search over loaded documents.
//!
//! No ranking and no inverted index: every line of every document body is
//! checked for the query, case-insensitively, in navigation order. Each hit
//! remembers the nearest heading at or above its line so results can link
//! straight to `/level/topic/#heading-id`.
//!
//! The generate stage also writes `search-index.json`, the same bodies cut
//! into per-heading sections, which `static/search.js` filters in the
//! browser with the same rules.

use crate::config::SearchConfig;
use crate::scan::{Document, Manifest};
use serde::Serialize;

/// One matching line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub level: String,
    pub topic: String,
    pub title: String,
    /// 1-based line number within the body (front matter excluded).
    pub line_number: usize,
    pub line: String,
    /// Id of the closest heading at or above the line.
    pub heading_id: Option<String>,
}

impl SearchHit {
    /// Site URL of the hit, with the heading fragment when there is one.
    pub fn url(&self) -> String {
        match &self.heading_id {
            Some(id) => format!("/{}/{}/#{}", self.level, self.topic, id),
            None => format!("/{}/{}/", self.level, self.topic),
        }
    }
}

/// Find lines containing `query`. Short queries return nothing; at most
/// `settings.max_results` hits are returned.
pub fn search(manifest: &Manifest, query: &str, settings: &SearchConfig) -> Vec<SearchHit> {
    let needle = query.trim().to_lowercase();
    if needle.chars().count() < settings.min_query_len {
        log::debug!("query {query:?} shorter than {} chars", settings.min_query_len);
        return Vec::new();
    }

    manifest
        .documents()
        .flat_map(|doc| document_hits(doc, &needle))
        .take(settings.max_results)
        .collect()
}

fn document_hits<'a>(doc: &'a Document, needle: &'a str) -> impl Iterator<Item = SearchHit> + 'a {
    let mut offset = 0;
    doc.body
        .split_inclusive('\n')
        .enumerate()
        .filter_map(move |(index, chunk)| {
            let line_offset = offset;
            offset += chunk.len();
            let line = chunk.trim_end_matches(['\n', '\r']);
            if !line.to_lowercase().contains(needle) {
                return None;
            }
            let heading_id = doc
                .headings
                .iter()
                .take_while(|h| h.offset <= line_offset)
                .last()
                .map(|h| h.id.clone());
            Some(SearchHit {
                level: doc.level.clone(),
                topic: doc.topic.clone(),
                title: doc.title.clone(),
                line_number: index + 1,
                line: line.trim().to_string(),
                heading_id,
            })
        })
}

/// A document as shipped to the browser search box.
#[derive(Debug, Serialize)]
pub struct IndexEntry {
    pub title: String,
    pub url: String,
    pub sections: Vec<IndexSection>,
}

/// Body text between one heading and the next.
#[derive(Debug, Serialize)]
pub struct IndexSection {
    /// `None` for text before the first heading.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    pub text: String,
}

/// Build the browser index for every document in the manifest.
pub fn build_index(manifest: &Manifest) -> Vec<IndexEntry> {
    manifest
        .documents()
        .map(|doc| IndexEntry {
            title: doc.title.clone(),
            url: format!("/{}/", doc.path()),
            sections: sections(doc),
        })
        .collect()
}

fn sections(doc: &Document) -> Vec<IndexSection> {
    let mut out = Vec::with_capacity(doc.headings.len() + 1);
    let first = doc.headings.first().map_or(doc.body.len(), |h| h.offset);
    let preamble = doc.body[..first].trim();
    if !preamble.is_empty() {
        out.push(IndexSection {
            id: None,
            heading: None,
            text: preamble.to_string(),
        });
    }
    for (i, heading) in doc.headings.iter().enumerate() {
        let end = doc
            .headings
            .get(i + 1)
            .map_or(doc.body.len(), |next| next.offset);
        out.push(IndexSection {
            id: Some(heading.id.clone()),
            heading: Some(heading.text.clone()),
            text: doc.body[heading.offset..end].trim().to_string(),
        });
    }
    out
}
