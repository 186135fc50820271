//! Markdown to HTML, with heading anchors taken from the indexer.
//!
//! Articles are rendered with `pulldown-cmark`. The renderer does not compute
//! slugs itself: each heading event is matched to the [`Heading`] whose line
//! offset falls inside the event's source range, and that heading's `id` is
//! written onto the element. A heading the indexer skipped (levels 5-6, setext
//! underlines, indented `#`) is rendered without an id.
//!
//! Front matter is an optional TOML block fenced by `+++` lines at the very
//! top of a file:
//!
//! ```text
//! +++
//! title = "Aggregation Pipelines"
//! description = "Stages, operators and performance notes"
//! +++
//!
//! # Aggregation
//! ```

use crate::types::Heading;
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html};
use serde::Deserialize;

const FRONT_MATTER_FENCE: &str = "+++";

/// Metadata parsed from a document's front matter block.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Drafts are skipped by the scan stage.
    pub draft: bool,
}

/// Split a raw file into front matter and body.
///
/// Files without a leading `+++` line, or whose block is never closed, have
/// no front matter and the whole text is the body.
pub fn split_front_matter(raw: &str) -> Result<(FrontMatter, &str), toml::de::Error> {
    let Some(first_end) = raw.find('\n') else {
        return Ok((FrontMatter::default(), raw));
    };
    if raw[..first_end].trim_end() != FRONT_MATTER_FENCE {
        return Ok((FrontMatter::default(), raw));
    }

    let block_start = first_end + 1;
    let mut cursor = block_start;
    for line in raw[block_start..].split_inclusive('\n') {
        if line.trim_end() == FRONT_MATTER_FENCE {
            let front: FrontMatter = toml::from_str(&raw[block_start..cursor])?;
            return Ok((front, &raw[cursor + line.len()..]));
        }
        cursor += line.len();
    }

    Ok((FrontMatter::default(), raw))
}

pub(crate) fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
}

/// Render a document body, stamping indexed headings with their ids.
///
/// `headings` must come from [`crate::headings::extract_headings`] over the
/// same `body`, otherwise offsets will not line up and headings render bare.
pub fn render_markdown(body: &str, headings: &[Heading]) -> String {
    let events = Parser::new_ext(body, parser_options())
        .into_offset_iter()
        .map(|(event, range)| match event {
            Event::Start(Tag::Heading {
                level,
                id: _,
                classes,
                attrs,
            }) => {
                let anchor = headings
                    .iter()
                    .find(|h| range.contains(&h.offset) && h.level == level as u8);
                Event::Start(Tag::Heading {
                    level,
                    id: anchor.map(|h| CowStr::from(h.id.clone())),
                    classes,
                    attrs,
                })
            }
            other => other,
        });

    let mut out = String::with_capacity(body.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}
