//! One open document: its heading list, tracker and viewport.
//!
//! A [`DocumentView`] is built when a document is opened and owns everything
//! the table of contents needs while it is on screen. Scroll and navigation
//! events are delivered to [`DocumentView::handle`]; dropping the view (or
//! calling [`DocumentView::close`] to get the viewport back) ends tracking.
//! Two views never share state, so separate tabs cannot steal each other's
//! active heading.

use crate::headings::extract_headings;
use crate::tracker::{Navigation, SectionTracker, TrackerSettings, Viewport};
use crate::types::Heading;
use std::time::Instant;

/// Input delivered by the host, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// The viewport scrolled.
    Scroll,
    /// The reader picked a table-of-contents entry.
    Navigate(String),
    /// Timer tick; drives navigation retries.
    Tick,
}

/// A table-of-contents row as the navigation panel draws it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry<'a> {
    pub level: u8,
    pub text: &'a str,
    pub id: &'a str,
    pub active: bool,
}

pub struct DocumentView<V: Viewport> {
    headings: Vec<Heading>,
    tracker: SectionTracker,
    viewport: V,
}

impl<V: Viewport> DocumentView<V> {
    /// Index `body` and start tracking it in `viewport`.
    pub fn open(body: &str, viewport: V, settings: TrackerSettings) -> Self {
        let headings = extract_headings(body);
        let tracker = SectionTracker::new(&headings, settings);
        Self {
            headings,
            tracker,
            viewport,
        }
    }

    /// Re-index after the body changed. The active id resets to the first
    /// heading and any waiting navigation is dropped.
    pub fn reload(&mut self, body: &str) {
        self.headings = extract_headings(body);
        self.tracker.load(&self.headings);
    }

    pub fn headings(&self) -> &[Heading] {
        &self.headings
    }

    pub fn active(&self) -> Option<&str> {
        self.tracker.active()
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    /// Apply one host event and return the active id afterwards.
    pub fn handle(&mut self, event: ViewEvent, now: Instant) -> Option<&str> {
        match event {
            ViewEvent::Scroll => {
                self.tracker.on_scroll(&self.viewport);
            }
            ViewEvent::Navigate(id) => {
                if let Navigation::Abandoned(id) =
                    self.tracker.navigate_to(&id, &mut self.viewport, now)
                {
                    log::debug!("no anchor for #{id}");
                }
            }
            ViewEvent::Tick => {
                self.tracker.poll(&mut self.viewport, now);
            }
        }
        self.tracker.active()
    }

    /// Rows for the navigation panel, with the active one marked.
    pub fn toc(&self) -> Vec<TocEntry<'_>> {
        let active = self.tracker.active();
        self.headings
            .iter()
            .map(|h| TocEntry {
                level: h.level,
                text: &h.text,
                id: &h.id,
                active: active == Some(h.id.as_str()),
            })
            .collect()
    }

    /// Stop tracking and hand the viewport back.
    pub fn close(self) -> V {
        self.viewport
    }
}
