//! Active-section tracking for a document's table of contents.
//!
//! The tracker keeps one heading id marked as active while a reader scrolls,
//! and moves it immediately when the reader picks an entry from the table of
//! contents. It is host-agnostic: element positions and scrolling go through
//! the [`Viewport`] trait, and time is passed in explicitly, so the same rules
//! can be driven by a test, a terminal pager, or a recorded scroll session.
//! The browser script shipped with generated sites (`static/toc.js`) applies
//! the same rules with the same [`TrackerSettings`].
//!
//! ## Scroll rule
//!
//! Headings are scanned from the bottom of the document upwards; the first
//! one whose anchor top is at or above the reading line
//! ([`TrackerSettings::scroll_threshold`], 200px by default) becomes active.
//! When the reader is above the first heading nothing qualifies and the
//! current id is kept, so the first heading stays selected on load.
//!
//! ## Navigation
//!
//! [`SectionTracker::navigate_to`] activates and scrolls to a heading at once
//! if its anchor exists. Otherwise the request is parked and retried by
//! [`SectionTracker::poll`] every `retry_interval`, up to `max_retries` more
//! times, then dropped without an error. A newer request replaces a parked one.

use crate::config::TocConfig;
use crate::types::Heading;
use std::time::{Duration, Instant};

pub const DEFAULT_SCROLL_THRESHOLD: f64 = 200.0;
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(100);
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Tuning for scroll tracking and navigation retries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerSettings {
    /// Distance in pixels from the viewport top that counts as "reached".
    pub scroll_threshold: f64,
    /// Delay between lookups while waiting for an anchor to render.
    pub retry_interval: Duration,
    /// Lookups after the first before a navigation is given up.
    pub max_retries: u32,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl From<&TocConfig> for TrackerSettings {
    fn from(config: &TocConfig) -> Self {
        Self {
            scroll_threshold: config.scroll_threshold,
            retry_interval: Duration::from_millis(config.retry_interval_ms),
            max_retries: config.max_retries,
        }
    }
}

/// The rendered surface a document is displayed in.
pub trait Viewport {
    /// Top edge of the anchor element with this id, relative to the top of
    /// the visible area. `None` if the anchor has not been rendered.
    fn anchor_top(&self, id: &str) -> Option<f64>;

    /// Smoothly scroll so the anchor's top edge meets the viewport top.
    fn scroll_into_view(&mut self, id: &str);
}

/// Outcome of a navigation request or retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// The anchor was found, activated and scrolled to.
    Arrived(String),
    /// The anchor is not rendered yet; `retries_left` lookups remain.
    Pending { id: String, retries_left: u32 },
    /// The retry budget ran out. Nothing changed.
    Abandoned(String),
    /// No navigation is in flight.
    Idle,
}

#[derive(Debug)]
struct PendingNavigation {
    id: String,
    retries_left: u32,
    due: Instant,
}

/// Active-heading state for one open document.
#[derive(Debug)]
pub struct SectionTracker {
    ids: Vec<String>,
    active: Option<String>,
    pending: Option<PendingNavigation>,
    settings: TrackerSettings,
}

impl SectionTracker {
    /// Start tracking a freshly loaded document. The first heading (if any)
    /// is active from the start.
    pub fn new(headings: &[Heading], settings: TrackerSettings) -> Self {
        let mut tracker = Self {
            ids: Vec::new(),
            active: None,
            pending: None,
            settings,
        };
        tracker.load(headings);
        tracker
    }

    /// Swap in a new document's headings, resetting the active id and
    /// dropping any parked navigation.
    pub fn load(&mut self, headings: &[Heading]) {
        self.ids = headings.iter().map(|h| h.id.clone()).collect();
        self.active = self.ids.first().cloned();
        self.pending = None;
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    /// Id of the navigation waiting for its anchor, if any.
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.id.as_str())
    }

    /// Re-derive the active heading from current anchor positions.
    ///
    /// Anchors that are not rendered are skipped. If no heading has reached
    /// the reading line the previous value is kept.
    pub fn on_scroll(&mut self, viewport: &impl Viewport) -> Option<&str> {
        let threshold = self.settings.scroll_threshold;
        let reached = self.ids.iter().rev().find(|id| {
            viewport
                .anchor_top(id)
                .is_some_and(|top| top <= threshold)
        });
        if let Some(id) = reached
            && self.active.as_deref() != Some(id.as_str())
        {
            self.active = Some(id.clone());
        }
        self.active()
    }

    /// Jump to a heading, or park the request until its anchor renders.
    ///
    /// Replaces any navigation that is still waiting.
    pub fn navigate_to(
        &mut self,
        id: &str,
        viewport: &mut impl Viewport,
        now: Instant,
    ) -> Navigation {
        if let Some(stale) = self.pending.take() {
            log::debug!("navigation to #{} superseded by #{id}", stale.id);
        }
        if viewport.anchor_top(id).is_some() {
            return self.arrive(id.to_string(), viewport);
        }
        if self.settings.max_retries == 0 {
            return Navigation::Abandoned(id.to_string());
        }

        self.pending = Some(PendingNavigation {
            id: id.to_string(),
            retries_left: self.settings.max_retries,
            due: now + self.settings.retry_interval,
        });
        Navigation::Pending {
            id: id.to_string(),
            retries_left: self.settings.max_retries,
        }
    }

    /// Retry a parked navigation if its next attempt is due.
    pub fn poll(&mut self, viewport: &mut impl Viewport, now: Instant) -> Navigation {
        let Some(mut pending) = self.pending.take() else {
            return Navigation::Idle;
        };
        if now < pending.due {
            let state = Navigation::Pending {
                id: pending.id.clone(),
                retries_left: pending.retries_left,
            };
            self.pending = Some(pending);
            return state;
        }

        if viewport.anchor_top(&pending.id).is_some() {
            return self.arrive(pending.id, viewport);
        }

        pending.retries_left -= 1;
        if pending.retries_left == 0 {
            log::debug!("anchor #{} never rendered, navigation dropped", pending.id);
            return Navigation::Abandoned(pending.id);
        }
        log::debug!(
            "anchor #{} not rendered, {} retries left",
            pending.id,
            pending.retries_left
        );
        pending.due = now + self.settings.retry_interval;
        let state = Navigation::Pending {
            id: pending.id.clone(),
            retries_left: pending.retries_left,
        };
        self.pending = Some(pending);
        state
    }

    fn arrive(&mut self, id: String, viewport: &mut impl Viewport) -> Navigation {
        self.active = Some(id.clone());
        viewport.scroll_into_view(&id);
        Navigation::Arrived(id)
    }
}
