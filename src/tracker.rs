//! Scroll progress and active-section tracking.
//!
//! Geometry is in host units: pixels for a browser-like host, rows for the
//! terminal reader. The defaults below are the pixel values; the reader takes
//! its row-based values from [`crate::settings::Settings`].

use crate::models::SectionGeometry;
use crate::outline::{NodeId, Outline};

pub const ACTIVATION_OFFSET: i64 = 100;
pub const REVEAL_MARGIN: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollMetrics {
    pub scroll_top: i64,
    pub scroll_height: i64,
    pub viewport_height: i64,
}

impl ScrollMetrics {
    /// Scrollable distance, floored at 1 so short pages never divide by zero.
    pub fn scrollable_height(&self) -> i64 {
        (self.scroll_height - self.viewport_height).max(1)
    }

    pub fn max_scroll_top(&self) -> i64 {
        (self.scroll_height - self.viewport_height).max(0)
    }

    pub fn progress(&self) -> f64 {
        (self.scroll_top as f64 / self.scrollable_height() as f64).clamp(0.0, 1.0)
    }

    pub fn percentage(&self) -> u8 {
        (self.progress() * 100.0).round() as u8
    }

    pub fn at_top(&self) -> bool {
        self.scroll_top <= 0
    }
}

/// The scrollable box holding the outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerView {
    pub scroll_top: i64,
    pub height: i64,
    pub row_height: i64,
}

impl Default for ContainerView {
    fn default() -> Self {
        Self {
            scroll_top: 0,
            height: 0,
            row_height: 1,
        }
    }
}

/// The last section in document order whose top has reached `offset`.
pub fn select_active_section(sections: &[SectionGeometry], offset: i64) -> Option<&SectionGeometry> {
    sections.iter().rev().find(|s| s.top <= offset)
}

/// Minimal scroll that brings `[top, bottom)` (relative to the container's
/// visible top) fully into view. `None` when it is already visible.
pub fn reveal_scroll_top(view: ContainerView, top: i64, bottom: i64, margin: i64) -> Option<i64> {
    if top < 0 {
        Some((view.scroll_top + top - margin).max(0))
    } else if bottom > view.height {
        Some(view.scroll_top + bottom - view.height + margin)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressReport {
    pub percentage: u8,
    pub active_section: Option<String>,
    pub active_entry: Option<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tracker {
    pub activation_offset: i64,
    pub reveal_margin: i64,
}

impl Default for Tracker {
    fn default() -> Self {
        Self {
            activation_offset: ACTIVATION_OFFSET,
            reveal_margin: REVEAL_MARGIN,
        }
    }
}

impl Tracker {
    pub fn new(activation_offset: i64, reveal_margin: i64) -> Self {
        Self {
            activation_offset,
            reveal_margin,
        }
    }

    /// One pass of the tracker; runs on load and on every scroll tick.
    pub fn update(
        &self,
        metrics: &ScrollMetrics,
        sections: &[SectionGeometry],
        outline: &mut Outline,
        mut container: Option<&mut ContainerView>,
    ) -> ProgressReport {
        let percentage = metrics.percentage();

        if metrics.at_top()
            && let Some(view) = container.as_deref_mut()
        {
            view.scroll_top = 0;
        }

        let active_section = select_active_section(sections, self.activation_offset)
            .and_then(|s| s.id.clone());

        outline.clear_active();
        let active_entry = active_section
            .as_deref()
            .and_then(|id| outline.find_by_target(id));
        if let Some(entry) = active_entry {
            outline.set_active(entry);
            outline.open_path(entry);
            if let Some(view) = container {
                self.keep_visible(outline, entry, view);
            }
        }

        ProgressReport {
            percentage,
            active_section,
            active_entry,
        }
    }

    fn keep_visible(&self, outline: &Outline, entry: NodeId, container: &mut ContainerView) {
        let Some(row) = outline.row_of(entry) else {
            return;
        };
        let row_height = container.row_height.max(1);
        let top = row as i64 * row_height - container.scroll_top;
        let bottom = top + row_height;
        if let Some(scroll_top) = reveal_scroll_top(*container, top, bottom, self.reveal_margin) {
            let content_height = outline.visible_rows().len() as i64 * row_height;
            let max_scroll = (content_height - container.height).max(0);
            container.scroll_top = scroll_top.min(max_scroll).max(0);
        }
    }
}
