use std::time::{Duration, Instant};

use eyre::Result;

use crate::logging;

pub const FEEDBACK_DURATION: Duration = Duration::from_millis(2000);
pub const COPIED_LABEL: &str = "Copied!";
pub const DEFAULT_COPY_LABEL: &str = "Copy";
pub const NAV_MARGIN: i64 = 20;

pub trait ClipboardSink {
    fn set_text(&mut self, text: String) -> Result<()>;
}

/// System clipboard. Construction may fail on headless machines; the copy
/// affordance then degrades to doing nothing.
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        let inner = match arboard::Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(err) => {
                logging::warn(format!("Clipboard unavailable: {err}"));
                None
            }
        };
        Self { inner }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: String) -> Result<()> {
        let clipboard = self
            .inner
            .as_mut()
            .ok_or_else(|| eyre::eyre!("no clipboard"))?;
        clipboard.set_text(text)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    Resting,
    Success,
}

/// A copy trigger paired with the formula text next to it.
#[derive(Debug, Clone, PartialEq)]
pub struct CopyButton {
    pub label: String,
    pub style: ButtonStyle,
    original_label: String,
    text: String,
    revert_at: Option<Instant>,
    duration: Duration,
}

impl CopyButton {
    pub fn new(label: &str, text: &str) -> Self {
        let label = if label.trim().is_empty() {
            DEFAULT_COPY_LABEL
        } else {
            label.trim()
        };
        Self {
            label: label.to_string(),
            style: ButtonStyle::Resting,
            original_label: label.to_string(),
            text: text.to_string(),
            revert_at: None,
            duration: FEEDBACK_DURATION,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Copy the adjacent text. On success the label shows the confirmation
    /// until the delay elapses; triggering again before then restarts the
    /// delay and still restores the original label. Failures change nothing
    /// visible.
    pub fn trigger(&mut self, clipboard: &mut dyn ClipboardSink, now: Instant) -> bool {
        if self.text.is_empty() {
            return false;
        }
        if let Err(err) = clipboard.set_text(self.text.clone()) {
            logging::warn(format!("Copy to clipboard failed: {err}"));
            return false;
        }
        self.label = COPIED_LABEL.to_string();
        self.style = ButtonStyle::Success;
        self.revert_at = Some(now + self.duration);
        true
    }

    /// Revert once the delay has elapsed. Returns true if anything changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.revert_at {
            Some(at) if now >= at => {
                self.label = self.original_label.clone();
                self.style = ButtonStyle::Resting;
                self.revert_at = None;
                true
            }
            _ => false,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.revert_at
    }
}

/// Decorative highlight on the progress indicator. Nothing in the reader
/// decides when a document is "complete"; the pulse only runs when a
/// `UiEvent::CompletionPulse` is sent.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionPulse {
    highlighted: bool,
    revert_at: Option<Instant>,
    duration: Duration,
}

impl Default for CompletionPulse {
    fn default() -> Self {
        Self::new(FEEDBACK_DURATION)
    }
}

impl CompletionPulse {
    pub fn new(duration: Duration) -> Self {
        Self {
            highlighted: false,
            revert_at: None,
            duration,
        }
    }

    pub fn trigger(&mut self, now: Instant) {
        self.highlighted = true;
        self.revert_at = Some(now + self.duration);
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        match self.revert_at {
            Some(at) if now >= at => {
                self.highlighted = false;
                self.revert_at = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.revert_at
    }
}

/// Where outline navigation lands: the section's offset minus a margin.
pub fn navigation_target(section_offset: i64, margin: i64) -> i64 {
    (section_offset - margin).max(0)
}

/// Scroll animation toward a target, one position per frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmoothScroll {
    from: i64,
    target: i64,
    step: u16,
    steps: u16,
}

impl SmoothScroll {
    pub fn new(from: i64, target: i64, steps: u16) -> Self {
        Self {
            from,
            target,
            step: 0,
            steps: steps.max(1),
        }
    }

    pub fn target(&self) -> i64 {
        self.target
    }

    pub fn is_done(&self) -> bool {
        self.step >= self.steps
    }

    /// Next position, ease-out; `None` once the target has been reached.
    pub fn advance(&mut self) -> Option<i64> {
        if self.is_done() {
            return None;
        }
        self.step += 1;
        let t = f64::from(self.step) / f64::from(self.steps);
        let eased = 1.0 - (1.0 - t) * (1.0 - t);
        let distance = (self.target - self.from) as f64;
        Some(self.from + (distance * eased).round() as i64)
    }
}
