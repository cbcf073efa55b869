//! Landing gate. `entered` persists as the string `true`/`false`.
//!
//! Unlike a browser page, a pending gate only locks scrolling when the page
//! actually has an overlay to dismiss.

use crate::models::GatePhase;
use crate::preferences::PreferenceStore;

pub const ENTERED_KEY: &str = "entered";

/// One-time interstitial shown before the document can be scrolled.
#[derive(Debug, Clone, PartialEq)]
pub struct LandingGate {
    phase: GatePhase,
    has_overlay: bool,
}

impl LandingGate {
    pub fn load(store: &dyn PreferenceStore, has_overlay: bool) -> Self {
        let entered = store.get(ENTERED_KEY).as_deref() == Some("true");
        Self {
            phase: if entered {
                GatePhase::Entered
            } else {
                GatePhase::Pending
            },
            has_overlay,
        }
    }

    pub fn enter(&mut self, store: &dyn PreferenceStore) {
        self.phase = GatePhase::Entered;
        store.set(ENTERED_KEY, "true");
    }

    /// Returns false when the document has no overlay to bring back.
    pub fn show_again(&mut self, store: &dyn PreferenceStore) -> bool {
        if !self.has_overlay {
            return false;
        }
        self.phase = GatePhase::Pending;
        store.set(ENTERED_KEY, "false");
        true
    }

    pub fn phase(&self) -> GatePhase {
        self.phase
    }

    /// Pending locks scrolling, except on a page without `#landing`.
    pub fn scroll_locked(&self) -> bool {
        self.overlay_visible()
    }

    pub fn overlay_visible(&self) -> bool {
        self.has_overlay && self.phase == GatePhase::Pending
    }
}
