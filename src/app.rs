//! The whole page state as one value, updated by one function per event.
//!
//! Hosts translate their input into [`UiEvent`]s and render from the fields
//! of [`AppState`]; nothing here touches a terminal.

use std::time::{Duration, Instant};

use crate::affordances::{ClipboardSink, CompletionPulse, CopyButton, SmoothScroll, navigation_target};
use crate::document::{Document, Roles, TextLayout};
use crate::landing::LandingGate;
use crate::logging;
use crate::models::{ScrollBehavior, SectionAnchor, SectionGeometry};
use crate::outline::{NodeId, Outline, accordion, search};
use crate::preferences::PreferenceStore;
use crate::settings::Settings;
use crate::theme::ThemeController;
use crate::tracker::{ContainerView, ScrollMetrics, Tracker};

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    ToggleTheme,
    EnterLanding,
    ShowLanding,
    ToggleEntry(NodeId),
    SearchInput(String),
    ScrollTo(i64),
    ScrollBy(i64),
    Navigate(NodeId),
    BackToTop,
    ScrollToEnd,
    TogglePanel,
    Copy(usize),
    CompletionPulse,
    Resize { viewport_height: i64, toc_height: i64 },
    Relayout { anchors: Vec<SectionAnchor>, content_height: i64 },
    Tick,
}

/// Tunables taken from [`Settings`]; split out so tests can build a state
/// with pixel-like numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Behavior {
    pub tracker: Tracker,
    pub nav_margin: i64,
    pub scroll: ScrollBehavior,
    pub smooth_steps: u16,
    pub feedback: Duration,
}

impl Behavior {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            tracker: Tracker::new(settings.activation_offset, settings.reveal_margin),
            nav_margin: settings.nav_margin,
            scroll: if settings.smooth_scroll {
                ScrollBehavior::Smooth
            } else {
                ScrollBehavior::Instant
            },
            smooth_steps: settings.smooth_scroll_steps,
            feedback: Duration::from_millis(settings.feedback_duration_ms),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub roles: Roles,
    pub theme: ThemeController,
    pub gate: LandingGate,
    pub outline: Outline,
    pub search_query: String,
    pub panel_collapsed: bool,
    pub metrics: ScrollMetrics,
    pub toc_view: ContainerView,
    pub progress: u8,
    pub active_section: Option<String>,
    pub copy_buttons: Vec<CopyButton>,
    pub pulse: CompletionPulse,
    anchors: Vec<SectionAnchor>,
    behavior: Behavior,
    smooth: Option<SmoothScroll>,
}

impl AppState {
    /// Everything the page does once on load: theme, landing gate, accordion,
    /// then one tracker pass.
    pub fn bootstrap(
        document: &Document,
        layout: &TextLayout,
        viewport_height: i64,
        toc_height: i64,
        behavior: Behavior,
        store: &dyn PreferenceStore,
        os_hint: Option<bool>,
    ) -> Self {
        let theme = ThemeController::init(store, os_hint, document.roles.theme_toggle);
        let gate = LandingGate::load(store, document.roles.landing);

        let mut outline = document.outline.clone();
        let expandable = accordion::discover(&mut outline);
        logging::debug(format!(
            "Outline has {} entries, {} expandable",
            outline.len(),
            expandable
        ));

        let copy_buttons = document
            .formulas
            .iter()
            .map(|f| CopyButton::new(&f.trigger_label, &f.text).with_duration(behavior.feedback))
            .collect();

        let mut state = Self {
            roles: document.roles,
            theme,
            gate,
            outline,
            search_query: String::new(),
            panel_collapsed: false,
            metrics: ScrollMetrics {
                scroll_top: 0,
                scroll_height: layout.height(),
                viewport_height,
            },
            toc_view: ContainerView {
                scroll_top: 0,
                height: toc_height,
                row_height: 1,
            },
            progress: 0,
            active_section: None,
            copy_buttons,
            pulse: CompletionPulse::new(behavior.feedback),
            anchors: layout.anchors.clone(),
            behavior,
            smooth: None,
        };
        state.update_progress();
        state
    }

    /// Apply one event. Returns true when anything visible may have changed.
    pub fn handle(
        &mut self,
        event: UiEvent,
        store: &dyn PreferenceStore,
        clipboard: &mut dyn ClipboardSink,
        now: Instant,
    ) -> bool {
        match event {
            UiEvent::ToggleTheme => {
                if !self.roles.theme_toggle {
                    return false;
                }
                self.theme.toggle(store);
                true
            }
            UiEvent::EnterLanding => {
                if !self.gate.overlay_visible() {
                    return false;
                }
                self.gate.enter(store);
                true
            }
            UiEvent::ShowLanding => {
                if !self.roles.show_landing {
                    return false;
                }
                self.smooth = None;
                self.gate.show_again(store)
            }
            UiEvent::ToggleEntry(id) => accordion::toggle(&mut self.outline, id).is_some(),
            UiEvent::SearchInput(query) => {
                if !self.roles.toc_search {
                    return false;
                }
                search::match_and_filter(&mut self.outline, &query);
                self.search_query = query;
                true
            }
            UiEvent::ScrollTo(top) => self.scroll(top, ScrollBehavior::Instant),
            UiEvent::ScrollBy(delta) => {
                let top = self.smooth.as_ref().map_or(self.metrics.scroll_top, |s| s.target());
                self.scroll(top + delta, ScrollBehavior::Instant)
            }
            UiEvent::Navigate(id) => self.navigate(id),
            UiEvent::BackToTop => self.back_to_top(),
            UiEvent::ScrollToEnd => self.scroll(self.metrics.max_scroll_top(), self.behavior.scroll),
            UiEvent::TogglePanel => {
                if !self.roles.panel_toggle {
                    return false;
                }
                self.panel_collapsed = !self.panel_collapsed;
                true
            }
            UiEvent::Copy(index) => match self.copy_buttons.get_mut(index) {
                Some(button) => button.trigger(clipboard, now),
                None => false,
            },
            UiEvent::CompletionPulse => {
                if !self.roles.progress_indicator {
                    return false;
                }
                self.pulse.trigger(now);
                true
            }
            UiEvent::Resize {
                viewport_height,
                toc_height,
            } => {
                self.metrics.viewport_height = viewport_height;
                self.toc_view.height = toc_height;
                self.metrics.scroll_top = self.clamp_scroll(self.metrics.scroll_top);
                self.update_progress();
                true
            }
            UiEvent::Relayout {
                anchors,
                content_height,
            } => {
                let progress = self.metrics.progress();
                self.anchors = anchors;
                self.metrics.scroll_height = content_height;
                self.smooth = None;
                let top = (progress * self.metrics.max_scroll_top() as f64).round() as i64;
                self.metrics.scroll_top = self.clamp_scroll(top);
                self.update_progress();
                true
            }
            UiEvent::Tick => self.tick(now),
        }
    }

    /// Advance the scroll animation one frame and expire feedback timers.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        if let Some(smooth) = self.smooth.as_mut() {
            match smooth.advance() {
                Some(top) => {
                    self.metrics.scroll_top = self.clamp_scroll(top);
                    self.update_progress();
                    changed = true;
                }
                None => self.smooth = None,
            }
            if self.smooth.as_ref().is_some_and(SmoothScroll::is_done) {
                self.smooth = None;
            }
        }
        for button in &mut self.copy_buttons {
            changed |= button.tick(now);
        }
        changed |= self.pulse.tick(now);
        changed
    }

    pub fn is_animating(&self) -> bool {
        self.smooth.is_some()
    }

    /// Earliest pending feedback revert, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.copy_buttons
            .iter()
            .filter_map(CopyButton::deadline)
            .chain(self.pulse.deadline())
            .min()
    }

    pub fn scroll_top(&self) -> i64 {
        self.metrics.scroll_top
    }

    pub fn anchors(&self) -> &[SectionAnchor] {
        &self.anchors
    }

    /// Recompute progress and the active entry from the current scroll
    /// position.
    pub fn update_progress(&mut self) {
        let sections: Vec<SectionGeometry> = self
            .anchors
            .iter()
            .map(|anchor| SectionGeometry {
                id: anchor.id.clone(),
                top: anchor.offset - self.metrics.scroll_top,
            })
            .collect();
        let report = self.behavior.tracker.update(
            &self.metrics,
            &sections,
            &mut self.outline,
            self.roles.toc_container.then_some(&mut self.toc_view),
        );
        self.progress = report.percentage;
        self.active_section = report.active_section;
    }

    fn clamp_scroll(&self, top: i64) -> i64 {
        top.clamp(0, self.metrics.max_scroll_top())
    }

    fn scroll(&mut self, target: i64, behavior: ScrollBehavior) -> bool {
        if self.gate.scroll_locked() {
            return false;
        }
        let target = self.clamp_scroll(target);
        let smooth = behavior == ScrollBehavior::Smooth && self.behavior.smooth_steps > 1;
        if smooth && target != self.metrics.scroll_top {
            self.smooth = Some(SmoothScroll::new(
                self.metrics.scroll_top,
                target,
                self.behavior.smooth_steps,
            ));
            return true;
        }
        self.smooth = None;
        self.metrics.scroll_top = target;
        self.update_progress();
        true
    }

    fn navigate(&mut self, id: NodeId) -> bool {
        let Some(target) = self.outline.node(id).and_then(|n| n.target.clone()) else {
            return false;
        };
        let Some(offset) = self
            .anchors
            .iter()
            .find(|a| a.id.as_deref() == Some(target.as_str()))
            .map(|a| a.offset)
        else {
            logging::debug(format!("No section for outline target #{target}"));
            return false;
        };
        let top = navigation_target(offset, self.behavior.nav_margin);
        self.scroll(top, self.behavior.scroll)
    }

    fn back_to_top(&mut self) -> bool {
        if self.gate.scroll_locked() {
            return false;
        }
        if self.roles.toc_container {
            self.toc_view.scroll_top = 0;
        }
        self.scroll(0, self.behavior.scroll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affordances::{COPIED_LABEL, FEEDBACK_DURATION};
    use crate::landing::ENTERED_KEY;
    use crate::models::{Formula, GatePhase, Theme};
    use crate::outline::fixtures::sample;
    use crate::preferences::MemoryPreferences;
    use crate::theme::THEME_KEY;

    #[derive(Default)]
    struct FakeClipboard(Vec<String>);

    impl ClipboardSink for FakeClipboard {
        fn set_text(&mut self, text: String) -> eyre::Result<()> {
            self.0.push(text);
            Ok(())
        }
    }

    fn all_roles() -> Roles {
        Roles {
            theme_toggle: true,
            landing: true,
            toc_search: true,
            panel_toggle: true,
            show_landing: true,
            progress_bar: true,
            toc_container: true,
            progress_indicator: true,
        }
    }

    fn document() -> Document {
        Document {
            path: "notes.html".to_string(),
            title: "Notes".to_string(),
            landing_html: Some("<h1>Welcome</h1>".to_string()),
            outline: sample(),
            sections: Vec::new(),
            formulas: vec![Formula {
                section_id: Some("sets".to_string()),
                trigger_label: "Copy".to_string(),
                text: "A ∪ B".to_string(),
            }],
            roles: all_roles(),
        }
    }

    fn layout() -> TextLayout {
        let ids = ["basics", "sets", "functions", "algebra", "groups", "cosets", "appendix"];
        TextLayout {
            width: 80,
            lines: vec![String::new(); 700],
            heading_rows: Default::default(),
            anchors: ids
                .iter()
                .enumerate()
                .map(|(i, id)| SectionAnchor {
                    id: Some(id.to_string()),
                    offset: i as i64 * 100,
                })
                .collect(),
        }
    }

    fn instant() -> Behavior {
        Behavior {
            tracker: Tracker::new(10, 1),
            nav_margin: 2,
            scroll: ScrollBehavior::Instant,
            smooth_steps: 1,
            feedback: FEEDBACK_DURATION,
        }
    }

    fn entered_state(store: &MemoryPreferences) -> AppState {
        store.set(ENTERED_KEY, "true");
        AppState::bootstrap(&document(), &layout(), 50, 5, instant(), store, None)
    }

    #[test]
    fn bootstrap_applies_stored_preferences() {
        let store = MemoryPreferences::with(&[(THEME_KEY, "dark")]);
        let state = AppState::bootstrap(&document(), &layout(), 50, 5, instant(), &store, Some(false));
        assert_eq!(state.theme.theme(), Theme::Dark);
        assert_eq!(state.gate.phase(), GatePhase::Pending);
        // the active entry is opened, the rest stay collapsed
        assert!(!state.outline.node(0).unwrap().collapsed);
        assert!(state.outline.node(3).unwrap().collapsed);
        assert_eq!(state.progress, 0);
        assert_eq!(state.active_section.as_deref(), Some("basics"));
    }

    #[test]
    fn locked_gate_blocks_scrolling_until_entered() {
        let store = MemoryPreferences::new();
        let mut clipboard = FakeClipboard::default();
        let now = Instant::now();
        let mut state = AppState::bootstrap(&document(), &layout(), 50, 5, instant(), &store, None);

        assert!(!state.handle(UiEvent::ScrollTo(200), &store, &mut clipboard, now));
        assert_eq!(state.scroll_top(), 0);

        assert!(state.handle(UiEvent::EnterLanding, &store, &mut clipboard, now));
        assert_eq!(store.get(ENTERED_KEY).as_deref(), Some("true"));
        assert!(state.handle(UiEvent::ScrollTo(200), &store, &mut clipboard, now));
        assert_eq!(state.scroll_top(), 200);

        assert!(state.handle(UiEvent::ShowLanding, &store, &mut clipboard, now));
        assert!(state.gate.scroll_locked());
        assert_eq!(store.get(ENTERED_KEY).as_deref(), Some("false"));
    }

    #[test]
    fn scrolling_tracks_active_entry() {
        let store = MemoryPreferences::new();
        let mut clipboard = FakeClipboard::default();
        let mut state = entered_state(&store);

        state.handle(UiEvent::ScrollTo(395), &store, &mut clipboard, Instant::now());
        // groups starts at 400, top 5 <= 10
        assert_eq!(state.active_section.as_deref(), Some("groups"));
        assert_eq!(state.outline.active(), Some(4));
        assert!(!state.outline.node(3).unwrap().collapsed);
        assert_eq!(state.progress, 61);
    }

    #[test]
    fn navigation_lands_above_section() {
        let store = MemoryPreferences::new();
        let mut clipboard = FakeClipboard::default();
        let mut state = entered_state(&store);

        assert!(state.handle(UiEvent::Navigate(5), &store, &mut clipboard, Instant::now()));
        assert_eq!(state.scroll_top(), 498);
        assert_eq!(state.active_section.as_deref(), Some("cosets"));
    }

    #[test]
    fn smooth_navigation_animates_over_ticks() {
        let store = MemoryPreferences::with(&[(ENTERED_KEY, "true")]);
        let mut clipboard = FakeClipboard::default();
        let behavior = Behavior {
            scroll: ScrollBehavior::Smooth,
            smooth_steps: 4,
            ..instant()
        };
        let mut state = AppState::bootstrap(&document(), &layout(), 50, 5, behavior, &store, None);
        let now = Instant::now();

        state.handle(UiEvent::Navigate(3), &store, &mut clipboard, now);
        assert!(state.is_animating());
        assert_eq!(state.scroll_top(), 0);

        let mut frames = 0;
        while state.is_animating() {
            state.handle(UiEvent::Tick, &store, &mut clipboard, now);
            frames += 1;
            assert!(frames <= 5);
        }
        assert_eq!(state.scroll_top(), 298);
        assert_eq!(state.active_section.as_deref(), Some("algebra"));
    }

    #[test]
    fn back_to_top_resets_outline_scroll() {
        let store = MemoryPreferences::new();
        let mut clipboard = FakeClipboard::default();
        let mut state = entered_state(&store);
        state.handle(UiEvent::ScrollTo(640), &store, &mut clipboard, Instant::now());
        state.toc_view.scroll_top = 3;

        state.handle(UiEvent::BackToTop, &store, &mut clipboard, Instant::now());
        assert_eq!(state.scroll_top(), 0);
        assert_eq!(state.toc_view.scroll_top, 0);
        assert_eq!(state.progress, 0);
    }

    #[test]
    fn scroll_is_clamped_to_document() {
        let store = MemoryPreferences::new();
        let mut clipboard = FakeClipboard::default();
        let mut state = entered_state(&store);
        state.handle(UiEvent::ScrollBy(10_000), &store, &mut clipboard, Instant::now());
        assert_eq!(state.scroll_top(), 650);
        assert_eq!(state.progress, 100);
        state.handle(UiEvent::ScrollBy(-10_000), &store, &mut clipboard, Instant::now());
        assert_eq!(state.scroll_top(), 0);
    }

    #[test]
    fn search_and_accordion_events() {
        let store = MemoryPreferences::new();
        let mut clipboard = FakeClipboard::default();
        let mut state = entered_state(&store);
        let now = Instant::now();

        state.handle(UiEvent::SearchInput("coset".to_string()), &store, &mut clipboard, now);
        assert_eq!(state.outline.visible_rows(), vec![3, 4, 5]);
        state.handle(UiEvent::SearchInput(String::new()), &store, &mut clipboard, now);
        assert_eq!(state.outline.visible_rows(), vec![0, 3, 6]);

        assert!(state.handle(UiEvent::ToggleEntry(0), &store, &mut clipboard, now));
        assert_eq!(state.outline.visible_rows(), vec![0, 1, 2, 3, 6]);
        assert!(!state.handle(UiEvent::ToggleEntry(6), &store, &mut clipboard, now));
    }

    #[test]
    fn copy_feedback_expires_on_tick() {
        let store = MemoryPreferences::new();
        let mut clipboard = FakeClipboard::default();
        let mut state = entered_state(&store);
        let t0 = Instant::now();

        assert!(state.handle(UiEvent::Copy(0), &store, &mut clipboard, t0));
        assert_eq!(clipboard.0, vec!["A ∪ B"]);
        assert_eq!(state.copy_buttons[0].label, COPIED_LABEL);
        assert_eq!(state.next_deadline(), Some(t0 + FEEDBACK_DURATION));

        state.handle(UiEvent::Tick, &store, &mut clipboard, t0 + FEEDBACK_DURATION);
        assert_eq!(state.copy_buttons[0].label, "Copy");
        assert_eq!(state.next_deadline(), None);
        assert!(!state.handle(UiEvent::Copy(9), &store, &mut clipboard, t0));
    }

    #[test]
    fn absent_roles_make_events_noops() {
        let store = MemoryPreferences::new();
        let mut clipboard = FakeClipboard::default();
        let mut doc = document();
        doc.roles = Roles::default();
        let mut state = AppState::bootstrap(&doc, &layout(), 50, 5, instant(), &store, None);
        let now = Instant::now();

        for event in [
            UiEvent::ToggleTheme,
            UiEvent::ShowLanding,
            UiEvent::TogglePanel,
            UiEvent::CompletionPulse,
            UiEvent::SearchInput("x".to_string()),
        ] {
            assert!(!state.handle(event, &store, &mut clipboard, now));
        }
        assert!(!state.panel_collapsed);
        assert!(!state.pulse.is_highlighted());
        // no overlay: nothing locks the page
        assert!(state.handle(UiEvent::ScrollTo(100), &store, &mut clipboard, now));
    }

    #[test]
    fn relayout_keeps_relative_position() {
        let store = MemoryPreferences::new();
        let mut clipboard = FakeClipboard::default();
        let mut state = entered_state(&store);
        let now = Instant::now();
        state.handle(UiEvent::ScrollTo(325), &store, &mut clipboard, now);

        let anchors = layout()
            .anchors
            .into_iter()
            .map(|a| SectionAnchor {
                offset: a.offset * 2,
                ..a
            })
            .collect();
        state.handle(
            UiEvent::Relayout {
                anchors,
                content_height: 1350,
            },
            &store,
            &mut clipboard,
            now,
        );
        assert_eq!(state.scroll_top(), 650);
        assert_eq!(state.progress, 50);
    }

    #[test]
    fn panel_toggle_flips_collapsed() {
        let store = MemoryPreferences::new();
        let mut clipboard = FakeClipboard::default();
        let mut state = entered_state(&store);
        let now = Instant::now();

        assert!(state.handle(UiEvent::TogglePanel, &store, &mut clipboard, now));
        assert!(state.panel_collapsed);
        assert!(state.handle(UiEvent::TogglePanel, &store, &mut clipboard, now));
        assert!(!state.panel_collapsed);
    }

    #[test]
    fn completion_pulse_highlights_then_reverts() {
        let store = MemoryPreferences::new();
        let mut clipboard = FakeClipboard::default();
        let mut state = entered_state(&store);
        let now = Instant::now();

        assert!(state.handle(UiEvent::CompletionPulse, &store, &mut clipboard, now));
        assert!(state.pulse.is_highlighted());
        assert_eq!(state.next_deadline(), Some(now + FEEDBACK_DURATION));

        assert!(!state.handle(UiEvent::Tick, &store, &mut clipboard, now + Duration::from_millis(10)));
        assert!(state.pulse.is_highlighted());
        assert!(state.handle(UiEvent::Tick, &store, &mut clipboard, now + FEEDBACK_DURATION));
        assert!(!state.pulse.is_highlighted());
        assert_eq!(state.next_deadline(), None);
    }

    #[test]
    fn reaching_the_end_does_not_pulse() {
        let store = MemoryPreferences::new();
        let mut clipboard = FakeClipboard::default();
        let mut state = entered_state(&store);
        let now = Instant::now();

        state.handle(UiEvent::ScrollToEnd, &store, &mut clipboard, now);
        assert_eq!(state.progress, 100);
        assert!(!state.pulse.is_highlighted());
        assert_eq!(state.next_deadline(), None);
    }

    #[test]
    fn outline_scroll_untouched_without_container() {
        let store = MemoryPreferences::with(&[(ENTERED_KEY, "true")]);
        let mut clipboard = FakeClipboard::default();
        let mut doc = document();
        doc.roles.toc_container = false;
        let mut state = AppState::bootstrap(&doc, &layout(), 50, 5, instant(), &store, None);
        state.handle(UiEvent::ScrollTo(640), &store, &mut clipboard, Instant::now());
        state.toc_view.scroll_top = 3;

        state.handle(UiEvent::BackToTop, &store, &mut clipboard, Instant::now());
        assert_eq!(state.scroll_top(), 0);
        assert_eq!(state.toc_view.scroll_top, 3);
    }
}
