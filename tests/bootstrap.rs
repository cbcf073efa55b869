use std::time::{Duration, Instant};

use scrollmark::affordances::{COPIED_LABEL, ClipboardSink};
use scrollmark::app::{AppState, Behavior, UiEvent};
use scrollmark::document::Document;
use scrollmark::landing::ENTERED_KEY;
use scrollmark::models::{GatePhase, ScrollBehavior, Theme};
use scrollmark::preferences::{MemoryPreferences, PreferenceStore, SqlitePreferences};
use scrollmark::settings::Settings;
use scrollmark::theme::THEME_KEY;
use tempfile::tempdir;

const PAGE: &str = include_str!("fixtures/notes.html");

#[derive(Default)]
struct RecordingClipboard {
    copied: Vec<String>,
}

impl ClipboardSink for RecordingClipboard {
    fn set_text(&mut self, text: String) -> eyre::Result<()> {
        self.copied.push(text);
        Ok(())
    }
}

fn behavior() -> Behavior {
    Behavior {
        scroll: ScrollBehavior::Instant,
        ..Behavior::from_settings(&Settings::default())
    }
}

fn start(store: &dyn PreferenceStore, os_hint: Option<bool>) -> (Document, AppState) {
    let document = Document::parse(PAGE, "notes.html").unwrap();
    let layout = document.layout(40).unwrap();
    let state = AppState::bootstrap(&document, &layout, 5, 6, behavior(), store, os_hint);
    (document, state)
}

#[test]
fn first_visit_shows_landing_and_follows_os_theme() {
    let store = MemoryPreferences::new();
    let (_, state) = start(&store, Some(true));

    assert_eq!(state.theme.theme(), Theme::Dark);
    assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));
    assert_eq!(state.gate.phase(), GatePhase::Pending);
    assert!(state.gate.scroll_locked());
    assert_eq!(state.progress, 0);
}

#[test]
fn entering_unlocks_and_is_remembered() {
    let store = MemoryPreferences::new();
    let mut clipboard = RecordingClipboard::default();
    let now = Instant::now();
    let (_, mut state) = start(&store, None);

    assert!(!state.handle(UiEvent::ScrollBy(5), &store, &mut clipboard, now));
    assert!(state.handle(UiEvent::EnterLanding, &store, &mut clipboard, now));
    assert!(state.handle(UiEvent::ScrollBy(5), &store, &mut clipboard, now));
    assert_eq!(state.scroll_top(), 5);

    let (_, reloaded) = start(&store, None);
    assert_eq!(reloaded.gate.phase(), GatePhase::Entered);
    assert!(!reloaded.gate.overlay_visible());
}

#[test]
fn theme_toggle_persists_across_sessions() {
    let store = MemoryPreferences::new();
    let mut clipboard = RecordingClipboard::default();
    let (_, mut state) = start(&store, Some(false));
    assert_eq!(state.theme.theme(), Theme::Light);

    state.handle(UiEvent::ToggleTheme, &store, &mut clipboard, Instant::now());
    assert_eq!(state.theme.theme(), Theme::Dark);

    // the stored choice beats the OS hint
    let (_, reloaded) = start(&store, Some(false));
    assert_eq!(reloaded.theme.theme(), Theme::Dark);
}

#[test]
fn navigating_from_the_outline_activates_the_entry() {
    let store = MemoryPreferences::with(&[(ENTERED_KEY, "true")]);
    let mut clipboard = RecordingClipboard::default();
    let (document, mut state) = start(&store, None);

    let cosets = document.outline.find_by_target("cosets").unwrap();
    let groups = document.outline.find_by_target("groups").unwrap();
    assert!(state.outline.node(groups).unwrap().collapsed);

    assert!(state.handle(UiEvent::Navigate(cosets), &store, &mut clipboard, Instant::now()));
    assert_eq!(state.active_section.as_deref(), Some("cosets"));
    assert_eq!(state.outline.active(), Some(cosets));
    assert!(!state.outline.node(groups).unwrap().collapsed);
    assert!(state.progress > 0);
}

#[test]
fn search_filters_and_reset_collapses() {
    let store = MemoryPreferences::with(&[(ENTERED_KEY, "true")]);
    let mut clipboard = RecordingClipboard::default();
    let (document, mut state) = start(&store, None);
    let now = Instant::now();

    state.handle(UiEvent::SearchInput("LAGRANGE".to_string()), &store, &mut clipboard, now);
    let labels: Vec<&str> = state
        .outline
        .visible_rows()
        .iter()
        .map(|&id| state.outline.node(id).unwrap().label.as_str())
        .collect();
    assert_eq!(labels, ["Groups", "Cosets and Lagrange"]);

    state.handle(UiEvent::SearchInput("   ".to_string()), &store, &mut clipboard, now);
    assert_eq!(state.outline.visible_rows().len(), 3);
    let groups = document.outline.find_by_target("groups").unwrap();
    assert!(state.outline.node(groups).unwrap().collapsed);
}

#[test]
fn copy_buttons_confirm_and_revert() {
    let store = MemoryPreferences::with(&[(ENTERED_KEY, "true")]);
    let mut clipboard = RecordingClipboard::default();
    let (_, mut state) = start(&store, None);
    let t0 = Instant::now();

    assert_eq!(state.copy_buttons.len(), 2);
    assert!(state.handle(UiEvent::Copy(1), &store, &mut clipboard, t0));
    assert_eq!(clipboard.copied, ["|G| = |H| [G:H]"]);
    assert_eq!(state.copy_buttons[1].label, COPIED_LABEL);

    state.handle(UiEvent::Tick, &store, &mut clipboard, t0 + Duration::from_millis(1000));
    assert_eq!(state.copy_buttons[1].label, COPIED_LABEL);
    state.handle(UiEvent::Tick, &store, &mut clipboard, t0 + Duration::from_millis(2000));
    assert_eq!(state.copy_buttons[1].label, "📋");
}

#[test]
fn preferences_survive_on_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("preferences.db");
    let mut clipboard = RecordingClipboard::default();
    {
        let store = SqlitePreferences::open(&path).unwrap();
        let (_, mut state) = start(&store, None);
        state.handle(UiEvent::EnterLanding, &store, &mut clipboard, Instant::now());
        state.handle(UiEvent::ToggleTheme, &store, &mut clipboard, Instant::now());
    }
    let store = SqlitePreferences::open(&path).unwrap();
    let (_, state) = start(&store, None);
    assert_eq!(state.gate.phase(), GatePhase::Entered);
    assert_eq!(state.theme.theme(), Theme::Dark);
}
