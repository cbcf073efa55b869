use crate::models::Theme;
use crate::preferences::PreferenceStore;

pub const THEME_KEY: &str = "theme";
pub const SUN_GLYPH: &str = "☀️";
pub const MOON_GLYPH: &str = "🌙";

/// Stored choice first, then the platform hint, then light.
pub fn resolve_initial_theme(store: &dyn PreferenceStore, os_hint: Option<bool>) -> Theme {
    if let Some(saved) = store.get(THEME_KEY)
        && !saved.is_empty()
    {
        return Theme::from_stored(&saved);
    }
    Theme::from_dark(os_hint.unwrap_or(false))
}

/// Dark-mode hint for a terminal, read from `COLORFGBG`.
pub fn os_dark_hint() -> Option<bool> {
    std::env::var("COLORFGBG")
        .ok()
        .and_then(|value| parse_colorfgbg(&value))
}

/// `COLORFGBG` is `fg;bg` (sometimes `fg;default;bg`); the last field is the
/// background palette index.
pub fn parse_colorfgbg(value: &str) -> Option<bool> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    match bg {
        0..=6 | 8 => Some(true),
        7 | 9..=15 => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThemeController {
    theme: Theme,
    has_toggle: bool,
}

impl ThemeController {
    pub fn new(has_toggle: bool) -> Self {
        Self {
            theme: Theme::Light,
            has_toggle,
        }
    }

    pub fn init(store: &dyn PreferenceStore, os_hint: Option<bool>, has_toggle: bool) -> Self {
        let mut controller = Self::new(has_toggle);
        let initial = resolve_initial_theme(store, os_hint);
        controller.apply(initial.is_dark(), store);
        controller
    }

    pub fn apply(&mut self, is_dark: bool, store: &dyn PreferenceStore) {
        self.theme = Theme::from_dark(is_dark);
        store.set(THEME_KEY, self.theme.as_str());
    }

    /// Derived from the current state on every call, so repeated toggles
    /// simply alternate.
    pub fn toggle(&mut self, store: &dyn PreferenceStore) -> Theme {
        let now_dark = !self.theme.is_dark();
        self.apply(now_dark, store);
        self.theme
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_dark(&self) -> bool {
        self.theme.is_dark()
    }

    /// Sun while dark (click for light), moon while light.
    pub fn glyph(&self) -> Option<&'static str> {
        if !self.has_toggle {
            return None;
        }
        Some(if self.is_dark() { SUN_GLYPH } else { MOON_GLYPH })
    }
}
