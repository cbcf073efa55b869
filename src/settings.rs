use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Rows below the top of the reading pane at which a section becomes active.
    pub activation_offset: i64,
    /// Rows left above a section heading after navigating to it.
    pub nav_margin: i64,
    /// Rows of slack kept around the active outline entry when revealing it.
    pub reveal_margin: i64,
    pub feedback_duration_ms: u64,
    pub smooth_scroll: bool,
    pub smooth_scroll_steps: u16,
    pub show_progress_bar: bool,
    pub mouse_support: bool,
    pub toc_width: u16,
    pub width: Option<usize>,
    pub dark_color_fg: i16,
    pub dark_color_bg: i16,
    pub light_color_fg: i16,
    pub light_color_bg: i16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            activation_offset: 3,
            nav_margin: 1,
            reveal_margin: 1,
            feedback_duration_ms: 2000,
            smooth_scroll: true,
            smooth_scroll_steps: 6,
            show_progress_bar: true,
            mouse_support: false,
            toc_width: 34,
            width: None,
            dark_color_fg: 252,
            dark_color_bg: 235,
            light_color_fg: 238,
            light_color_bg: 253,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CfgDefaultKeymaps {
    pub scroll_up: String,
    pub scroll_down: String,
    pub page_up: String,
    pub page_down: String,
    pub back_to_top: String,
    pub end_of_document: String,
    pub toggle_panel: String,
    pub focus_outline: String,
    pub search_outline: String,
    pub switch_theme: String,
    pub show_landing: String,
    pub formulas: String,
    pub help: String,
    pub quit: String,
}

impl Default for CfgDefaultKeymaps {
    fn default() -> Self {
        Self {
            scroll_up: "k".to_string(),
            scroll_down: "j".to_string(),
            page_up: "h".to_string(),
            page_down: "l".to_string(),
            back_to_top: "g".to_string(),
            end_of_document: "G".to_string(),
            toggle_panel: "t".to_string(),
            focus_outline: "o".to_string(),
            search_outline: "/".to_string(),
            switch_theme: "c".to_string(),
            show_landing: "L".to_string(),
            formulas: "y".to_string(),
            help: "?".to_string(),
            quit: "q".to_string(),
        }
    }
}

impl CfgDefaultKeymaps {
    /// Whether `c` is bound by `binding`; bindings are single characters.
    pub fn matches(binding: &str, c: char) -> bool {
        let mut chars = binding.chars();
        chars.next() == Some(c) && chars.next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.activation_offset, 3);
        assert_eq!(settings.feedback_duration_ms, 2000);
        assert!(settings.smooth_scroll);
        assert!(settings.show_progress_bar);
        assert!(!settings.mouse_support);
        assert_eq!(settings.dark_color_bg, 235);
        assert_eq!(settings.width, None);
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"activation_offset": 5, "smooth_scroll": false}"#).unwrap();
        assert_eq!(settings.activation_offset, 5);
        assert!(!settings.smooth_scroll);
        assert_eq!(settings.toc_width, 34);
    }

    #[test]
    fn test_keymap_serialization() {
        let keymap = CfgDefaultKeymaps::default();
        let serialized = serde_json::to_string(&keymap).unwrap();
        let deserialized: CfgDefaultKeymaps = serde_json::from_str(&serialized).unwrap();
        assert_eq!(keymap, deserialized);
    }

    #[test]
    fn test_binding_matches_single_char() {
        assert!(CfgDefaultKeymaps::matches("j", 'j'));
        assert!(!CfgDefaultKeymaps::matches("j", 'k'));
        assert!(!CfgDefaultKeymaps::matches("jj", 'j'));
        assert!(!CfgDefaultKeymaps::matches("", 'j'));
    }
}
