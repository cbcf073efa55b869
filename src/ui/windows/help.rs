use ratatui::{
    Frame,
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::settings::CfgDefaultKeymaps;

pub struct HelpWindow;

impl HelpWindow {
    pub fn lines(keymap: &CfgDefaultKeymaps) -> Vec<String> {
        let row = |keys: String, action: &str| format!("   {keys:<18}{action}");
        vec![
            " Reading:".to_string(),
            row(format!("{} / Down", keymap.scroll_down), "Line Down"),
            row(format!("{} / Up", keymap.scroll_up), "Line Up"),
            row(format!("{} / PgDn / Space", keymap.page_down), "Page Down"),
            row(format!("{} / PgUp", keymap.page_up), "Page Up"),
            row(format!("{} / Home", keymap.back_to_top), "Back To Top"),
            row(format!("{} / End", keymap.end_of_document), "End Of Document"),
            String::new(),
            " Contents:".to_string(),
            row(format!("{} / Tab", keymap.focus_outline), "Focus Contents"),
            row(keymap.search_outline.clone(), "Search Contents"),
            row(keymap.toggle_panel.clone(), "Show/Hide Contents"),
            row("Enter".to_string(), "Go To Entry"),
            row("Space".to_string(), "Expand/Collapse Entry"),
            String::new(),
            " Page:".to_string(),
            row(keymap.switch_theme.clone(), "Switch Theme"),
            row(keymap.show_landing.clone(), "Show Landing Page"),
            row(keymap.formulas.clone(), "Copy Formulas"),
            row(keymap.help.clone(), "Help"),
            row(format!("{} / Esc", keymap.quit), "Quit / Close Window"),
        ]
    }

    pub fn get_total_lines(keymap: &CfgDefaultKeymaps) -> usize {
        Self::lines(keymap).len()
    }

    fn popup_area(area: Rect, lines: &[Line]) -> Rect {
        let max_width = lines.iter().map(|l| l.width()).max().unwrap_or(0) as u16;
        let width = (max_width + 4).min(area.width);
        let height = (lines.len() as u16 + 2).min(area.height);

        let x = area.x + (area.width - width) / 2;
        let y = area.y + (area.height - height) / 2;
        Rect::new(x, y, width, height)
    }

    /// How far the help text can scroll before its last line reaches the
    /// bottom border.
    pub fn max_scroll_offset(area: Rect, keymap: &CfgDefaultKeymaps) -> u16 {
        let total = Self::get_total_lines(keymap) as u16;
        let visible = area.height.saturating_sub(2).min(total);
        total.saturating_sub(visible)
    }

    pub fn render(frame: &mut Frame, area: Rect, keymap: &CfgDefaultKeymaps, scroll_offset: u16) {
        let help_content: Vec<Line> = Self::lines(keymap).into_iter().map(Line::from).collect();
        let popup_area = Self::popup_area(area, &help_content);

        frame.render_widget(Clear, popup_area);

        let help_paragraph = Paragraph::new(help_content)
            .block(Block::default().title("Help").borders(Borders::ALL))
            .scroll((scroll_offset, 0));

        frame.render_widget(help_paragraph, popup_area);
    }
}
