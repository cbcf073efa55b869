use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::centered_popup_area;
use crate::ui::board::Palette;

pub const ENTER_HINT: &str = "Press Enter to start reading";

pub struct LandingWindow;

impl LandingWindow {
    pub fn render(frame: &mut Frame, area: Rect, title: &str, lines: &[String], palette: Palette) {
        let popup_area = centered_popup_area(area, 70, 70);
        frame.render_widget(Clear, popup_area);

        let mut content: Vec<Line> = lines.iter().map(|l| Line::from(l.as_str())).collect();
        content.push(Line::from(""));
        content.push(
            Line::from(ENTER_HINT)
                .style(Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD))
                .centered(),
        );

        let paragraph = Paragraph::new(content)
            .style(palette.style())
            .wrap(Wrap { trim: false })
            .block(Block::default().title(title.to_string()).borders(Borders::ALL));

        frame.render_widget(paragraph, popup_area);
    }
}
