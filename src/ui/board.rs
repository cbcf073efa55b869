use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::document::TextLayout;
use crate::models::Theme;
use crate::settings::Settings;

/// Foreground and background for the current theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub fg: Color,
    pub bg: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            fg: Color::Reset,
            bg: Color::Reset,
        }
    }
}

impl Palette {
    pub fn for_theme(theme: Theme, settings: &Settings) -> Self {
        let (fg, bg) = match theme {
            Theme::Dark => (settings.dark_color_fg, settings.dark_color_bg),
            Theme::Light => (settings.light_color_fg, settings.light_color_bg),
        };
        Self {
            fg: indexed(fg),
            bg: indexed(bg),
        }
    }

    pub fn style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }
}

/// Negative palette indices mean "terminal default".
fn indexed(value: i16) -> Color {
    u8::try_from(value).map(Color::Indexed).unwrap_or(Color::Reset)
}

/// Board widget for rendering the laid-out document
pub struct Board {
    layout: Option<TextLayout>,
    scroll_top: usize,
    palette: Palette,
    padding: u16,
}

impl Board {
    pub fn new() -> Self {
        Self {
            layout: None,
            scroll_top: 0,
            palette: Palette::default(),
            padding: 1,
        }
    }

    pub fn with_layout(mut self, layout: TextLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_padding(mut self, padding: u16) -> Self {
        self.padding = padding;
        self
    }

    pub fn layout(&self) -> Option<&TextLayout> {
        self.layout.as_ref()
    }

    pub fn update_layout(&mut self, layout: TextLayout) {
        self.layout = Some(layout);
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    pub fn set_scroll_top(&mut self, scroll_top: i64) {
        self.scroll_top = usize::try_from(scroll_top).unwrap_or(0);
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().style(self.palette.style());
        frame.render_widget(block, area);

        let inner_area = Rect {
            x: area.x + self.padding.min(area.width / 2),
            y: area.y,
            width: area.width.saturating_sub(self.padding * 2),
            height: area.height,
        };

        if let Some(ref layout) = self.layout {
            self.render_content(frame, inner_area, layout);
        } else {
            self.render_empty(frame, inner_area);
        }
    }

    fn render_content(&self, frame: &mut Frame, area: Rect, layout: &TextLayout) {
        let height = area.height as usize;
        let start_line = self.scroll_top.min(layout.lines.len());
        let end_line = (start_line + height).min(layout.lines.len());

        // Center the text column when it is narrower than the pane.
        let left_pad = (area.width as usize).saturating_sub(layout.width) / 2;
        let margin = " ".repeat(left_pad);

        let visible_lines: Vec<Line> = layout.lines[start_line..end_line]
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let row = start_line + i;
                if layout.is_heading(row) {
                    let text = line.trim_start_matches('#').trim_start();
                    Line::from(vec![
                        Span::raw(margin.clone()),
                        Span::styled(
                            text.to_string(),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                    ])
                } else {
                    Line::from(vec![Span::raw(margin.clone()), Span::raw(line.clone())])
                }
            })
            .collect();

        let paragraph = Paragraph::new(visible_lines).style(self.palette.style());
        frame.render_widget(paragraph, area);
    }

    fn render_empty(&self, frame: &mut Frame, area: Rect) {
        let empty_text = vec![
            Line::from("This document has no sections"),
            Line::from("Mark content with class=\"section\" to read it here"),
        ];

        let paragraph = Paragraph::new(empty_text).style(
            self.palette
                .style()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        );

        frame.render_widget(paragraph, area);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
