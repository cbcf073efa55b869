use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use super::centered_popup_area;
use crate::affordances::{ButtonStyle, CopyButton};
use crate::models::Formula;

/// Every copy button in the document, in page order.
pub struct FormulasWindow;

impl FormulasWindow {
    /// `formulas` supplies the owning section of each button; rows past its
    /// end are drawn without one.
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        buttons: &[CopyButton],
        formulas: &[Formula],
        selected_index: usize,
    ) {
        let popup_area = centered_popup_area(area, 60, 70);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Formulas").borders(Borders::ALL);

        if buttons.is_empty() {
            let paragraph = Paragraph::new("No copyable formulas")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(paragraph, popup_area);
            return;
        }

        let items: Vec<ListItem> = buttons
            .iter()
            .enumerate()
            .map(|(i, button)| {
                let label_style = match button.style {
                    ButtonStyle::Success => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ButtonStyle::Resting => Style::default().fg(Color::Cyan),
                };
                let mut spans = vec![
                    Span::styled(format!("[{}] ", button.label), label_style),
                    Span::raw(button.text().to_string()),
                ];
                if let Some(id) = formulas.get(i).and_then(|f| f.section_id.as_deref()) {
                    spans.push(Span::styled(
                        format!("  #{id}"),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));

        let mut state = ListState::default();
        state.select(Some(selected_index.min(buttons.len() - 1)));

        frame.render_stateful_widget(list, popup_area, &mut state);
    }
}
