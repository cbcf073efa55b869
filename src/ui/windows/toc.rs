use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::outline::{NodeId, Outline, OutlineNode};
use crate::ui::board::Palette;

/// Where the sidebar puts its search box and its entry list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TocAreas {
    pub search: Option<Rect>,
    pub list: Rect,
}

/// What the sidebar needs beyond the outline itself.
#[derive(Debug, Clone, Copy)]
pub struct TocView<'a> {
    pub scroll_top: usize,
    pub selected: Option<NodeId>,
    pub focused: bool,
    /// Current query and whether it is being edited; `None` hides the box.
    pub search: Option<(&'a str, bool)>,
    pub palette: Palette,
}

pub struct TocPanel;

impl TocPanel {
    pub fn block() -> Block<'static> {
        Block::default().title("Contents").borders(Borders::ALL)
    }

    pub fn areas(area: Rect, has_search: bool) -> TocAreas {
        let inner = Self::block().inner(area);
        if !has_search || inner.height < 2 {
            return TocAreas {
                search: None,
                list: inner,
            };
        }
        TocAreas {
            search: Some(Rect { height: 1, ..inner }),
            list: Rect {
                y: inner.y + 2,
                height: inner.height.saturating_sub(2),
                ..inner
            },
        }
    }

    /// Display text for one entry: indentation, the toggle glyph for
    /// expandable entries, then the label.
    pub fn entry_text(node: &OutlineNode) -> String {
        let indent = "  ".repeat(node.depth);
        match &node.toggle {
            Some(toggle) => format!("{}{} {}", indent, toggle.glyph, node.label),
            None => format!("{}  {}", indent, node.label),
        }
    }

    /// The entry drawn at `row` of the list area, if any.
    pub fn entry_at(outline: &Outline, scroll_top: usize, row: u16) -> Option<NodeId> {
        outline.visible_rows().get(scroll_top + row as usize).copied()
    }

    pub fn render(frame: &mut Frame, area: Rect, outline: &Outline, view: TocView) {
        let border_style = if view.focused {
            Style::default().fg(Color::Blue)
        } else {
            Style::default()
        };
        frame.render_widget(
            Self::block().border_style(border_style).style(view.palette.style()),
            area,
        );

        let areas = Self::areas(area, view.search.is_some());
        if let (Some(search_area), Some((query, editing))) = (areas.search, view.search) {
            let mut spans = vec![Span::styled("/ ", Style::default().fg(Color::DarkGray))];
            if query.is_empty() && !editing {
                spans.push(Span::styled(
                    "search",
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                ));
            } else {
                spans.push(Span::raw(query.to_string()));
            }
            if editing {
                spans.push(Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)));
            }
            frame.render_widget(Paragraph::new(Line::from(spans)), search_area);
        }

        let rows = outline.visible_rows();
        if rows.is_empty() {
            let message = if view.search.is_some_and(|(q, _)| !q.trim().is_empty()) {
                "No matches"
            } else {
                "No entries"
            };
            let empty = Paragraph::new(message).style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            );
            frame.render_widget(empty, areas.list);
            return;
        }

        let items: Vec<ListItem> = rows
            .iter()
            .skip(view.scroll_top)
            .take(areas.list.height as usize)
            .filter_map(|&id| outline.node(id))
            .map(|node| {
                let mut style = if node.active {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else if !node.is_link {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default()
                };
                if view.focused && view.selected == Some(node.id) {
                    style = style.bg(Color::Blue).fg(Color::White);
                }
                ListItem::new(Line::from(Self::entry_text(node))).style(style)
            })
            .collect();

        frame.render_widget(List::new(items), areas.list);
    }
}
