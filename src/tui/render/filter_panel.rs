use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::{App, FilterItem, Focus};
use crate::util::unicode::truncate_to_width;

/// Render the filter panel: a check list of contexts, then projects
pub fn render_filter_panel(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let focused = app.focus == Focus::FilterPanel;
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    // Border + padding
    let width = (area.width as usize).saturating_sub(2);

    let items = app.filter_items();
    let mut lines: Vec<Line> = Vec::new();
    let mut cursor_line = 0;
    for (i, item) in items.iter().enumerate() {
        let first_of_kind = match (i.checked_sub(1).map(|p| &items[p]), item) {
            (None, FilterItem::Context(_)) => Some(" Contexts"),
            (None, FilterItem::Project(_)) | (Some(FilterItem::Context(_)), FilterItem::Project(_)) => {
                Some(" Projects")
            }
            _ => None,
        };
        if let Some(title) = first_of_kind {
            if !lines.is_empty() {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled(title, header_style)));
        }

        let is_cursor = focused && i == app.filter.cursor;
        if is_cursor {
            cursor_line = lines.len();
        }
        let (label, color) = match item {
            FilterItem::Context(c) => (format!("@{}", c), app.theme.context),
            FilterItem::Project(p) => (format!("+{}", p), app.theme.project),
        };
        let check = if app.filter.is_checked(item) { "[x] " } else { "[ ] " };
        let row_bg = if is_cursor { app.theme.selection_bg } else { bg };
        lines.push(Line::from(vec![
            Span::styled(format!(" {}", check), Style::default().fg(app.theme.text).bg(row_bg)),
            Span::styled(
                truncate_to_width(&label, width.saturating_sub(5)),
                Style::default().fg(color).bg(row_bg),
            ),
        ]));
    }
    if items.is_empty() {
        lines.push(Line::from(Span::styled(
            " No contexts or projects",
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    }

    let visible = area.height as usize;
    let scroll = (cursor_line + 1).saturating_sub(visible);
    let border_color = if focused { app.theme.highlight } else { app.theme.dim };
    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(border_color).bg(bg))
        .style(Style::default().bg(bg));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((scroll as u16, 0))
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
