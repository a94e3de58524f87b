pub mod filter_panel;
pub mod footer;
pub mod header;
pub mod help_overlay;
pub mod list_view;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::{App, Focus};

/// Width of the filter panel column
const FILTER_PANEL_WIDTH: u16 = 30;

/// Draw the whole screen for the current state
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: header | toolbar (optional) | body | search footer (optional)
    let show_footer = app.focus == Focus::Search || !app.search.is_empty();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(u16::from(app.toolbar)),
            Constraint::Min(1),
            Constraint::Length(u16::from(show_footer)),
        ])
        .split(area);

    header::render_header(frame, app, chunks[0]);
    if app.toolbar {
        header::render_toolbar(frame, app, chunks[1]);
    }

    let body = chunks[2];
    if app.filter.visible && body.width > FILTER_PANEL_WIDTH * 2 {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(FILTER_PANEL_WIDTH)])
            .split(body);
        list_view::render_list_view(frame, app, columns[0]);
        filter_panel::render_filter_panel(frame, app, columns[1]);
    } else {
        list_view::render_list_view(frame, app, body);
    }

    if show_footer {
        footer::render_footer(frame, app, chunks[3]);
    }

    // Help overlay (rendered on top of everything)
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, frame.area());
    }
}

#[cfg(test)]
mod tests {
    use super::test_helpers::{app_with_lines, render_to_string};

    #[test]
    fn test_full_screen_layout() {
        let mut app = app_with_lines(&["(A) Call mom @phone", "Buy milk +groceries"]);
        app.filter.visible = true;
        let out = render_to_string(80, 8, |frame, _| super::render(frame, &mut app));
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].contains("2 Todos  2 Pending  0 Done"));
        assert!(lines[1].contains("sort: Unsorted"));
        assert!(lines[2].contains("(A) Call mom @phone"));
        assert!(lines[2].contains("Contexts"));
        assert!(lines[3].contains("Buy milk +groceries"));
    }

    #[test]
    fn test_footer_only_while_searching() {
        let mut app = app_with_lines(&["Buy milk", "Call mom"]);
        let out = render_to_string(60, 6, |frame, _| super::render(frame, &mut app));
        assert!(!out.contains('/'));

        app.search = "milk".into();
        app.refresh_rows();
        let out = render_to_string(60, 6, |frame, _| super::render(frame, &mut app));
        let last = out.lines().last().unwrap();
        assert!(last.starts_with("/milk"));
        assert!(last.contains("1 match"));
    }
}
