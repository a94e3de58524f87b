use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::util::unicode::{display_width, truncate_to_width};

/// Bindings advertised in the toolbar, with their short labels
const TOOLBAR_HINTS: &[(&str, &str)] = &[
    ("toggle-help", "help"),
    ("append", "new"),
    ("search", "search"),
    ("toggle-filter", "filter"),
    ("archive", "archive"),
    ("quit", "quit"),
];

/// Render the header row: counts and status on the left, file path on the right
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let counts = app.todos.counts();

    let mut spans = vec![Span::styled(
        format!(
            " {} Todos  {} Pending  {} Done",
            counts.total, counts.pending, counts.done
        ),
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(status) = &app.status {
        spans.push(Span::styled("  ", Style::default().bg(bg)));
        spans.push(Span::styled(
            status.clone(),
            Style::default().fg(app.theme.highlight).bg(bg),
        ));
    }

    let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let path = app.todos.file_path.display().to_string();
    let room = width.saturating_sub(used + 2);
    if room > 3 {
        let path = truncate_to_width(&path, room);
        let padding = width.saturating_sub(used + display_width(&path) + 1);
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(path, Style::default().fg(app.theme.dim).bg(bg)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

/// Render the toolbar: view toggles and a few key hints
pub fn render_toolbar(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let label = Style::default().fg(app.theme.dim).bg(bg);
    let value = Style::default().fg(app.theme.text).bg(bg);
    let key_style = Style::default().fg(app.theme.highlight).bg(bg);

    let on_off = |b: bool| if b { "on" } else { "off" };
    let mut spans = vec![
        Span::styled(" wrap: ", label),
        Span::styled(on_off(app.wrap), value),
        Span::styled("  borders: ", label),
        Span::styled(on_off(app.borders), value),
        Span::styled("  sort: ", label),
        Span::styled(app.sort_order.label(), value),
        Span::styled("  ", label),
    ];

    for (name, hint) in TOOLBAR_HINTS {
        let Some(key) = app.bindings.resolve(name).first() else {
            continue;
        };
        spans.push(Span::styled(format!(" {}", key), key_style));
        spans.push(Span::styled(format!(" {}", hint), label));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
