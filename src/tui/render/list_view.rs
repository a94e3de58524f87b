use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use regex::Regex;
use std::ops::Range;
use unicode_segmentation::UnicodeSegmentation;

use crate::model::{Task, TaskId};
use crate::parse::{HighlightOptions, HighlightTag};
use crate::tui::app::App;
use crate::tui::editor::LineEditor;
use crate::util::unicode::{display_width, next_grapheme_boundary, wrap_ranges};

/// Columns taken by the selection marker
const GUTTER: u16 = 1;

/// Render the task list, scrolled so the cursor row is visible
pub fn render_list_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    if app.rows.is_empty() {
        let msg = if app.filter.is_active() || !app.search.is_empty() {
            " No matching tasks"
        } else {
            " No tasks"
        };
        let empty = Paragraph::new(msg).style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, area);
        return;
    }

    app.clamp_cursor();
    let text_width = content_width(app, area.width);
    let heights: Vec<u16> = app
        .rows
        .iter()
        .map(|id| row_height(app, *id, text_width))
        .collect();
    app.scroll = scroll_to_cursor(&heights, app.cursor, app.scroll, area.height as usize);

    // Now reborrow immutably for rendering
    let app = &*app;
    let search_re = app.search_regex();
    let mut y = area.y;
    for (row, id) in app.rows.iter().enumerate().skip(app.scroll) {
        if y >= area.bottom() {
            break;
        }
        let height = heights[row].min(area.bottom() - y);
        let rect = Rect::new(area.x, y, area.width, height);
        render_row(frame, app, *id, row == app.cursor, rect, search_re.as_ref());
        y = y.saturating_add(heights[row]);
    }
}

/// First row to show so that the cursor row fits on screen
fn scroll_to_cursor(heights: &[u16], cursor: usize, scroll: usize, visible: usize) -> usize {
    let mut scroll = scroll.min(cursor);
    while scroll < cursor
        && heights[scroll..=cursor]
            .iter()
            .map(|h| *h as usize)
            .sum::<usize>()
            > visible
    {
        scroll += 1;
    }
    scroll
}

/// Text columns available inside a row
fn content_width(app: &App, width: u16) -> usize {
    let border = if app.borders { 2 } else { 0 };
    width.saturating_sub(GUTTER + border) as usize
}

fn highlight_options(app: &App) -> HighlightOptions {
    if app.borders {
        HighlightOptions::body_only()
    } else {
        HighlightOptions::default()
    }
}

fn row_height(app: &App, id: TaskId, width: usize) -> u16 {
    let border = if app.borders { 2 } else { 0 };
    let editing = app.edit.as_ref().is_some_and(|e| e.id == id);
    let lines = match app.todos.get_id(id) {
        Some(task) if app.wrap && !editing => {
            let text: String = task
                .highlight(highlight_options(app))
                .into_iter()
                .map(|(_, text)| text)
                .collect();
            wrap_ranges(&text, width).len()
        }
        _ => 1,
    };
    lines as u16 + border
}

fn render_row(
    frame: &mut Frame,
    app: &App,
    id: TaskId,
    is_cursor: bool,
    rect: Rect,
    search_re: Option<&Regex>,
) {
    let Some(task) = app.todos.get_id(id) else {
        return;
    };
    let bg = if is_cursor {
        app.theme.selection_bg
    } else {
        app.theme.background
    };

    let marker = if is_cursor { "\u{258E}" } else { " " };
    let marker_style = Style::default().fg(app.theme.highlight).bg(bg);
    let gutter: Vec<Line> = (0..rect.height)
        .map(|_| Line::from(Span::styled(marker, marker_style)))
        .collect();
    let gutter_rect = Rect::new(rect.x, rect.y, GUTTER.min(rect.width), rect.height);
    frame.render_widget(Paragraph::new(gutter), gutter_rect);

    let content = Rect::new(
        rect.x + gutter_rect.width,
        rect.y,
        rect.width - gutter_rect.width,
        rect.height,
    );
    let width = content_width(app, rect.width);
    let lines = match &app.edit {
        Some(edit) if edit.id == id => vec![editor_line(app, &edit.editor, width)],
        _ => task_lines(app, task, is_cursor, width, search_re),
    };

    let mut paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    if app.borders {
        paragraph = paragraph.block(task_block(app, task, bg));
    }
    frame.render_widget(paragraph, content);
}

/// Styled, wrapped (or clipped) lines for one task
fn task_lines<'a>(
    app: &App,
    task: &Task,
    is_cursor: bool,
    width: usize,
    search_re: Option<&Regex>,
) -> Vec<Line<'a>> {
    let options = highlight_options(app);
    let fragments = match search_re {
        Some(re) => task.highlight_search_matches(re, options),
        None => task.highlight(options),
    };
    let styled: Vec<(Style, String)> = fragments
        .into_iter()
        .map(|(tag, text)| {
            let mut style = app.theme.style_for(tag);
            if is_cursor && tag != HighlightTag::SearchMatch {
                style = style.bg(app.theme.selection_bg);
            }
            (style, text)
        })
        .collect();

    let full: String = styled.iter().map(|(_, text)| text.as_str()).collect();
    let ranges = if app.wrap {
        wrap_ranges(&full, width)
    } else {
        vec![0..clip_end(&full, width)]
    };
    ranges
        .into_iter()
        .map(|range| Line::from(slice_spans(&styled, range)))
        .collect()
}

/// Byte offset where `text` stops fitting in `width` cells
fn clip_end(text: &str, width: usize) -> usize {
    let mut used = 0;
    for (i, g) in text.grapheme_indices(true) {
        used += display_width(g);
        if used > width {
            return i;
        }
    }
    text.len()
}

/// Spans covering `range` of the concatenated fragment text
fn slice_spans<'a>(styled: &[(Style, String)], range: Range<usize>) -> Vec<Span<'a>> {
    let mut spans = Vec::new();
    let mut offset = 0;
    for (style, text) in styled {
        let (start, end) = (offset, offset + text.len());
        offset = end;
        let s = range.start.max(start);
        let e = range.end.min(end);
        if s < e {
            spans.push(Span::styled(text[s - start..e - start].to_string(), *style));
        }
    }
    spans
}

/// The line being edited, with a block cursor. Scrolls horizontally so the
/// cursor stays in view.
fn editor_line<'a>(app: &App, editor: &LineEditor, width: usize) -> Line<'a> {
    let text = editor.text();
    let cursor = editor.cursor();
    let bg = app.theme.selection_bg;

    let mut start = 0;
    while start < cursor && display_width(&text[start..cursor]) + 1 > width {
        start = next_grapheme_boundary(text, start).unwrap_or(cursor);
    }
    let cursor_end = next_grapheme_boundary(text, cursor).unwrap_or(cursor);
    let under = if cursor_end > cursor {
        &text[cursor..cursor_end]
    } else {
        " "
    };
    let after = &text[cursor_end..];

    let text_style = Style::default().fg(app.theme.text_bright).bg(bg);
    let cursor_style = Style::default()
        .fg(app.theme.background)
        .bg(app.theme.highlight)
        .add_modifier(Modifier::BOLD);
    Line::from(vec![
        Span::styled(text[start..cursor].to_string(), text_style),
        Span::styled(under.to_string(), cursor_style),
        Span::styled(after.to_string(), text_style),
    ])
}

/// Border for bordered mode: colored by priority, due date on top, contexts
/// and projects underneath
fn task_block<'a>(app: &App, task: &Task, bg: ratatui::style::Color) -> Block<'a> {
    let color = task
        .priority()
        .and_then(|p| app.theme.priority_color(p))
        .unwrap_or(app.theme.dim);
    let mut block = Block::bordered()
        .border_style(Style::default().fg(color).bg(bg))
        .style(Style::default().bg(bg));

    if let Some(due) = task.due_date() {
        block = block.title_top(
            Line::from(Span::styled(
                format!(" due:{} ", due),
                Style::default().fg(app.theme.due_date).bg(bg),
            ))
            .right_aligned(),
        );
    }

    let mut tags: Vec<Span> = Vec::new();
    for context in task.contexts() {
        tags.push(Span::styled(
            format!(" @{}", context),
            Style::default().fg(app.theme.context).bg(bg),
        ));
    }
    for project in task.projects() {
        tags.push(Span::styled(
            format!(" +{}", project),
            Style::default().fg(app.theme.project).bg(bg),
        ));
    }
    if !tags.is_empty() {
        tags.push(Span::styled(" ", Style::default().bg(bg)));
        block = block.title_bottom(Line::from(tags).right_aligned());
    }
    block
}
