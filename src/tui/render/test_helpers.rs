use std::fs;
use std::path::PathBuf;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use tempfile::TempDir;

use crate::keys::KeyBindings;
use crate::model::{Config, TaskList};
use crate::tui::app::App;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// An App over in-memory tasks. The backing path points into a directory that
/// doesn't exist, so an accidental save fails instead of writing anywhere.
pub fn app_with_lines(lines: &[&str]) -> App {
    let todos = TaskList::from_lines(
        lines,
        PathBuf::from("/nonexistent-todoline-test/todo.txt"),
        None,
    );
    App::new(todos, KeyBindings::defaults(), &Config::default())
}

/// An App backed by `todo.txt` and `done.txt` in a fresh temp directory.
/// Keep the `TempDir` alive for the duration of the test.
pub fn app_in_dir(lines: &[&str]) -> (TempDir, App) {
    let tmp = TempDir::new().unwrap();
    let todo = tmp.path().join("todo.txt");
    let content: String = lines.iter().map(|l| format!("{}\n", l)).collect();
    fs::write(&todo, content).unwrap();
    let todos = TaskList::load(&todo, Some(tmp.path().join("done.txt"))).unwrap();
    let app = App::new(todos, KeyBindings::defaults(), &Config::default());
    (tmp, app)
}
