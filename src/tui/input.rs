use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::keys::{Action, Context, Dispatcher, key_name};

use super::app::{App, Focus};

/// Handle a key event in the current focus
pub fn handle_key(app: &mut App, dispatcher: &Dispatcher<App>, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    // Help overlay intercepts everything; scroll keys scroll, anything else closes
    if app.show_help {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                app.help_scroll = app.help_scroll.saturating_add(1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                app.help_scroll = app.help_scroll.saturating_sub(1);
            }
            _ => app.show_help = false,
        }
        return;
    }

    let Some(name) = key_name(&key) else {
        return;
    };

    // Any key other than another tab ends a completion cycle
    let context = app.context();
    if context == Context::TabComplete
        && !matches!(
            dispatcher.resolve(&name, context),
            Some((_, Action::EditComplete, _))
        )
        && let Some(edit) = app.edit.as_mut()
    {
        edit.editor.end_completion();
    }

    app.status = None;
    let context = app.context();
    if dispatcher.dispatch(app, &name, context) {
        return;
    }

    match app.focus {
        Focus::Editor => handle_editor_text(app, key),
        Focus::Search => handle_search_text(app, key),
        Focus::List | Focus::FilterPanel => {
            log::debug!("unbound key: {}", name);
        }
    }
}

/// Keys with no binding in the editor: typing and deletion
fn handle_editor_text(app: &mut App, key: KeyEvent) {
    let Some(edit) = app.edit.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Char(c) if !has_command_modifier(key) => edit.editor.insert_char(c),
        KeyCode::Backspace => edit.editor.backspace(),
        KeyCode::Delete => edit.editor.delete(),
        _ => {}
    }
}

/// Keys with no binding in the search prompt edit the query; results follow
/// as you type
fn handle_search_text(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) if !has_command_modifier(key) => app.search.push(c),
        KeyCode::Backspace => {
            app.search.pop();
        }
        _ => return,
    }
    app.refresh_rows();
}

fn has_command_modifier(key: KeyEvent) -> bool {
    key.modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}
