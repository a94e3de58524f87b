use crate::keys::{Action, ActionArg, Context, Dispatcher, KeyBindings};
use crate::model::{TaskId, today};

use super::app::{App, EditState, Focus};
use super::editor::LineEditor;

/// Dispatcher with every action wired to its handler
pub fn dispatcher(bindings: &KeyBindings) -> Dispatcher<App> {
    use Context::{Editing, List, ListFiltering, Search, TabComplete};

    Dispatcher::new(bindings)
        // List navigation
        .on(List, Action::Down, down)
        .on(List, Action::Up, up)
        .on(List, Action::Top, top)
        .on(List, Action::Bottom, bottom)
        .on(List, Action::ChangeFocus, change_focus)
        .on(List, Action::Right, focus_filter_panel)
        // Task operations
        .on(List, Action::ToggleComplete, toggle_complete)
        .on(List, Action::Archive, archive)
        .on(List, Action::Append, append)
        .on(List, Action::InsertAfter, insert_after)
        .on(List, Action::InsertBefore, insert_before)
        .on(List, Action::Edit, edit)
        .on(List, Action::Delete, delete)
        .on(List, Action::SwapDown, swap_down)
        .on(List, Action::SwapUp, swap_up)
        .on(List, Action::SetPriority, set_priority)
        .on(List, Action::Save, save)
        .on(List, Action::Reload, reload)
        .on(List, Action::Quit, quit)
        // View
        .on(List, Action::ToggleHelp, toggle_help)
        .on(List, Action::ToggleToolbar, toggle_toolbar)
        .on(List, Action::ToggleWrapping, toggle_wrapping)
        .on(List, Action::ToggleBorders, toggle_borders)
        .on(List, Action::ToggleSorting, toggle_sorting)
        .on(List, Action::ToggleFilter, toggle_filter)
        .on(List, Action::ClearFilter, clear_filter)
        .on(List, Action::Search, start_search)
        .on(List, Action::SearchClear, clear_search)
        // Filter panel
        .on(ListFiltering, Action::Down, filter_down)
        .on(ListFiltering, Action::Up, filter_up)
        .on(ListFiltering, Action::ChangeFocus, change_focus)
        .on(ListFiltering, Action::Left, focus_list)
        .on(ListFiltering, Action::ToggleFilter, toggle_filter)
        .on(ListFiltering, Action::ClearFilter, clear_filter)
        .on(ListFiltering, Action::ToggleFilterItem, toggle_filter_item)
        // Search prompt
        .on(Search, Action::SearchEnd, end_search)
        .on(Search, Action::SearchClear, clear_search)
        // Line editor
        .on(Editing, Action::EditSave, edit_save)
        .on(Editing, Action::EditCancel, edit_cancel)
        .on(Editing, Action::EditComplete, edit_complete)
        .on(TabComplete, Action::EditComplete, edit_complete)
        .on(Editing, Action::EditMoveLeft, |app, _| with_editor(app, LineEditor::move_left))
        .on(Editing, Action::EditMoveRight, |app, _| with_editor(app, LineEditor::move_right))
        .on(Editing, Action::EditWordLeft, |app, _| with_editor(app, LineEditor::word_left))
        .on(Editing, Action::EditWordRight, |app, _| with_editor(app, LineEditor::word_right))
        .on(Editing, Action::EditHome, |app, _| with_editor(app, LineEditor::home))
        .on(Editing, Action::EditEnd, |app, _| with_editor(app, LineEditor::end))
        .on(Editing, Action::EditDeleteWord, |app, _| kill(app, LineEditor::delete_word))
        .on(Editing, Action::EditDeleteEnd, |app, _| kill(app, LineEditor::delete_to_end))
        .on(Editing, Action::EditDeleteBeginning, |app, _| {
            kill(app, LineEditor::delete_to_start)
        })
        .on(Editing, Action::EditPaste, edit_paste)
}

// ---------------------------------------------------------------------------
// List navigation

fn down(app: &mut App, _: ActionArg) {
    if app.cursor + 1 < app.rows.len() {
        app.cursor += 1;
    }
}

fn up(app: &mut App, _: ActionArg) {
    app.cursor = app.cursor.saturating_sub(1);
}

fn top(app: &mut App, _: ActionArg) {
    app.cursor = 0;
}

fn bottom(app: &mut App, _: ActionArg) {
    app.cursor = app.rows.len().saturating_sub(1);
}

fn change_focus(app: &mut App, arg: ActionArg) {
    match app.focus {
        Focus::FilterPanel => focus_list(app, arg),
        _ => focus_filter_panel(app, arg),
    }
}

fn focus_filter_panel(app: &mut App, _: ActionArg) {
    app.filter.visible = true;
    app.focus = Focus::FilterPanel;
}

fn focus_list(app: &mut App, _: ActionArg) {
    app.focus = Focus::List;
}

// ---------------------------------------------------------------------------
// Task operations

fn toggle_complete(app: &mut App, _: ActionArg) {
    let Some(id) = app.selected_id() else {
        return;
    };
    if app.todos.toggle_complete(id) {
        app.persist();
        app.refresh_rows();
    } else {
        app.status = Some("Task text would be read as a prefix; edit it instead".into());
    }
}

fn archive(app: &mut App, _: ActionArg) {
    match app.todos.archive_done() {
        Ok(true) => {
            app.status = Some("Archived completed tasks".into());
            app.refresh_rows();
        }
        Ok(false) if app.todos.archive_path.is_none() => {
            app.status = Some("No archive file configured".into());
        }
        Ok(false) => app.status = Some("Nothing to archive".into()),
        Err(e) => {
            log::error!("archive failed: {}", e);
            app.status = Some(format!("Archive failed: {}", e));
        }
    }
}

fn append(app: &mut App, _: ActionArg) {
    let index = app.todos.len();
    start_new_task(app, index);
}

fn insert_after(app: &mut App, _: ActionArg) {
    let index = selected_position(app).map_or(app.todos.len(), |i| i + 1);
    start_new_task(app, index);
}

fn insert_before(app: &mut App, _: ActionArg) {
    let index = selected_position(app).unwrap_or(0);
    start_new_task(app, index);
}

fn selected_position(app: &App) -> Option<usize> {
    app.selected_id().and_then(|id| app.todos.position(id))
}

/// Insert an empty task at `index` and open it in the editor
fn start_new_task(app: &mut App, index: usize) {
    let index = app.todos.insert_on(index, "", None);
    let Some(id) = app.todos.get(index).map(|t| t.id) else {
        return;
    };
    begin_edit(app, id, "", true);
}

fn edit(app: &mut App, _: ActionArg) {
    let Some(task) = app.selected() else {
        return;
    };
    let (id, text) = (task.id, task.raw().to_string());
    begin_edit(app, id, &text, false);
}

fn begin_edit(app: &mut App, id: TaskId, text: &str, is_new: bool) {
    app.edit = Some(EditState {
        id,
        editor: LineEditor::new(text),
        is_new,
    });
    app.focus = Focus::Editor;
    app.refresh_rows();
    app.select(id);
}

fn delete(app: &mut App, _: ActionArg) {
    let Some(id) = app.selected_id() else {
        return;
    };
    if let Some(task) = app.todos.delete_id(id) {
        app.yanked = task.raw().to_string();
        app.persist();
        app.refresh_rows();
    }
}

fn swap_down(app: &mut App, _: ActionArg) {
    swap_with_row(app, app.cursor + 1);
}

fn swap_up(app: &mut App, _: ActionArg) {
    if let Some(row) = app.cursor.checked_sub(1) {
        swap_with_row(app, row);
    }
}

/// Swap the selected task with the one shown at `row`. Hidden tasks in
/// between stay where they are.
fn swap_with_row(app: &mut App, row: usize) {
    let (Some(id), Some(other)) = (app.selected_id(), app.rows.get(row).copied()) else {
        return;
    };
    let (Some(i), Some(j)) = (app.todos.position(id), app.todos.position(other)) else {
        return;
    };
    if app.todos.swap(i, j) {
        app.persist();
        app.refresh_rows();
        app.select(id);
    }
}

fn set_priority(app: &mut App, arg: ActionArg) {
    let ActionArg::Priority(priority) = arg else {
        return;
    };
    let Some(id) = app.selected_id() else {
        return;
    };
    if app.todos.set_priority(id, priority) {
        app.persist();
        app.refresh_rows();
    }
}

fn save(app: &mut App, _: ActionArg) {
    app.status = None;
    app.persist();
    if app.status.is_none() {
        app.status = Some(format!("Saved {}", app.todos.file_path.display()));
    }
}

fn reload(app: &mut App, _: ActionArg) {
    match app.todos.reload_from_file() {
        Ok(()) => {
            app.sort_order.apply(&mut app.todos);
            app.edit = None;
            app.status = Some("Reloaded".into());
            app.refresh_rows();
        }
        Err(e) => {
            log::error!("reload failed: {}", e);
            app.status = Some(format!("Reload failed: {}", e));
        }
    }
}

fn quit(app: &mut App, _: ActionArg) {
    app.should_quit = true;
}

// ---------------------------------------------------------------------------
// View

fn toggle_help(app: &mut App, _: ActionArg) {
    app.show_help = !app.show_help;
    app.help_scroll = 0;
}

fn toggle_toolbar(app: &mut App, _: ActionArg) {
    app.toolbar = !app.toolbar;
}

fn toggle_wrapping(app: &mut App, _: ActionArg) {
    app.wrap = !app.wrap;
}

fn toggle_borders(app: &mut App, _: ActionArg) {
    app.borders = !app.borders;
}

fn toggle_sorting(app: &mut App, _: ActionArg) {
    app.sort_order = app.sort_order.next();
    app.sort_order.apply(&mut app.todos);
    app.status = Some(format!("Sorting: {}", app.sort_order.label()));
    app.refresh_rows();
}

fn toggle_filter(app: &mut App, _: ActionArg) {
    app.filter.visible = !app.filter.visible;
    if !app.filter.visible && app.focus == Focus::FilterPanel {
        app.focus = Focus::List;
    }
}

fn clear_filter(app: &mut App, _: ActionArg) {
    app.filter.clear();
    app.refresh_rows();
}

fn filter_down(app: &mut App, _: ActionArg) {
    if app.filter.cursor + 1 < app.filter_items().len() {
        app.filter.cursor += 1;
    }
}

fn filter_up(app: &mut App, _: ActionArg) {
    app.filter.cursor = app.filter.cursor.saturating_sub(1);
}

fn toggle_filter_item(app: &mut App, _: ActionArg) {
    let Some(item) = app.filter_items().into_iter().nth(app.filter.cursor) else {
        return;
    };
    app.filter.toggle(&item);
    app.refresh_rows();
}

// ---------------------------------------------------------------------------
// Search

fn start_search(app: &mut App, _: ActionArg) {
    app.search.clear();
    app.focus = Focus::Search;
    app.refresh_rows();
}

fn end_search(app: &mut App, _: ActionArg) {
    app.focus = Focus::List;
}

fn clear_search(app: &mut App, _: ActionArg) {
    app.search.clear();
    app.focus = Focus::List;
    app.refresh_rows();
}

// ---------------------------------------------------------------------------
// Line editor

fn edit_save(app: &mut App, _: ActionArg) {
    let Some(state) = app.edit.take() else {
        return;
    };
    app.focus = Focus::List;
    let text = state.editor.text();
    if text.trim().is_empty() {
        // An emptied task is removed, like a cancelled new one
        app.todos.delete_id(state.id);
    } else {
        app.todos.update(state.id, text);
        if state.is_new
            && app.add_creation_date
            && let Some(task) = app.todos.get_id_mut(state.id)
        {
            task.stamp_creation_date(today());
        }
    }
    app.persist();
    app.refresh_rows();
    app.select(state.id);
}

fn edit_cancel(app: &mut App, _: ActionArg) {
    let Some(state) = app.edit.take() else {
        return;
    };
    app.focus = Focus::List;
    if state.is_new {
        app.todos.delete_id(state.id);
    }
    app.refresh_rows();
}

fn edit_complete(app: &mut App, _: ActionArg) {
    let words = app.completion_words();
    if let Some(state) = app.edit.as_mut() {
        state.editor.complete(&words);
    }
}

fn edit_paste(app: &mut App, _: ActionArg) {
    let yanked = app.yanked.clone();
    if let Some(state) = app.edit.as_mut() {
        state.editor.insert_str(&yanked);
    }
}

fn with_editor(app: &mut App, f: fn(&mut LineEditor)) {
    if let Some(state) = app.edit.as_mut() {
        f(&mut state.editor);
    }
}

/// Run a kill command, keeping what it removed for `edit-paste`
fn kill(app: &mut App, f: fn(&mut LineEditor) -> String) {
    let Some(state) = app.edit.as_mut() else {
        return;
    };
    let killed = f(&mut state.editor);
    if !killed.is_empty() {
        app.yanked = killed;
    }
}
