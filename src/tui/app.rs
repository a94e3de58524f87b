use std::collections::HashSet;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use regex::Regex;

use crate::keys::{Context, Dispatcher, KeyBindings};
use crate::model::{Config, Task, TaskId, TaskList};
use crate::ops::search::SearchQuery;
use crate::ops::sort::SortOrder;

use super::editor::LineEditor;
use super::handlers;
use super::input;
use super::render;
use super::theme::Theme;

/// Which part of the screen receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    FilterPanel,
    Editor,
    Search,
}

/// A task being edited in place
#[derive(Debug, Clone)]
pub struct EditState {
    pub id: TaskId,
    pub editor: LineEditor,
    /// Created by append/insert; removed again if saved empty or cancelled
    pub is_new: bool,
}

/// One checkable entry in the filter panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterItem {
    Context(String),
    Project(String),
}

/// Filter panel state: what is checked and where its cursor is
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    pub visible: bool,
    pub contexts: Vec<String>,
    pub projects: Vec<String>,
    pub cursor: usize,
}

impl FilterState {
    pub fn is_active(&self) -> bool {
        !self.contexts.is_empty() || !self.projects.is_empty()
    }

    pub fn is_checked(&self, item: &FilterItem) -> bool {
        match item {
            FilterItem::Context(c) => self.contexts.contains(c),
            FilterItem::Project(p) => self.projects.contains(p),
        }
    }

    pub fn toggle(&mut self, item: &FilterItem) {
        let (list, name) = match item {
            FilterItem::Context(c) => (&mut self.contexts, c),
            FilterItem::Project(p) => (&mut self.projects, p),
        };
        match list.iter().position(|x| x == name) {
            Some(i) => {
                list.remove(i);
            }
            None => list.push(name.clone()),
        }
    }

    pub fn clear(&mut self) {
        self.contexts.clear();
        self.projects.clear();
    }
}

/// Main application state
pub struct App {
    pub todos: TaskList,
    pub bindings: KeyBindings,
    pub theme: Theme,
    pub focus: Focus,
    pub should_quit: bool,
    /// Visible tasks, in display order
    pub rows: Vec<TaskId>,
    /// Index into `rows`
    pub cursor: usize,
    /// First visible row
    pub scroll: usize,
    pub edit: Option<EditState>,
    /// Current search query (applied while non-empty)
    pub search: String,
    pub filter: FilterState,
    pub sort_order: SortOrder,
    pub wrap: bool,
    pub borders: bool,
    pub toolbar: bool,
    pub show_help: bool,
    pub help_scroll: usize,
    pub add_creation_date: bool,
    /// Last text removed by a delete or kill command
    pub yanked: String,
    /// One-shot message shown in the header
    pub status: Option<String>,
}

impl App {
    pub fn new(todos: TaskList, bindings: KeyBindings, config: &Config) -> Self {
        let mut app = App {
            todos,
            bindings,
            theme: Theme::from_config(&config.ui),
            focus: Focus::List,
            should_quit: false,
            rows: Vec::new(),
            cursor: 0,
            scroll: 0,
            edit: None,
            search: String::new(),
            filter: FilterState::default(),
            sort_order: SortOrder::default(),
            wrap: config.settings.wrap,
            borders: config.settings.borders,
            toolbar: config.settings.toolbar,
            show_help: false,
            help_scroll: 0,
            add_creation_date: config.settings.add_creation_date,
            yanked: String::new(),
            status: None,
        };
        app.refresh_rows();
        app
    }

    /// Binding context for the current focus
    pub fn context(&self) -> Context {
        match self.focus {
            Focus::List => Context::List,
            Focus::FilterPanel => Context::ListFiltering,
            Focus::Search => Context::Search,
            Focus::Editor => match &self.edit {
                Some(edit) if edit.editor.is_completing() => Context::TabComplete,
                _ => Context::Editing,
            },
        }
    }

    /// The task under the cursor
    pub fn selected_id(&self) -> Option<TaskId> {
        self.rows.get(self.cursor).copied()
    }

    pub fn selected(&self) -> Option<&Task> {
        self.selected_id().and_then(|id| self.todos.get_id(id))
    }

    pub fn visible_tasks(&self) -> impl Iterator<Item = &Task> {
        self.rows.iter().filter_map(|id| self.todos.get_id(*id))
    }

    /// Parsed search query, if the current text is a usable one
    pub fn search_query(&self) -> Option<SearchQuery> {
        SearchQuery::parse(&self.search)
    }

    pub fn search_regex(&self) -> Option<Regex> {
        self.search_query().and_then(|q| q.highlight_regex())
    }

    /// Contexts and projects available in the filter panel
    pub fn filter_items(&self) -> Vec<FilterItem> {
        let mut items: Vec<FilterItem> = self
            .todos
            .all_contexts()
            .into_iter()
            .map(FilterItem::Context)
            .collect();
        items.extend(self.todos.all_projects().into_iter().map(FilterItem::Project));
        items
    }

    /// `@context` and `+project` words for tab completion
    pub fn completion_words(&self) -> Vec<String> {
        let mut words: Vec<String> = self
            .todos
            .all_contexts()
            .into_iter()
            .map(|c| format!("@{}", c))
            .collect();
        words.extend(self.todos.all_projects().into_iter().map(|p| format!("+{}", p)));
        words
    }

    /// Recompute the visible rows from the filter and search, keeping the
    /// cursor on the same task when it is still visible. The task being
    /// edited always stays visible.
    pub fn refresh_rows(&mut self) {
        let selected = self.selected_id();

        let filtered: HashSet<TaskId> = self
            .todos
            .filter_contexts_and_projects(&self.filter.contexts, &self.filter.projects)
            .map(|t| t.id)
            .collect();
        let searched: Option<HashSet<TaskId>> = self
            .todos
            .valid_search(&self.search)
            .then(|| self.todos.search(&self.search, false).map(|t| t.id).collect());
        let editing = self.edit.as_ref().map(|e| e.id);

        self.rows = self
            .todos
            .iter()
            .map(|t| t.id)
            .filter(|id| {
                Some(*id) == editing
                    || (filtered.contains(id)
                        && searched.as_ref().is_none_or(|s| s.contains(id)))
            })
            .collect();

        if let Some(id) = selected
            && let Some(pos) = self.rows.iter().position(|r| *r == id)
        {
            self.cursor = pos;
        }
        self.clamp_cursor();
        self.filter.cursor = self
            .filter
            .cursor
            .min(self.filter_items().len().saturating_sub(1));
    }

    pub fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.rows.len().saturating_sub(1));
    }

    /// Put the cursor on `id` if it is visible
    pub fn select(&mut self, id: TaskId) {
        if let Some(pos) = self.rows.iter().position(|r| *r == id) {
            self.cursor = pos;
        }
    }

    /// Save to disk, reporting a failure in the header. The in-memory list is
    /// kept either way.
    pub fn persist(&mut self) {
        if let Err(e) = self.todos.save() {
            log::error!("save failed: {}", e);
            self.status = Some(format!("Save failed: {}", e));
        }
    }
}

/// Run the TUI until the user quits
pub fn run(
    todos: TaskList,
    bindings: KeyBindings,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let dispatcher = handlers::dispatcher(&bindings);
    let mut app = App::new(todos, bindings, config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, &dispatcher);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    dispatcher: &Dispatcher<App>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, dispatcher, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::app_with_lines;
    use pretty_assertions::assert_eq;

    fn visible(app: &App) -> Vec<&str> {
        app.visible_tasks().map(|t| t.raw()).collect()
    }

    #[test]
    fn test_rows_follow_filter_and_search() {
        let mut app = app_with_lines(&[
            "Call mom @phone",
            "Buy milk @errands",
            "Buy bread @errands",
        ]);
        assert_eq!(app.rows.len(), 3);

        app.filter.contexts.push("errands".into());
        app.refresh_rows();
        assert_eq!(visible(&app), vec!["Buy milk @errands", "Buy bread @errands"]);

        app.search = "bread".into();
        app.refresh_rows();
        assert_eq!(visible(&app), vec!["Buy bread @errands"]);
    }

    #[test]
    fn test_refresh_keeps_cursor_on_same_task() {
        let mut app = app_with_lines(&["a", "b @x", "c @x"]);
        app.cursor = 2;
        app.filter.contexts.push("x".into());
        app.refresh_rows();
        assert_eq!(app.selected().map(|t| t.raw()), Some("c @x"));
        assert_eq!(app.cursor, 1);
    }

    #[test]
    fn test_refresh_clamps_cursor() {
        let mut app = app_with_lines(&["a", "b"]);
        app.cursor = 1;
        app.search = "a".into();
        app.refresh_rows();
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn test_context_tracks_focus() {
        let mut app = app_with_lines(&["a"]);
        assert_eq!(app.context(), Context::List);
        app.focus = Focus::FilterPanel;
        assert_eq!(app.context(), Context::ListFiltering);
        app.focus = Focus::Search;
        assert_eq!(app.context(), Context::Search);
    }

    #[test]
    fn test_filter_items_and_completion_words() {
        let app = app_with_lines(&["a @home +garden", "b @work"]);
        assert_eq!(
            app.filter_items(),
            vec![
                FilterItem::Context("home".into()),
                FilterItem::Context("work".into()),
                FilterItem::Project("garden".into()),
            ]
        );
        assert_eq!(app.completion_words(), vec!["@home", "@work", "+garden"]);
    }

    #[test]
    fn test_filter_state_toggle() {
        let mut f = FilterState::default();
        let item = FilterItem::Project("garden".into());
        f.toggle(&item);
        assert!(f.is_checked(&item));
        assert!(f.is_active());
        f.toggle(&item);
        assert!(!f.is_active());
    }
}
