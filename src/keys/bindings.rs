use indexmap::IndexMap;

use super::action::{Action, ActionArg, Context};

use Context::{Editing, List, ListFiltering, Search, TabComplete};

/// Where one named binding applies, and what it does there
pub type Target = (Context, Action, ActionArg);

/// A compiled-in binding
struct DefaultBinding {
    name: &'static str,
    keys: &'static [&'static str],
    targets: &'static [Target],
    tooltip: &'static str,
}

const fn plain(context: Context, action: Action) -> Target {
    (context, action, ActionArg::None)
}

const fn priority(p: Option<char>) -> Target {
    (List, Action::SetPriority, ActionArg::Priority(p))
}

macro_rules! binding {
    ($name:literal, [$($key:literal),*], [$($target:expr),*], $tooltip:literal) => {
        DefaultBinding {
            name: $name,
            keys: &[$($key),*],
            targets: &[$($target),*],
            tooltip: $tooltip,
        }
    };
}

#[rustfmt::skip]
const DEFAULTS: &[DefaultBinding] = &[
    binding!("down", ["j", "down"], [plain(List, Action::Down), plain(ListFiltering, Action::Down)], "move selection down"),
    binding!("up", ["k", "up"], [plain(List, Action::Up), plain(ListFiltering, Action::Up)], "move selection up"),
    binding!("top", ["g", "home"], [plain(List, Action::Top)], "move selection to the top"),
    binding!("bottom", ["G", "end"], [plain(List, Action::Bottom)], "move selection to the bottom"),
    binding!("change-focus", ["tab"], [plain(List, Action::ChangeFocus), plain(ListFiltering, Action::ChangeFocus)], "toggle focus between the list and the filter panel"),
    binding!("right", ["L", "right"], [plain(List, Action::Right)], "move focus to the filter panel"),
    binding!("left", ["H", "left"], [plain(ListFiltering, Action::Left)], "move focus back to the list"),
    binding!("toggle-complete", ["x"], [plain(List, Action::ToggleComplete)], "mark the selected task complete or incomplete"),
    binding!("archive", ["X"], [plain(List, Action::Archive)], "move completed tasks to the archive file"),
    binding!("append", ["n"], [plain(List, Action::Append)], "add a new task at the end of the list"),
    binding!("insert-after", ["o"], [plain(List, Action::InsertAfter)], "add a new task after the selection"),
    binding!("insert-before", ["O"], [plain(List, Action::InsertBefore)], "add a new task before the selection"),
    binding!("edit", ["enter", "i", "a"], [plain(List, Action::Edit)], "edit the selected task"),
    binding!("delete", ["ctrl d"], [plain(List, Action::Delete)], "delete the selected task"),
    binding!("swap-down", ["J"], [plain(List, Action::SwapDown)], "swap the selected task with the one below"),
    binding!("swap-up", ["K"], [plain(List, Action::SwapUp)], "swap the selected task with the one above"),
    binding!("priority-a", ["A"], [priority(Some('A'))], "set priority (A)"),
    binding!("priority-b", ["B"], [priority(Some('B'))], "set priority (B)"),
    binding!("priority-c", ["C"], [priority(Some('C'))], "set priority (C)"),
    binding!("priority-d", ["D"], [priority(Some('D'))], "set priority (D)"),
    binding!("priority-e", ["E"], [priority(Some('E'))], "set priority (E)"),
    binding!("priority-none", ["_"], [priority(None)], "remove the priority"),
    binding!("save", ["S"], [plain(List, Action::Save)], "save the todo file"),
    binding!("reload", ["R"], [plain(List, Action::Reload)], "reload the todo file, discarding unsaved changes"),
    binding!("quit", ["q"], [plain(List, Action::Quit)], "quit"),
    binding!("toggle-help", ["h", "?"], [plain(List, Action::ToggleHelp)], "show or hide this help"),
    binding!("toggle-toolbar", ["t"], [plain(List, Action::ToggleToolbar)], "show or hide the toolbar"),
    binding!("toggle-wrapping", ["w"], [plain(List, Action::ToggleWrapping)], "wrap or clip long lines"),
    binding!("toggle-borders", ["b"], [plain(List, Action::ToggleBorders)], "draw a border around each task"),
    binding!("toggle-sorting", ["s"], [plain(List, Action::ToggleSorting)], "cycle the sort order"),
    binding!("toggle-filter", ["f"], [plain(List, Action::ToggleFilter), plain(ListFiltering, Action::ToggleFilter)], "show or hide the filter panel"),
    binding!("clear-filter", ["F"], [plain(List, Action::ClearFilter), plain(ListFiltering, Action::ClearFilter)], "clear all filters"),
    binding!("toggle-filter-item", ["space", "x", "enter"], [plain(ListFiltering, Action::ToggleFilterItem)], "check or uncheck the selected filter"),
    binding!("search", ["/"], [plain(List, Action::Search)], "start searching"),
    binding!("search-end", ["enter"], [plain(Search, Action::SearchEnd)], "keep the results and return to the list"),
    binding!("search-clear", ["esc"], [plain(List, Action::SearchClear), plain(Search, Action::SearchClear)], "clear the search"),
    binding!("edit-save", ["enter"], [plain(Editing, Action::EditSave)], "save the task"),
    binding!("edit-cancel", ["esc"], [plain(Editing, Action::EditCancel)], "discard changes"),
    binding!("edit-complete", ["tab"], [plain(Editing, Action::EditComplete), plain(TabComplete, Action::EditComplete)], "complete a context or project"),
    binding!("edit-move-left", ["left"], [plain(Editing, Action::EditMoveLeft)], "move the cursor left"),
    binding!("edit-move-right", ["right"], [plain(Editing, Action::EditMoveRight)], "move the cursor right"),
    binding!("edit-word-left", ["meta b", "ctrl b"], [plain(Editing, Action::EditWordLeft)], "move the cursor one word left"),
    binding!("edit-word-right", ["meta f", "ctrl f"], [plain(Editing, Action::EditWordRight)], "move the cursor one word right"),
    binding!("edit-home", ["ctrl a", "home"], [plain(Editing, Action::EditHome)], "move the cursor to the beginning of the line"),
    binding!("edit-end", ["ctrl e", "end"], [plain(Editing, Action::EditEnd)], "move the cursor to the end of the line"),
    binding!("edit-delete-word", ["ctrl w"], [plain(Editing, Action::EditDeleteWord)], "delete the word before the cursor"),
    binding!("edit-delete-end", ["ctrl k"], [plain(Editing, Action::EditDeleteEnd)], "delete from the cursor to the end of the line"),
    binding!("edit-delete-beginning", ["ctrl u"], [plain(Editing, Action::EditDeleteBeginning)], "delete from the cursor to the beginning of the line"),
    binding!("edit-paste", ["ctrl y"], [plain(Editing, Action::EditPaste)], "paste the last deleted text"),
];

/// One named binding: its physical keys and what it triggers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub keys: Vec<String>,
    pub targets: &'static [Target],
    pub tooltip: &'static str,
}

/// Binding name → keys and targets, in definition order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    bindings: IndexMap<String, Binding>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        KeyBindings::defaults()
    }
}

impl KeyBindings {
    /// The compiled-in bindings
    pub fn defaults() -> Self {
        let bindings = DEFAULTS
            .iter()
            .map(|d| {
                let binding = Binding {
                    keys: d.keys.iter().map(|k| k.to_string()).collect(),
                    targets: d.targets,
                    tooltip: d.tooltip,
                };
                (d.name.to_string(), binding)
            })
            .collect();
        KeyBindings { bindings }
    }

    /// Defaults with user overrides layered on top. Each override value is a
    /// comma-separated key list and replaces that binding's keys entirely.
    ///
    /// Returns the bindings and the override names that matched nothing, so
    /// the caller decides how to report them.
    pub fn with_overrides<'a>(
        overrides: impl IntoIterator<Item = (&'a String, &'a String)>,
    ) -> (Self, Vec<String>) {
        let mut bindings = KeyBindings::defaults();
        let mut rejected = Vec::new();
        for (name, value) in overrides {
            match bindings.bindings.get_mut(name.as_str()) {
                Some(binding) => binding.keys = split_keys(value),
                None => rejected.push(name.clone()),
            }
        }
        (bindings, rejected)
    }

    /// Keys bound to `name`; empty if the name is unknown
    pub fn resolve(&self, name: &str) -> &[String] {
        self.bindings
            .get(name)
            .map(|b| b.keys.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_bound_to(&self, key: &str, name: &str) -> bool {
        self.resolve(name).iter().any(|k| k == key)
    }

    /// Keys joined for display, e.g. `"j, down"`
    pub fn display(&self, name: &str) -> String {
        self.resolve(name).join(", ")
    }

    pub fn tooltip(&self, name: &str) -> Option<&'static str> {
        self.bindings.get(name).map(|b| b.tooltip)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.bindings.iter().map(|(name, b)| (name.as_str(), b))
    }

    /// Render as a `[keys]` TOML table sorted by name, ready to paste into
    /// a config file
    pub fn to_toml(&self) -> String {
        let sorted: std::collections::BTreeMap<&str, String> = self
            .bindings
            .iter()
            .map(|(name, b)| (name.as_str(), b.keys.join(", ")))
            .collect();
        let mut table = toml::map::Map::new();
        for (name, keys) in sorted {
            table.insert(name.to_string(), toml::Value::String(keys));
        }
        let mut root = toml::map::Map::new();
        root.insert("keys".to_string(), toml::Value::Table(table));
        toml::to_string(&toml::Value::Table(root)).unwrap_or_default()
    }
}

/// The defaults rendered as a `[keys]` TOML table
pub fn default_bindings_toml() -> String {
    KeyBindings::defaults().to_toml()
}

fn split_keys(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}
