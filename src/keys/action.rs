/// Interaction context a key is interpreted in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Context {
    List,
    /// Focus on the filter panel
    ListFiltering,
    Editing,
    /// Editing, right after a tab completion
    TabComplete,
    Search,
}

impl Context {
    pub const ALL: [Context; 5] = [
        Context::List,
        Context::ListFiltering,
        Context::Editing,
        Context::TabComplete,
        Context::Search,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Context::List => "list",
            Context::ListFiltering => "list:filtering",
            Context::Editing => "editing",
            Context::TabComplete => "editing:tab-complete",
            Context::Search => "search",
        }
    }

    /// Context consulted when this one has no binding for a key
    pub fn parent(self) -> Option<Context> {
        match self {
            Context::ListFiltering => Some(Context::List),
            Context::TabComplete => Some(Context::Editing),
            Context::List | Context::Editing | Context::Search => None,
        }
    }

    /// This context followed by its fallbacks
    pub fn chain(self) -> impl Iterator<Item = Context> {
        std::iter::successors(Some(self), |c| c.parent())
    }
}

/// Operations a key can trigger. Several binding names may share one action
/// with different [`ActionArg`]s (the `priority-*` family).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // List navigation
    Down,
    Up,
    Top,
    Bottom,
    ChangeFocus,
    Right,
    Left,
    // Task operations
    ToggleComplete,
    Archive,
    Append,
    InsertAfter,
    InsertBefore,
    Edit,
    Delete,
    SwapDown,
    SwapUp,
    SetPriority,
    Save,
    Reload,
    Quit,
    // View
    ToggleHelp,
    ToggleToolbar,
    ToggleWrapping,
    ToggleBorders,
    ToggleSorting,
    ToggleFilter,
    ClearFilter,
    ToggleFilterItem,
    // Search
    Search,
    SearchEnd,
    SearchClear,
    // Line editor
    EditSave,
    EditCancel,
    EditComplete,
    EditMoveLeft,
    EditMoveRight,
    EditWordLeft,
    EditWordRight,
    EditHome,
    EditEnd,
    EditDeleteWord,
    EditDeleteEnd,
    EditDeleteBeginning,
    EditPaste,
}

/// Static argument bound alongside an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionArg {
    #[default]
    None,
    Priority(Option<char>),
}
