use chrono::NaiveDate;

use crate::model::task::Task;
use crate::model::task_list::TaskList;

/// Display orders cycled by the `toggle-sorting` action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// File order
    #[default]
    Unsorted,
    DueDate,
    Priority,
    /// Project, then due date, then priority (priority is the major key)
    Natural,
}

impl SortOrder {
    pub fn next(self) -> SortOrder {
        match self {
            SortOrder::Unsorted => SortOrder::DueDate,
            SortOrder::DueDate => SortOrder::Priority,
            SortOrder::Priority => SortOrder::Natural,
            SortOrder::Natural => SortOrder::Unsorted,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Unsorted => "Unsorted",
            SortOrder::DueDate => "Due date",
            SortOrder::Priority => "Priority",
            SortOrder::Natural => "Natural",
        }
    }

    /// Reorder the list in place
    pub fn apply(self, list: &mut TaskList) {
        match self {
            SortOrder::Unsorted => list.sorted_raw(),
            SortOrder::DueDate => list.sorted(due_key),
            SortOrder::Priority => list.sorted(priority_key),
            SortOrder::Natural => {
                list.sorted(project_key);
                list.sorted(due_key);
                list.sorted(priority_key);
            }
        }
    }
}

// Keys put missing values after present ones: `(true, _)` sorts last.

fn due_key(task: &Task) -> (bool, Option<NaiveDate>) {
    (task.due_date().is_none(), task.due_date())
}

fn priority_key(task: &Task) -> (bool, Option<char>) {
    (task.priority().is_none(), task.priority())
}

fn project_key(task: &Task) -> (bool, Option<String>) {
    let first = task.projects().first().map(|p| p.to_lowercase());
    (first.is_none(), first)
}
