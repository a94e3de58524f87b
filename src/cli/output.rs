use serde::Serialize;

use crate::model::Task;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    /// 1-based position in the todo file
    pub line: usize,
    pub text: String,
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<char>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub contexts: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<String>,
}

pub fn task_to_json(task: &Task) -> TaskJson {
    TaskJson {
        line: task.raw_index + 1,
        text: task.raw().to_string(),
        complete: task.is_complete(),
        priority: task.priority(),
        completion_date: task.completion_date().map(|d| d.to_string()),
        creation_date: task.creation_date().map(|d| d.to_string()),
        due: task.due_date().map(|d| d.to_string()),
        contexts: task.contexts().to_vec(),
        projects: task.projects().to_vec(),
    }
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

/// `  3 (A) Call mom`: line number right-aligned to `width` digits
pub fn format_task_line(task: &Task, width: usize) -> String {
    format!("{:>width$} {}", task.raw_index + 1, task.raw(), width = width)
}

/// Digits needed for the largest line number in a list of `len` tasks
pub fn line_number_width(len: usize) -> usize {
    len.max(1).to_string().len()
}
