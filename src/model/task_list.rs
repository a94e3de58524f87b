use std::collections::HashMap;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::model::task::{Task, TaskId, today};

/// The in-memory todo list: tasks in display order plus where they live on disk.
///
/// Persistence (`load`, `save`, `reload_from_file`, `archive_done`) lives in
/// `io::todo_io`; searching and filtering in `ops::search`.
#[derive(Debug, Clone)]
pub struct TaskList {
    pub todo_items: Vec<Task>,
    pub file_path: PathBuf,
    pub archive_path: Option<PathBuf>,
    /// Ids in file order, for `sorted_raw`
    raw_order: Vec<TaskId>,
    next_id: u64,
    sorted: bool,
}

/// Task counts for the header line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub total: usize,
    pub pending: usize,
    pub done: usize,
}

impl TaskList {
    pub fn new(file_path: PathBuf, archive_path: Option<PathBuf>) -> Self {
        TaskList {
            todo_items: Vec::new(),
            file_path,
            archive_path,
            raw_order: Vec::new(),
            next_id: 1,
            sorted: false,
        }
    }

    /// Build a list from file lines. Blank lines are skipped.
    pub fn from_lines<S: AsRef<str>>(
        lines: &[S],
        file_path: PathBuf,
        archive_path: Option<PathBuf>,
    ) -> Self {
        let mut list = TaskList::new(file_path, archive_path);
        list.replace_lines(lines);
        list
    }

    /// Discard every task and rebuild from `lines`. Ids keep counting up so
    /// stale ids held by a view never alias a new task.
    pub(crate) fn replace_lines<S: AsRef<str>>(&mut self, lines: &[S]) {
        self.todo_items.clear();
        for line in lines {
            let line = line.as_ref();
            if line.trim().is_empty() {
                continue;
            }
            let id = self.alloc_id();
            self.todo_items.push(Task::new(id, line));
        }
        self.sorted = false;
        self.sync_raw_order();
        self.renumber();
    }

    pub fn len(&self) -> usize {
        self.todo_items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todo_items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.todo_items.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.todo_items.get(index)
    }

    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.todo_items.iter().position(|t| t.id == id)
    }

    pub fn get_id(&self, id: TaskId) -> Option<&Task> {
        self.todo_items.iter().find(|t| t.id == id)
    }

    pub fn get_id_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.todo_items.iter_mut().find(|t| t.id == id)
    }

    /// Ids in current order
    pub fn ids(&self) -> Vec<TaskId> {
        self.todo_items.iter().map(|t| t.id).collect()
    }

    /// Parse `text` and append it. Returns the new index.
    pub fn append(&mut self, text: &str, add_creation_date: bool) -> usize {
        self.insert(self.len(), text, add_creation_date)
    }

    /// Parse `text` and insert it at `index` (clamped to the list length).
    /// Returns the index it landed at.
    pub fn insert(&mut self, index: usize, text: &str, add_creation_date: bool) -> usize {
        let date = add_creation_date.then(today);
        self.insert_on(index, text, date)
    }

    /// Insert with an explicit creation date to stamp (if the text has none)
    pub fn insert_on(&mut self, index: usize, text: &str, creation_date: Option<NaiveDate>) -> usize {
        let index = index.min(self.len());
        let mut task = Task::new(self.alloc_id(), text);
        if let Some(date) = creation_date {
            task.stamp_creation_date(date);
        }

        // File order: right after whatever precedes it on screen
        let raw_pos = match index.checked_sub(1).and_then(|i| self.todo_items.get(i)) {
            Some(prev) => self
                .raw_order
                .iter()
                .position(|id| *id == prev.id)
                .map_or(self.raw_order.len(), |p| p + 1),
            None => 0,
        };
        self.raw_order.insert(raw_pos, task.id);

        self.todo_items.insert(index, task);
        self.renumber();
        index
    }

    /// Remove the task at `index`. Out of range is a no-op returning `None`.
    pub fn delete(&mut self, index: usize) -> Option<Task> {
        if index >= self.len() {
            return None;
        }
        let task = self.todo_items.remove(index);
        self.raw_order.retain(|id| *id != task.id);
        self.renumber();
        Some(task)
    }

    /// Remove a task by identity
    pub fn delete_id(&mut self, id: TaskId) -> Option<Task> {
        let index = self.position(id)?;
        self.delete(index)
    }

    /// Exchange two tasks. Returns false (and changes nothing) if either index
    /// is out of range.
    pub fn swap(&mut self, i: usize, j: usize) -> bool {
        if i >= self.len() || j >= self.len() {
            return false;
        }
        self.todo_items.swap(i, j);
        if !self.sorted {
            self.sync_raw_order();
        }
        self.renumber();
        true
    }

    /// Stable sort by `key`. Equal keys keep their current relative order, so
    /// successive sorts compose into a multi-key order.
    pub fn sorted<K: Ord>(&mut self, key: impl FnMut(&Task) -> K) {
        self.todo_items.sort_by_key(key);
        self.sorted = true;
        self.renumber();
    }

    /// Restore file order
    pub fn sorted_raw(&mut self) {
        let order: HashMap<TaskId, usize> = self
            .raw_order
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, i))
            .collect();
        self.todo_items
            .sort_by_key(|t| order.get(&t.id).copied().unwrap_or(usize::MAX));
        self.sorted = false;
        self.renumber();
    }

    /// Replace a task's text. Returns false if the id is unknown.
    pub fn update(&mut self, id: TaskId, text: &str) -> bool {
        match self.get_id_mut(id) {
            Some(task) => {
                task.update(text);
                true
            }
            None => false,
        }
    }

    /// Set a task's priority. Returns whether the line changed.
    pub fn set_priority(&mut self, id: TaskId, priority: Option<char>) -> bool {
        self.get_id_mut(id)
            .is_some_and(|task| task.set_priority(priority))
    }

    /// Flip a task between complete and incomplete. Returns whether the line
    /// changed.
    pub fn toggle_complete(&mut self, id: TaskId) -> bool {
        self.get_id_mut(id).is_some_and(Task::toggle_complete)
    }

    /// Distinct contexts in first-seen order
    pub fn all_contexts(&self) -> Vec<String> {
        distinct(self.todo_items.iter().flat_map(|t| t.contexts()))
    }

    /// Distinct projects in first-seen order
    pub fn all_projects(&self) -> Vec<String> {
        distinct(self.todo_items.iter().flat_map(|t| t.projects()))
    }

    pub fn counts(&self) -> TaskCounts {
        counts(self.todo_items.iter())
    }

    fn alloc_id(&mut self) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        id
    }

    fn sync_raw_order(&mut self) {
        self.raw_order = self.ids();
    }

    pub(crate) fn renumber(&mut self) {
        for (i, task) in self.todo_items.iter_mut().enumerate() {
            task.raw_index = i;
        }
    }

    pub(crate) fn forget_raw_order(&mut self, removed: &[TaskId]) {
        self.raw_order.retain(|id| !removed.contains(id));
    }
}

/// Count total, pending and done tasks in any subset of a list
pub fn counts<'a>(tasks: impl Iterator<Item = &'a Task>) -> TaskCounts {
    let mut counts = TaskCounts::default();
    for task in tasks {
        counts.total += 1;
        if task.is_complete() {
            counts.done += 1;
        } else {
            counts.pending += 1;
        }
    }
    counts
}

fn distinct<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        if !seen.contains(value) {
            seen.push(value.clone());
        }
    }
    seen
}
