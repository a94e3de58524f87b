use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::parse::task_parser::{ParsedLine, parse_line};
use crate::parse::task_serializer::{Prefix, compose_line, strip_priority_tag, with_priority_tag};

/// Stable identity of a task for the lifetime of a [`TaskList`](super::TaskList).
///
/// Unlike `raw_index`, an id never changes when the list is sorted, filtered or
/// reordered, so views hold ids and translate to positions only when drawing.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TaskId(pub u64);

/// Today's date in local time
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// One line of a todo.txt file.
///
/// The raw text is authoritative. Every other field is derived from it by
/// [`parse_line`] and is only ever replaced wholesale, never patched.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: TaskId,
    /// Position in the owning list (renumbered after every structural change)
    pub raw_index: usize,
    parsed: ParsedLine,
}

impl Task {
    pub fn new(id: TaskId, line: &str) -> Self {
        Task {
            id,
            raw_index: 0,
            parsed: parse_line(line),
        }
    }

    /// Parse a standalone line. The id is the default and gets replaced when
    /// the task joins a list.
    pub fn parse(line: &str) -> Self {
        Task::new(TaskId::default(), line)
    }

    pub fn raw(&self) -> &str {
        &self.parsed.raw
    }

    pub fn is_complete(&self) -> bool {
        self.parsed.complete
    }

    pub fn completion_date(&self) -> Option<NaiveDate> {
        self.parsed.completion_date
    }

    pub fn creation_date(&self) -> Option<NaiveDate> {
        self.parsed.creation_date
    }

    pub fn priority(&self) -> Option<char> {
        self.parsed.priority
    }

    /// Context names without the `@`
    pub fn contexts(&self) -> &[String] {
        &self.parsed.contexts
    }

    /// Project names without the `+`
    pub fn projects(&self) -> &[String] {
        &self.parsed.projects
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.parsed.due_date
    }

    /// The line with the positional prefix (marker, dates, priority) removed
    pub fn body(&self) -> &str {
        &self.parsed.raw[self.parsed.spans.body_start..]
    }

    pub(crate) fn parsed(&self) -> &ParsedLine {
        &self.parsed
    }

    /// Replace the whole line, as if it had just been read from the file.
    pub fn update(&mut self, text: &str) {
        self.parsed = parse_line(text);
    }

    /// Set, replace or remove the priority. Returns whether the line changed.
    ///
    /// Completed tasks carry no priority prefix, so this is a no-op on them.
    /// Anything other than an ASCII letter is ignored.
    pub fn set_priority(&mut self, priority: Option<char>) -> bool {
        if self.is_complete() {
            return false;
        }
        let priority = match priority {
            Some(c) if c.is_ascii_alphabetic() => Some(c.to_ascii_uppercase()),
            Some(_) => return false,
            None => None,
        };
        if priority == self.priority() {
            return false;
        }
        let prefix = Prefix {
            priority,
            ..self.prefix()
        };
        let body = self.body().to_string();
        self.rewrite(prefix, &body)
    }

    /// Mark complete, stamped with today's date
    pub fn complete(&mut self) -> bool {
        self.complete_on(today())
    }

    /// Mark complete with an explicit completion date.
    ///
    /// A priority is moved into a trailing `pri:X` tag so that
    /// [`incomplete`](Self::incomplete) can restore it. Returns whether the
    /// line changed.
    pub fn complete_on(&mut self, date: NaiveDate) -> bool {
        if self.is_complete() {
            return false;
        }
        let body = match self.priority() {
            Some(p) => with_priority_tag(self.body(), p),
            None => self.body().to_string(),
        };
        let prefix = Prefix {
            complete: true,
            completion_date: Some(date),
            priority: None,
            creation_date: self.creation_date(),
        };
        self.rewrite(prefix, &body)
    }

    /// Remove the completion marker and completion date, restoring a priority
    /// saved as `pri:X`. The creation date is left alone. Returns whether the
    /// line changed.
    pub fn incomplete(&mut self) -> bool {
        if !self.is_complete() {
            return false;
        }
        let (body, priority) = strip_priority_tag(self.body());
        let prefix = Prefix {
            complete: false,
            completion_date: None,
            priority,
            creation_date: self.creation_date(),
        };
        self.rewrite(prefix, &body)
    }

    pub fn toggle_complete(&mut self) -> bool {
        if self.is_complete() {
            self.incomplete()
        } else {
            self.complete()
        }
    }

    /// Add a creation date if the line has none. Returns whether it was added.
    ///
    /// A completed line without a completion date has no slot for one.
    pub fn stamp_creation_date(&mut self, date: NaiveDate) -> bool {
        if self.creation_date().is_some()
            || (self.is_complete() && self.completion_date().is_none())
        {
            return false;
        }
        let prefix = Prefix {
            creation_date: Some(date),
            ..self.prefix()
        };
        let body = self.body().to_string();
        self.rewrite(prefix, &body)
    }

    fn prefix(&self) -> Prefix {
        prefix_of(&self.parsed)
    }

    /// Swap in the line built from `prefix` and `body`, unless the body would
    /// be read back as part of the prefix (`(A) x marks the spot` losing its
    /// priority must not turn into a completed task). Returns whether the line
    /// changed.
    fn rewrite(&mut self, prefix: Prefix, body: &str) -> bool {
        let parsed = parse_line(&compose_line(&prefix, body));
        if prefix_of(&parsed) != prefix.representable() {
            log::warn!(
                "refusing to rewrite {:?}: body would change the prefix",
                self.raw()
            );
            return false;
        }
        self.parsed = parsed;
        true
    }
}

fn prefix_of(parsed: &ParsedLine) -> Prefix {
    Prefix {
        complete: parsed.complete,
        completion_date: parsed.completion_date,
        priority: parsed.priority,
        creation_date: parsed.creation_date,
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.raw() == other.raw()
    }
}

impl Eq for Task {}
