use chrono::NaiveDate;

use crate::model::task::Task;

/// The positional fields that precede a task's body
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Prefix {
    pub complete: bool,
    pub completion_date: Option<NaiveDate>,
    pub priority: Option<char>,
    pub creation_date: Option<NaiveDate>,
}

impl Prefix {
    /// The fields [`compose_line`] actually writes for this prefix
    pub fn representable(self) -> Prefix {
        Prefix {
            complete: self.complete,
            completion_date: self.completion_date.filter(|_| self.complete),
            priority: self.priority.filter(|_| !self.complete),
            creation_date: self
                .creation_date
                .filter(|_| !self.complete || self.completion_date.is_some()),
        }
    }
}

/// Build a line from prefix fields and a body, in canonical field order:
/// `x [completion] (P) [creation] body`.
///
/// A completion date without the marker and a priority on a completed line
/// are not representable, so they are dropped.
pub fn compose_line(prefix: &Prefix, body: &str) -> String {
    let mut parts: Vec<String> = Vec::new();
    if prefix.complete {
        parts.push("x".to_string());
        if let Some(date) = prefix.completion_date {
            parts.push(date.format("%Y-%m-%d").to_string());
        }
    } else if let Some(p) = prefix.priority {
        parts.push(format!("({})", p));
    }
    if let Some(date) = prefix.creation_date
        && (!prefix.complete || prefix.completion_date.is_some())
    {
        parts.push(date.format("%Y-%m-%d").to_string());
    }

    let mut line = parts.join(" ");
    if !body.is_empty() {
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(body);
    } else if prefix.complete && prefix.completion_date.is_none() {
        // The marker alone needs its separator to stay a marker
        line.push(' ');
    }
    line
}

/// Append a `pri:X` tag, used to carry a priority through completion
pub fn with_priority_tag(body: &str, priority: char) -> String {
    if body.is_empty() {
        format!("pri:{}", priority)
    } else {
        format!("{} pri:{}", body, priority)
    }
}

/// Remove the last `pri:X` tag and return the remaining body and the letter.
/// Completion appends its tag at the end, so an earlier `pri:` is user text.
/// The body is returned unchanged when no tag is present.
pub fn strip_priority_tag(body: &str) -> (String, Option<char>) {
    let words: Vec<&str> = body.split(' ').collect();
    let found = words.iter().rposition(|w| {
        let b = w.as_bytes();
        b.len() == 5 && b.starts_with(b"pri:") && b[4].is_ascii_uppercase()
    });
    match found {
        Some(idx) => {
            let priority = words[idx].chars().nth(4);
            let rest: Vec<&str> = words
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != idx)
                .map(|(_, w)| *w)
                .collect();
            (rest.join(" "), priority)
        }
        None => (body.to_string(), None),
    }
}

/// Serialize tasks to file content: one line per task, each `\n`-terminated
pub fn serialize_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> String {
    let mut out = String::new();
    for task in tasks {
        out.push_str(task.raw());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::task_parser::parse_date;

    #[test]
    fn test_compose_full_prefix() {
        let prefix = Prefix {
            complete: true,
            completion_date: parse_date("2024-03-02"),
            priority: None,
            creation_date: parse_date("2024-03-01"),
        };
        assert_eq!(
            compose_line(&prefix, "Body text"),
            "x 2024-03-02 2024-03-01 Body text"
        );
    }

    #[test]
    fn test_compose_priority_only() {
        let prefix = Prefix {
            priority: Some('A'),
            ..Prefix::default()
        };
        assert_eq!(compose_line(&prefix, "Body"), "(A) Body");
        assert_eq!(compose_line(&prefix, ""), "(A)");
    }

    #[test]
    fn test_compose_drops_priority_on_completed() {
        let prefix = Prefix {
            complete: true,
            completion_date: parse_date("2024-03-02"),
            priority: Some('A'),
            creation_date: None,
        };
        assert_eq!(compose_line(&prefix, "Body"), "x 2024-03-02 Body");
    }

    #[test]
    fn test_compose_bare_marker_keeps_separator() {
        let prefix = Prefix {
            complete: true,
            ..Prefix::default()
        };
        assert_eq!(compose_line(&prefix, ""), "x ");
    }

    #[test]
    fn test_strip_priority_tag() {
        assert_eq!(
            strip_priority_tag("Call mom pri:B @phone"),
            ("Call mom @phone".to_string(), Some('B'))
        );
        assert_eq!(strip_priority_tag("pri:A"), (String::new(), Some('A')));
        assert_eq!(
            strip_priority_tag("priority:A pri:a"),
            ("priority:A pri:a".to_string(), None)
        );
    }

    #[test]
    fn test_strip_priority_tag_takes_the_last() {
        assert_eq!(
            strip_priority_tag("Review pri:C notes pri:A"),
            ("Review pri:C notes".to_string(), Some('A'))
        );
    }

    #[test]
    fn test_representable_prefix() {
        let prefix = Prefix {
            complete: true,
            completion_date: None,
            priority: Some('A'),
            creation_date: parse_date("2024-03-01"),
        };
        assert_eq!(
            prefix.representable(),
            Prefix {
                complete: true,
                ..Prefix::default()
            }
        );
    }

    #[test]
    fn test_serialize_terminates_every_line() {
        let tasks = vec![Task::parse("one"), Task::parse("(A) two")];
        assert_eq!(serialize_tasks(&tasks), "one\n(A) two\n");
    }
}
