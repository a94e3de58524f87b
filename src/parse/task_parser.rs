use std::ops::Range;

use chrono::NaiveDate;

use crate::parse::span::PrefixSpans;

/// Every field derived from one todo.txt line.
///
/// Produced only by [`parse_line`]; a task swaps in a fresh `ParsedLine`
/// whenever its text changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLine {
    pub raw: String,
    pub complete: bool,
    pub completion_date: Option<NaiveDate>,
    pub creation_date: Option<NaiveDate>,
    pub priority: Option<char>,
    pub contexts: Vec<String>,
    pub projects: Vec<String>,
    pub due_date: Option<NaiveDate>,
    pub spans: PrefixSpans,
}

/// Parse a single line. Never fails: unrecognised text simply stays in the
/// body, and the raw text is kept verbatim (minus a trailing newline).
///
/// Prefix fields are matched strictly left to right, each separated by a
/// single space: `x`, completion date, `(P)`, creation date.
pub fn parse_line(line: &str) -> ParsedLine {
    let raw = line.strip_suffix('\n').unwrap_or(line);
    let raw = raw.strip_suffix('\r').unwrap_or(raw);

    let mut parsed = ParsedLine {
        raw: raw.to_string(),
        ..ParsedLine::default()
    };
    let mut pos = 0;

    if raw.starts_with("x ") {
        parsed.complete = true;
        pos = 2;
        if let Some((date, _, next)) = date_at(raw, pos) {
            parsed.completion_date = Some(date);
            pos = next;
        }
    } else if let Some((priority, range, next)) = priority_at(raw, pos) {
        parsed.priority = Some(priority);
        parsed.spans.priority = Some(range);
        pos = next;
    }

    // A completed line only has room for a creation date after its completion date
    let creation_slot = !parsed.complete || parsed.completion_date.is_some();
    if creation_slot && let Some((date, range, next)) = date_at(raw, pos) {
        parsed.creation_date = Some(date);
        parsed.spans.creation_date = Some(range);
        pos = next;
    }

    parsed.spans.body_start = pos;

    for word in raw[pos..].split_whitespace() {
        if let Some(context) = word.strip_prefix('@')
            && !context.is_empty()
        {
            parsed.contexts.push(context.to_string());
        } else if let Some(project) = word.strip_prefix('+')
            && !project.is_empty()
        {
            parsed.projects.push(project.to_string());
        } else if let Some(due) = word.strip_prefix("due:")
            && parsed.due_date.is_none()
        {
            parsed.due_date = parse_date(due);
        }
    }

    parsed
}

/// Parse a strictly `YYYY-MM-DD` shaped, calendar-valid date
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let bytes = s.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// The space-delimited token starting at `pos`, and the offset just past its
/// trailing separator. `None` at end of line or on a doubled space.
fn token_at(raw: &str, pos: usize) -> Option<(Range<usize>, usize)> {
    if pos >= raw.len() {
        return None;
    }
    let end = raw[pos..].find(' ').map_or(raw.len(), |i| pos + i);
    if end == pos {
        return None;
    }
    let next = if end < raw.len() { end + 1 } else { end };
    Some((pos..end, next))
}

fn date_at(raw: &str, pos: usize) -> Option<(NaiveDate, Range<usize>, usize)> {
    let (range, next) = token_at(raw, pos)?;
    let date = parse_date(&raw[range.clone()])?;
    Some((date, range, next))
}

fn priority_at(raw: &str, pos: usize) -> Option<(char, Range<usize>, usize)> {
    let (range, next) = token_at(raw, pos)?;
    match raw[range.clone()].as_bytes() {
        [b'(', p, b')'] if p.is_ascii_uppercase() => Some((*p as char, range, next)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_parse_plain_line() {
        let p = parse_line("Call the bank");
        assert!(!p.complete);
        assert_eq!(p.priority, None);
        assert_eq!(p.creation_date, None);
        assert_eq!(p.spans.body_start, 0);
    }

    #[test]
    fn test_parse_strips_newline() {
        assert_eq!(parse_line("Task\n").raw, "Task");
        assert_eq!(parse_line("Task\r\n").raw, "Task");
    }

    #[test]
    fn test_parse_completed_with_both_dates() {
        let p = parse_line("x 2024-03-02 2024-03-01 Review PR +work");
        assert!(p.complete);
        assert_eq!(p.completion_date, Some(date("2024-03-02")));
        assert_eq!(p.creation_date, Some(date("2024-03-01")));
        assert_eq!(p.projects, vec!["work"]);
        assert_eq!(&p.raw[p.spans.body_start..], "Review PR +work");
    }

    #[test]
    fn test_parse_completed_priority_is_body_text() {
        let p = parse_line("x (A) Something");
        assert!(p.complete);
        assert_eq!(p.priority, None);
        assert_eq!(&p.raw[p.spans.body_start..], "(A) Something");
    }

    #[test]
    fn test_parse_completed_without_completion_date_has_no_creation_date() {
        let p = parse_line("x Something 2024-01-01");
        assert!(p.complete);
        assert_eq!(p.completion_date, None);
        assert_eq!(p.creation_date, None);
    }

    #[test]
    fn test_parse_creation_date_without_priority() {
        let p = parse_line("2024-01-01 Plant tomatoes");
        assert_eq!(p.creation_date, Some(date("2024-01-01")));
        assert_eq!(p.spans.creation_date, Some(0..10));
    }

    #[test]
    fn test_parse_uppercase_x_is_not_a_marker() {
        let p = parse_line("X marks the spot");
        assert!(!p.complete);
        let p = parse_line("xylophone lesson");
        assert!(!p.complete);
    }

    #[test]
    fn test_parse_lowercase_priority_is_body_text() {
        let p = parse_line("(a) not a priority");
        assert_eq!(p.priority, None);
        assert_eq!(p.spans.body_start, 0);
    }

    #[test]
    fn test_parse_priority_needs_separator() {
        let p = parse_line("(A)Something");
        assert_eq!(p.priority, None);
    }

    #[test]
    fn test_parse_double_space_stops_prefix() {
        let p = parse_line("(A)  2024-01-01 Task");
        assert_eq!(p.priority, Some('A'));
        assert_eq!(p.creation_date, None);
        assert_eq!(&p.raw[p.spans.body_start..], " 2024-01-01 Task");
    }

    #[test]
    fn test_parse_invalid_date_is_body_text() {
        let p = parse_line("2024-13-45 Not a date");
        assert_eq!(p.creation_date, None);
        assert_eq!(p.spans.body_start, 0);
    }

    #[test]
    fn test_parse_tokens_keep_duplicates_and_order() {
        let p = parse_line("Plan @home trip +travel @phone @home +travel");
        assert_eq!(p.contexts, vec!["home", "phone", "home"]);
        assert_eq!(p.projects, vec!["travel", "travel"]);
    }

    #[test]
    fn test_parse_bare_sigils_are_not_tokens() {
        let p = parse_line("a @ b + c");
        assert!(p.contexts.is_empty());
        assert!(p.projects.is_empty());
    }

    #[test]
    fn test_parse_first_valid_due_date_wins() {
        let p = parse_line("Ship due:2024-02-30 due:2024-02-10 due:2024-02-11");
        assert_eq!(p.due_date, Some(date("2024-02-10")));
    }

    #[test]
    fn test_parse_date_shape() {
        assert_eq!(parse_date("2024-01-05"), Some(date("2024-01-05")));
        assert_eq!(parse_date("2024-1-05"), None);
        assert_eq!(parse_date("+2024-01-0"), None);
        assert_eq!(parse_date("2024/01/05"), None);
        assert_eq!(parse_date("2023-02-29"), None);
    }

    #[test]
    fn test_parse_garbage_never_fails() {
        for line in ["", " ", "x", "x ", "()", "(", "due:", "@", "+", "\u{1F389} @🎉"] {
            let p = parse_line(line);
            assert_eq!(p.raw, line);
        }
    }
}
