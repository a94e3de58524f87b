use regex::Regex;

use crate::model::task::Task;
use crate::parse::task_parser::parse_date;

/// Style class of a highlighted fragment. The TUI theme maps these to colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightTag {
    Plain,
    Completed,
    Priority(char),
    CompletionDate,
    CreationDate,
    Context,
    Project,
    DueDate,
    SearchMatch,
}

/// Which body tokens to render (bordered rows move them onto the border)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightOptions {
    pub show_due_date: bool,
    pub show_contexts: bool,
    pub show_projects: bool,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        HighlightOptions {
            show_due_date: true,
            show_contexts: true,
            show_projects: true,
        }
    }
}

impl HighlightOptions {
    /// Everything except the due date, contexts and projects
    pub fn body_only() -> Self {
        HighlightOptions {
            show_due_date: false,
            show_contexts: false,
            show_projects: false,
        }
    }
}

pub type Fragment = (HighlightTag, String);

#[derive(Default)]
struct Fragments(Vec<Fragment>);

impl Fragments {
    fn push(&mut self, tag: HighlightTag, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.0.last_mut() {
            Some((last, buf)) if *last == tag => buf.push_str(text),
            _ => self.0.push((tag, text.to_string())),
        }
    }

    fn finish(mut self) -> Vec<Fragment> {
        if let Some((_, text)) = self.0.last_mut() {
            let trimmed = text.trim_end_matches(' ').len();
            text.truncate(trimmed);
            if text.is_empty() {
                self.0.pop();
            }
        }
        self.0
    }
}

impl Task {
    /// Split the line into styled fragments. Pure: derived from the parsed
    /// fields and `options` only.
    pub fn highlight(&self, options: HighlightOptions) -> Vec<Fragment> {
        let parsed = self.parsed();
        let raw = parsed.raw.as_str();
        let body_start = parsed.spans.body_start;
        let mut out = Fragments::default();

        if parsed.complete {
            out.push(HighlightTag::Completed, &raw[..body_start]);
        } else {
            let mut fields = Vec::new();
            if let (Some(range), Some(p)) = (&parsed.spans.priority, parsed.priority) {
                fields.push((range.clone(), HighlightTag::Priority(p)));
            }
            if let Some(range) = &parsed.spans.creation_date {
                fields.push((range.clone(), HighlightTag::CreationDate));
            }
            let mut pos = 0;
            for (range, tag) in fields {
                out.push(HighlightTag::Plain, &raw[pos..range.start]);
                out.push(tag, &raw[range.clone()]);
                pos = range.end;
            }
            out.push(HighlightTag::Plain, &raw[pos..body_start]);
        }

        let words: Vec<&str> = raw[body_start..].split(' ').collect();
        let last = words.len().saturating_sub(1);
        for (i, word) in words.iter().enumerate() {
            let (tag, shown) = classify(word, options);
            if !shown {
                continue;
            }
            let tag = if parsed.complete {
                HighlightTag::Completed
            } else {
                tag
            };
            out.push(tag, word);
            if i < last {
                let sep = if parsed.complete {
                    HighlightTag::Completed
                } else {
                    HighlightTag::Plain
                };
                out.push(sep, " ");
            }
        }

        out.finish()
    }

    /// The full line with default highlighting
    pub fn colored(&self) -> Vec<Fragment> {
        self.highlight(HighlightOptions::default())
    }

    /// Like [`highlight`](Self::highlight), with every match of `re`
    /// re-tagged as [`HighlightTag::SearchMatch`].
    pub fn highlight_search_matches(&self, re: &Regex, options: HighlightOptions) -> Vec<Fragment> {
        let fragments = self.highlight(options);
        let full: String = fragments.iter().map(|(_, text)| text.as_str()).collect();
        let matches: Vec<(usize, usize)> = re
            .find_iter(&full)
            .filter(|m| !m.is_empty())
            .map(|m| (m.start(), m.end()))
            .collect();
        if matches.is_empty() {
            return fragments;
        }

        let mut out = Fragments::default();
        let mut offset = 0;
        for (tag, text) in &fragments {
            let start = offset;
            let end = offset + text.len();
            offset = end;
            let mut cursor = start;
            for &(m_start, m_end) in &matches {
                if m_end <= start || m_start >= end {
                    continue;
                }
                let s = m_start.max(start);
                let e = m_end.min(end);
                out.push(*tag, &full[cursor..s]);
                out.push(HighlightTag::SearchMatch, &full[s..e]);
                cursor = e;
            }
            out.push(*tag, &full[cursor..end]);
        }
        out.0
    }
}

fn classify(word: &str, options: HighlightOptions) -> (HighlightTag, bool) {
    if word.len() > 1 && word.starts_with('@') {
        (HighlightTag::Context, options.show_contexts)
    } else if word.len() > 1 && word.starts_with('+') {
        (HighlightTag::Project, options.show_projects)
    } else if word
        .strip_prefix("due:")
        .is_some_and(|d| parse_date(d).is_some())
    {
        (HighlightTag::DueDate, options.show_due_date)
    } else {
        (HighlightTag::Plain, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use HighlightTag::*;

    fn frag(tag: HighlightTag, text: &str) -> Fragment {
        (tag, text.to_string())
    }

    #[test]
    fn test_highlight_full_line() {
        let task = Task::parse("(A) 2024-01-01 Buy milk @errands +shopping due:2024-01-10");
        assert_eq!(
            task.colored(),
            vec![
                frag(Priority('A'), "(A)"),
                frag(Plain, " "),
                frag(CreationDate, "2024-01-01"),
                frag(Plain, " Buy milk "),
                frag(Context, "@errands"),
                frag(Plain, " "),
                frag(Project, "+shopping"),
                frag(Plain, " "),
                frag(DueDate, "due:2024-01-10"),
            ]
        );
    }

    #[test]
    fn test_highlight_hides_tokens() {
        let task = Task::parse("Buy milk @errands +shopping due:2024-01-10");
        assert_eq!(
            task.highlight(HighlightOptions::body_only()),
            vec![frag(Plain, "Buy milk")]
        );
    }

    #[test]
    fn test_highlight_completed_is_one_style() {
        let task = Task::parse("x 2024-03-01 Pay rent +bills");
        assert_eq!(
            task.colored(),
            vec![frag(Completed, "x 2024-03-01 Pay rent +bills")]
        );
    }

    #[test]
    fn test_highlight_concatenates_to_raw() {
        for line in [
            "(B) thing  with   gaps @a",
            "x 2024-01-01 2023-12-31 done +p",
            "",
            "due:2024-99-99 not a date",
        ] {
            let task = Task::parse(line);
            let joined: String = task.colored().into_iter().map(|(_, t)| t).collect();
            assert_eq!(joined, line.trim_end());
        }
    }

    #[test]
    fn test_highlight_search_matches() {
        let task = Task::parse("Buy milk @errands");
        let re = Regex::new("(?i)MILK|err").unwrap();
        assert_eq!(
            task.highlight_search_matches(&re, HighlightOptions::default()),
            vec![
                frag(Plain, "Buy "),
                frag(SearchMatch, "milk"),
                frag(Plain, " "),
                frag(Context, "@"),
                frag(SearchMatch, "err"),
                frag(Context, "ands"),
            ]
        );
    }
}
