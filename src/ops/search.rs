use regex::Regex;

use crate::model::task::Task;
use crate::model::task_list::TaskList;

/// A parsed search query.
///
/// Whitespace-separated terms, matched case-insensitively against the raw line.
/// Every plain term must match; a term starting with `-` must not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl SearchQuery {
    /// `None` for a query with no usable term (blank, or only bare `-`)
    pub fn parse(text: &str) -> Option<SearchQuery> {
        let mut include = Vec::new();
        let mut exclude = Vec::new();
        for term in text.split_whitespace() {
            match term.strip_prefix('-') {
                Some("") => {}
                Some(neg) => exclude.push(neg.to_lowercase()),
                None => include.push(term.to_lowercase()),
            }
        }
        if include.is_empty() && exclude.is_empty() {
            return None;
        }
        Some(SearchQuery { include, exclude })
    }

    pub fn matches(&self, task: &Task) -> bool {
        let line = task.raw().to_lowercase();
        self.include.iter().all(|term| line.contains(term.as_str()))
            && !self.exclude.iter().any(|term| line.contains(term.as_str()))
    }

    /// Case-insensitive regex over the positive terms, for highlighting.
    /// `None` when the query only excludes.
    pub fn highlight_regex(&self) -> Option<Regex> {
        if self.include.is_empty() {
            return None;
        }
        let alternatives: Vec<String> = self.include.iter().map(|t| regex::escape(t)).collect();
        Regex::new(&format!("(?i){}", alternatives.join("|"))).ok()
    }
}

impl TaskList {
    /// Whether `text` is a usable search query
    pub fn valid_search(&self, text: &str) -> bool {
        SearchQuery::parse(text).is_some()
    }

    /// Tasks matching `text` (or, with `invert`, the ones that don't), in
    /// current order. An invalid query yields nothing.
    pub fn search<'a>(
        &'a self,
        text: &str,
        invert: bool,
    ) -> impl Iterator<Item = &'a Task> + Clone + use<'a> {
        let query = SearchQuery::parse(text);
        self.todo_items.iter().filter(move |task| match &query {
            Some(q) => q.matches(task) != invert,
            None => false,
        })
    }

    /// Tasks tagged with any of `contexts` or any of `projects`. With both
    /// empty, every task. Names may carry their `@`/`+` sigil.
    pub fn filter_contexts_and_projects<'a>(
        &'a self,
        contexts: &[String],
        projects: &[String],
    ) -> impl Iterator<Item = &'a Task> + Clone + use<'a> {
        let contexts: Vec<String> = contexts
            .iter()
            .map(|c| c.trim_start_matches('@').to_string())
            .collect();
        let projects: Vec<String> = projects
            .iter()
            .map(|p| p.trim_start_matches('+').to_string())
            .collect();
        let everything = contexts.is_empty() && projects.is_empty();
        self.todo_items.iter().filter(move |task| {
            everything
                || task.contexts().iter().any(|c| contexts.contains(c))
                || task.projects().iter().any(|p| projects.contains(p))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn sample() -> TaskList {
        TaskList::from_lines(
            &[
                "(A) Call Mom @phone",
                "Buy milk @errands +shopping",
                "x 2024-01-01 Pay rent +bills",
                "Email boss @work +report",
                "Plan trip +travel @home",
            ],
            PathBuf::from("todo.txt"),
            None,
        )
    }

    fn raws<'a>(tasks: impl Iterator<Item = &'a Task>) -> Vec<&'a str> {
        tasks.map(|t| t.raw()).collect()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_query_parse() {
        assert_eq!(SearchQuery::parse("   "), None);
        assert_eq!(SearchQuery::parse("-"), None);
        assert_eq!(
            SearchQuery::parse("Milk -Done"),
            Some(SearchQuery {
                include: vec!["milk".to_string()],
                exclude: vec!["done".to_string()],
            })
        );
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let list = sample();
        assert_eq!(raws(list.search("MOM", false)), vec!["(A) Call Mom @phone"]);
    }

    #[test]
    fn test_search_terms_are_anded() {
        let list = sample();
        assert_eq!(
            raws(list.search("@errands milk", false)),
            vec!["Buy milk @errands +shopping"]
        );
        assert!(list.search("milk rent", false).next().is_none());
    }

    #[test]
    fn test_search_exclusion() {
        let list = sample();
        assert_eq!(
            raws(list.search("+ -shopping -bills", false)),
            vec!["Email boss @work +report", "Plan trip +travel @home"]
        );
    }

    #[test]
    fn test_search_invert_is_complement() {
        let list = sample();
        let hits = list.search("@", false).count();
        let misses = list.search("@", true).count();
        assert_eq!(hits + misses, list.len());
        assert_eq!(
            raws(list.search("@", true)),
            vec!["x 2024-01-01 Pay rent +bills"]
        );
    }

    #[test]
    fn test_search_invalid_query_is_empty() {
        let list = sample();
        assert!(!list.valid_search(""));
        assert!(list.valid_search("milk"));
        assert_eq!(list.search("", false).count(), 0);
        assert_eq!(list.search(" ", true).count(), 0);
    }

    #[test]
    fn test_filter_empty_yields_all() {
        let list = sample();
        assert_eq!(list.filter_contexts_and_projects(&[], &[]).count(), 5);
    }

    #[test]
    fn test_filter_is_or_across_both_lists() {
        let list = sample();
        let result = list.filter_contexts_and_projects(&strings(&["@phone"]), &strings(&["bills"]));
        assert_eq!(
            raws(result),
            vec!["(A) Call Mom @phone", "x 2024-01-01 Pay rent +bills"]
        );
    }

    #[test]
    fn test_filter_iterator_is_reusable() {
        let list = sample();
        let iter = list.filter_contexts_and_projects(&strings(&["home", "work"]), &[]);
        assert_eq!(iter.clone().count(), 2);
        assert_eq!(
            raws(iter),
            vec!["Email boss @work +report", "Plan trip +travel @home"]
        );
    }

    #[test]
    fn test_filter_unknown_tag_is_empty() {
        let list = sample();
        assert_eq!(
            list.filter_contexts_and_projects(&strings(&["nowhere"]), &[]).count(),
            0
        );
    }

    #[test]
    fn test_highlight_regex_escapes_terms() {
        let q = SearchQuery::parse("a.b -c").unwrap();
        let re = q.highlight_regex().unwrap();
        assert!(re.is_match("xx A.B yy"));
        assert!(!re.is_match("axb"));
        assert!(SearchQuery::parse("-c").unwrap().highlight_regex().is_none());
    }
}
