use crate::util::unicode::{
    next_grapheme_boundary, prev_grapheme_boundary, word_start_after, word_start_before,
};

/// In-progress tab completion: which word is being completed and with what
#[derive(Debug, Clone, PartialEq, Eq)]
struct Completion {
    /// Byte offset where the completed word starts
    start: usize,
    candidates: Vec<String>,
    index: usize,
}

/// Single-line text editor used for editing a task in place.
///
/// The cursor is a byte offset, always on a grapheme boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineEditor {
    text: String,
    cursor: usize,
    completion: Option<Completion>,
}

impl LineEditor {
    /// Start editing `text` with the cursor at the end
    pub fn new(text: &str) -> Self {
        LineEditor {
            text: text.to_string(),
            cursor: text.len(),
            completion: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn insert_str(&mut self, s: &str) {
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = prev_grapheme_boundary(&self.text, self.cursor) {
            self.text.replace_range(prev..self.cursor, "");
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if let Some(next) = next_grapheme_boundary(&self.text, self.cursor) {
            self.text.replace_range(self.cursor..next, "");
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = prev_grapheme_boundary(&self.text, self.cursor) {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = next_grapheme_boundary(&self.text, self.cursor) {
            self.cursor = next;
        }
    }

    pub fn word_left(&mut self) {
        self.cursor = word_start_before(&self.text, self.cursor);
    }

    pub fn word_right(&mut self) {
        self.cursor = word_start_after(&self.text, self.cursor);
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Remove the word before the cursor and return it
    pub fn delete_word(&mut self) -> String {
        let start = word_start_before(&self.text, self.cursor);
        self.kill(start, self.cursor)
    }

    /// Remove everything from the cursor to the end and return it
    pub fn delete_to_end(&mut self) -> String {
        self.kill(self.cursor, self.text.len())
    }

    /// Remove everything before the cursor and return it
    pub fn delete_to_start(&mut self) -> String {
        self.kill(0, self.cursor)
    }

    fn kill(&mut self, start: usize, end: usize) -> String {
        let killed = self.text[start..end].to_string();
        self.text.replace_range(start..end, "");
        self.cursor = start;
        killed
    }

    /// Whether the last edit was a tab completion that `complete` would cycle
    pub fn is_completing(&self) -> bool {
        self.completion.is_some()
    }

    pub fn end_completion(&mut self) {
        self.completion = None;
    }

    /// Complete the word before the cursor against `words` (e.g. `@home`,
    /// `+garden`). Repeated calls cycle through the matches. Returns whether
    /// anything was completed.
    pub fn complete(&mut self, words: &[String]) -> bool {
        if let Some(c) = &mut self.completion {
            c.index = (c.index + 1) % c.candidates.len();
            let start = c.start;
            let word = c.candidates[c.index].clone();
            self.text.replace_range(start..self.cursor, &word);
            self.cursor = start + word.len();
            return true;
        }

        let start = self.text[..self.cursor].rfind(' ').map_or(0, |i| i + 1);
        let prefix = &self.text[start..self.cursor];
        if prefix.is_empty() {
            return false;
        }
        let candidates: Vec<String> = words
            .iter()
            .filter(|w| w.starts_with(prefix) && w.as_str() != prefix)
            .cloned()
            .collect();
        let Some(first) = candidates.first().cloned() else {
            return false;
        };
        self.text.replace_range(start..self.cursor, &first);
        self.cursor = start + first.len();
        self.completion = Some(Completion {
            start,
            candidates,
            index: 0,
        });
        true
    }
}
