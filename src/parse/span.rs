use std::ops::Range;

/// Byte ranges of the positional fields at the start of a todo.txt line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixSpans {
    /// The whole `(A)` token
    pub priority: Option<Range<usize>>,
    pub creation_date: Option<Range<usize>>,
    /// Byte offset where the free-text body starts
    pub body_start: usize,
}
