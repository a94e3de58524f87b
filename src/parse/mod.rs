pub mod highlight;
pub mod span;
pub mod task_parser;
pub mod task_serializer;

pub use highlight::{HighlightOptions, HighlightTag};
pub use task_parser::{ParsedLine, parse_date, parse_line};
pub use task_serializer::serialize_tasks;
