pub mod breaker;
pub mod builder;
pub mod justify;

pub use breaker::{BreakerPos, Line, LineBreaker, LineItem, LineItemKind};
pub use builder::{build_paragraph_content, InlineItem, ParagraphContent, TextRun};
pub use justify::align_line;
