use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Builder mismatch: Expected {0} node, got {1}.")]
    BuilderMismatch(&'static str, &'static str),
    #[error("State mismatch: Expected state for {0}, got {1}.")]
    StateMismatch(&'static str, &'static str),
    #[error("Table row {0} has more cells than the table has columns ({1}).")]
    TooManyCells(usize, usize),
    #[error("Pagination did not make progress after {0} areas.")]
    NoProgress(usize),
    #[error("Generic layout error: {0}")]
    Generic(String),
}

pub mod config;
pub mod diag;
pub mod engine;
pub mod floats;
pub mod interface;
pub mod keep;
pub mod metrics;
pub mod nodes;
pub mod painting;
pub mod rotate;
pub mod style;
pub mod text;

mod elements;

pub use self::config::LayoutConfig;
pub use self::diag::{Diagnostic, DiagnosticSink};
pub use self::elements::{
    BackgroundElement, BorderElement, ImageElement, LayoutElement, PositionedElement, TextElement,
};
pub use self::engine::{LayoutEngine, LayoutStore, Page, PaginatedLayout};
pub use self::floats::FloatContext;
pub use self::interface::{
    BlockState, LayoutContext, LayoutEnvironment, LayoutNode, LayoutResult, ListItemState,
    NodeState, ParagraphState, TableState,
};
pub use self::metrics::{BuiltinMetrics, FontMetrics};
pub use self::style::ComputedStyle;

// Re-export geometry types used by nodes to prevent type mismatches.
pub use quire_types::geometry::{BoxConstraints, Rect, Size};

#[cfg(test)]
mod keep_test;
#[cfg(test)]
mod table_test;
#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod text_test;
