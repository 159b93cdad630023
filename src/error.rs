use quire_layout::LayoutError;
use quire_style::StyleParseError;
use quire_tags::TagError;
use thiserror::Error;

/// Top-level error for document assembly and layout.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Tag(#[from] TagError),
    #[error(transparent)]
    Style(#[from] StyleParseError),
}
