pub mod border;
pub mod dimension;
pub mod flow;
pub mod font;
pub mod list;
pub mod parsers;
pub mod stylesheet;
pub mod text;

pub use border::{Border, BorderStyle};
pub use dimension::{Dimension, Margins, PageSize};
pub use flow::{Clear, Float, Overflow};
pub use font::{FontStyle, FontWeight};
pub use list::ListStyleType;
pub use parsers::StyleParseError;
pub use stylesheet::{ElementStyle, PageLayout, Stylesheet};
pub use text::{TextAlign, TextDecoration};
