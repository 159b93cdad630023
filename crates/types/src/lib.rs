pub mod color;
pub mod geometry;
pub mod transform;

pub use color::Color;
pub use geometry::{BoxConstraints, Point, Rect, Size};
pub use transform::Transform;
