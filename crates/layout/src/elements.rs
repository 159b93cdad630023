use crate::style::ComputedStyle;
use quire_style::border::BorderStyle;
use quire_style::text::TextDecoration;
use quire_types::geometry::Rect;
use quire_types::transform::Transform;
use quire_types::Color;
use std::sync::Arc;

/// A run of positioned text sharing one style.
#[derive(Debug, Clone, PartialEq)]
pub struct TextElement {
    pub content: String,
    pub href: Option<String>,
    pub text_decoration: TextDecoration,
    /// Distance from the top of the element box to the glyph baseline.
    pub baseline: f32,
    /// Extra advance inserted between characters by justification, on top
    /// of any styled character spacing.
    pub char_spacing: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageElement {
    pub natural_width: f32,
    pub natural_height: f32,
}

/// A filled rectangle behind a box.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundElement {
    pub color: Color,
}

/// One painted border edge. Table border-collapse paints each shared edge
/// exactly once as one of these.
#[derive(Debug, Clone, PartialEq)]
pub struct BorderElement {
    pub width: f32,
    pub style: BorderStyle,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutElement {
    Text(TextElement),
    Image(ImageElement),
    Background(BackgroundElement),
    Border(BorderElement),
}

/// A laid-out element in page coordinates. `transform` maps the element's
/// local box onto the page; it is identity for unrotated content.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedElement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub element: LayoutElement,
    pub style: Arc<ComputedStyle>,
    pub transform: Transform,
    /// Content outside `[x, y, width, height]` must not be painted.
    pub clipped: bool,
}

impl PositionedElement {
    pub fn from_rect(rect: Rect, element: LayoutElement, style: Arc<ComputedStyle>) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            element,
            style,
            transform: Transform::identity(),
            clipped: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}
