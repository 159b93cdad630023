use crate::elements::{BackgroundElement, BorderElement};
use crate::style::ComputedStyle;
use crate::{LayoutElement, PositionedElement};
use quire_style::border::Border;
use quire_types::geometry::Rect;
use std::sync::Arc;

/// Generates background and border elements for a rectangular region.
///
/// This function is stateless and pure, depending only on the provided
/// arguments. It is used by the block, list item, and table cell nodes.
/// When a box breaks across areas, `draw_top`/`draw_bottom` select which
/// fragment paints the horizontal edges.
pub fn create_background_and_borders(
    bounds: Rect,
    style: &Arc<ComputedStyle>,
    start_y: f32,
    content_height: f32,
    draw_top: bool,
    draw_bottom: bool,
) -> Vec<PositionedElement> {
    let mut elements = Vec::new();

    let border_top = if draw_top {
        style.border_top_width()
    } else {
        0.0
    };
    let border_bottom = if draw_bottom {
        style.border_bottom_width()
    } else {
        0.0
    };
    let border_left = style.border_left_width();
    let border_right = style.border_right_width();

    let padding_top = if draw_top {
        style.box_model.padding.top
    } else {
        0.0
    };
    let padding_bottom = if draw_bottom {
        style.box_model.padding.bottom
    } else {
        0.0
    };

    let total_height = border_top + padding_top + content_height + padding_bottom + border_bottom;

    if total_height <= 0.0 {
        return elements;
    }

    let mut push = |mut element: PositionedElement, y: f32| {
        element.y += y;
        elements.push(element);
    };

    if let Some(bg_color) = &style.misc.background_color {
        // Background is drawn inside borders.
        let bg_rect = Rect {
            x: border_left,
            y: border_top,
            width: bounds.width - border_left - border_right,
            height: total_height - border_top - border_bottom,
        };
        let bg = PositionedElement::from_rect(
            bg_rect,
            LayoutElement::Background(BackgroundElement {
                color: bg_color.clone(),
            }),
            style.clone(),
        );
        push(bg, start_y);
    }

    let bounds_width = bounds.width;

    let mut draw_border = |b: &Option<Border>, rect: Rect| {
        if let Some(border) = b
            && border.width > 0.0
        {
            let el = PositionedElement::from_rect(
                rect,
                LayoutElement::Border(BorderElement {
                    width: border.width,
                    style: border.style.clone(),
                    color: border.color.clone(),
                }),
                style.clone(),
            );
            push(el, start_y);
        }
    };

    if draw_top {
        draw_border(
            &style.border.top,
            Rect {
                x: 0.0,
                y: 0.0,
                width: bounds_width,
                height: border_top,
            },
        );
    }
    if draw_bottom {
        draw_border(
            &style.border.bottom,
            Rect {
                x: 0.0,
                y: total_height - border_bottom,
                width: bounds_width,
                height: border_bottom,
            },
        );
    }

    draw_border(
        &style.border.left,
        Rect {
            x: 0.0,
            y: 0.0,
            width: border_left,
            height: total_height,
        },
    );
    draw_border(
        &style.border.right,
        Rect {
            x: bounds_width - border_right,
            y: 0.0,
            width: border_right,
            height: total_height,
        },
    );

    elements
}
