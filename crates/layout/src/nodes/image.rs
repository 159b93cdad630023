use super::RenderNode;
use crate::LayoutError;
use crate::elements::ImageElement;
use crate::engine::{LayoutEngine, LayoutStore};
use crate::interface::{LayoutContext, LayoutEnvironment, LayoutNode, LayoutResult, NodeState};
use crate::painting::box_painter::create_background_and_borders;
use crate::style::ComputedStyle;
use crate::{LayoutElement, PositionedElement};
use quire_dom::Element;
use quire_types::geometry::{self, BoxConstraints, Size};
use std::sync::Arc;

/// A block-level image. Layout only needs its box; pixel data is the
/// caller's concern.
#[derive(Debug, Clone)]
pub struct ImageNode {
    natural_width: f32,
    natural_height: f32,
    style: Arc<ComputedStyle>,
}

impl ImageNode {
    pub fn build<'a>(
        node: &Element,
        engine: &LayoutEngine,
        parent_style: Arc<ComputedStyle>,
        store: &'a LayoutStore,
    ) -> Result<RenderNode<'a>, LayoutError> {
        let (meta, width, height) = match node {
            Element::Image {
                meta,
                width,
                height,
            } => (meta, *width, *height),
            _ => return Err(LayoutError::BuilderMismatch("Image", node.kind())),
        };

        let style = engine.compute_style(&meta.style_sets, meta.style_override.as_ref(), &parent_style);
        let style_ref = store.cache_style(style);

        let node = store.bump.alloc(Self {
            natural_width: width,
            natural_height: height,
            style: style_ref,
        });
        Ok(RenderNode::Image(node))
    }

    /// Content size after style overrides; the aspect ratio is preserved
    /// when only one axis is styled.
    fn content_size(&self, available_width: f32) -> Size {
        let styled_w = self
            .style
            .box_model
            .width
            .as_ref()
            .and_then(|d| d.resolve(available_width));
        let styled_h = self
            .style
            .box_model
            .height
            .as_ref()
            .and_then(|d| d.resolve(f32::INFINITY));

        match (styled_w, styled_h) {
            (Some(w), Some(h)) => Size::new(w, h),
            (Some(w), None) => Size::new(w, w * self.natural_height / self.natural_width.max(0.01)),
            (None, Some(h)) => Size::new(h * self.natural_width / self.natural_height.max(0.01), h),
            (None, None) => Size::new(self.natural_width, self.natural_height),
        }
    }
}

impl LayoutNode for ImageNode {
    fn style(&self) -> &ComputedStyle {
        self.style.as_ref()
    }

    fn measure(
        &self,
        _env: &LayoutEnvironment,
        constraints: BoxConstraints,
    ) -> Result<Size, LayoutError> {
        let available = if constraints.has_bounded_width() {
            constraints.max_width
        } else {
            f32::INFINITY
        };
        let content = self.content_size(available);
        let margin_y = self.style.box_model.margin.top + self.style.box_model.margin.bottom;

        Ok(Size::new(
            content.width + self.style.padding_x() + self.style.border_x(),
            content.height + self.style.padding_y() + self.style.border_y() + margin_y,
        ))
    }

    fn layout(
        &self,
        ctx: &mut LayoutContext,
        constraints: BoxConstraints,
        break_state: Option<NodeState>,
    ) -> Result<LayoutResult, LayoutError> {
        // An Atomic resume means we already moved to a fresh area; lay out
        // from scratch there.
        let retried = break_state.is_some();

        let content = self.content_size(ctx.bounds().width);
        let box_height =
            content.height + self.style.padding_y() + self.style.border_y();

        if ctx.prepare_for_block(self.style.box_model.margin.top) {
            return Ok(LayoutResult::Break(NodeState::Atomic));
        }

        if box_height > ctx.available_height() + 0.01 && !ctx.is_at_area_top() && !retried {
            return Ok(LayoutResult::Break(NodeState::Atomic));
        }

        let start_y = ctx.cursor_y();

        let bg_elements =
            create_background_and_borders(ctx.bounds(), &self.style, start_y, content.height, true, true);
        for el in bg_elements {
            ctx.push_element_at(el, 0.0, 0.0);
        }

        let content_rect = geometry::Rect {
            x: self.style.border_left_width() + self.style.box_model.padding.left,
            y: start_y + self.style.border_top_width() + self.style.box_model.padding.top,
            width: content.width,
            height: content.height,
        };

        let image_el = PositionedElement::from_rect(
            content_rect,
            LayoutElement::Image(ImageElement {
                natural_width: self.natural_width,
                natural_height: self.natural_height,
            }),
            self.style.clone(),
        );
        ctx.push_element_at(image_el, 0.0, 0.0);

        ctx.set_cursor_y(start_y + box_height);
        ctx.finish_block(self.style.box_model.margin.bottom);

        let _ = constraints;
        Ok(LayoutResult::Finished)
    }
}
