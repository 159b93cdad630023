//! Layout of rotated boxes.
//!
//! A rotated subtree is laid out untransformed in a detached scratch
//! context at the origin, then placed by composing a transform onto every
//! produced element. The parent flow reserves the rotated bounding box, so
//! rotated content never overlaps following siblings.

use crate::diag::Diagnostic;
use crate::floats::FloatContext;
use crate::interface::{LayoutContext, LayoutResult, NodeState};
use crate::nodes::RenderNode;
use crate::{LayoutError, PositionedElement};
use quire_types::geometry::{BoxConstraints, Rect, Size};
use quire_types::transform::Transform;

fn rotated_bbox(size: Size, angle: f32) -> Rect {
    Transform::rotate_about(angle, size.width / 2.0, size.height / 2.0)
        .bounding_box(Rect::new(0.0, 0.0, size.width, size.height))
}

/// Lays out `node` rotated by its style angle. The box is atomic: it is
/// placed whole on this area or deferred whole to the next one.
pub fn layout_rotated(
    node: RenderNode,
    ctx: &mut LayoutContext,
    constraints: BoxConstraints,
    break_state: Option<NodeState>,
) -> Result<LayoutResult, LayoutError> {
    let style = node.style();
    let angle = match style.rotation_radians() {
        Some(a) => a,
        None => return node.layout_inner(ctx, constraints, break_state),
    };
    // A resumed rotated box has already been deferred once; it places
    // unconditionally to guarantee progress.
    let retried = break_state.is_some();

    if !retried {
        if ctx.prepare_for_block(style.box_model.margin.top) {
            return Ok(LayoutResult::Break(NodeState::Atomic));
        }
    } else {
        ctx.last_v_margin = 0.0;
    }

    let bounds = ctx.bounds();
    let epsilon = ctx.env.engine.config().epsilon;
    let mut max_width = if constraints.has_bounded_width() {
        constraints.max_width
    } else {
        bounds.width
    };
    // A styled width caps the box regardless of the container measure.
    if let Some(w) = style
        .box_model
        .width
        .as_ref()
        .and_then(|d| d.resolve(bounds.width))
    {
        max_width = max_width.min(w + style.padding_x() + style.border_x());
    }

    // The rotated bounding box can be wider than the box itself, so a first
    // fit at full width may overflow. Re-measure at progressively narrower
    // widths, a bounded number of times, until the footprint fits.
    let max_passes = ctx.env.engine.config().max_rotation_passes;
    let mut content_constraints = BoxConstraints::tight_width(max_width);
    let mut size = node.measure_unrotated(&ctx.env, content_constraints)?;
    let mut bbox = rotated_bbox(size, angle);
    let mut passes = 0;
    while bbox.width > max_width + epsilon && passes < max_passes {
        let scale = max_width / bbox.width;
        content_constraints = BoxConstraints::tight_width((size.width * scale).max(1.0));
        size = node.measure_unrotated(&ctx.env, content_constraints)?;
        bbox = rotated_bbox(size, angle);
        passes += 1;
    }

    let mut clip = false;
    if bbox.width > max_width + epsilon {
        ctx.warn(Diagnostic::RotationRetriesExhausted { passes: max_passes });
        ctx.warn(Diagnostic::ClippedContent { kind: node.kind() });
        clip = true;
    }

    let available = ctx.available_height();
    if bbox.height > available + epsilon {
        if !retried && !ctx.is_at_area_top() && !ctx.is_forced() {
            return Ok(LayoutResult::Break(NodeState::Atomic));
        }
        // Placed regardless (fresh area top, forced context, or already
        // deferred once): the footprint overflows the area.
        ctx.warn(Diagnostic::DoesNotFitArea {
            kind: node.kind(),
            required: bbox.height,
            available,
        });
    }

    // Lay the subtree out untransformed at the origin.
    let scratch_bounds = Rect::new(0.0, 0.0, size.width, f32::INFINITY);
    let mut scratch_elements: Vec<PositionedElement> = Vec::new();
    let mut scratch_floats = FloatContext::new(scratch_bounds);
    {
        let mut scratch = ctx.detached(
            scratch_bounds,
            &mut scratch_elements,
            &mut scratch_floats,
            true,
        );
        node.layout_inner(&mut scratch, content_constraints, None)?;
    }

    // Place the rotated box so its bounding box's top-left corner lands at
    // the current cursor, flush with the left content edge.
    let rotation = Transform::rotate_about(angle, size.width / 2.0, size.height / 2.0);
    let place = Transform::translate(bounds.x - bbox.x, bounds.y + ctx.cursor_y() - bbox.y)
        .then(rotation);

    for mut el in scratch_elements {
        el.transform = place.then(el.transform);
        if clip {
            el.clipped = true;
        }
        ctx.push_element_absolute(el);
    }

    ctx.advance_cursor(bbox.height);
    ctx.finish_block(style.box_model.margin.bottom);
    Ok(LayoutResult::Finished)
}
