pub mod block;
pub mod image;
pub mod list;
pub mod page_break;
pub mod paragraph;
pub mod table;

use crate::diag::Diagnostic;
use crate::interface::{LayoutContext, LayoutEnvironment, LayoutNode, LayoutResult, NodeState};
use crate::keep::{resolve_keep_together, KeepOutcome};
use crate::style::ComputedStyle;
use crate::{LayoutError, rotate};
use quire_style::flow::Clear;
use quire_types::geometry::{BoxConstraints, Rect, Size};
use quire_types::transform::Transform;

pub use block::BlockNode;
pub use image::ImageNode;
pub use list::{ListItemNode, ListNode};
pub use page_break::PageBreakNode;
pub use paragraph::ParagraphNode;
pub use table::{TableCellNode, TableNode, TableRowNode};

/// A layout-ready node. All variants are arena references so the whole tree
/// lives in the [`crate::LayoutStore`] bump and the enum stays `Copy`.
#[derive(Debug, Clone, Copy)]
pub enum RenderNode<'a> {
    Block(&'a BlockNode<'a>),
    Paragraph(&'a ParagraphNode<'a>),
    Image(&'a ImageNode),
    List(&'a ListNode<'a>),
    ListItem(&'a ListItemNode<'a>),
    Table(&'a TableNode<'a>),
    PageBreak(&'a PageBreakNode),
}

impl<'a> RenderNode<'a> {
    fn inner(&self) -> &dyn LayoutNode {
        match self {
            RenderNode::Block(n) => *n,
            RenderNode::Paragraph(n) => *n,
            RenderNode::Image(n) => *n,
            RenderNode::List(n) => *n,
            RenderNode::ListItem(n) => *n,
            RenderNode::Table(n) => *n,
            RenderNode::PageBreak(n) => *n,
        }
    }

    pub fn style(&self) -> &ComputedStyle {
        self.inner().style()
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RenderNode::Block(_) => "block",
            RenderNode::Paragraph(_) => "paragraph",
            RenderNode::Image(_) => "image",
            RenderNode::List(_) => "list",
            RenderNode::ListItem(_) => "list-item",
            RenderNode::Table(_) => "table",
            RenderNode::PageBreak(_) => "page-break",
        }
    }

    /// Measures the node, reporting the rotated bounding box for rotated
    /// boxes so parents fit-check against the space actually occupied.
    pub fn measure(
        &self,
        env: &LayoutEnvironment,
        constraints: BoxConstraints,
    ) -> Result<Size, LayoutError> {
        let size = self.inner().measure(env, constraints)?;
        if let Some(angle) = self.style().rotation_radians() {
            let bbox = Transform::rotate_about(angle, size.width / 2.0, size.height / 2.0)
                .bounding_box(Rect::new(0.0, 0.0, size.width, size.height));
            return Ok(Size::new(bbox.width, bbox.height));
        }
        Ok(size)
    }

    /// Measures the node ignoring rotation, for the rotation pass itself.
    pub(crate) fn measure_unrotated(
        &self,
        env: &LayoutEnvironment,
        constraints: BoxConstraints,
    ) -> Result<Size, LayoutError> {
        self.inner().measure(env, constraints)
    }

    /// Lays out the node, applying flow policies that wrap any node type:
    /// clearing past floats, bounded rotation, and keep-together.
    pub fn layout(
        &self,
        ctx: &mut LayoutContext,
        constraints: BoxConstraints,
        break_state: Option<NodeState>,
    ) -> Result<LayoutResult, LayoutError> {
        // A Restart state means the node was deferred whole; lay out fresh.
        let (break_state, restarted) = match break_state {
            Some(NodeState::Restart) => (None, true),
            other => (other, false),
        };

        if break_state.is_none() {
            let clear = self.style().flow.clear;
            if clear != Clear::None {
                let target = ctx.floats().clearance(clear, ctx.absolute_y());
                let dy = target - ctx.absolute_y();
                if dy > 0.0 {
                    if dy > ctx.available_height() && !ctx.is_at_area_top() {
                        return Ok(LayoutResult::Break(NodeState::Restart));
                    }
                    ctx.advance_cursor(dy);
                    ctx.last_v_margin = 0.0;
                }
            }
        }

        if self.style().rotation_radians().is_some() {
            return rotate::layout_rotated(*self, ctx, constraints, break_state);
        }

        if self.style().flow.keep_together && break_state.is_none() && !ctx.is_forced() {
            return self.layout_kept(ctx, constraints, restarted);
        }

        self.layout_inner(ctx, constraints, break_state)
    }

    fn layout_kept(
        &self,
        ctx: &mut LayoutContext,
        constraints: BoxConstraints,
        restarted: bool,
    ) -> Result<LayoutResult, LayoutError> {
        let required = self.measure(&ctx.env, constraints)?.height;
        let available = ctx.available_height();
        let at_top = ctx.is_at_area_top() || restarted;

        match resolve_keep_together(required, available, at_top, ctx.env.engine.config().epsilon) {
            KeepOutcome::Fits => self.layout_inner(ctx, constraints, None),
            KeepOutcome::RetryNextArea => Ok(LayoutResult::Break(NodeState::Restart)),
            KeepOutcome::ForcedPlacement => {
                ctx.warn(Diagnostic::DoesNotFitArea {
                    kind: self.kind(),
                    required,
                    available,
                });
                ctx.set_forced(true);
                let result = self.layout_inner(ctx, constraints, None);
                ctx.set_forced(false);
                result
            }
        }
    }

    pub(crate) fn layout_inner(
        &self,
        ctx: &mut LayoutContext,
        constraints: BoxConstraints,
        break_state: Option<NodeState>,
    ) -> Result<LayoutResult, LayoutError> {
        self.inner().layout(ctx, constraints, break_state)
    }
}
