use super::RenderNode;
use crate::LayoutError;
use crate::engine::LayoutStore;
use crate::interface::{LayoutContext, LayoutEnvironment, LayoutNode, LayoutResult, NodeState};
use crate::style::ComputedStyle;
use quire_types::geometry::{BoxConstraints, Size};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct PageBreakNode {
    style: Arc<ComputedStyle>,
}

impl PageBreakNode {
    pub fn build<'a>(store: &'a LayoutStore) -> RenderNode<'a> {
        let style = store.cache_style(Arc::new(ComputedStyle::default()));
        RenderNode::PageBreak(store.bump.alloc(Self { style }))
    }
}

impl LayoutNode for PageBreakNode {
    fn style(&self) -> &ComputedStyle {
        self.style.as_ref()
    }

    fn measure(
        &self,
        _env: &LayoutEnvironment,
        _constraints: BoxConstraints,
    ) -> Result<Size, LayoutError> {
        Ok(Size::zero())
    }

    fn layout(
        &self,
        ctx: &mut LayoutContext,
        _constraints: BoxConstraints,
        break_state: Option<NodeState>,
    ) -> Result<LayoutResult, LayoutError> {
        if break_state.is_some() {
            // We've already broken, so we are finished
            return Ok(LayoutResult::Finished);
        }

        // Force a break unless we are at the very top of an empty area.
        if !ctx.is_empty() || ctx.cursor_y() > 0.0 {
            Ok(LayoutResult::Break(NodeState::Atomic))
        } else {
            Ok(LayoutResult::Finished)
        }
    }
}
