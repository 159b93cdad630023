use super::RenderNode;
use crate::LayoutError;
use crate::elements::TextElement;
use crate::engine::{LayoutEngine, LayoutStore};
use crate::interface::{
    BlockState, LayoutContext, LayoutEnvironment, LayoutNode, LayoutResult, ListItemState,
    NodeState,
};
use crate::style::ComputedStyle;
use crate::{LayoutElement, PositionedElement};
use quire_dom::Element;
use quire_style::text::TextDecoration;
use quire_types::geometry::{self, BoxConstraints, Rect, Size};
use std::sync::Arc;

/// Space between the marker and the item content, in points.
const MARKER_GAP: f32 = 6.0;

#[derive(Debug, Clone)]
pub struct ListNode<'a> {
    pub items: &'a [RenderNode<'a>],
    pub style: Arc<ComputedStyle>,
}

impl<'a> ListNode<'a> {
    pub fn build(
        node: &Element,
        engine: &LayoutEngine,
        parent_style: Arc<ComputedStyle>,
        store: &'a LayoutStore,
    ) -> Result<RenderNode<'a>, LayoutError> {
        let (meta, start, children) = match node {
            Element::List {
                meta,
                start,
                children,
            } => (meta, start.unwrap_or(1), children),
            _ => return Err(LayoutError::BuilderMismatch("List", node.kind())),
        };

        let style = engine.compute_style(&meta.style_sets, meta.style_override.as_ref(), &parent_style);

        let mut item_vec = Vec::with_capacity(children.len());
        let mut index = start.saturating_sub(1);
        for child in children {
            match child {
                Element::ListItem { .. } => {
                    item_vec.push(ListItemNode::build(child, index, engine, style.clone(), store)?);
                    index += 1;
                }
                other => {
                    // Non-item children flow as ordinary nodes, unnumbered.
                    item_vec.push(engine.build_render_node(other, style.clone(), store)?);
                }
            }
        }

        let items = store.bump.alloc_slice_copy(&item_vec);
        let style_ref = store.cache_style(style);

        let node = store.bump.alloc(Self {
            items,
            style: style_ref,
        });
        Ok(RenderNode::List(node))
    }
}

impl<'a> LayoutNode for ListNode<'a> {
    fn style(&self) -> &ComputedStyle {
        self.style.as_ref()
    }

    fn measure(
        &self,
        env: &LayoutEnvironment,
        constraints: BoxConstraints,
    ) -> Result<Size, LayoutError> {
        let margin_y = self.style.box_model.margin.top + self.style.box_model.margin.bottom;
        let mut height = margin_y;
        let mut max_width: f32 = 0.0;
        for item in self.items {
            let size = item.measure(env, constraints)?;
            height += size.height;
            max_width = max_width.max(size.width);
        }
        let width = if constraints.has_bounded_width() {
            constraints.max_width
        } else {
            max_width
        };
        Ok(Size::new(width, height))
    }

    fn layout(
        &self,
        ctx: &mut LayoutContext,
        constraints: BoxConstraints,
        break_state: Option<NodeState>,
    ) -> Result<LayoutResult, LayoutError> {
        let (start_index, mut child_resume_state) = if let Some(state) = break_state {
            let s = state.as_block()?;
            (s.child_index, s.child_state.map(|b| *b))
        } else {
            (0, None)
        };
        let is_continuation = start_index > 0 || child_resume_state.is_some();

        if !is_continuation {
            if ctx.prepare_for_block(self.style.box_model.margin.top) {
                return Ok(LayoutResult::Break(NodeState::Block(BlockState {
                    child_index: 0,
                    child_state: None,
                })));
            }
        } else {
            ctx.last_v_margin = 0.0;
        }

        for (i, item) in self.items.iter().enumerate().skip(start_index) {
            let resume = if i == start_index {
                child_resume_state.take()
            } else {
                None
            };

            match item.layout(ctx, constraints, resume)? {
                LayoutResult::Finished => {}
                LayoutResult::Break(next_state) => {
                    return Ok(LayoutResult::Break(NodeState::Block(BlockState {
                        child_index: i,
                        child_state: Some(Box::new(next_state)),
                    })));
                }
            }
        }

        ctx.finish_block(self.style.box_model.margin.bottom);
        Ok(LayoutResult::Finished)
    }
}

#[derive(Debug, Clone)]
pub struct ListItemNode<'a> {
    pub marker: &'a str,
    pub children: &'a [RenderNode<'a>],
    pub style: Arc<ComputedStyle>,
}

impl<'a> ListItemNode<'a> {
    pub fn build(
        node: &Element,
        index: usize,
        engine: &LayoutEngine,
        list_style: Arc<ComputedStyle>,
        store: &'a LayoutStore,
    ) -> Result<RenderNode<'a>, LayoutError> {
        let (meta, children_ir) = match node {
            Element::ListItem { meta, children } => (meta, children),
            _ => return Err(LayoutError::BuilderMismatch("ListItem", node.kind())),
        };

        let style = engine.compute_style(&meta.style_sets, meta.style_override.as_ref(), &list_style);

        let marker_text = list_style.list.style_type.marker(index);
        let marker = store.alloc_str(&marker_text);

        let child_vec = engine.build_layout_node_children(children_ir, style.clone(), store)?;
        let children = store.bump.alloc_slice_copy(&child_vec);
        let style_ref = store.cache_style(style);

        let node = store.bump.alloc(Self {
            marker,
            children,
            style: style_ref,
        });
        Ok(RenderNode::ListItem(node))
    }

    fn gutter_width(&self, env: &LayoutEnvironment) -> f32 {
        if self.marker.is_empty() {
            return 0.0;
        }
        env.engine.metrics().text_width(
            self.marker,
            self.style.text.font_size,
            &self.style.text.font_weight,
        ) + MARKER_GAP
    }
}

impl<'a> LayoutNode for ListItemNode<'a> {
    fn style(&self) -> &ComputedStyle {
        self.style.as_ref()
    }

    fn measure(
        &self,
        env: &LayoutEnvironment,
        constraints: BoxConstraints,
    ) -> Result<Size, LayoutError> {
        let gutter = self.gutter_width(env);
        let margin_y = self.style.box_model.margin.top + self.style.box_model.margin.bottom;

        let child_constraints = if constraints.has_bounded_width() {
            BoxConstraints::tight_width((constraints.max_width - gutter).max(0.0))
        } else {
            BoxConstraints::default()
        };

        let mut height = margin_y;
        let mut max_width: f32 = 0.0;
        for child in self.children {
            let size = child.measure(env, child_constraints)?;
            height += size.height;
            max_width = max_width.max(size.width);
        }
        height = height.max(margin_y + self.style.text.line_height);

        let width = if constraints.has_bounded_width() {
            constraints.max_width
        } else {
            max_width + gutter
        };
        Ok(Size::new(width, height))
    }

    fn layout(
        &self,
        ctx: &mut LayoutContext,
        _constraints: BoxConstraints,
        break_state: Option<NodeState>,
    ) -> Result<LayoutResult, LayoutError> {
        let (start_index, mut child_resume_state) = if let Some(state) = break_state {
            let s = state.as_list_item()?;
            (s.child_index, s.child_state.map(|b| *b))
        } else {
            (0, None)
        };
        let is_continuation = start_index > 0 || child_resume_state.is_some();

        if !is_continuation {
            if ctx.prepare_for_block(self.style.box_model.margin.top) {
                return Ok(LayoutResult::Break(NodeState::ListItem(ListItemState {
                    child_index: 0,
                    child_state: None,
                })));
            }
        } else {
            ctx.last_v_margin = 0.0;
        }

        let gutter = self.gutter_width(&ctx.env);
        let start_y = ctx.cursor_y();

        // The marker is drawn once, on the fragment where the item starts.
        if !is_continuation && !self.marker.is_empty() {
            let marker_width = gutter - MARKER_GAP;
            let text = &self.style.text;
            let baseline = ctx
                .env
                .engine
                .metrics()
                .baseline_in_line(text.font_size, text.line_height);
            let el = PositionedElement::from_rect(
                Rect::new(0.0, start_y, marker_width, text.line_height),
                LayoutElement::Text(TextElement {
                    content: self.marker.to_string(),
                    href: None,
                    text_decoration: TextDecoration::None,
                    baseline,
                    char_spacing: 0.0,
                }),
                self.style.clone(),
            );
            ctx.push_element_at(el, 0.0, 0.0);
        }

        let ctx_bounds = ctx.bounds();
        let child_bounds = geometry::Rect {
            x: ctx_bounds.x + gutter,
            y: ctx_bounds.y + start_y,
            width: (ctx_bounds.width - gutter).max(0.0),
            height: ctx.available_height(),
        };
        let child_constraints = BoxConstraints::tight_width(child_bounds.width);

        let mut child_ctx = ctx.child(child_bounds);
        let mut split_res = LayoutResult::Finished;
        for (i, child) in self.children.iter().enumerate().skip(start_index) {
            let resume = if i == start_index {
                child_resume_state.take()
            } else {
                None
            };

            match child.layout(&mut child_ctx, child_constraints, resume)? {
                LayoutResult::Finished => {}
                LayoutResult::Break(next_state) => {
                    split_res = LayoutResult::Break(NodeState::ListItem(ListItemState {
                        child_index: i,
                        child_state: Some(Box::new(next_state)),
                    }));
                    break;
                }
            }
        }

        let used = child_ctx.cursor_y().max(if is_continuation {
            0.0
        } else {
            self.style.text.line_height
        });

        ctx.set_cursor_y(start_y + used);
        match split_res {
            LayoutResult::Finished => {
                ctx.finish_block(self.style.box_model.margin.bottom);
                Ok(LayoutResult::Finished)
            }
            res => Ok(res),
        }
    }
}
