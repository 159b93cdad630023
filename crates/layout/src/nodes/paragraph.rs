use crate::LayoutError;
use crate::elements::{ImageElement, TextElement};
use crate::engine::{LayoutEngine, LayoutStore};
use crate::interface::{
    LayoutContext, LayoutEnvironment, LayoutNode, LayoutResult, NodeState, ParagraphState,
};
use crate::metrics::FontMetrics;
use crate::nodes::RenderNode;
use crate::painting::box_painter::create_background_and_borders;
use crate::style::ComputedStyle;
use crate::text::{
    align_line, build_paragraph_content, InlineItem, Line, LineBreaker, LineItemKind,
    ParagraphContent,
};
use crate::{LayoutElement, PositionedElement};
use quire_dom::Element;
use quire_types::geometry::{BoxConstraints, Rect, Size};
use std::sync::Arc;

#[derive(Debug)]
pub struct ParagraphNode<'a> {
    pub content: &'a ParagraphContent,
    pub style: Arc<ComputedStyle>,
}

impl<'a> ParagraphNode<'a> {
    pub fn build(
        node: &Element,
        engine: &LayoutEngine,
        parent_style: Arc<ComputedStyle>,
        store: &'a LayoutStore,
    ) -> Result<RenderNode<'a>, LayoutError> {
        let (meta, children) = match node {
            Element::Paragraph { meta, children } => (meta, children),
            _ => return Err(LayoutError::BuilderMismatch("Paragraph", node.kind())),
        };

        let style = engine.compute_style(&meta.style_sets, meta.style_override.as_ref(), &parent_style);
        let content = build_paragraph_content(children, engine, &style);

        let style_ref = store.cache_style(style);
        let content_ref = &*store.bump.alloc(content);

        let node = store.bump.alloc(Self {
            content: content_ref,
            style: style_ref,
        });
        Ok(RenderNode::Paragraph(node))
    }

    fn breaker<'b>(&'b self, engine: &'b LayoutEngine) -> LineBreaker<'b> {
        LineBreaker::new(
            self.content,
            engine.metrics(),
            self.style.flow.overflow,
            self.style.text.line_height,
        )
    }

    /// The horizontal band a line starting at page-absolute `y` may occupy,
    /// as (x offset into the content box, usable width).
    fn line_band(ctx: &LayoutContext, content_x: f32, content_width: f32, y: f32, h: f32) -> (f32, f32) {
        let floats = ctx.floats();
        let area = floats.content();
        let left_limit = (area.x + floats.left_inset(y, h)).max(content_x);
        let right_limit = (area.right() - floats.right_inset(y, h)).min(content_x + content_width);
        let width = (right_limit - left_limit).max(0.0);
        (left_limit - content_x, width)
    }

    fn push_line(
        &self,
        ctx: &mut LayoutContext,
        metrics: &dyn FontMetrics,
        line: &Line,
        x_offset: f32,
    ) {
        for item in &line.items {
            match &item.kind {
                LineItemKind::Text { start, end } => {
                    let run = match &self.content.items[item.item_index] {
                        InlineItem::Run(run) => run,
                        _ => continue,
                    };
                    let text = &run.style.text;
                    let element = PositionedElement::from_rect(
                        Rect::new(x_offset + item.x, 0.0, item.width, text.line_height),
                        LayoutElement::Text(TextElement {
                            content: run.text[*start..*end].to_string(),
                            href: run.href.clone(),
                            text_decoration: text.text_decoration.clone(),
                            baseline: metrics.baseline_in_line(text.font_size, text.line_height),
                            char_spacing: item.char_spacing,
                        }),
                        run.style.clone(),
                    );
                    ctx.push_element(element);
                }
                LineItemKind::Image { height } => {
                    let style = match &self.content.items[item.item_index] {
                        InlineItem::Image { style, .. } => style.clone(),
                        _ => continue,
                    };
                    // Bottom-align the image within the line box.
                    let element = PositionedElement::from_rect(
                        Rect::new(
                            x_offset + item.x,
                            line.height - height,
                            item.width,
                            *height,
                        ),
                        LayoutElement::Image(ImageElement {
                            natural_width: item.width,
                            natural_height: *height,
                        }),
                        style,
                    );
                    ctx.push_element(element);
                }
            }
        }
    }
}

impl<'a> LayoutNode for ParagraphNode<'a> {
    fn style(&self) -> &ComputedStyle {
        self.style.as_ref()
    }

    fn measure(
        &self,
        env: &LayoutEnvironment,
        constraints: BoxConstraints,
    ) -> Result<Size, LayoutError> {
        let h_deduction = self.style.padding_x() + self.style.border_x();
        let margin_y = self.style.box_model.margin.top + self.style.box_model.margin.bottom;

        let content_width = if constraints.has_bounded_width() {
            (constraints.max_width - h_deduction).max(0.0)
        } else {
            f32::INFINITY
        };

        let mut breaker = self.breaker(env.engine);
        let mut height = 0.0;
        let mut max_line_width: f32 = 0.0;
        while let Some(line) = breaker.next_line(content_width) {
            height += line.height;
            max_line_width = max_line_width.max(line.width);
        }

        let width = if constraints.has_bounded_width() {
            constraints.max_width
        } else {
            max_line_width + h_deduction
        };

        Ok(Size::new(
            width,
            margin_y + self.style.padding_y() + self.style.border_y() + height,
        ))
    }

    fn layout(
        &self,
        ctx: &mut LayoutContext,
        constraints: BoxConstraints,
        break_state: Option<NodeState>,
    ) -> Result<LayoutResult, LayoutError> {
        let resume_pos = match break_state {
            Some(state) => Some(state.as_paragraph()?.pos),
            None => None,
        };
        let is_continuation = resume_pos.is_some();

        if !is_continuation {
            if ctx.prepare_for_block(self.style.box_model.margin.top) {
                return Ok(LayoutResult::Break(NodeState::Paragraph(ParagraphState {
                    pos: Default::default(),
                })));
            }
        } else {
            ctx.last_v_margin = 0.0;
        }

        let top_spacing = if !is_continuation {
            self.style.border_top_width() + self.style.box_model.padding.top
        } else {
            0.0
        };

        let block_start_y = ctx.cursor_y();
        ctx.advance_cursor(top_spacing);
        let content_start_y = ctx.cursor_y();

        let bounds = ctx.bounds();
        let content_x = bounds.x + self.style.border_left_width() + self.style.box_model.padding.left;
        let content_width = if constraints.has_bounded_width() {
            (bounds.width - self.style.padding_x() - self.style.border_x()).max(0.0)
        } else {
            f32::INFINITY
        };

        // The breaker borrows the engine, not the context, so lines can be
        // pushed through `ctx` while it is live.
        let engine = ctx.env.engine;
        let mut breaker = self.breaker(engine);
        if let Some(pos) = resume_pos {
            breaker.seek(pos);
        }

        let mut split_state: Option<ParagraphState> = None;
        let probe_height = self.style.text.line_height;

        while !breaker.is_done() {
            let y_abs = ctx.absolute_y();
            let (x_offset, band_width) = if ctx.floats().has_floats() && content_width.is_finite() {
                Self::line_band(ctx, content_x, content_width, y_abs, probe_height)
            } else {
                (0.0, content_width)
            };

            let pos_before = breaker.pos();
            let line = match breaker.next_line(band_width) {
                Some(line) => line,
                None => break,
            };

            if line.height > ctx.available_height() + 0.01 && !ctx.is_at_area_top() {
                breaker.seek(pos_before);
                split_state = Some(ParagraphState { pos: pos_before });
                break;
            }

            let mut line = line;
            align_line(&mut line, band_width, &self.style.text.text_align, self.content);
            let left_spacing = self.style.border_left_width() + self.style.box_model.padding.left;
            self.push_line(ctx, engine.metrics(), &line, left_spacing + x_offset);
            ctx.advance_cursor(line.height);
        }

        let used_height = ctx.cursor_y() - content_start_y;

        let bg = create_background_and_borders(
            bounds,
            &self.style,
            block_start_y,
            used_height,
            !is_continuation,
            split_state.is_none(),
        );
        for el in bg {
            ctx.push_element_at(el, 0.0, 0.0);
        }

        match split_state {
            None => {
                let bottom_spacing =
                    self.style.box_model.padding.bottom + self.style.border_bottom_width();
                ctx.advance_cursor(bottom_spacing);
                ctx.finish_block(self.style.box_model.margin.bottom);
                Ok(LayoutResult::Finished)
            }
            Some(state) => Ok(LayoutResult::Break(NodeState::Paragraph(state))),
        }
    }
}
