use super::collapse::collapse_edge;
use super::solver::ColumnSolver;
use crate::LayoutError;
use crate::elements::{BackgroundElement, BorderElement, LayoutElement, PositionedElement};
use crate::engine::{LayoutEngine, LayoutStore};
use crate::interface::{
    LayoutContext, LayoutEnvironment, LayoutNode, LayoutResult, NodeState, TableState,
};
use crate::nodes::{BlockNode, RenderNode};
use crate::style::{ComputedStyle, ComputedStyleData};
use quire_dom::{Element, TableColumn, TableRow, TableSettings};
use quire_style::border::Border;
use quire_style::dimension::Margins;
use quire_types::color::Color;
use quire_types::geometry::{BoxConstraints, Rect, Size};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Rows sampled when sizing auto columns from content.
const CONTENT_SAMPLE_ROWS: usize = 100;

/// Solved geometry for a table at a given content width. Cached per
/// (table, width) so pagination across areas does not re-solve columns.
#[derive(Debug, Clone)]
struct TableGeometry {
    col_widths: Vec<f32>,
    header_heights: Vec<f32>,
    body_heights: Vec<f32>,
    footer_heights: Vec<f32>,
}

impl TableGeometry {
    /// Column boundary offsets relative to the content box, length `n + 1`.
    fn x_offsets(&self) -> Vec<f32> {
        let mut offsets = Vec::with_capacity(self.col_widths.len() + 1);
        let mut acc = 0.0;
        offsets.push(acc);
        for w in &self.col_widths {
            acc += w;
            offsets.push(acc);
        }
        offsets
    }

    fn grid_width(&self) -> f32 {
        self.col_widths.iter().sum()
    }

    fn header_total(&self) -> f32 {
        self.header_heights.iter().sum()
    }

    fn body_total(&self) -> f32 {
        self.body_heights.iter().sum()
    }

    fn footer_total(&self) -> f32 {
        self.footer_heights.iter().sum()
    }
}

#[derive(Debug, Clone)]
pub struct TableCellNode<'a> {
    /// Cell content as an anonymous block; its style carries the cell's
    /// padding and text properties but no border or background, which are
    /// painted by the table grid itself.
    pub content: BlockNode<'a>,
    /// The cell's declared borders, participants in edge collapsing.
    pub border: crate::style::BorderModel,
    pub background: Option<Color>,
    pub col_start: usize,
    pub col_span: usize,
}

#[derive(Debug, Clone)]
pub struct TableRowNode<'a> {
    pub cells: &'a [TableCellNode<'a>],
}

impl<'a> TableRowNode<'a> {
    fn cell_starting_at(&self, boundary: usize) -> Option<&TableCellNode<'a>> {
        self.cells.iter().find(|c| c.col_start == boundary)
    }

    fn cell_ending_at(&self, boundary: usize) -> Option<&TableCellNode<'a>> {
        self.cells
            .iter()
            .find(|c| c.col_start + c.col_span == boundary)
    }

    fn border_top(&self, col: usize) -> Option<&Border> {
        self.cells
            .iter()
            .find(|c| col >= c.col_start && col < c.col_start + c.col_span)
            .and_then(|c| c.border.top.as_ref())
    }

    fn border_bottom(&self, col: usize) -> Option<&Border> {
        self.cells
            .iter()
            .find(|c| col >= c.col_start && col < c.col_start + c.col_span)
            .and_then(|c| c.border.bottom.as_ref())
    }
}

#[derive(Debug, Clone)]
pub struct TableNode<'a> {
    unique_id: u64,
    pub columns: &'a [TableColumn],
    pub header: &'a [TableRowNode<'a>],
    pub body: &'a [TableRowNode<'a>],
    pub footer: &'a [TableRowNode<'a>],
    pub settings: TableSettings,
    pub style: Arc<ComputedStyle>,
}

impl<'a> TableNode<'a> {
    pub fn build(
        node: &Element,
        engine: &LayoutEngine,
        parent_style: Arc<ComputedStyle>,
        store: &'a LayoutStore,
    ) -> Result<RenderNode<'a>, LayoutError> {
        let (meta, columns, header, body, footer, settings) = match node {
            Element::Table {
                meta,
                columns,
                header,
                body,
                footer,
                settings,
            } => (meta, columns, header, body, footer, settings),
            _ => return Err(LayoutError::BuilderMismatch("Table", node.kind())),
        };

        let style =
            engine.compute_style(&meta.style_sets, meta.style_override.as_ref(), &parent_style);

        let num_columns = columns.len();
        let mut row_counter = 0;

        let header_rows = match header {
            Some(section) => Self::build_section(
                &section.rows,
                num_columns,
                &mut row_counter,
                engine,
                &style,
                store,
            )?,
            None => Vec::new(),
        };
        let body_rows = Self::build_section(
            &body.rows,
            num_columns,
            &mut row_counter,
            engine,
            &style,
            store,
        )?;
        let footer_rows = match footer {
            Some(section) => Self::build_section(
                &section.rows,
                num_columns,
                &mut row_counter,
                engine,
                &style,
                store,
            )?,
            None => Vec::new(),
        };

        let node = store.bump.alloc(Self {
            unique_id: store.next_id(),
            columns: store.bump.alloc_slice_clone(columns),
            header: store.bump.alloc_slice_clone(&header_rows),
            body: store.bump.alloc_slice_clone(&body_rows),
            footer: store.bump.alloc_slice_clone(&footer_rows),
            settings: *settings,
            style: store.cache_style(style),
        });
        Ok(RenderNode::Table(node))
    }

    fn build_section(
        rows: &[TableRow],
        num_columns: usize,
        row_counter: &mut usize,
        engine: &LayoutEngine,
        table_style: &Arc<ComputedStyle>,
        store: &'a LayoutStore,
    ) -> Result<Vec<TableRowNode<'a>>, LayoutError> {
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let row_index = *row_counter;
            *row_counter += 1;

            let mut cells = Vec::with_capacity(row.cells.len());
            let mut col_cursor = 0;
            for cell in &row.cells {
                let col_span = cell.col_span.max(1);
                if col_cursor + col_span > num_columns {
                    return Err(LayoutError::TooManyCells(row_index, num_columns));
                }

                let cell_style = engine.compute_style(
                    &cell.style_sets,
                    cell.style_override.as_ref(),
                    table_style,
                );
                let border = cell_style.border.clone();
                let background = cell_style.misc.background_color.clone();

                // The content block keeps the cell's padding and text styling
                // but surrenders border and background to the grid painter.
                let mut content_data: ComputedStyleData = cell_style.inner.clone();
                content_data.border = Default::default();
                content_data.misc.background_color = None;
                content_data.box_model.margin = Margins::default();
                let content_style = Arc::new(ComputedStyle::new(content_data));

                let children =
                    engine.build_layout_node_children(&cell.children, content_style.clone(), store)?;
                let content = BlockNode::new_from_children(children, content_style, store);

                cells.push(TableCellNode {
                    content,
                    border,
                    background,
                    col_start: col_cursor,
                    col_span,
                });
                col_cursor += col_span;
            }

            out.push(TableRowNode {
                cells: store.bump.alloc_slice_clone(&cells),
            });
        }
        Ok(out)
    }

    fn all_rows(&self) -> impl Iterator<Item = &TableRowNode<'a>> {
        self.header
            .iter()
            .chain(self.body.iter())
            .chain(self.footer.iter())
    }

    fn section_heights(
        &self,
        rows: &[TableRowNode<'a>],
        offsets: &[f32],
        env: &LayoutEnvironment,
    ) -> Result<Vec<f32>, LayoutError> {
        let mut heights = Vec::with_capacity(rows.len());
        for row in rows {
            let mut row_height: f32 = 0.0;
            for cell in row.cells {
                let span_width = offsets[cell.col_start + cell.col_span] - offsets[cell.col_start];
                let size = cell
                    .content
                    .measure(env, BoxConstraints::tight_width(span_width))?;
                row_height = row_height.max(size.height);
            }
            heights.push(row_height);
        }
        Ok(heights)
    }

    /// Solves column widths and row heights, caching the result per content
    /// width so continuation fragments reuse the same grid.
    fn geometry(
        &self,
        env: &LayoutEnvironment,
        content_width: Option<f32>,
    ) -> Result<TableGeometry, LayoutError> {
        let cache_key = content_width.map(|w| {
            let mut s = DefaultHasher::new();
            self.unique_id.hash(&mut s);
            w.to_bits().hash(&mut s);
            s.finish()
        });

        if let Some(key) = cache_key {
            if let Some(cached) = env
                .cache
                .borrow()
                .get(&key)
                .and_then(|b| b.downcast_ref::<TableGeometry>())
            {
                return Ok(cached.clone());
            }
        }

        let mut solver = ColumnSolver::new(self.columns, content_width);
        if solver.has_auto() {
            // Sample a bounded prefix of the rows so a huge table does not
            // pay a full content measure per cell just to size columns.
            for row in self.all_rows().take(CONTENT_SAMPLE_ROWS) {
                for cell in row.cells {
                    let covers_auto = (cell.col_start..cell.col_start + cell.col_span)
                        .any(|c| solver.is_auto(c));
                    if covers_auto {
                        let preferred = cell
                            .content
                            .measure(env, BoxConstraints::default())?
                            .width;
                        solver.record(cell.col_start, cell.col_span, preferred);
                    }
                }
            }
        }
        let col_widths = solver.finish();

        let geometry = {
            let offsets = {
                let mut offsets = Vec::with_capacity(col_widths.len() + 1);
                let mut acc = 0.0;
                offsets.push(acc);
                for w in &col_widths {
                    acc += w;
                    offsets.push(acc);
                }
                offsets
            };
            TableGeometry {
                header_heights: self.section_heights(self.header, &offsets, env)?,
                body_heights: self.section_heights(self.body, &offsets, env)?,
                footer_heights: self.section_heights(self.footer, &offsets, env)?,
                col_widths,
            }
        };

        if let Some(key) = cache_key {
            env.cache
                .borrow_mut()
                .insert(key, Box::new(geometry.clone()));
        }
        Ok(geometry)
    }

    fn push_border(
        &self,
        ctx: &mut LayoutContext,
        rect: Rect,
        border: &Border,
        style: &Arc<ComputedStyle>,
    ) {
        ctx.push_element_absolute(PositionedElement::from_rect(
            rect,
            LayoutElement::Border(BorderElement {
                width: border.width,
                style: border.style.clone(),
                color: border.color.clone(),
            }),
            style.clone(),
        ));
    }
}

impl<'a> LayoutNode for TableNode<'a> {
    fn style(&self) -> &ComputedStyle {
        self.style.as_ref()
    }

    fn measure(
        &self,
        env: &LayoutEnvironment,
        constraints: BoxConstraints,
    ) -> Result<Size, LayoutError> {
        let h_frame = self.style.padding_x() + self.style.border_x();
        let margin_y = self.style.box_model.margin.top + self.style.box_model.margin.bottom;

        let content_width = if constraints.has_bounded_width() {
            Some((constraints.max_width - h_frame).max(0.0))
        } else {
            None
        };
        let geometry = self.geometry(env, content_width)?;

        let height = margin_y
            + self.style.border_y()
            + self.style.padding_y()
            + geometry.header_total()
            + geometry.body_total()
            + geometry.footer_total();

        let width = if constraints.has_bounded_width() {
            constraints.max_width
        } else {
            geometry.grid_width() + h_frame
        };
        Ok(Size::new(width, height))
    }

    fn layout(
        &self,
        ctx: &mut LayoutContext,
        constraints: BoxConstraints,
        break_state: Option<NodeState>,
    ) -> Result<LayoutResult, LayoutError> {
        let start_row = match break_state {
            Some(state) => state.as_table()?.row_index,
            None => 0,
        };
        let fresh = start_row == 0;

        if fresh {
            if ctx.prepare_for_block(self.style.box_model.margin.top) {
                return Ok(LayoutResult::Break(NodeState::Restart));
            }
        } else {
            ctx.last_v_margin = 0.0;
        }

        let bounds = ctx.bounds();
        let h_frame = self.style.padding_x() + self.style.border_x();
        let content_width = if constraints.has_bounded_width() {
            (constraints.max_width - h_frame).max(0.0)
        } else {
            (bounds.width - h_frame).max(0.0)
        };
        let geometry = self.geometry(&ctx.env, Some(content_width))?;

        let block_start_y = ctx.cursor_y();
        if fresh {
            ctx.advance_cursor(self.style.border_top_width() + self.style.box_model.padding.top);
        }
        let content_start_y = ctx.cursor_y();
        let available = ctx.available_height();
        let epsilon = ctx.env.engine.config().epsilon;
        let at_top = ctx.is_at_area_top() || ctx.is_forced();

        // Assemble the bands shown on this area: optional header, as many
        // body rows as fit, and the footer when due.
        let include_header = !self.header.is_empty()
            && if fresh {
                !self.settings.skip_first_header
            } else {
                self.settings.repeat_header
            };

        let mut bands: Vec<(&TableRowNode<'a>, f32)> = Vec::new();
        let mut used = 0.0;
        if include_header {
            for (row, h) in self.header.iter().zip(&geometry.header_heights) {
                bands.push((row, *h));
                used += *h;
            }
        }

        let mut next_row = start_row.min(self.body.len());
        let mut placed_body = 0usize;
        while next_row < self.body.len() {
            let h = geometry.body_heights[next_row];
            let fits = used + h <= available + epsilon;
            // The first body row on a fresh area is placed even if it
            // overflows, which guarantees pagination progress.
            if fits || (placed_body == 0 && at_top) {
                bands.push((&self.body[next_row], h));
                used += h;
                placed_body += 1;
                next_row += 1;
            } else {
                break;
            }
        }

        if placed_body == 0 && next_row < self.body.len() {
            // Nothing fits mid-area: defer without painting anything.
            return Ok(LayoutResult::Break(NodeState::Table(TableState {
                row_index: start_row,
            })));
        }

        let body_done = next_row >= self.body.len();
        let mut pending_row: Option<usize> = if body_done { None } else { Some(next_row) };

        if !self.footer.is_empty() {
            let footer_due = if self.settings.skip_last_footer {
                body_done
            } else {
                true
            };
            if footer_due {
                let footer_total = geometry.footer_total();
                let fits = used + footer_total <= available + epsilon;
                let must_place = body_done && placed_body == 0 && at_top;
                if fits || must_place {
                    for (row, h) in self.footer.iter().zip(&geometry.footer_heights) {
                        bands.push((row, *h));
                    }
                } else if body_done {
                    pending_row = Some(self.body.len());
                }
            }
        }

        let finished = pending_row.is_none();
        let num_columns = self.columns.len();
        let offsets = geometry.x_offsets();
        let grid_width = geometry.grid_width();
        let x0 = self.style.border_left_width() + self.style.box_model.padding.left;
        let abs_x0 = bounds.x + x0;
        let bottom_frame = self.style.box_model.padding.bottom + self.style.border_bottom_width();

        // Band top offsets relative to this context, length bands + 1.
        let mut band_tops = Vec::with_capacity(bands.len() + 1);
        let mut acc = content_start_y;
        for (_, h) in &bands {
            band_tops.push(acc);
            acc += *h;
        }
        band_tops.push(acc);
        let content_end_y = acc;

        // Table background spans the frame, including the bottom frame only
        // on the closing fragment.
        if let Some(color) = self.style.misc.background_color.clone() {
            let frame_height = (content_end_y - block_start_y)
                + if finished { bottom_frame } else { 0.0 };
            let el = PositionedElement::from_rect(
                Rect::new(0.0, block_start_y, grid_width + h_frame, frame_height),
                LayoutElement::Background(BackgroundElement { color }),
                self.style.clone(),
            );
            ctx.push_element_at(el, 0.0, 0.0);
        }

        // Cell backgrounds and content.
        for (band_index, (row, h)) in bands.iter().enumerate() {
            let y_abs = bounds.y + band_tops[band_index];
            for cell in row.cells {
                let cell_x = abs_x0 + offsets[cell.col_start];
                let cell_width = offsets[cell.col_start + cell.col_span] - offsets[cell.col_start];
                let rect = Rect::new(cell_x, y_abs, cell_width, *h);

                if let Some(color) = cell.background.clone() {
                    ctx.push_element_absolute(PositionedElement::from_rect(
                        rect,
                        LayoutElement::Background(BackgroundElement { color }),
                        cell.content.style.clone(),
                    ));
                }

                let mut cell_ctx = ctx.child(rect);
                cell_ctx.set_forced(true);
                cell.content
                    .layout(&mut cell_ctx, BoxConstraints::tight_width(cell_width), None)?;
            }
        }

        // Horizontal grid edges. Boundary j sits between band j-1 and band j;
        // the table frame participates at the true top and bottom of the
        // table, never at a fragment break.
        let table_top = if fresh { self.style.border.top.as_ref() } else { None };
        let table_bottom = if finished {
            self.style.border.bottom.as_ref()
        } else {
            None
        };
        for j in 0..=bands.len() {
            let above = if j > 0 { Some(bands[j - 1].0) } else { None };
            let below = bands.get(j).map(|(row, _)| *row);
            if above.is_none() && table_top.is_none() && below.is_none() && table_bottom.is_none() {
                continue;
            }

            let participant_above = |col: usize| match above {
                Some(row) => row.border_bottom(col),
                None => table_top,
            };
            let participant_below = |col: usize| match below {
                Some(row) => row.border_top(col),
                None => table_bottom,
            };

            let y_abs = bounds.y + band_tops[j];
            let mut col = 0;
            while col < num_columns {
                match collapse_edge(participant_above(col), participant_below(col)) {
                    Some(winner) => {
                        let seg_start = col;
                        let mut seg_end = col + 1;
                        while seg_end < num_columns
                            && collapse_edge(participant_above(seg_end), participant_below(seg_end))
                                == Some(winner)
                        {
                            seg_end += 1;
                        }
                        let x_start = abs_x0 + offsets[seg_start];
                        let x_end = abs_x0 + offsets[seg_end];
                        self.push_border(
                            ctx,
                            Rect::new(
                                x_start,
                                y_abs - winner.width / 2.0,
                                x_end - x_start,
                                winner.width,
                            ),
                            winner,
                            &self.style,
                        );
                        col = seg_end;
                    }
                    None => col += 1,
                }
            }
        }

        // Vertical grid edges, per band. Boundary b runs along column offset
        // b; the frame participates at b == 0 and b == columns.
        for (band_index, (row, h)) in bands.iter().enumerate() {
            let y_abs = bounds.y + band_tops[band_index];
            for b in 0..=num_columns {
                let left = if b == 0 {
                    self.style.border.left.as_ref()
                } else {
                    row.cell_ending_at(b).and_then(|c| c.border.right.as_ref())
                };
                let right = if b == num_columns {
                    self.style.border.right.as_ref()
                } else {
                    row.cell_starting_at(b).and_then(|c| c.border.left.as_ref())
                };
                if let Some(winner) = collapse_edge(left, right) {
                    let x_abs = abs_x0 + offsets[b];
                    self.push_border(
                        ctx,
                        Rect::new(x_abs - winner.width / 2.0, y_abs, winner.width, *h),
                        winner,
                        &self.style,
                    );
                }
            }
        }

        match pending_row {
            None => {
                ctx.set_cursor_y(content_end_y + bottom_frame);
                ctx.finish_block(self.style.box_model.margin.bottom);
                Ok(LayoutResult::Finished)
            }
            Some(row_index) => {
                ctx.set_cursor_y(content_end_y);
                Ok(LayoutResult::Break(NodeState::Table(TableState { row_index })))
            }
        }
    }
}
