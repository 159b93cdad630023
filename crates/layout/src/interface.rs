use crate::diag::{Diagnostic, DiagnosticSink};
use crate::floats::FloatContext;
use crate::{ComputedStyle, LayoutEngine, LayoutError, PositionedElement};
use bumpalo::Bump;
use quire_types::geometry::{self, BoxConstraints, Size};
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Debug;

// --- State Definitions (Type-Safe) ---

#[derive(Debug, Clone)]
pub struct BlockState {
    pub child_index: usize,
    pub child_state: Option<Box<NodeState>>,
}

#[derive(Debug, Clone)]
pub struct ListItemState {
    pub child_index: usize,
    pub child_state: Option<Box<NodeState>>,
}

#[derive(Debug, Clone)]
pub struct ParagraphState {
    /// Breaker progress at the start of the first unplaced line.
    pub pos: crate::text::BreakerPos,
}

#[derive(Debug, Clone)]
pub struct TableState {
    pub row_index: usize,
}

#[derive(Debug, Clone)]
pub enum NodeState {
    Block(BlockState),
    ListItem(ListItemState),
    Paragraph(ParagraphState),
    Table(TableState),
    /// The node was deferred whole to the next area and must lay out from
    /// scratch there (keep-together retry).
    Restart,
    /// The node is unsplittable and continues on the next area.
    Atomic,
}

impl NodeState {
    pub fn as_block(self) -> Result<BlockState, LayoutError> {
        match self {
            NodeState::Block(s) => Ok(s),
            _ => Err(LayoutError::StateMismatch("Block", self.variant_name())),
        }
    }

    pub fn as_list_item(self) -> Result<ListItemState, LayoutError> {
        match self {
            NodeState::ListItem(s) => Ok(s),
            _ => Err(LayoutError::StateMismatch("ListItem", self.variant_name())),
        }
    }

    pub fn as_paragraph(self) -> Result<ParagraphState, LayoutError> {
        match self {
            NodeState::Paragraph(s) => Ok(s),
            _ => Err(LayoutError::StateMismatch("Paragraph", self.variant_name())),
        }
    }

    pub fn as_table(self) -> Result<TableState, LayoutError> {
        match self {
            NodeState::Table(s) => Ok(s),
            _ => Err(LayoutError::StateMismatch("Table", self.variant_name())),
        }
    }

    fn variant_name(&self) -> &'static str {
        match self {
            NodeState::Block(_) => "Block",
            NodeState::ListItem(_) => "ListItem",
            NodeState::Paragraph(_) => "Paragraph",
            NodeState::Table(_) => "Table",
            NodeState::Restart => "Restart",
            NodeState::Atomic => "Atomic",
        }
    }
}

// --- Context and Environment ---

/// Read-only environment data shared across the layout pass.
pub struct LayoutEnvironment<'a> {
    pub engine: &'a LayoutEngine,
    pub local_page_index: usize,
    /// A cache for transient layout data (e.g. solved table geometries).
    pub cache: &'a RefCell<HashMap<u64, Box<dyn Any>>>,
}

pub struct LayoutContext<'a> {
    pub env: LayoutEnvironment<'a>,
    pub arena: &'a Bump,
    bounds: geometry::Rect,
    cursor: (f32, f32),
    elements: &'a mut Vec<PositionedElement>,
    floats: &'a mut FloatContext,
    diags: &'a mut DiagnosticSink,
    pub last_v_margin: f32,
    root_top_y: f32,
    forced: bool,
}

impl<'a> LayoutContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        env: LayoutEnvironment<'a>,
        bounds: geometry::Rect,
        arena: &'a Bump,
        elements: &'a mut Vec<PositionedElement>,
        floats: &'a mut FloatContext,
        diags: &'a mut DiagnosticSink,
    ) -> Self {
        let root_top_y = bounds.y;
        Self {
            env,
            arena,
            bounds,
            cursor: (0.0, 0.0),
            elements,
            floats,
            diags,
            last_v_margin: 0.0,
            root_top_y,
            forced: false,
        }
    }

    pub fn cursor_y(&self) -> f32 {
        self.cursor.1
    }

    pub fn set_cursor_y(&mut self, y: f32) {
        self.cursor.1 = y;
    }

    pub fn advance_cursor(&mut self, dy: f32) {
        self.cursor.1 += dy;
    }

    /// The cursor position in page coordinates.
    pub fn absolute_y(&self) -> f32 {
        self.bounds.y + self.cursor.1
    }

    pub fn is_at_area_top(&self) -> bool {
        (self.absolute_y() - self.root_top_y).abs() < 0.1
    }

    pub fn bounds(&self) -> geometry::Rect {
        self.bounds
    }

    pub fn available_height(&self) -> f32 {
        if self.forced {
            return f32::INFINITY;
        }
        (self.bounds.height - self.cursor.1).max(0.0)
    }

    /// Inside a forced placement fit checks are suspended: the subtree must
    /// lay out in full on this area even if it overflows.
    pub fn is_forced(&self) -> bool {
        self.forced
    }

    pub fn set_forced(&mut self, forced: bool) {
        self.forced = forced;
    }

    pub fn prepare_for_block(&mut self, top_margin: f32) -> bool {
        let margin_to_add = top_margin.max(self.last_v_margin);
        if self.cursor_y() > 0.001 && margin_to_add > self.available_height() {
            return true;
        }
        self.advance_cursor(margin_to_add);
        self.last_v_margin = 0.0;
        false
    }

    pub fn finish_block(&mut self, bottom_margin: f32) {
        self.last_v_margin = bottom_margin;
    }

    pub fn floats(&self) -> &FloatContext {
        self.floats
    }

    pub fn floats_mut(&mut self) -> &mut FloatContext {
        self.floats
    }

    pub fn warn(&mut self, diagnostic: Diagnostic) {
        self.diags.warn(diagnostic);
    }

    pub fn push_element(&mut self, mut element: PositionedElement) {
        element.x += self.bounds.x + self.cursor.0;
        element.y += self.bounds.y + self.cursor.1;
        self.elements.push(element);
    }

    pub fn push_element_at(&mut self, mut element: PositionedElement, x: f32, y: f32) {
        element.x += self.bounds.x + x;
        element.y += self.bounds.y + y;
        self.elements.push(element);
    }

    /// Pushes an element already expressed in page coordinates.
    pub fn push_element_absolute(&mut self, element: PositionedElement) {
        self.elements.push(element);
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn child<'child>(&'child mut self, bounds: geometry::Rect) -> LayoutContext<'child> {
        let sub_env = LayoutEnvironment {
            engine: self.env.engine,
            local_page_index: self.env.local_page_index,
            cache: self.env.cache,
        };

        LayoutContext {
            env: sub_env,
            arena: self.arena,
            bounds,
            cursor: (0.0, 0.0),
            elements: &mut *self.elements,
            floats: &mut *self.floats,
            diags: &mut *self.diags,
            last_v_margin: 0.0,
            root_top_y: self.root_top_y,
            forced: self.forced,
        }
    }

    /// A context that lays out into its own element buffer and float
    /// registry, detached from this area's flow. Used for rotated subtrees,
    /// which are laid out at the origin and placed by transform afterwards.
    pub fn detached<'s>(
        &'s mut self,
        bounds: geometry::Rect,
        elements: &'s mut Vec<PositionedElement>,
        floats: &'s mut FloatContext,
        forced: bool,
    ) -> LayoutContext<'s> {
        let sub_env = LayoutEnvironment {
            engine: self.env.engine,
            local_page_index: self.env.local_page_index,
            cache: self.env.cache,
        };

        LayoutContext {
            env: sub_env,
            arena: self.arena,
            bounds,
            cursor: (0.0, 0.0),
            elements,
            floats,
            diags: &mut *self.diags,
            last_v_margin: 0.0,
            root_top_y: bounds.y,
            forced,
        }
    }
}

#[derive(Debug, Clone)]
pub enum LayoutResult {
    Finished,
    Break(NodeState),
}

pub trait LayoutNode: Debug {
    fn measure(
        &self,
        env: &LayoutEnvironment,
        constraints: BoxConstraints,
    ) -> Result<Size, LayoutError>;

    fn layout(
        &self,
        ctx: &mut LayoutContext,
        constraints: BoxConstraints,
        break_state: Option<NodeState>,
    ) -> Result<LayoutResult, LayoutError>;

    fn style(&self) -> &ComputedStyle;
}
