//! The layout engine: builds the render tree into an arena and paginates it
//! into a sequence of pages of positioned elements.

use crate::config::LayoutConfig;
use crate::diag::{Diagnostic, DiagnosticSink};
use crate::floats::FloatContext;
use crate::interface::{LayoutContext, LayoutEnvironment, LayoutResult, NodeState};
use crate::metrics::{BuiltinMetrics, FontMetrics};
use crate::nodes::{
    BlockNode, ImageNode, ListItemNode, ListNode, PageBreakNode, ParagraphNode, RenderNode,
    TableNode,
};
use crate::style::{ComputedStyle, compute_style, get_default_style};
use crate::{LayoutError, PositionedElement};
use bumpalo::Bump;
use quire_dom::Element;
use quire_style::stylesheet::{ElementStyle, Stylesheet};
use quire_types::geometry::BoxConstraints;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;

/// Arena and caches for one layout run. The whole render tree is allocated
/// here, so nodes can be `Copy` arena references.
#[derive(Default)]
pub struct LayoutStore {
    pub bump: Bump,
    style_cache: RefCell<HashMap<u64, Arc<ComputedStyle>>>,
    next_id: Cell<u64>,
}

impl LayoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc_str(&self, s: &str) -> &str {
        self.bump.alloc_str(s)
    }

    /// Deduplicates identical computed styles so equal nodes share one `Arc`.
    pub fn cache_style(&self, style: Arc<ComputedStyle>) -> Arc<ComputedStyle> {
        let mut hasher = DefaultHasher::new();
        style.hash(&mut hasher);
        let key = hasher.finish();
        self.style_cache
            .borrow_mut()
            .entry(key)
            .or_insert_with(|| style.clone())
            .clone()
    }

    /// A run-unique id, used as a cache key by nodes with solved geometry.
    pub fn next_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }
}

/// One laid-out page: page dimensions plus its positioned elements.
#[derive(Debug, Clone)]
pub struct Page {
    /// 1-based page number.
    pub number: usize,
    pub width: f32,
    pub height: f32,
    pub elements: Vec<PositionedElement>,
}

/// The result of a pagination run.
#[derive(Debug, Clone)]
pub struct PaginatedLayout {
    pub pages: Vec<Page>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct LayoutEngine {
    stylesheet: Stylesheet,
    metrics: Box<dyn FontMetrics>,
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(stylesheet: Stylesheet) -> Self {
        Self::with_metrics(stylesheet, Box::new(BuiltinMetrics))
    }

    pub fn with_metrics(stylesheet: Stylesheet, metrics: Box<dyn FontMetrics>) -> Self {
        Self {
            stylesheet,
            metrics,
            config: LayoutConfig::default(),
        }
    }

    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    pub fn stylesheet(&self) -> &Stylesheet {
        &self.stylesheet
    }

    pub fn metrics(&self) -> &dyn FontMetrics {
        self.metrics.as_ref()
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn compute_style(
        &self,
        style_sets: &[Arc<ElementStyle>],
        style_override: Option<&ElementStyle>,
        parent_style: &Arc<ComputedStyle>,
    ) -> Arc<ComputedStyle> {
        compute_style(style_sets, style_override, parent_style)
    }

    pub fn get_default_style(&self) -> Arc<ComputedStyle> {
        get_default_style()
    }

    pub fn build_render_node<'a>(
        &self,
        element: &Element,
        parent_style: Arc<ComputedStyle>,
        store: &'a LayoutStore,
    ) -> Result<RenderNode<'a>, LayoutError> {
        match element {
            Element::Root(_) | Element::Div { .. } => {
                BlockNode::build(element, self, parent_style, store)
            }
            Element::Paragraph { .. } => ParagraphNode::build(element, self, parent_style, store),
            Element::Image { .. } => ImageNode::build(element, self, parent_style, store),
            Element::List { .. } => ListNode::build(element, self, parent_style, store),
            // A list item outside a list flows as an unnumbered item.
            Element::ListItem { .. } => ListItemNode::build(element, 0, self, parent_style, store),
            Element::Table { .. } => TableNode::build(element, self, parent_style, store),
            Element::PageBreak => Ok(PageBreakNode::build(store)),
        }
    }

    pub fn build_layout_node_children<'a>(
        &self,
        children: &[Element],
        parent_style: Arc<ComputedStyle>,
        store: &'a LayoutStore,
    ) -> Result<Vec<RenderNode<'a>>, LayoutError> {
        children
            .iter()
            .map(|child| self.build_render_node(child, parent_style.clone(), store))
            .collect()
    }

    /// Lays out the document tree into pages, resuming across area breaks
    /// until the whole tree has been placed.
    pub fn paginate(&self, root: &Element) -> Result<PaginatedLayout, LayoutError> {
        let store = LayoutStore::new();
        let root_node = self.build_render_node(root, self.get_default_style(), &store)?;

        let page_layout = self.stylesheet.get_default_page_layout();
        let content = page_layout.content_area();
        let (page_width, page_height) = page_layout.size.dimensions_pt();
        let constraints = BoxConstraints::tight_width(content.width);

        let cache: RefCell<HashMap<u64, Box<dyn Any>>> = RefCell::new(HashMap::new());
        let mut diags = DiagnosticSink::new();
        let mut pages = Vec::new();
        let mut pending: Option<NodeState> = None;

        loop {
            if pages.len() >= self.config.max_areas {
                return Err(LayoutError::NoProgress(self.config.max_areas));
            }

            let mut elements = Vec::new();
            let mut floats = FloatContext::new(content);
            let env = LayoutEnvironment {
                engine: self,
                local_page_index: pages.len(),
                cache: &cache,
            };
            let mut ctx = LayoutContext::new(
                env,
                content,
                &store.bump,
                &mut elements,
                &mut floats,
                &mut diags,
            );

            let result = root_node.layout(&mut ctx, constraints, pending.take())?;

            pages.push(Page {
                number: pages.len() + 1,
                width: page_width,
                height: page_height,
                elements,
            });

            match result {
                LayoutResult::Finished => break,
                LayoutResult::Break(state) => pending = Some(state),
            }
        }

        Ok(PaginatedLayout {
            pages,
            diagnostics: diags.into_entries(),
        })
    }
}
