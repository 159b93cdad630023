//! The document builder. Elements are added sequentially; each add validates
//! and records the element's accessibility tags, and `close()` runs layout
//! and returns the pages together with the finished structure tree.

use crate::error::DocumentError;
use quire_dom::{Element, Inline, TableSection, TagInfo};
use quire_layout::{Diagnostic, FontMetrics, LayoutConfig, LayoutEngine, Page};
use quire_style::Stylesheet;
use quire_tags::{NS_PDF_2_0, Namespace, NamespaceRegistry, TagError, TagPointer, TagTree};

/// The output of a closed document: laid-out pages, the accessibility
/// structure tree, and the non-fatal diagnostics layout recorded.
#[derive(Debug, Clone)]
pub struct LaidOutDocument {
    pub pages: Vec<Page>,
    pub tag_tree: TagTree,
    pub diagnostics: Vec<Diagnostic>,
}

/// An in-progress document.
///
/// Structure tags are validated eagerly: the `add` that introduces a role
/// which cannot be resolved to a standard role fails, and nothing of that
/// element is recorded in the structure tree past the offending tag. Layout
/// itself is deferred to [`Document::close`].
#[derive(Debug)]
pub struct Document {
    stylesheet: Stylesheet,
    config: LayoutConfig,
    metrics: Option<Box<dyn FontMetrics>>,
    registry: NamespaceRegistry,
    pointer: TagPointer,
    children: Vec<Element>,
    closed: bool,
}

impl Document {
    pub fn new(stylesheet: Stylesheet) -> Self {
        Self {
            stylesheet,
            config: LayoutConfig::default(),
            metrics: None,
            registry: NamespaceRegistry::new(),
            pointer: TagPointer::new(NS_PDF_2_0),
            children: Vec::new(),
            closed: false,
        }
    }

    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the built-in font metrics used for measurement.
    pub fn with_metrics(mut self, metrics: Box<dyn FontMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Registers a semantic namespace so elements can carry roles from it.
    pub fn register_namespace(&mut self, namespace: Namespace) {
        self.registry.register(namespace);
    }

    /// Overrides the namespace assigned to tags of subsequently added
    /// elements. `None` restores the document default.
    pub fn set_namespace_for_new_tags(&mut self, uri: Option<&str>) {
        self.pointer.set_namespace_for_new_tags(uri);
    }

    /// Appends a block element to the document flow.
    ///
    /// The element's structure tags are resolved against the registered
    /// namespaces here; an unresolvable role fails this call.
    pub fn add(&mut self, element: Element) -> Result<&mut Self, DocumentError> {
        // A rejected element must leave the structure tree as it was, or the
        // cursor would stay parked inside its partially tagged ancestors.
        let snapshot = self.pointer.clone();
        if let Err(err) = self.tag_element(&element) {
            self.pointer = snapshot;
            return Err(err.into());
        }
        self.children.push(element);
        Ok(self)
    }

    /// Consumes the document, lays it out, and returns pages, tag tree, and
    /// diagnostics.
    pub fn close(mut self) -> Result<LaidOutDocument, DocumentError> {
        self.closed = true;
        let children = std::mem::take(&mut self.children);
        let pointer = std::mem::replace(&mut self.pointer, TagPointer::new(NS_PDF_2_0));
        let stylesheet = std::mem::take(&mut self.stylesheet);

        let engine = match self.metrics.take() {
            Some(metrics) => LayoutEngine::with_metrics(stylesheet, metrics),
            None => LayoutEngine::new(stylesheet),
        }
        .with_config(self.config.clone());

        let output = engine.paginate(&Element::Root(children))?;
        Ok(LaidOutDocument {
            pages: output.pages,
            tag_tree: pointer.into_tree(),
            diagnostics: output.diagnostics,
        })
    }

    /// Pushes a structure node for `tag`, falling back to `default_role`.
    /// Returns whether a node was pushed; neutral tags push nothing but
    /// their children still tag under the current cursor.
    fn open_tag(&mut self, tag: &TagInfo, default_role: &str) -> Result<bool, TagError> {
        if tag.neutral {
            return Ok(false);
        }
        let role = tag.role.as_deref().unwrap_or(default_role);
        self.pointer
            .push_tag(&self.registry, role, tag.namespace.as_deref())?;
        Ok(true)
    }

    fn tag_children(
        &mut self,
        tag: &TagInfo,
        default_role: &str,
        children: &[Element],
    ) -> Result<(), TagError> {
        let pushed = self.open_tag(tag, default_role)?;
        for child in children {
            self.tag_element(child)?;
        }
        if pushed {
            self.pointer.pop();
        }
        Ok(())
    }

    fn tag_element(&mut self, element: &Element) -> Result<(), TagError> {
        match element {
            Element::Root(children) => {
                for child in children {
                    self.tag_element(child)?;
                }
            }
            Element::PageBreak => {}
            Element::Div { meta, children } => self.tag_children(&meta.tag, "Div", children)?,
            Element::List { meta, children, .. } => self.tag_children(&meta.tag, "L", children)?,
            Element::ListItem { meta, children } => self.tag_children(&meta.tag, "LI", children)?,
            Element::Paragraph { meta, children } => {
                let pushed = self.open_tag(&meta.tag, "P")?;
                for inline in children {
                    self.tag_inline(inline)?;
                }
                if pushed {
                    self.pointer.pop();
                }
            }
            Element::Image { meta, .. } => {
                if self.open_tag(&meta.tag, "Figure")? {
                    self.pointer.pop();
                }
            }
            Element::Table {
                meta,
                header,
                body,
                footer,
                ..
            } => {
                let pushed = self.open_tag(&meta.tag, "Table")?;
                if let Some(header) = header {
                    self.tag_table_section(header, "THead", "TH")?;
                }
                self.tag_table_section(body, "TBody", "TD")?;
                if let Some(footer) = footer {
                    self.tag_table_section(footer, "TFoot", "TD")?;
                }
                if pushed {
                    self.pointer.pop();
                }
            }
        }
        Ok(())
    }

    fn tag_table_section(
        &mut self,
        section: &TableSection,
        band_role: &str,
        cell_role: &str,
    ) -> Result<(), TagError> {
        self.pointer.push_tag(&self.registry, band_role, None)?;
        for row in &section.rows {
            self.pointer.push_tag(&self.registry, "TR", None)?;
            for cell in &row.cells {
                self.pointer.push_tag(&self.registry, cell_role, None)?;
                for child in &cell.children {
                    self.tag_element(child)?;
                }
                self.pointer.pop();
            }
            self.pointer.pop();
        }
        self.pointer.pop();
        Ok(())
    }

    fn tag_inline(&mut self, inline: &Inline) -> Result<(), TagError> {
        match inline {
            Inline::Text(_) | Inline::LineBreak => {}
            Inline::StyledSpan { meta, children } => {
                let pushed = self.open_tag(&meta.tag, "Span")?;
                for child in children {
                    self.tag_inline(child)?;
                }
                if pushed {
                    self.pointer.pop();
                }
            }
            Inline::Link { meta, children, .. } => {
                let pushed = self.open_tag(&meta.tag, "Link")?;
                for child in children {
                    self.tag_inline(child)?;
                }
                if pushed {
                    self.pointer.pop();
                }
            }
            Inline::Image { meta, .. } => {
                if self.open_tag(&meta.tag, "Figure")? {
                    self.pointer.pop();
                }
            }
        }
        Ok(())
    }
}

impl Drop for Document {
    fn drop(&mut self) {
        if !self.closed && !self.children.is_empty() {
            log::warn!(
                "document dropped with {} element(s) and no close(); no output was produced",
                self.children.len()
            );
        }
    }
}
