//! The in-memory element tree: the document's structure and content before
//! layout. Blocks own their children exclusively (a tree, no cycles); styling
//! is carried as sparse property bags resolved at layout time.

use quire_style::dimension::Dimension;
use quire_style::stylesheet::ElementStyle;
use std::sync::Arc;

/// Accessibility information attached to an element.
///
/// `role` names the structure-tree role for this element. `namespace` names
/// the owning role namespace (the document default applies when absent).
/// A neutral element produces no structure node but still recurses into
/// children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TagInfo {
    pub role: Option<String>,
    pub namespace: Option<String>,
    pub neutral: bool,
}

impl TagInfo {
    pub fn role(role: &str) -> Self {
        Self {
            role: Some(role.to_string()),
            namespace: None,
            neutral: false,
        }
    }

    pub fn role_in(role: &str, namespace: &str) -> Self {
        Self {
            role: Some(role.to_string()),
            namespace: Some(namespace.to_string()),
            neutral: false,
        }
    }

    pub fn neutral() -> Self {
        Self {
            role: None,
            namespace: None,
            neutral: true,
        }
    }
}

/// A common metadata structure for all block-level `Element`s.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeMetadata {
    pub id: Option<String>,
    pub style_sets: Vec<Arc<ElementStyle>>,
    pub style_override: Option<ElementStyle>,
    pub tag: TagInfo,
}

impl NodeMetadata {
    pub fn styled(style: ElementStyle) -> Self {
        Self {
            style_override: Some(style),
            ..Default::default()
        }
    }
}

/// A common metadata structure for all `Inline` nodes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InlineMetadata {
    pub style_sets: Vec<Arc<ElementStyle>>,
    pub style_override: Option<ElementStyle>,
    pub tag: TagInfo,
}

/// Represents a block-level element in the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// The root of a document fragment, containing other block nodes.
    Root(Vec<Element>),
    /// A generic block container.
    Div {
        meta: NodeMetadata,
        children: Vec<Element>,
    },
    /// A paragraph, containing only inline content.
    Paragraph {
        meta: NodeMetadata,
        children: Vec<Inline>,
    },
    /// A block-level image with intrinsic dimensions in points.
    Image {
        meta: NodeMetadata,
        width: f32,
        height: f32,
    },
    /// An ordered or unordered list.
    List {
        meta: NodeMetadata,
        start: Option<usize>,
        children: Vec<Element>,
    },
    /// An item within a list.
    ListItem {
        meta: NodeMetadata,
        children: Vec<Element>,
    },
    /// A table with optional repeating header and trailing footer bands.
    Table {
        meta: NodeMetadata,
        columns: Vec<TableColumn>,
        header: Option<Box<TableSection>>,
        body: Box<TableSection>,
        footer: Option<Box<TableSection>>,
        settings: TableSettings,
    },
    /// A hard page break.
    PageBreak,
}

impl Element {
    /// Returns a reference to the metadata if the node type supports it.
    pub fn meta(&self) -> Option<&NodeMetadata> {
        match self {
            Element::Div { meta, .. } => Some(meta),
            Element::Paragraph { meta, .. } => Some(meta),
            Element::Image { meta, .. } => Some(meta),
            Element::List { meta, .. } => Some(meta),
            Element::ListItem { meta, .. } => Some(meta),
            Element::Table { meta, .. } => Some(meta),
            Element::Root(_) | Element::PageBreak => None,
        }
    }

    /// Returns a mutable reference to the metadata if the node type supports it.
    pub fn meta_mut(&mut self) -> Option<&mut NodeMetadata> {
        match self {
            Element::Div { meta, .. } => Some(meta),
            Element::Paragraph { meta, .. } => Some(meta),
            Element::Image { meta, .. } => Some(meta),
            Element::List { meta, .. } => Some(meta),
            Element::ListItem { meta, .. } => Some(meta),
            Element::Table { meta, .. } => Some(meta),
            Element::Root(_) | Element::PageBreak => None,
        }
    }

    pub fn style_sets(&self) -> &[Arc<ElementStyle>] {
        self.meta().map(|m| m.style_sets.as_slice()).unwrap_or(&[])
    }

    pub fn style_override(&self) -> Option<&ElementStyle> {
        self.meta().and_then(|m| m.style_override.as_ref())
    }

    /// A string identifier for the node type, used in error messages and for
    /// default structure roles.
    pub fn kind(&self) -> &'static str {
        match self {
            Element::Root(_) => "root",
            Element::Div { .. } => "div",
            Element::Paragraph { .. } => "paragraph",
            Element::Image { .. } => "image",
            Element::List { .. } => "list",
            Element::ListItem { .. } => "list-item",
            Element::Table { .. } => "table",
            Element::PageBreak => "page-break",
        }
    }
}

/// Represents an inline-level node within a block like a `Paragraph`.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    /// A run of plain text.
    Text(String),
    /// A styled span.
    StyledSpan {
        meta: InlineMetadata,
        children: Vec<Inline>,
    },
    /// A hyperlink.
    Link {
        meta: InlineMetadata,
        href: String,
        children: Vec<Inline>,
    },
    /// An inline image with intrinsic dimensions in points.
    Image {
        meta: InlineMetadata,
        width: f32,
        height: f32,
    },
    /// A forced line break.
    LineBreak,
}

// --- Table-specific Structures ---

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableColumn {
    pub width: Option<Dimension>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableSection {
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableCell {
    pub style_sets: Vec<Arc<ElementStyle>>,
    pub style_override: Option<ElementStyle>,
    pub children: Vec<Element>,
    pub col_span: usize,
}

impl TableCell {
    pub fn new(children: Vec<Element>) -> Self {
        Self {
            children,
            col_span: 1,
            ..Default::default()
        }
    }
}

/// Runtime pagination knobs for a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSettings {
    /// Repeat the header band at the top of every area the table spans.
    pub repeat_header: bool,
    /// Suppress the header on the first area (it repeats on later ones).
    pub skip_first_header: bool,
    /// Suppress the footer on every area except the last.
    pub skip_last_footer: bool,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            repeat_header: true,
            skip_first_header: false,
            skip_last_footer: true,
        }
    }
}

/// Builds a paragraph from plain text, honoring embedded `\n` forced breaks.
pub fn paragraph(text: &str) -> Element {
    let mut children = Vec::new();
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            children.push(Inline::LineBreak);
        }
        if !line.is_empty() {
            children.push(Inline::Text(line.to_string()));
        }
    }

    Element::Paragraph {
        meta: NodeMetadata::default(),
        children,
    }
}
