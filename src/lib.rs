//! `quire` lays a document element tree out into pages.
//!
//! Build a [`Document`] from a [`Stylesheet`](quire_style::Stylesheet), `add`
//! block elements in reading order, and `close()` it to obtain positioned
//! pages, the accessibility structure tree, and layout diagnostics.
//!
//! The heavy lifting lives in the member crates, re-exported here:
//! `quire_types` (geometry, transforms, color), `quire_style` (style bags,
//! stylesheets, page masters), `quire_dom` (the element tree), `quire_tags`
//! (role namespaces and the tag tree), and `quire_layout` (the engine).

pub mod document;
pub mod error;

pub use document::{Document, LaidOutDocument};
pub use error::DocumentError;

pub use quire_dom as dom;
pub use quire_layout as layout;
pub use quire_style as style;
pub use quire_tags as tags;
pub use quire_types as types;
