//! Accessibility structure tree support: semantic role namespaces, the role
//! mapping graph, and the tag tree built alongside layout.
//!
//! The structure tree mirrors the document's semantics, not its visual
//! placement. Every role must normalize (directly or through transitive
//! namespace mappings, within a fixed hop bound) to a role from a standard
//! vocabulary; a role that cannot be normalized is a fatal error because the
//! resulting document would not be conformant.

use thiserror::Error;

pub mod roles;
pub mod tree;

pub use roles::{NS_PDF_1_7, NS_PDF_2_0, Namespace, NamespaceRegistry, ResolvedRole};
pub use tree::{TagNode, TagNodeId, TagPointer, TagTree};

/// Hop bound for transitive role mapping. Mapping chains longer than this
/// (including cycles) fail deterministically.
pub const MAX_ROLE_MAPPING_DEPTH: usize = 100;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    #[error("Role '{role}' in namespace '{namespace}' cannot be resolved to a standard role.")]
    UnresolvedRole { role: String, namespace: String },

    #[error(
        "Too many transitive mappings while resolving role '{role}' in namespace '{namespace}' (limit {limit})."
    )]
    TooManyMappings {
        role: String,
        namespace: String,
        limit: usize,
    },

    #[error("Namespace '{uri}' is not registered.")]
    UnknownNamespace { uri: String },
}
