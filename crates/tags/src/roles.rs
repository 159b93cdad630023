//! Role namespaces, the role-mapping graph, and bounded transitive
//! resolution against the standard vocabularies.

use crate::{MAX_ROLE_MAPPING_DEPTH, TagError};
use std::collections::HashMap;

/// The standard structure namespace of PDF 1.7 (ISO 32000-1).
pub const NS_PDF_1_7: &str = "http://iso.org/pdf/ssn";
/// The standard structure namespace of PDF 2.0 (ISO 32000-2).
pub const NS_PDF_2_0: &str = "http://iso.org/pdf2/ssn";

const STANDARD_ROLES_1_7: &[&str] = &[
    "Document", "Part", "Art", "Sect", "Div", "BlockQuote", "Caption", "TOC", "TOCI", "Index",
    "NonStruct", "Private", "P", "H", "H1", "H2", "H3", "H4", "H5", "H6", "L", "LI", "Lbl",
    "LBody", "Table", "TR", "TH", "TD", "THead", "TBody", "TFoot", "Span", "Quote", "Note",
    "Reference", "BibEntry", "Code", "Link", "Annot", "Ruby", "RB", "RT", "RP", "Warichu", "WT",
    "WP", "Figure", "Formula", "Form",
];

const STANDARD_ROLES_2_0: &[&str] = &[
    "Document", "DocumentFragment", "Part", "Sect", "Div", "Aside", "NonStruct", "P", "Title",
    "FENote", "Sub", "Lbl", "Span", "Em", "Strong", "Link", "Annot", "Form", "Ruby", "RB", "RT",
    "RP", "Warichu", "WT", "WP", "L", "LI", "LBody", "Table", "TR", "TH", "TD", "THead", "TBody",
    "TFoot", "Caption", "Figure", "Formula", "Artifact",
];

/// Heading roles in PDF 2.0 are open-ended: `H1`, `H2`, ... `Hn`.
fn is_numbered_heading(role: &str) -> bool {
    role.len() > 1
        && role.starts_with('H')
        && role[1..].chars().all(|c| c.is_ascii_digit())
        && !role[1..].starts_with('0')
}

/// True when `role` belongs to the standard vocabulary of `namespace_uri`.
pub fn is_standard_role(namespace_uri: &str, role: &str) -> bool {
    match namespace_uri {
        NS_PDF_1_7 => STANDARD_ROLES_1_7.contains(&role),
        NS_PDF_2_0 => STANDARD_ROLES_2_0.contains(&role) || is_numbered_heading(role),
        _ => false,
    }
}

/// The target of one hop in the role-mapping graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleTarget {
    pub role: String,
    pub namespace: String,
}

/// A semantic namespace: a URI plus a role-mapping table into other
/// namespaces.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    pub uri: String,
    role_map: HashMap<String, RoleTarget>,
}

impl Namespace {
    pub fn new(uri: &str) -> Self {
        Self {
            uri: uri.to_string(),
            role_map: HashMap::new(),
        }
    }

    /// Maps `role` in this namespace to `target_role` in `target_namespace`.
    pub fn add_mapping(&mut self, role: &str, target_role: &str, target_namespace: &str) {
        self.role_map.insert(
            role.to_string(),
            RoleTarget {
                role: target_role.to_string(),
                namespace: target_namespace.to_string(),
            },
        );
    }

    pub fn mapping(&self, role: &str) -> Option<&RoleTarget> {
        self.role_map.get(role)
    }
}

/// A fully resolved role: the standard role a custom role normalizes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRole {
    pub role: String,
    pub namespace: String,
    /// Number of mapping hops taken (0 for an already-standard role).
    pub hops: usize,
}

/// All namespaces known to one document. The standard namespaces are always
/// present.
#[derive(Debug, Clone)]
pub struct NamespaceRegistry {
    namespaces: HashMap<String, Namespace>,
}

impl Default for NamespaceRegistry {
    fn default() -> Self {
        let mut namespaces = HashMap::new();
        namespaces.insert(NS_PDF_1_7.to_string(), Namespace::new(NS_PDF_1_7));
        namespaces.insert(NS_PDF_2_0.to_string(), Namespace::new(NS_PDF_2_0));
        Self { namespaces }
    }
}

impl NamespaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, namespace: Namespace) {
        self.namespaces.insert(namespace.uri.clone(), namespace);
    }

    pub fn get(&self, uri: &str) -> Option<&Namespace> {
        self.namespaces.get(uri)
    }

    pub fn get_mut(&mut self, uri: &str) -> Option<&mut Namespace> {
        self.namespaces.get_mut(uri)
    }

    /// Resolves `role` in `namespace_uri` to a standard role, following
    /// mappings transitively up to [`MAX_ROLE_MAPPING_DEPTH`] hops.
    pub fn resolve_role(&self, role: &str, namespace_uri: &str) -> Result<ResolvedRole, TagError> {
        let mut current_role = role.to_string();
        let mut current_ns = namespace_uri.to_string();

        for hops in 0..=MAX_ROLE_MAPPING_DEPTH {
            if is_standard_role(&current_ns, &current_role) {
                return Ok(ResolvedRole {
                    role: current_role,
                    namespace: current_ns,
                    hops,
                });
            }

            let ns = self
                .get(&current_ns)
                .ok_or_else(|| TagError::UnknownNamespace {
                    uri: current_ns.clone(),
                })?;

            match ns.mapping(&current_role) {
                Some(target) => {
                    current_role = target.role.clone();
                    current_ns = target.namespace.clone();
                }
                None => {
                    return Err(TagError::UnresolvedRole {
                        role: role.to_string(),
                        namespace: namespace_uri.to_string(),
                    });
                }
            }
        }

        log::warn!(
            "too many transitive role mappings for '{}' in '{}' (limit {})",
            role,
            namespace_uri,
            MAX_ROLE_MAPPING_DEPTH
        );
        Err(TagError::TooManyMappings {
            role: role.to_string(),
            namespace: namespace_uri.to_string(),
            limit: MAX_ROLE_MAPPING_DEPTH,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_role_resolves_with_zero_hops() {
        let registry = NamespaceRegistry::new();
        let resolved = registry.resolve_role("P", NS_PDF_2_0).unwrap();
        assert_eq!(resolved.role, "P");
        assert_eq!(resolved.hops, 0);
    }

    #[test]
    fn numbered_headings_are_standard_in_pdf_2_0() {
        assert!(is_standard_role(NS_PDF_2_0, "H7"));
        assert!(is_standard_role(NS_PDF_2_0, "H42"));
        assert!(!is_standard_role(NS_PDF_2_0, "H0x"));
        assert!(!is_standard_role(NS_PDF_1_7, "H7"));
    }

    #[test]
    fn custom_role_resolves_through_mapping_chain() {
        let mut registry = NamespaceRegistry::new();
        let mut custom = Namespace::new("urn:example:custom");
        custom.add_mapping("chapter", "Sect", NS_PDF_2_0);
        registry.register(custom);

        let resolved = registry.resolve_role("chapter", "urn:example:custom").unwrap();
        assert_eq!(resolved.role, "Sect");
        assert_eq!(resolved.namespace, NS_PDF_2_0);
        assert_eq!(resolved.hops, 1);
    }

    #[test]
    fn unmapped_custom_role_is_unresolved() {
        let mut registry = NamespaceRegistry::new();
        registry.register(Namespace::new("urn:example:custom"));

        let err = registry
            .resolve_role("mystery", "urn:example:custom")
            .unwrap_err();
        assert_eq!(
            err,
            TagError::UnresolvedRole {
                role: "mystery".to_string(),
                namespace: "urn:example:custom".to_string(),
            }
        );
    }

    #[test]
    fn long_chain_within_bound_resolves() {
        let mut registry = NamespaceRegistry::new();
        let mut ns = Namespace::new("urn:example:chain");
        // role0 -> role1 -> ... -> role49 -> P
        for i in 0..49 {
            ns.add_mapping(
                &format!("role{}", i),
                &format!("role{}", i + 1),
                "urn:example:chain",
            );
        }
        ns.add_mapping("role49", "P", NS_PDF_2_0);
        registry.register(ns);

        let resolved = registry.resolve_role("role0", "urn:example:chain").unwrap();
        assert_eq!(resolved.role, "P");
        assert_eq!(resolved.hops, 50);
    }

    #[test]
    fn chain_of_120_hops_fails_deterministically() {
        let mut registry = NamespaceRegistry::new();
        let mut ns = Namespace::new("urn:example:deep");
        for i in 0..119 {
            ns.add_mapping(
                &format!("role{}", i),
                &format!("role{}", i + 1),
                "urn:example:deep",
            );
        }
        ns.add_mapping("role119", "P", NS_PDF_2_0);
        registry.register(ns);

        let err = registry.resolve_role("role0", "urn:example:deep").unwrap_err();
        assert_eq!(
            err,
            TagError::TooManyMappings {
                role: "role0".to_string(),
                namespace: "urn:example:deep".to_string(),
                limit: MAX_ROLE_MAPPING_DEPTH,
            }
        );
    }

    #[test]
    fn identity_cycle_that_reaches_standard_role_resolves() {
        // A -> B -> A -> ... with an exit: B maps to a standard role via a
        // second namespace once the chain reaches it.
        let mut registry = NamespaceRegistry::new();
        let mut ns_a = Namespace::new("urn:example:a");
        let mut ns_b = Namespace::new("urn:example:b");
        ns_a.add_mapping("x", "x", "urn:example:b");
        ns_b.add_mapping("x", "Span", NS_PDF_2_0);
        registry.register(ns_a);
        registry.register(ns_b);

        let resolved = registry.resolve_role("x", "urn:example:a").unwrap();
        assert_eq!(resolved.role, "Span");
        assert_eq!(resolved.hops, 2);
    }

    #[test]
    fn pure_cycle_exceeds_bound() {
        let mut registry = NamespaceRegistry::new();
        let mut ns_a = Namespace::new("urn:example:a");
        let mut ns_b = Namespace::new("urn:example:b");
        ns_a.add_mapping("x", "x", "urn:example:b");
        ns_b.add_mapping("x", "x", "urn:example:a");
        registry.register(ns_a);
        registry.register(ns_b);

        let err = registry.resolve_role("x", "urn:example:a").unwrap_err();
        assert!(matches!(err, TagError::TooManyMappings { .. }));
    }
}
