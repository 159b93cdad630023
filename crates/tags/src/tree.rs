//! The tag tree and the pointer cursor used to build it incrementally.

use crate::roles::{NS_PDF_2_0, NamespaceRegistry, ResolvedRole};
use crate::TagError;

pub type TagNodeId = usize;

/// One structure node: a role plus the namespace that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagNode {
    pub role: String,
    pub namespace: String,
    pub parent: Option<TagNodeId>,
    pub children: Vec<TagNodeId>,
}

/// The structure tree. Index-arena storage; node 0 is the document root.
#[derive(Debug, Clone)]
pub struct TagTree {
    nodes: Vec<TagNode>,
}

impl Default for TagTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TagTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![TagNode {
                role: "Document".to_string(),
                namespace: NS_PDF_2_0.to_string(),
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> TagNodeId {
        0
    }

    pub fn node(&self, id: TagNodeId) -> &TagNode {
        &self.nodes[id]
    }

    /// Total node count, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    fn add_child(&mut self, parent: TagNodeId, role: String, namespace: String) -> TagNodeId {
        let id = self.nodes.len();
        self.nodes.push(TagNode {
            role,
            namespace,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }

    /// Depth-first flattening of roles, for assertions and debugging.
    pub fn roles_depth_first(&self) -> Vec<&str> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            out.push(node.role.as_str());
            for child in node.children.iter().rev() {
                stack.push(*child);
            }
        }
        out
    }
}

/// The single cursor used while the document is visited. New tags are pushed
/// under the cursor's current position and receive the document default
/// namespace unless overridden per element or via
/// [`TagPointer::set_namespace_for_new_tags`].
#[derive(Debug, Clone)]
pub struct TagPointer {
    tree: TagTree,
    cursor: TagNodeId,
    default_namespace: String,
    namespace_for_new_tags: Option<String>,
}

impl TagPointer {
    pub fn new(default_namespace: &str) -> Self {
        let tree = TagTree::new();
        let cursor = tree.root();
        Self {
            tree,
            cursor,
            default_namespace: default_namespace.to_string(),
            namespace_for_new_tags: None,
        }
    }

    pub fn cursor(&self) -> TagNodeId {
        self.cursor
    }

    pub fn tree(&self) -> &TagTree {
        &self.tree
    }

    /// Overrides the namespace assigned to subsequently pushed tags.
    /// `None` restores the document default.
    pub fn set_namespace_for_new_tags(&mut self, uri: Option<&str>) {
        self.namespace_for_new_tags = uri.map(str::to_string);
    }

    fn namespace_for(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_string)
            .or_else(|| self.namespace_for_new_tags.clone())
            .unwrap_or_else(|| self.default_namespace.clone())
    }

    /// Validates that `role` resolves to a standard role, then pushes a
    /// structure node under the cursor and descends into it.
    pub fn push_tag(
        &mut self,
        registry: &NamespaceRegistry,
        role: &str,
        namespace: Option<&str>,
    ) -> Result<ResolvedRole, TagError> {
        let ns = self.namespace_for(namespace);
        let resolved = registry.resolve_role(role, &ns)?;
        let id = self.tree.add_child(self.cursor, role.to_string(), ns);
        self.cursor = id;
        Ok(resolved)
    }

    /// Moves the cursor back to the parent of the current node. At the root
    /// this is a no-op.
    pub fn pop(&mut self) {
        if let Some(parent) = self.tree.node(self.cursor).parent {
            self.cursor = parent;
        }
    }

    pub fn into_tree(self) -> TagTree {
        self.tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::Namespace;

    #[test]
    fn push_and_pop_build_nested_structure() {
        let registry = NamespaceRegistry::new();
        let mut pointer = TagPointer::new(NS_PDF_2_0);

        pointer.push_tag(&registry, "Sect", None).unwrap();
        pointer.push_tag(&registry, "P", None).unwrap();
        pointer.pop();
        pointer.push_tag(&registry, "P", None).unwrap();
        pointer.pop();
        pointer.pop();

        let tree = pointer.into_tree();
        assert_eq!(
            tree.roles_depth_first(),
            vec!["Document", "Sect", "P", "P"]
        );
    }

    #[test]
    fn push_rejects_unresolvable_role() {
        let registry = NamespaceRegistry::new();
        let mut pointer = TagPointer::new(NS_PDF_2_0);

        let err = pointer.push_tag(&registry, "Chapter", None).unwrap_err();
        assert!(matches!(err, TagError::UnresolvedRole { .. }));
        // A rejected push leaves the tree untouched.
        assert_eq!(pointer.tree().len(), 1);
        assert_eq!(pointer.cursor(), pointer.tree().root());
    }

    #[test]
    fn namespace_for_new_tags_applies_until_reset() {
        let mut registry = NamespaceRegistry::new();
        let mut custom = Namespace::new("urn:example:custom");
        custom.add_mapping("chapter", "Sect", NS_PDF_2_0);
        registry.register(custom);

        let mut pointer = TagPointer::new(NS_PDF_2_0);
        pointer.set_namespace_for_new_tags(Some("urn:example:custom"));
        pointer.push_tag(&registry, "chapter", None).unwrap();
        assert_eq!(
            pointer.tree().node(pointer.cursor()).namespace,
            "urn:example:custom"
        );

        pointer.set_namespace_for_new_tags(None);
        pointer.push_tag(&registry, "P", None).unwrap();
        assert_eq!(pointer.tree().node(pointer.cursor()).namespace, NS_PDF_2_0);
    }

    #[test]
    fn explicit_namespace_wins_over_pointer_setting() {
        let mut registry = NamespaceRegistry::new();
        let mut custom = Namespace::new("urn:example:custom");
        custom.add_mapping("chapter", "Sect", NS_PDF_2_0);
        registry.register(custom);

        let mut pointer = TagPointer::new(NS_PDF_2_0);
        pointer.set_namespace_for_new_tags(Some("urn:example:other"));
        pointer
            .push_tag(&registry, "chapter", Some("urn:example:custom"))
            .unwrap();
        assert_eq!(
            pointer.tree().node(pointer.cursor()).namespace,
            "urn:example:custom"
        );
    }
}
