//! Tree of named scopes that own the collected declarations
//!
//! Namespaces map onto Rust modules in generated code. Nodes live in an arena
//! owned by [`NamespaceTree`] and are addressed by [`NamespaceId`]; the root is
//! always `NamespaceId(0)` and is the only node without a name.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::error::ModelError;
use crate::naming::module_ident;
use crate::overloads::ListOfFunctions;
use crate::types::{ClassId, InterfaceId, NamespaceId, Variable};

#[derive(Debug, Clone, Serialize)]
pub struct Namespace {
    /// Name as written in the declaration
    pub name: String,
    /// Output identifier (module name)
    pub ident: String,
    #[serde(skip)]
    pub parent: Option<NamespaceId>,
    pub namespaces: BTreeMap<String, NamespaceId>,
    pub classes: BTreeMap<String, ClassId>,
    pub interfaces: BTreeMap<String, InterfaceId>,
    /// Free functions
    pub functions: ListOfFunctions,
    pub variables: Vec<Variable>,
}

impl Namespace {
    fn new(name: &str, parent: Option<NamespaceId>, parent_path: &str) -> Result<Self, ModelError> {
        if name.is_empty() && parent.is_some() {
            return Err(ModelError::MalformedNamespace {
                parent: parent_path.to_string(),
            });
        }
        Ok(Self {
            name: name.to_string(),
            ident: if name.is_empty() {
                String::new()
            } else {
                module_ident(name)
            },
            parent,
            namespaces: BTreeMap::new(),
            classes: BTreeMap::new(),
            interfaces: BTreeMap::new(),
            functions: ListOfFunctions::new(),
            variables: Vec::new(),
        })
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Append a variable unless an equal one is already present
    pub fn add_variable(&mut self, variable: Variable) -> bool {
        if self.variables.contains(&variable) {
            return false;
        }
        self.variables.push(variable);
        true
    }
}

/// Arena of namespaces rooted at [`NamespaceTree::ROOT`]
#[derive(Debug, Clone, Serialize)]
pub struct NamespaceTree {
    nodes: Vec<Namespace>,
}

impl NamespaceTree {
    pub const ROOT: NamespaceId = NamespaceId(0);

    pub fn new() -> Self {
        let root = Namespace {
            name: String::new(),
            ident: String::new(),
            parent: None,
            namespaces: BTreeMap::new(),
            classes: BTreeMap::new(),
            interfaces: BTreeMap::new(),
            functions: ListOfFunctions::new(),
            variables: Vec::new(),
        };
        Self { nodes: vec![root] }
    }

    pub fn root(&self) -> &Namespace {
        &self.nodes[Self::ROOT.0]
    }

    pub fn get(&self, id: NamespaceId) -> &Namespace {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NamespaceId) -> &mut Namespace {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NamespaceId, &Namespace)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(idx, ns)| (NamespaceId(idx), ns))
    }

    /// Look up a child by its escaped identifier, creating and linking it if absent
    pub fn get_or_create_sub_namespace(
        &mut self,
        parent: NamespaceId,
        name: &str,
    ) -> Result<NamespaceId, ModelError> {
        let key = module_ident(name);
        if let Some(existing) = self.nodes[parent.0].namespaces.get(&key) {
            return Ok(*existing);
        }

        let parent_path = self.display_path(parent);
        let namespace = Namespace::new(name, Some(parent), &parent_path)?;
        let id = NamespaceId(self.nodes.len());
        debug!("NamespaceTree: created '{}' under '{}'", key, parent_path);
        self.nodes.push(namespace);
        self.nodes[parent.0].namespaces.insert(key, id);
        Ok(id)
    }

    /// Create (or find) the whole chain of namespaces below the root
    pub fn namespace_at<S: AsRef<str>>(&mut self, components: &[S]) -> Result<NamespaceId, ModelError> {
        let mut current = Self::ROOT;
        for component in components {
            current = self.get_or_create_sub_namespace(current, component.as_ref())?;
        }
        Ok(current)
    }

    /// Chain of namespaces from the root down to `id`, both included
    pub fn ancestors(&self, id: NamespaceId) -> Vec<NamespaceId> {
        let mut chain = vec![id];
        let mut current = id;
        while let Some(parent) = self.nodes[current.0].parent {
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }

    /// Identifiers from the root (excluded) down to `id`
    pub fn qualified_path(&self, id: NamespaceId) -> Vec<&str> {
        self.ancestors(id)
            .into_iter()
            .skip(1)
            .map(|ns| self.nodes[ns.0].ident.as_str())
            .collect()
    }

    /// `a::b::item` for an item declared in `id`
    pub fn qualified_item(&self, id: NamespaceId, item: &str) -> String {
        let mut parts = self.qualified_path(id);
        parts.push(item);
        parts.join("::")
    }

    fn display_path(&self, id: NamespaceId) -> String {
        let path = self.qualified_path(id);
        if path.is_empty() {
            "<root>".to_string()
        } else {
            path.join("::")
        }
    }

    /// Shortest reference from code in `from` to `item` declared in `to`
    ///
    /// Climbs to the common ancestor with `super::` and then descends through
    /// the part of `to`'s chain that differs. When the only shared ancestor is
    /// the root (and `from` is not the root) the path is absolute.
    pub fn rust_path_to(&self, from: NamespaceId, to: NamespaceId, item: &str) -> String {
        if from == to {
            return item.to_string();
        }

        let from_chain = self.ancestors(from);
        let to_chain = self.ancestors(to);
        let common = from_chain
            .iter()
            .zip(&to_chain)
            .take_while(|(a, b)| a == b)
            .count();

        let mut parts: Vec<&str> = Vec::new();
        if common == 1 && from != Self::ROOT {
            parts.push("crate");
        } else {
            parts.extend(std::iter::repeat("super").take(from_chain.len() - common));
        }
        parts.extend(to_chain[common..].iter().map(|ns| self.nodes[ns.0].ident.as_str()));
        parts.push(item);
        parts.join("::")
    }
}

impl Default for NamespaceTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> (NamespaceTree, NamespaceId, NamespaceId, NamespaceId, NamespaceId) {
        let mut tree = NamespaceTree::new();
        let pixi = tree.namespace_at(&["PIXI"]).unwrap();
        let loaders = tree.namespace_at(&["PIXI", "loaders"]).unwrap();
        let filters = tree.namespace_at(&["PIXI", "filters"]).unwrap();
        let events = tree.namespace_at(&["events"]).unwrap();
        (tree, pixi, loaders, filters, events)
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let mut tree = NamespaceTree::new();
        let a = tree
            .get_or_create_sub_namespace(NamespaceTree::ROOT, "PIXI")
            .unwrap();
        let b = tree
            .get_or_create_sub_namespace(NamespaceTree::ROOT, "PIXI")
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.get(a).ident, "pixi");
        assert_eq!(tree.get(a).name, "PIXI");
        assert_eq!(tree.root().namespaces.len(), 1);
    }

    #[test]
    fn test_unnamed_child_is_rejected() {
        let mut tree = NamespaceTree::new();
        let err = tree
            .get_or_create_sub_namespace(NamespaceTree::ROOT, "")
            .unwrap_err();
        assert!(matches!(err, ModelError::MalformedNamespace { .. }));
    }

    #[test]
    fn test_qualified_path() {
        let (tree, _, loaders, _, _) = tree();
        assert_eq!(tree.qualified_path(loaders), ["pixi", "loaders"]);
        assert_eq!(tree.qualified_item(loaders, "Loader"), "pixi::loaders::Loader");
        assert!(tree.qualified_path(NamespaceTree::ROOT).is_empty());
    }

    #[test]
    fn test_path_within_same_namespace() {
        let (tree, pixi, ..) = tree();
        assert_eq!(tree.rust_path_to(pixi, pixi, "Sprite"), "Sprite");
    }

    #[test]
    fn test_path_to_child_and_parent() {
        let (tree, pixi, loaders, ..) = tree();
        assert_eq!(tree.rust_path_to(pixi, loaders, "Loader"), "loaders::Loader");
        assert_eq!(tree.rust_path_to(loaders, pixi, "Sprite"), "super::Sprite");
    }

    #[test]
    fn test_path_to_sibling() {
        let (tree, _, loaders, filters, _) = tree();
        assert_eq!(
            tree.rust_path_to(loaders, filters, "BlurFilter"),
            "super::filters::BlurFilter"
        );
    }

    #[test]
    fn test_path_across_root() {
        let (tree, pixi, loaders, _, events) = tree();
        assert_eq!(
            tree.rust_path_to(loaders, events, "EventEmitter"),
            "crate::events::EventEmitter"
        );
        assert_eq!(
            tree.rust_path_to(NamespaceTree::ROOT, loaders, "Loader"),
            "pixi::loaders::Loader"
        );
        assert_eq!(
            tree.rust_path_to(pixi, NamespaceTree::ROOT, "Global"),
            "crate::Global"
        );
    }
}
