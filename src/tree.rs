//! The suffix tree model: one storage backend, the frozen generalized text,
//! and an open set of named per-node attribute tables computed by traversal
//! after construction.

use std::collections::HashMap;
use std::sync::Arc;

use crate::storage::{ArenaStorage, NodeId, TreeStorage, ROOT};
use crate::text::{GeneralizedText, SeqPosition, Symbol};

/// Attribute name under which the builder attaches the suffix-link table.
pub const SUFFIX_LINK_ATTRIBUTE: &str = "suffix_link";

/// Attribute name used by the leaf-count annotation.
pub const LEAF_COUNT_ATTRIBUTE: &str = "leaf_count";

/// A typed per-node attribute array. Every variant carries exactly one entry
/// per node; the tree validates the length but never interprets the payload.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeAttribute {
    Int(Vec<i64>),
    Float(Vec<f64>),
    Bool(Vec<bool>),
    Nodes(Vec<NodeId>),
}

impl NodeAttribute {
    pub fn len(&self) -> usize {
        match self {
            Self::Int(values) => values.len(),
            Self::Float(values) => values.len(),
            Self::Bool(values) => values.len(),
            Self::Nodes(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A built generalized suffix tree.
///
/// The storage backend and text are bound exactly once at construction;
/// after the build finishes the tree is read-only and safe to share across
/// threads for matching.
#[derive(Debug)]
pub struct SuffixTree<S: TreeStorage = ArenaStorage> {
    storage: S,
    text: Arc<GeneralizedText>,
    attributes: HashMap<String, NodeAttribute>,
}

impl<S: TreeStorage> SuffixTree<S> {
    pub(crate) fn new(mut storage: S, text: Arc<GeneralizedText>) -> Self {
        storage.initialize(Arc::clone(&text));
        storage.create_super_root_and_root();
        Self {
            storage,
            text,
            attributes: HashMap::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub(crate) fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn text(&self) -> &GeneralizedText {
        &self.text
    }

    /// Number of explicit nodes, root included.
    pub fn node_count(&self) -> usize {
        self.storage.max_node() as usize + 1
    }

    /// Children of `node`, ordered by first edge symbol.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.storage.child_nodes(node)
    }

    pub fn num_children(&self, node: NodeId) -> usize {
        self.storage.num_children(node)
    }

    pub fn is_leaf(&self, node: NodeId) -> bool {
        node != ROOT && self.storage.num_children(node) == 0
    }

    /// Label on the edge entering `node`.
    pub fn edge_label(&self, node: NodeId) -> &[Symbol] {
        self.storage.edge_label(node)
    }

    /// Map a generalized offset back to its input sequence.
    pub fn locate(&self, pos: usize) -> SeqPosition {
        self.text.locate(pos)
    }

    /// Attach a named per-node attribute array. The array must carry exactly
    /// one entry per node.
    pub fn set_attribute(&mut self, name: impl Into<String>, values: NodeAttribute) {
        assert_eq!(
            values.len(),
            self.node_count(),
            "attribute arrays carry one entry per node"
        );
        self.attributes.insert(name.into(), values);
    }

    pub fn attribute(&self, name: &str) -> Option<&NodeAttribute> {
        self.attributes.get(name)
    }

    /// Discard a derived attribute so it can be recomputed.
    pub fn remove_attribute(&mut self, name: &str) -> Option<NodeAttribute> {
        self.attributes.remove(name)
    }

    pub fn int_attribute(&self, name: &str) -> Option<&[i64]> {
        match self.attributes.get(name) {
            Some(NodeAttribute::Int(values)) => Some(values),
            _ => None,
        }
    }

    pub fn float_attribute(&self, name: &str) -> Option<&[f64]> {
        match self.attributes.get(name) {
            Some(NodeAttribute::Float(values)) => Some(values),
            _ => None,
        }
    }

    pub fn bool_attribute(&self, name: &str) -> Option<&[bool]> {
        match self.attributes.get(name) {
            Some(NodeAttribute::Bool(values)) => Some(values),
            _ => None,
        }
    }

    pub fn nodes_attribute(&self, name: &str) -> Option<&[NodeId]> {
        match self.attributes.get(name) {
            Some(NodeAttribute::Nodes(values)) => Some(values),
            _ => None,
        }
    }

    /// The suffix-link table attached by the builder. Entries for the root
    /// and for leaves hold the super-root sentinel.
    pub fn suffix_links(&self) -> Option<&[NodeId]> {
        self.nodes_attribute(SUFFIX_LINK_ATTRIBUTE)
    }
}
