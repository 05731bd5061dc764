//! Node/edge storage behind an opaque integer id space.
//!
//! The [`TreeStorage`] trait is the contract the construction algorithm and
//! the read-only consumers are written against; [`ArenaStorage`] is the
//! reference implementation, an arena of node records indexed by id with a
//! per-node child table keyed by first edge symbol. Backends with other edge
//! encodings can be swapped in without touching the algorithm.

use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;

use crate::locus::Locus;
use crate::text::{GeneralizedText, Symbol};

/// Dense, zero-based node identifier.
pub type NodeId = u32;

/// The root node, always id 0.
pub const ROOT: NodeId = 0;

/// Sentinel ancestor of the root. It never occupies the arena; it exists
/// only as the root's suffix-link target, and every symbol leads from it
/// back to the root across an edge of length one.
pub const SUPER_ROOT: NodeId = NodeId::MAX;

/// Storage contract for one suffix tree.
///
/// Mutators may only be called between `initialize` and the end of the
/// construction pass. Calling them out of order, splitting at an explicit
/// locus, or naming a node past `max_node` are programmer errors and panic;
/// they are never surfaced as recoverable results.
pub trait TreeStorage {
    /// Reset to an empty state bound to the given frozen text.
    fn initialize(&mut self, text: Arc<GeneralizedText>);

    /// Establish the root (id 0). The super-root stays implicit. Called
    /// exactly once, before any insertion.
    fn create_super_root_and_root(&mut self);

    /// Attach a new leaf under `parent` with edge label `text[start..]`.
    /// The label's end is open and grows implicitly with the text.
    fn add_leaf(&mut self, parent: NodeId, start: usize) -> NodeId;

    /// Materialize an explicit node at a mid-edge locus by splitting the
    /// edge in two; returns the new node. Precondition: `!locus.is_explicit()`.
    fn split(&mut self, locus: &Locus) -> NodeId;

    /// Rewrite `locus` into canonical form, walking down and consuming full
    /// edges until the pending range no longer spans an explicit boundary.
    fn canonize(&self, locus: &mut Locus);

    /// The node reached by following `symbol` from the position `locus`
    /// describes, or `None` when no such edge exists.
    fn lookup(&self, locus: &Locus, symbol: Symbol) -> Option<NodeId>;

    /// Full label of the edge that `symbol` would follow from `locus`.
    fn follow(&self, locus: &Locus, symbol: Symbol) -> Option<&[Symbol]>;

    /// Children of `node`, ordered by first edge symbol.
    fn child_nodes(&self, node: NodeId) -> Vec<NodeId>;

    fn num_children(&self, node: NodeId) -> usize;

    /// Text range of the label on the edge entering `node`, with open leaf
    /// ends resolved against the current text length.
    fn edge_range(&self, node: NodeId) -> Range<usize>;

    /// Label on the edge entering `node`.
    fn edge_label(&self, node: NodeId) -> &[Symbol];

    /// Highest node id handed out so far.
    fn max_node(&self) -> NodeId;

    /// Post-build hook for backends that want to compact themselves.
    fn finished(&mut self) {}
}

/// Leaf edges carry this end until resolved against the text length.
const OPEN_END: usize = usize::MAX;

#[derive(Debug, Clone)]
struct NodeRecord {
    edge_start: usize,
    edge_end: usize,
    children: HashMap<Symbol, NodeId>,
}

impl NodeRecord {
    fn new(edge_start: usize, edge_end: usize) -> Self {
        Self {
            edge_start,
            edge_end,
            children: HashMap::new(),
        }
    }
}

/// Reference backend: an arena of node records indexed by id.
#[derive(Debug, Default)]
pub struct ArenaStorage {
    nodes: Vec<NodeRecord>,
    text: Option<Arc<GeneralizedText>>,
}

impl ArenaStorage {
    fn text(&self) -> &GeneralizedText {
        self.text.as_deref().expect("storage not initialized")
    }

    fn record(&self, node: NodeId) -> &NodeRecord {
        &self.nodes[node as usize]
    }

    fn edge_len(&self, node: NodeId) -> usize {
        let range = self.edge_range(node);
        range.end - range.start
    }

    fn child_by_first_symbol(&self, node: NodeId, symbol: Symbol) -> Option<NodeId> {
        self.record(node).children.get(&symbol).copied()
    }
}

impl TreeStorage for ArenaStorage {
    fn initialize(&mut self, text: Arc<GeneralizedText>) {
        self.nodes.clear();
        self.text = Some(text);
    }

    fn create_super_root_and_root(&mut self) {
        assert!(
            self.text.is_some() && self.nodes.is_empty(),
            "root may only be created once, after initialize"
        );
        self.nodes.push(NodeRecord::new(0, 0));
    }

    fn add_leaf(&mut self, parent: NodeId, start: usize) -> NodeId {
        assert!(
            (parent as usize) < self.nodes.len(),
            "add_leaf parent is not a live node"
        );
        let first = self.text().symbol(start);
        let id = self.nodes.len() as NodeId;
        self.nodes.push(NodeRecord::new(start, OPEN_END));
        let previous = self.nodes[parent as usize].children.insert(first, id);
        debug_assert!(
            previous.is_none(),
            "parent already owns an edge for this symbol"
        );
        id
    }

    fn split(&mut self, locus: &Locus) -> NodeId {
        assert!(!locus.is_explicit(), "split requires a mid-edge locus");
        assert!(locus.node != SUPER_ROOT, "cannot split below the super-root");
        let first = self.text().symbol(locus.start);
        let span = locus.span();
        let child = self
            .child_by_first_symbol(locus.node, first)
            .expect("canonical locus names a missing edge");
        let child_start = self.nodes[child as usize].edge_start;
        let branch = self.text().symbol(child_start + span);

        let id = self.nodes.len() as NodeId;
        let mut upper = NodeRecord::new(child_start, child_start + span);
        upper.children.insert(branch, child);
        self.nodes.push(upper);
        self.nodes[child as usize].edge_start = child_start + span;
        self.nodes[locus.node as usize].children.insert(first, id);
        id
    }

    fn canonize(&self, locus: &mut Locus) {
        loop {
            if locus.is_explicit() {
                return;
            }
            if locus.node == SUPER_ROOT {
                // The universal edge to the root consumes exactly one symbol.
                locus.node = ROOT;
                locus.start += 1;
                continue;
            }
            let first = self.text().symbol(locus.start);
            let child = match self.child_by_first_symbol(locus.node, first) {
                Some(child) => child,
                None => return,
            };
            let len = self.edge_len(child);
            if locus.span() < len {
                return;
            }
            locus.start += len;
            locus.node = child;
        }
    }

    fn lookup(&self, locus: &Locus, symbol: Symbol) -> Option<NodeId> {
        if locus.node == SUPER_ROOT {
            debug_assert!(locus.is_explicit(), "super-root locus must be explicit");
            return Some(ROOT);
        }
        if locus.is_explicit() {
            return self.child_by_first_symbol(locus.node, symbol);
        }
        let first = self.text().symbol(locus.start);
        let child = self
            .child_by_first_symbol(locus.node, first)
            .expect("canonical locus names a missing edge");
        let range = self.edge_range(child);
        if self.text().symbol(range.start + locus.span()) == symbol {
            Some(child)
        } else {
            None
        }
    }

    fn follow(&self, locus: &Locus, symbol: Symbol) -> Option<&[Symbol]> {
        let child = self.lookup(locus, symbol)?;
        Some(self.edge_label(child))
    }

    fn child_nodes(&self, node: NodeId) -> Vec<NodeId> {
        let mut pairs: Vec<(Symbol, NodeId)> = self
            .record(node)
            .children
            .iter()
            .map(|(&symbol, &child)| (symbol, child))
            .collect();
        pairs.sort_unstable_by_key(|&(symbol, _)| symbol);
        pairs.into_iter().map(|(_, child)| child).collect()
    }

    fn num_children(&self, node: NodeId) -> usize {
        self.record(node).children.len()
    }

    fn edge_range(&self, node: NodeId) -> Range<usize> {
        let record = self.record(node);
        let end = if record.edge_end == OPEN_END {
            self.text().len()
        } else {
            record.edge_end
        };
        record.edge_start..end
    }

    fn edge_label(&self, node: NodeId) -> &[Symbol] {
        let range = self.edge_range(node);
        &self.text().symbols()[range]
    }

    fn max_node(&self) -> NodeId {
        assert!(!self.nodes.is_empty(), "storage not initialized");
        (self.nodes.len() - 1) as NodeId
    }
}
