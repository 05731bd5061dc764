//! Depth-first traversal over a finished tree.
//!
//! `DfsDownTraverser` visits each node once, parent before children.
//! `DfsDownAndUpTraverser` additionally emits an up-visit per node on the way
//! back, which is what bottom-up aggregations hang off; `leaf_counts` is the
//! canonical example, summing each finished subtree into its parent.
//! Traversers are finite and single-pass; construct a new one to restart.

use crate::storage::{NodeId, TreeStorage, ROOT};
use crate::tree::{NodeAttribute, SuffixTree, LEAF_COUNT_ATTRIBUTE};

/// Which way a down-and-up traversal is moving when it reports a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Down,
    Up,
}

/// Parent-before-children traversal, each node exactly once.
pub struct DfsDownTraverser<'t, S: TreeStorage> {
    tree: &'t SuffixTree<S>,
    stack: Vec<NodeId>,
}

impl<'t, S: TreeStorage> DfsDownTraverser<'t, S> {
    pub fn new(tree: &'t SuffixTree<S>) -> Self {
        Self {
            tree,
            stack: vec![ROOT],
        }
    }
}

impl<S: TreeStorage> Iterator for DfsDownTraverser<'_, S> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let node = self.stack.pop()?;
        let children = self.tree.children(node);
        for &child in children.iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}

struct Frame {
    node: NodeId,
    children: Vec<NodeId>,
    next: usize,
}

/// Traversal reporting every node twice: once on the way down, once on the
/// way back up after all of its children have finished.
pub struct DfsDownAndUpTraverser<'t, S: TreeStorage> {
    tree: &'t SuffixTree<S>,
    stack: Vec<Frame>,
    pending_root: bool,
}

impl<'t, S: TreeStorage> DfsDownAndUpTraverser<'t, S> {
    pub fn new(tree: &'t SuffixTree<S>) -> Self {
        Self {
            tree,
            stack: vec![Frame {
                node: ROOT,
                children: tree.children(ROOT),
                next: 0,
            }],
            pending_root: true,
        }
    }
}

impl<S: TreeStorage> Iterator for DfsDownAndUpTraverser<'_, S> {
    type Item = (NodeId, Direction);

    fn next(&mut self) -> Option<(NodeId, Direction)> {
        if self.pending_root {
            self.pending_root = false;
            return Some((ROOT, Direction::Down));
        }
        let (descend, node) = {
            let frame = self.stack.last_mut()?;
            if frame.next < frame.children.len() {
                let child = frame.children[frame.next];
                frame.next += 1;
                (true, child)
            } else {
                (false, frame.node)
            }
        };
        if descend {
            self.stack.push(Frame {
                node,
                children: self.tree.children(node),
                next: 0,
            });
            Some((node, Direction::Down))
        } else {
            self.stack.pop();
            Some((node, Direction::Up))
        }
    }
}

/// Number of leaves beneath each node, computed bottom-up: a leaf contributes
/// one to itself, and every up-visit folds the finished child into its
/// parent.
pub fn leaf_counts<S: TreeStorage>(tree: &SuffixTree<S>) -> Vec<i64> {
    let mut counts = vec![0i64; tree.node_count()];
    let mut path: Vec<NodeId> = Vec::new();
    for (node, direction) in DfsDownAndUpTraverser::new(tree) {
        match direction {
            Direction::Down => {
                if tree.is_leaf(node) {
                    counts[node as usize] = 1;
                }
                path.push(node);
            }
            Direction::Up => {
                path.pop();
                if let Some(&parent) = path.last() {
                    counts[parent as usize] += counts[node as usize];
                }
            }
        }
    }
    counts
}

/// Compute `leaf_counts` and attach it to the tree.
pub fn annotate_leaf_counts<S: TreeStorage>(tree: &mut SuffixTree<S>) {
    let counts = leaf_counts(tree);
    tree.set_attribute(LEAF_COUNT_ATTRIBUTE, NodeAttribute::Int(counts));
}
