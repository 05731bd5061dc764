//! Linear-time online suffix tree construction (Ukkonen's algorithm).
//!
//! One pass over the generalized text drives the storage backend through
//! successive phases. The active point follows suffix links between the
//! insertions of a phase, canonicalizing after every jump, and the
//! show-stopper rule ends a phase as soon as an edge for the next symbol
//! already exists. Total work is amortized O(n): canonicalization only ever
//! walks forward along the text, and the show stopper bounds insertions.

use std::sync::Arc;

use crate::locus::Locus;
use crate::storage::{ArenaStorage, NodeId, TreeStorage, ROOT, SUPER_ROOT};
use crate::text::GeneralizedText;
use crate::tree::{NodeAttribute, SuffixTree, SUFFIX_LINK_ATTRIBUTE};

/// Builds a [`SuffixTree`] from a frozen [`GeneralizedText`].
pub struct UkkonenBuilder;

impl UkkonenBuilder {
    /// Build over the reference arena backend.
    pub fn build(text: GeneralizedText) -> SuffixTree<ArenaStorage> {
        Self::build_with(ArenaStorage::default(), text)
    }

    /// Build over a caller-supplied backend.
    pub fn build_with<S: TreeStorage>(storage: S, text: GeneralizedText) -> SuffixTree<S> {
        let text = Arc::new(text);
        let mut tree = SuffixTree::new(storage, Arc::clone(&text));
        let n = text.len();

        // Working suffix-link buffer, indexed by node id. A build over n
        // symbols creates at most n leaves and n-1 internal nodes besides
        // the root, so 2n entries never index out of bounds. Unset entries
        // (the root, leaves) keep the super-root sentinel.
        let mut links: Vec<NodeId> = vec![SUPER_ROOT; (2 * n).max(1)];

        if n > 0 {
            let storage = tree.storage_mut();
            storage.add_leaf(ROOT, 0);
            // The first symbol is already in place; the active point starts
            // at the root with phase 1 pending.
            let mut locus = Locus::new(ROOT, 1, 1);

            for i in 1..n {
                let ti = text.symbol(i);
                // At most one suffix link is pending at a time: the node a
                // split just created, waiting for the next insertion's node.
                let mut pending: Option<NodeId> = None;

                loop {
                    if storage.lookup(&locus, ti).is_some() {
                        // Show stopper: the edge already exists here, so it
                        // exists for every shorter suffix of this phase too.
                        break;
                    }
                    let target = if locus.is_explicit() {
                        locus.node
                    } else {
                        storage.split(&locus)
                    };
                    storage.add_leaf(target, i);
                    if let Some(source) = pending.take() {
                        links[source as usize] = target;
                    }
                    if target != ROOT {
                        pending = Some(target);
                    }
                    locus.node = links[locus.node as usize];
                    storage.canonize(&mut locus);
                }

                if let Some(source) = pending.take() {
                    links[source as usize] = locus.node;
                }
                // Every leaf edge is open-ended, so the phase extends all of
                // them implicitly; only the active point must advance.
                locus.end += 1;
                storage.canonize(&mut locus);
            }
        }

        let max_node = tree.storage().max_node() as usize;
        links.truncate(max_node + 1);
        log::debug!(
            "suffix tree built: {} nodes over {} symbols ({} sequences)",
            max_node + 1,
            n,
            text.sequence_count()
        );
        tree.set_attribute(SUFFIX_LINK_ATTRIBUTE, NodeAttribute::Nodes(links));
        tree.storage_mut().finished();
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_over(sequences: &[&str]) -> SuffixTree<ArenaStorage> {
        let text = GeneralizedText::build(sequences, None).unwrap();
        UkkonenBuilder::build(text)
    }

    fn count_leaves(tree: &SuffixTree<ArenaStorage>) -> usize {
        let mut stack = vec![ROOT];
        let mut leaves = 0;
        while let Some(node) = stack.pop() {
            let children = tree.children(node);
            if children.is_empty() && node != ROOT {
                leaves += 1;
            }
            stack.extend(children);
        }
        leaves
    }

    #[test]
    fn builds_one_leaf_per_generalized_suffix() {
        let tree = build_over(&["abcabxabcd"]);
        assert_eq!(count_leaves(&tree), tree.text().len());
    }

    #[test]
    fn known_text_produces_the_expected_arena_size() {
        // "abcabxabcd" plus terminator: 11 leaves, 5 internal nodes, root.
        let tree = build_over(&["abcabxabcd"]);
        assert_eq!(tree.node_count(), 17);
    }

    #[test]
    fn empty_text_builds_a_root_only_tree() {
        let tree = build_over(&[]);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.num_children(ROOT), 0);
        assert_eq!(tree.suffix_links().unwrap(), &[SUPER_ROOT]);
    }

    #[test]
    fn empty_sequence_contributes_a_terminator_leaf() {
        let tree = build_over(&["", "a"]);
        // Text is [term0, 'a', term1]: three leaves under the root.
        assert_eq!(count_leaves(&tree), 3);
        assert_eq!(tree.node_count(), 4);
    }

    #[test]
    fn duplicate_sequences_share_paths_until_their_terminators() {
        let tree = build_over(&["ab", "ab"]);
        assert_eq!(count_leaves(&tree), tree.text().len());
        // Both terminators hang below the shared "ab" and "b" paths, which
        // must therefore be explicit internal nodes.
        assert!(tree.node_count() > tree.text().len() + 1);
    }

    #[test]
    fn suffix_link_table_covers_every_node() {
        let tree = build_over(&["banana", "ananas"]);
        let links = tree.suffix_links().unwrap();
        assert_eq!(links.len(), tree.node_count());
        assert_eq!(links[ROOT as usize], SUPER_ROOT);
    }

    #[test]
    fn internal_suffix_links_drop_exactly_one_symbol() {
        let tree = build_over(&["abcabxabcd"]);
        let links = tree.suffix_links().unwrap();
        let paths = node_paths(&tree);
        for node in 0..tree.node_count() as NodeId {
            if node == ROOT || tree.num_children(node) == 0 {
                continue;
            }
            let target = links[node as usize];
            assert_ne!(target, SUPER_ROOT, "internal node {node} missing its link");
            assert_eq!(paths[target as usize], paths[node as usize][1..]);
        }
    }

    fn node_paths(tree: &SuffixTree<ArenaStorage>) -> Vec<Vec<crate::text::Symbol>> {
        let mut paths = vec![Vec::new(); tree.node_count()];
        let mut stack = vec![ROOT];
        while let Some(node) = stack.pop() {
            for child in tree.children(node) {
                let mut path = paths[node as usize].clone();
                path.extend_from_slice(tree.edge_label(child));
                paths[child as usize] = path;
                stack.push(child);
            }
        }
        paths
    }
}
