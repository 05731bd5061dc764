//! Read-only pattern matching over a finished tree.
//!
//! [`ExactMatcher`] walks from the root comparing the pattern against edge
//! labels, re-canonicalizing at every explicit node boundary, then lazily
//! enumerates all leaf positions beneath the locus it reached. Matching
//! never mutates the tree, so scans may fan out across threads once the
//! build has finished; [`match_many`] does exactly that when the `parallel`
//! feature is enabled.

use crate::locus::Locus;
use crate::storage::{NodeId, TreeStorage, ROOT};
use crate::text::{GeneralizedText, Symbol};
use crate::tree::SuffixTree;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A read-only query producing generalized-text start positions.
pub trait Matcher {
    /// Iterator over every position where the matcher's subject occurs.
    /// Lazy and single-pass; call again for a fresh enumeration.
    fn occurrences<'t, S: TreeStorage>(&self, tree: &'t SuffixTree<S>) -> Occurrences<'t, S>;
}

/// Exact substring lookup.
///
/// The empty pattern matches every position of the generalized text.
/// Patterns never match across a terminator, since terminators lie outside
/// the natural alphabet.
#[derive(Debug, Clone)]
pub struct ExactMatcher {
    pattern: Vec<Symbol>,
}

impl ExactMatcher {
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: GeneralizedText::encode(pattern),
        }
    }

    pub fn from_symbols(pattern: Vec<Symbol>) -> Self {
        Self { pattern }
    }

    pub fn pattern(&self) -> &[Symbol] {
        &self.pattern
    }

    /// Walk the pattern down from the root. `None` on the first mismatch or
    /// when the path runs out; otherwise the locus where the pattern ends.
    pub fn locate<S: TreeStorage>(&self, tree: &SuffixTree<S>) -> Option<Locus> {
        let storage = tree.storage();
        let mut locus = Locus::explicit(ROOT);
        let mut matched = 0;
        while matched < self.pattern.len() {
            debug_assert!(locus.is_explicit(), "pattern walk resumes at a node");
            let next = self.pattern[matched];
            let label = storage.follow(&locus, next)?;
            let take = label.len().min(self.pattern.len() - matched);
            if label[..take] != self.pattern[matched..matched + take] {
                return None;
            }
            let child = storage
                .lookup(&locus, next)
                .expect("follow and lookup disagree on an edge");
            let range = storage.edge_range(child);
            locus = Locus::new(locus.node, range.start, range.start + take);
            storage.canonize(&mut locus);
            matched += take;
        }
        Some(locus)
    }
}

impl Matcher for ExactMatcher {
    fn occurrences<'t, S: TreeStorage>(&self, tree: &'t SuffixTree<S>) -> Occurrences<'t, S> {
        match self.locate(tree) {
            Some(locus) => Occurrences::beneath(tree, locus, self.pattern.len()),
            None => Occurrences::empty(tree),
        }
    }
}

/// Lazy depth-first enumeration of the leaf positions beneath a locus.
///
/// Each stack entry pairs a node with its full string depth; a leaf at depth
/// d corresponds to the occurrence starting at `text.len() - d`.
pub struct Occurrences<'t, S: TreeStorage> {
    tree: &'t SuffixTree<S>,
    stack: Vec<(NodeId, usize)>,
}

impl<'t, S: TreeStorage> Occurrences<'t, S> {
    fn empty(tree: &'t SuffixTree<S>) -> Self {
        Self {
            tree,
            stack: Vec::new(),
        }
    }

    fn beneath(tree: &'t SuffixTree<S>, locus: Locus, matched: usize) -> Self {
        if tree.text().is_empty() {
            return Self::empty(tree);
        }
        let storage = tree.storage();
        let seed = if locus.is_explicit() {
            (locus.node, matched)
        } else {
            let first = tree.text().symbol(locus.start);
            let child = storage
                .lookup(&Locus::explicit(locus.node), first)
                .expect("mid-edge locus names a live edge");
            let range = storage.edge_range(child);
            (child, matched - locus.span() + (range.end - range.start))
        };
        Self {
            tree,
            stack: vec![seed],
        }
    }
}

impl<S: TreeStorage> Iterator for Occurrences<'_, S> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while let Some((node, depth)) = self.stack.pop() {
            let children = self.tree.children(node);
            if children.is_empty() {
                return Some(self.tree.text().len() - depth);
            }
            for &child in children.iter().rev() {
                let range = self.tree.storage().edge_range(child);
                self.stack.push((child, depth + (range.end - range.start)));
            }
        }
        None
    }
}

/// Sorted, deduplicated indices of the sequences containing at least one
/// occurrence.
pub fn sequence_hits<S: TreeStorage, M: Matcher>(tree: &SuffixTree<S>, matcher: &M) -> Vec<usize> {
    let mut sequences: Vec<usize> = matcher
        .occurrences(tree)
        .map(|pos| tree.locate(pos).sequence)
        .collect();
    sequences.sort_unstable();
    sequences.dedup();
    sequences
}

/// Options for scanning a batch of patterns.
#[derive(Debug, Clone, Copy)]
pub struct ScanConfig {
    /// Fan the patterns out over a thread pool (requires the `parallel`
    /// feature; downgraded to sequential with a warning otherwise).
    pub use_threads: bool,
    /// Worker count when threading is enabled.
    pub max_workers: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            use_threads: false,
            max_workers: 1,
        }
    }
}

/// Match every pattern against the tree, returning its sorted occurrence
/// positions. Read-only, so the parallel path shares the tree freely.
pub fn match_many<S: TreeStorage + Sync>(
    tree: &SuffixTree<S>,
    patterns: &[String],
    config: ScanConfig,
) -> Vec<Vec<usize>> {
    #[cfg(not(feature = "parallel"))]
    if config.use_threads {
        log::warn!(
            "Threaded pattern scan requested, but the 'parallel' feature is not enabled; falling back to sequential mode"
        );
    }

    let scan = |pattern: &String| {
        let mut positions: Vec<usize> = ExactMatcher::new(pattern).occurrences(tree).collect();
        positions.sort_unstable();
        positions
    };

    if config.use_threads {
        #[cfg(feature = "parallel")]
        {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.max_workers)
                .build()
                .expect("Failed to build rayon thread pool");
            return pool.install(|| patterns.par_iter().map(scan).collect());
        }
    }
    patterns.iter().map(scan).collect()
}
