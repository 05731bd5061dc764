//! Generalized suffix tree engine.
//!
//! Builds a suffix tree over one or more input sequences in linear time
//! (Ukkonen's online construction), each sequence closed by a unique
//! terminator symbol, and answers exact pattern queries with per-sequence
//! coordinates. Node/edge storage sits behind the [`TreeStorage`] trait so
//! the representation can be swapped without touching the algorithm.
//!
//! ```
//! use gstree::{ExactMatcher, GeneralizedText, Matcher, UkkonenBuilder};
//!
//! let text = GeneralizedText::build(&["banana", "ananas"], None).unwrap();
//! let tree = UkkonenBuilder::build(text);
//! let mut positions: Vec<usize> = ExactMatcher::new("ana").occurrences(&tree).collect();
//! positions.sort_unstable();
//! assert_eq!(positions, vec![1, 3, 7, 9]);
//! assert_eq!(tree.locate(7).sequence, 1);
//! ```

pub mod builder;
pub mod ingest;
pub mod locus;
pub mod matching;
pub mod storage;
pub mod text;
pub mod traverse;
pub mod tree;

pub use builder::UkkonenBuilder;
pub use ingest::{read_lines, read_sequences, IngestError, SequenceRecord};
pub use locus::Locus;
pub use matching::{match_many, sequence_hits, ExactMatcher, Matcher, Occurrences, ScanConfig};
pub use storage::{ArenaStorage, NodeId, TreeStorage, ROOT, SUPER_ROOT};
pub use text::{Alphabet, GeneralizedText, SeqPosition, Symbol, TextError, TERMINATOR_BASE};
pub use traverse::{
    annotate_leaf_counts, leaf_counts, DfsDownAndUpTraverser, DfsDownTraverser, Direction,
};
pub use tree::{NodeAttribute, SuffixTree, LEAF_COUNT_ATTRIBUTE, SUFFIX_LINK_ATTRIBUTE};
