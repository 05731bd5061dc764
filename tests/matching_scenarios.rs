//! End-to-end matching scenarios over generalized trees.

use gstree::{
    sequence_hits, Alphabet, ExactMatcher, GeneralizedText, Matcher, SeqPosition, TextError,
    UkkonenBuilder,
};

fn build_over(sequences: &[&str]) -> gstree::SuffixTree {
    let text = GeneralizedText::build(sequences, None).unwrap();
    UkkonenBuilder::build(text)
}

fn positions(tree: &gstree::SuffixTree, pattern: &str) -> Vec<usize> {
    let mut found: Vec<usize> = ExactMatcher::new(pattern).occurrences(tree).collect();
    found.sort_unstable();
    found
}

#[test]
fn repeated_pattern_over_a_single_sequence() {
    let tree = build_over(&["abcabxabcd"]);
    assert_eq!(positions(&tree, "ab"), vec![0, 3, 6]);
    assert_eq!(positions(&tree, "xyz"), Vec::<usize>::new());
}

#[test]
fn pattern_shared_across_two_sequences_maps_to_both() {
    let tree = build_over(&["banana", "ananas"]);
    let found = positions(&tree, "ana");
    assert_eq!(found, vec![1, 3, 7, 9]);

    let local: Vec<SeqPosition> = found.iter().map(|&pos| tree.locate(pos)).collect();
    assert!(local.contains(&SeqPosition { sequence: 0, offset: 1 }));
    assert!(local.contains(&SeqPosition { sequence: 0, offset: 3 }));
    assert!(local.contains(&SeqPosition { sequence: 1, offset: 0 }));
    assert!(local.contains(&SeqPosition { sequence: 1, offset: 2 }));

    let matcher = ExactMatcher::new("ana");
    assert_eq!(sequence_hits(&tree, &matcher), vec![0, 1]);
}

#[test]
fn empty_pattern_matches_every_position_of_the_text() {
    let tree = build_over(&["banana", "ananas"]);
    let found = positions(&tree, "");
    assert_eq!(found, (0..tree.text().len()).collect::<Vec<usize>>());
}

#[test]
fn pattern_longer_than_every_sequence_matches_nothing() {
    let tree = build_over(&["banana", "ananas"]);
    assert!(positions(&tree, "bananas").is_empty());
    assert!(positions(&tree, "bananabanana").is_empty());
}

#[test]
fn duplicate_sequences_report_hits_in_each_copy() {
    let tree = build_over(&["acgt", "acgt"]);
    let found = positions(&tree, "cg");
    assert_eq!(found.len(), 2);
    let hits = sequence_hits(&tree, &ExactMatcher::new("cg"));
    assert_eq!(hits, vec![0, 1]);
}

#[test]
fn empty_sequences_build_and_never_match_natural_patterns() {
    let tree = build_over(&["", "abc", ""]);
    assert_eq!(positions(&tree, "abc"), vec![1]);
    assert_eq!(tree.locate(1), SeqPosition { sequence: 1, offset: 0 });
    // Empty-pattern positions still include the bare terminators.
    assert_eq!(positions(&tree, "").len(), tree.text().len());
}

#[test]
fn terminators_never_bridge_adjacent_sequences() {
    // "ab" ends sequence 0 and "ba" starts sequence 1; the concatenation
    // "abba" must not be reported as an occurrence.
    let tree = build_over(&["xab", "bay"]);
    assert!(positions(&tree, "abba").is_empty());
    assert_eq!(positions(&tree, "ab"), vec![1]);
    assert_eq!(positions(&tree, "ba"), vec![4]);
}

#[test]
fn validation_rejects_characters_outside_the_declared_alphabet() {
    let alphabet = Alphabet::from_text("acgt");
    let error = GeneralizedText::build(&["acgt", "acgu"], Some(&alphabet)).unwrap_err();
    assert!(matches!(
        error,
        TextError::InvalidSymbol {
            sequence: 1,
            position: 3,
            symbol: 'u',
        }
    ));
}

#[test]
fn validated_input_still_builds_and_matches() {
    let alphabet = Alphabet::from_text("abcdx");
    let text = GeneralizedText::build(&["abcabxabcd"], Some(&alphabet)).unwrap();
    let tree = UkkonenBuilder::build(text);
    assert_eq!(positions(&tree, "abc"), vec![0, 6]);
}
