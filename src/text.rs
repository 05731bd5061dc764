//! Generalized input text: concatenation of the input sequences, each closed
//! by a sequence-unique terminator symbol drawn from outside the natural
//! alphabet, plus the position index mapping generalized offsets back to
//! (sequence, local offset) pairs.

use std::ops::Range;

/// A single symbol of the generalized text. Natural symbols are Unicode
/// scalar values; terminators live above [`TERMINATOR_BASE`].
pub type Symbol = u32;

/// First symbol value reserved for terminators. Every `char` maps below this,
/// so terminators can never collide with the natural alphabet.
pub const TERMINATOR_BASE: Symbol = 0x11_0000;

/// Errors raised while validating input sequences against an alphabet.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TextError {
    #[error("symbol {symbol:?} at position {position} of sequence {sequence} is outside the declared alphabet")]
    InvalidSymbol {
        sequence: usize,
        position: usize,
        symbol: char,
    },
}

/// A generalized-text offset resolved to its input sequence.
///
/// `offset == sequence length` denotes the sequence's terminator position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeqPosition {
    pub sequence: usize,
    pub offset: usize,
}

/// Sorted, deduplicated symbol set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<Symbol>,
}

impl Alphabet {
    /// Alphabet consisting of the characters of `text`.
    pub fn from_text(text: &str) -> Self {
        Self::from_symbols(text.chars().map(|ch| ch as Symbol))
    }

    pub fn from_symbols(symbols: impl IntoIterator<Item = Symbol>) -> Self {
        let mut symbols: Vec<Symbol> = symbols.into_iter().collect();
        symbols.sort_unstable();
        symbols.dedup();
        Self { symbols }
    }

    /// Scan all sequences once and collect every character that occurs.
    pub fn derive<S: AsRef<str>>(sequences: &[S]) -> Self {
        Self::from_symbols(
            sequences
                .iter()
                .flat_map(|seq| seq.as_ref().chars())
                .map(|ch| ch as Symbol),
        )
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        self.symbols.binary_search(&symbol).is_ok()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// The frozen generalized text. Built once, never mutated afterwards.
#[derive(Debug, Clone)]
pub struct GeneralizedText {
    symbols: Vec<Symbol>,
    /// Generalized offset of each sequence's first symbol, ascending.
    starts: Vec<usize>,
    /// Natural alphabet plus one terminator per sequence, sorted.
    alphabet: Alphabet,
    natural: Alphabet,
}

impl GeneralizedText {
    /// Concatenate `sequences`, closing each with its unique terminator.
    ///
    /// With `Some(alphabet)` validation is enabled: any character outside the
    /// alphabet fails with [`TextError::InvalidSymbol`] before anything is
    /// built. With `None` the natural alphabet is derived by a single scan
    /// and validation cannot fail.
    pub fn build<S: AsRef<str>>(
        sequences: &[S],
        alphabet: Option<&Alphabet>,
    ) -> Result<Self, TextError> {
        let natural = match alphabet {
            Some(declared) => {
                for (sequence, seq) in sequences.iter().enumerate() {
                    for (position, symbol) in seq.as_ref().chars().enumerate() {
                        if !declared.contains(symbol as Symbol) {
                            return Err(TextError::InvalidSymbol {
                                sequence,
                                position,
                                symbol,
                            });
                        }
                    }
                }
                declared.clone()
            }
            None => Alphabet::derive(sequences),
        };

        let total: usize = sequences
            .iter()
            .map(|seq| seq.as_ref().chars().count() + 1)
            .sum();
        let mut symbols = Vec::with_capacity(total);
        let mut starts = Vec::with_capacity(sequences.len());
        for (index, seq) in sequences.iter().enumerate() {
            starts.push(symbols.len());
            symbols.extend(seq.as_ref().chars().map(|ch| ch as Symbol));
            symbols.push(Self::terminator(index));
        }

        let alphabet = Alphabet::from_symbols(
            natural
                .symbols()
                .iter()
                .copied()
                .chain((0..sequences.len()).map(Self::terminator)),
        );

        Ok(Self {
            symbols,
            starts,
            alphabet,
            natural,
        })
    }

    /// Terminator symbol owned by input sequence `index`.
    pub fn terminator(index: usize) -> Symbol {
        TERMINATOR_BASE + index as Symbol
    }

    pub fn is_terminator(symbol: Symbol) -> bool {
        symbol >= TERMINATOR_BASE
    }

    /// Encode a query pattern into the symbol space of the text.
    pub fn encode(pattern: &str) -> Vec<Symbol> {
        pattern.chars().map(|ch| ch as Symbol).collect()
    }

    /// Total length including terminators.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbol(&self, pos: usize) -> Symbol {
        self.symbols[pos]
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn slice(&self, range: Range<usize>) -> &[Symbol] {
        &self.symbols[range]
    }

    pub fn sequence_count(&self) -> usize {
        self.starts.len()
    }

    /// Generalized offset of sequence `index`'s first symbol.
    pub fn sequence_start(&self, index: usize) -> usize {
        self.starts[index]
    }

    /// Length of sequence `index` without its terminator.
    pub fn sequence_len(&self, index: usize) -> usize {
        let end = self
            .starts
            .get(index + 1)
            .copied()
            .unwrap_or(self.symbols.len());
        end - self.starts[index] - 1
    }

    /// Map a generalized offset to its (sequence, local offset) pair.
    ///
    /// Binary search over the per-sequence start offsets, O(log k) for k
    /// sequences. An offset past the end of the text is a programmer error.
    pub fn locate(&self, pos: usize) -> SeqPosition {
        assert!(pos < self.symbols.len(), "offset beyond generalized text");
        let sequence = self.starts.partition_point(|&start| start <= pos) - 1;
        SeqPosition {
            sequence,
            offset: pos - self.starts[sequence],
        }
    }

    /// Natural alphabet plus the terminators, sorted.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn natural_alphabet(&self) -> &Alphabet {
        &self.natural
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concatenates_sequences_with_unique_terminators() {
        let text = GeneralizedText::build(&["ab", "c"], None).unwrap();
        assert_eq!(text.len(), 5);
        assert_eq!(text.sequence_count(), 2);
        assert_eq!(
            text.symbols(),
            &[
                'a' as Symbol,
                'b' as Symbol,
                GeneralizedText::terminator(0),
                'c' as Symbol,
                GeneralizedText::terminator(1),
            ]
        );
        assert_eq!(text.slice(0..2), &['a' as Symbol, 'b' as Symbol]);
        assert!(GeneralizedText::is_terminator(text.symbol(2)));
        assert!(!GeneralizedText::is_terminator(text.symbol(0)));
    }

    #[test]
    fn generalized_alphabet_unions_natural_and_terminators() {
        let text = GeneralizedText::build(&["ba", "ab"], None).unwrap();
        assert_eq!(text.natural_alphabet().len(), 2);
        assert_eq!(text.alphabet().len(), 4);
        assert!(text.alphabet().contains(GeneralizedText::terminator(1)));
        assert!(!text.natural_alphabet().contains(GeneralizedText::terminator(0)));
    }

    #[test]
    fn locates_offsets_across_sequence_boundaries() {
        let text = GeneralizedText::build(&["banana", "ananas"], None).unwrap();
        assert_eq!(text.locate(0), SeqPosition { sequence: 0, offset: 0 });
        assert_eq!(text.locate(5), SeqPosition { sequence: 0, offset: 5 });
        // Offset 6 is banana's terminator.
        assert_eq!(text.locate(6), SeqPosition { sequence: 0, offset: 6 });
        assert_eq!(text.locate(7), SeqPosition { sequence: 1, offset: 0 });
        assert_eq!(text.locate(13), SeqPosition { sequence: 1, offset: 6 });
        assert_eq!(text.sequence_start(1), 7);
        assert_eq!(text.sequence_len(1), 6);
    }

    #[test]
    fn rejects_symbols_outside_declared_alphabet() {
        let alphabet = Alphabet::from_text("acgt");
        let error = GeneralizedText::build(&["acgt", "acgn"], Some(&alphabet)).unwrap_err();
        assert_eq!(
            error,
            TextError::InvalidSymbol {
                sequence: 1,
                position: 3,
                symbol: 'n',
            }
        );
    }

    #[test]
    fn derived_alphabet_accepts_everything_seen() {
        let text = GeneralizedText::build(&["xyzzy"], None).unwrap();
        assert_eq!(text.natural_alphabet().symbols().len(), 3);
    }

    #[test]
    fn empty_input_list_yields_empty_text() {
        let text = GeneralizedText::build::<&str>(&[], None).unwrap();
        assert!(text.is_empty());
        assert_eq!(text.sequence_count(), 0);
    }

    #[test]
    fn empty_sequence_contributes_only_its_terminator() {
        let text = GeneralizedText::build(&["", "a"], None).unwrap();
        assert_eq!(text.len(), 3);
        assert_eq!(text.sequence_len(0), 0);
        assert_eq!(text.locate(0), SeqPosition { sequence: 0, offset: 0 });
        assert_eq!(text.locate(1), SeqPosition { sequence: 1, offset: 0 });
    }
}
