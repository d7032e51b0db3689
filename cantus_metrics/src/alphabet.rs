// Symbol encoding: mapping raw tokens onto a compact integer alphabet.
//
// The encoder assigns codes in first-seen order: the first distinct token
// gets code 0, the next new token code 1, and so on. Two runs over the same
// sequence always produce identical codes, which is what makes downstream
// binary projections (and therefore complexity values) reproducible.
//
// Each analysis owns its own `Alphabet`; nothing is shared or memoized
// across analyses.

use rustc_hash::FxHashMap;
use std::hash::Hash;

/// Bidirectional token ↔ code mapping observed in one sequence.
///
/// `q = size()` is the alphabet size; an empty sequence yields an empty
/// alphabet with `q = 0`, which callers treat as "no information" rather
/// than an error.
#[derive(Debug, Clone)]
pub struct Alphabet<T> {
    codes: FxHashMap<T, u32>,
    tokens: Vec<T>,
}

impl<T: Eq + Hash + Clone> Alphabet<T> {
    /// Encode a sequence, returning the integer codes and the alphabet that
    /// produced them. Pure function of the input.
    pub fn encode(sequence: &[T]) -> (Vec<u32>, Self) {
        let mut alphabet = Alphabet {
            codes: FxHashMap::default(),
            tokens: Vec::new(),
        };
        let mut encoded = Vec::with_capacity(sequence.len());
        for token in sequence {
            let next_code = alphabet.tokens.len() as u32;
            let code = *alphabet.codes.entry(token.clone()).or_insert(next_code);
            if code == next_code {
                alphabet.tokens.push(token.clone());
            }
            encoded.push(code);
        }
        (encoded, alphabet)
    }

    /// Number of distinct tokens observed.
    pub fn size(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Code assigned to a token, if it was observed.
    pub fn code_of(&self, token: &T) -> Option<u32> {
        self.codes.get(token).copied()
    }

    /// Token behind a code, if the code is in range.
    pub fn token_of(&self, code: u32) -> Option<&T> {
        self.tokens.get(code as usize)
    }

    /// Distinct tokens in first-seen order.
    pub fn tokens(&self) -> &[T] {
        &self.tokens
    }

    /// Map codes back to tokens. Returns `None` if any code is out of
    /// range for this alphabet.
    pub fn decode(&self, codes: &[u32]) -> Option<Vec<T>> {
        codes
            .iter()
            .map(|&code| self.token_of(code).cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_seen_code_assignment() {
        let sequence = ["b", "a", "b", "c", "a"];
        let (encoded, alphabet) = Alphabet::encode(&sequence);
        assert_eq!(encoded, vec![0, 1, 0, 2, 1]);
        assert_eq!(alphabet.size(), 3);
        assert_eq!(alphabet.code_of(&"b"), Some(0));
        assert_eq!(alphabet.code_of(&"a"), Some(1));
        assert_eq!(alphabet.code_of(&"c"), Some(2));
        assert_eq!(alphabet.token_of(1), Some(&"a"));
    }

    #[test]
    fn test_encode_is_deterministic() {
        let sequence = [5, 3, 5, 9, 3, 5];
        let (first, _) = Alphabet::encode(&sequence);
        let (second, _) = Alphabet::encode(&sequence);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_sequence_yields_empty_alphabet() {
        let (encoded, alphabet) = Alphabet::<u32>::encode(&[]);
        assert!(encoded.is_empty());
        assert_eq!(alphabet.size(), 0);
        assert!(alphabet.is_empty());
    }

    #[test]
    fn test_decode_round_trip() {
        let sequence = [60, 60, 62, 64, 62, 60];
        let (encoded, alphabet) = Alphabet::encode(&sequence);
        let decoded = alphabet.decode(&encoded).unwrap();
        assert_eq!(decoded, sequence.to_vec());
    }

    #[test]
    fn test_decode_rejects_out_of_range_code() {
        let (_, alphabet) = Alphabet::encode(&[1, 2, 3]);
        assert_eq!(alphabet.decode(&[0, 7]), None);
    }
}
