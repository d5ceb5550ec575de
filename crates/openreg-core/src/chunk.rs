//! Word chunking: the bridge between variable-length payloads and the
//! ledger's fixed 32-byte storage slots.
//!
//! `slice` cuts a payload into consecutive words, zero-padding the last one.
//! `merge` concatenates words back in order and keeps that padding; stripping
//! it is left to whoever knows the payload's grammar (see `openreg-schema`).
//!
//! ```ignore
//! let chunks = slice(&[0xaa; 40]);
//! assert_eq!(chunks.len(), 2);
//! assert_eq!(merge(chunks.words()).len(), 64);
//! ```

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

use crate::error::ChunkError;

/// Width of one ledger storage slot in bytes.
pub const WORD_SIZE: usize = 32;

/// One ledger storage slot. Displays and parses as `0x` + 64 hex digits.
pub type Word = B256;

/// An ordered run of words holding one serialized payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChunkSequence(Vec<Word>);

impl ChunkSequence {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn words(&self) -> &[Word] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append all words of `other`, keeping their order.
    pub fn extend_from(&mut self, other: &ChunkSequence) {
        self.0.extend_from_slice(&other.0);
    }

    /// Render every word as `0x`-prefixed hex, the form the ledger speaks.
    pub fn to_hex(&self) -> Vec<String> {
        self.0.iter().map(word_to_hex).collect()
    }

    pub fn into_inner(self) -> Vec<Word> {
        self.0
    }
}

impl From<Vec<Word>> for ChunkSequence {
    fn from(words: Vec<Word>) -> Self {
        Self(words)
    }
}

impl FromIterator<Word> for ChunkSequence {
    fn from_iter<I: IntoIterator<Item = Word>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ChunkSequence {
    type Item = Word;
    type IntoIter = std::vec::IntoIter<Word>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ChunkSequence {
    type Item = &'a Word;
    type IntoIter = std::slice::Iter<'a, Word>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Split `data` into 32-byte words, right-padding the final word with zeros.
///
/// Empty input yields an empty sequence.
pub fn slice(data: &[u8]) -> ChunkSequence {
    data.chunks(WORD_SIZE)
        .map(|window| {
            let mut word = [0u8; WORD_SIZE];
            word[..window.len()].copy_from_slice(window);
            Word::from(word)
        })
        .collect()
}

/// [`slice`] for `0x`-prefixed (or bare) hex text.
pub fn slice_hex(data: &str) -> Result<ChunkSequence, ChunkError> {
    Ok(slice(&decode_hex(data)?))
}

/// Concatenate words in order. The output length is always a multiple of 32.
pub fn merge(words: &[Word]) -> Vec<u8> {
    let mut out = Vec::with_capacity(words.len() * WORD_SIZE);
    for word in words {
        out.extend_from_slice(word.as_slice());
    }
    out
}

/// [`merge`] for hex-encoded words as returned by the ledger.
///
/// Every element must decode to exactly one word.
pub fn merge_hex<S: AsRef<str>>(words: &[S]) -> Result<Vec<u8>, ChunkError> {
    let mut out = Vec::with_capacity(words.len() * WORD_SIZE);
    for (index, word) in words.iter().enumerate() {
        let bytes = decode_hex(word.as_ref())?;
        if bytes.len() != WORD_SIZE {
            return Err(ChunkError::WordSize {
                index,
                len: bytes.len(),
            });
        }
        out.extend_from_slice(&bytes);
    }
    Ok(out)
}

/// Parse a single `0x`-prefixed word.
pub fn parse_word(s: &str) -> Result<Word, ChunkError> {
    let bytes = decode_hex(s)?;
    if bytes.len() != WORD_SIZE {
        return Err(ChunkError::WordSize {
            index: 0,
            len: bytes.len(),
        });
    }
    Ok(Word::from_slice(&bytes))
}

pub fn word_to_hex(word: &Word) -> String {
    format!("0x{}", hex::encode(word.as_slice()))
}

fn decode_hex(s: &str) -> Result<Vec<u8>, ChunkError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(digits).map_err(|e| ChunkError::InvalidHex {
        reason: format!("'{s}': {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SLICE1: &str = "0x1234000000000000000000000000000000000000000000000000000000004321";
    const SLICE2: &str = "0x5678000000000000000000000000000000000000000000000000000000004321";
    const TOTAL: &str = "0x12340000000000000000000000000000000000000000000000000000000043215678000000000000000000000000000000000000000000000000000000004321";

    #[test]
    fn slices_into_words_in_order() {
        let chunks = slice_hex(TOTAL).unwrap();
        assert_eq!(chunks.to_hex(), vec![SLICE1.to_string(), SLICE2.to_string()]);
    }

    #[test]
    fn merges_words_back_together() {
        let merged = merge_hex(&[SLICE1, SLICE2]).unwrap();
        assert_eq!(format!("0x{}", hex::encode(merged)), TOTAL);
    }

    #[test]
    fn pads_short_final_word() {
        let chunks = slice(&hex::decode("0a0e0a02aabb120875726e3a74657374").unwrap());
        assert_eq!(chunks.len(), 1);
        assert_eq!(
            word_to_hex(&chunks.words()[0]),
            "0x0a0e0a02aabb120875726e3a7465737400000000000000000000000000000000"
        );
    }

    #[test]
    fn empty_input_yields_no_words() {
        assert!(slice(&[]).is_empty());
        assert!(slice_hex("0x").unwrap().is_empty());
        assert!(merge(&[]).is_empty());
    }

    #[test]
    fn rejects_invalid_hex() {
        assert!(matches!(
            slice_hex("0xzz"),
            Err(ChunkError::InvalidHex { .. })
        ));
        assert!(matches!(slice_hex("0x123"), Err(ChunkError::InvalidHex { .. })));
    }

    #[test]
    fn rejects_mis_sized_words() {
        let err = merge_hex(&[SLICE1, "0x1234"]).unwrap_err();
        assert_eq!(err, ChunkError::WordSize { index: 1, len: 2 });
        assert!(parse_word("0x00").is_err());
    }

    #[test]
    fn parse_word_round_trips_display() {
        let word = parse_word(SLICE1).unwrap();
        assert_eq!(word_to_hex(&word), SLICE1);
    }

    #[test]
    fn serializes_as_hex_array() {
        let chunks = slice_hex(TOTAL).unwrap();
        let json = serde_json::to_value(&chunks).unwrap();
        assert_eq!(json, serde_json::json!([SLICE1, SLICE2]));
        let back: ChunkSequence = serde_json::from_value(json).unwrap();
        assert_eq!(back, chunks);
    }

    proptest! {
        #[test]
        fn merge_inverts_slice_on_word_multiples(words in 1usize..8, seed in any::<u8>()) {
            let data: Vec<u8> = (0..words * WORD_SIZE).map(|i| (i as u8).wrapping_mul(31) ^ seed).collect();
            prop_assert_eq!(merge(slice(&data).words()), data);
        }

        #[test]
        fn slice_pads_to_word_count(data in proptest::collection::vec(any::<u8>(), 1..200)) {
            let chunks = slice(&data);
            prop_assert_eq!(chunks.len(), data.len().div_ceil(WORD_SIZE));
            let merged = merge(chunks.words());
            prop_assert_eq!(&merged[..data.len()], &data[..]);
            prop_assert!(merged[data.len()..].iter().all(|b| *b == 0));
        }
    }
}
