//! Lookup references: the keys under which the ledger indexes a thing in
//! addition to its own entity identifier.
//!
//! A multi-identity thing is indexed once per identity, and each reference is
//! the identity's raw public key, byte for byte. Keys are not hashed, so a
//! reference is exactly as long as the key it comes from.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::Bytes;
use serde::{Deserialize, Serialize};

use crate::chunk::WORD_SIZE;
use crate::error::ChunkError;
use crate::record::{BatchEntry, Thing};

/// An opaque lookup token understood by the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reference(Bytes);

impl Reference {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// The placeholder passed when no identity-keyed index is wanted.
    /// The ledger accepts any value here; a zero word is used.
    pub fn unconstrained() -> Self {
        Self(Bytes::from(vec![0u8; WORD_SIZE]))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_unconstrained(&self) -> bool {
        self.0.len() == WORD_SIZE && self.0.iter().all(|b| *b == 0)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

impl FromStr for Reference {
    type Err = ChunkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        hex::decode(digits)
            .map(|b| Self(Bytes::from(b)))
            .map_err(|e| ChunkError::InvalidHex {
                reason: format!("'{s}': {e}"),
            })
    }
}

impl From<Vec<u8>> for Reference {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Bytes::from(bytes))
    }
}

impl From<&[u8]> for Reference {
    fn from(bytes: &[u8]) -> Self {
        Self(Bytes::copy_from_slice(bytes))
    }
}

/// Stateless derivation of the references passed to the ledger's create calls.
pub struct ReferenceResolver;

impl ReferenceResolver {
    /// Reference for a thing carrying a single identity.
    pub fn for_single(_thing: &Thing) -> Reference {
        Reference::unconstrained()
    }

    /// One reference per identity, equal to its raw public key, in identity order.
    pub fn for_multiple(thing: &Thing) -> Vec<Reference> {
        thing
            .identities
            .iter()
            .map(|id| Reference(id.pub_key.clone()))
            .collect()
    }

    /// The caller-supplied references of a batch, unchanged and in input order.
    pub fn for_batch(entries: &[BatchEntry]) -> Vec<Reference> {
        entries.iter().map(|e| e.reference.clone()).collect()
    }

    /// Pick the single- or multi-identity path by identity count.
    pub fn for_thing(thing: &Thing) -> Vec<Reference> {
        if thing.is_multi_identity() {
            Self::for_multiple(thing)
        } else {
            vec![Self::for_single(thing)]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Identity;

    fn thing(keys: &[&[u8]]) -> Thing {
        Thing::new(
            keys.iter()
                .map(|k| Identity::new(k.to_vec(), "urn:test"))
                .collect(),
        )
    }

    #[test]
    fn single_identity_gets_unconstrained_reference() {
        let refs = ReferenceResolver::for_thing(&thing(&[&[0xaa, 0xbb]]));
        assert_eq!(refs.len(), 1);
        assert!(refs[0].is_unconstrained());
    }

    #[test]
    fn multiple_identities_map_to_raw_keys_in_order() {
        let a = [0x12u8; 32];
        let b = [0x34u8; 32];
        let refs = ReferenceResolver::for_thing(&thing(&[&a, &b]));
        assert_eq!(refs, vec![Reference::from(&a[..]), Reference::from(&b[..])]);
    }

    #[test]
    fn batch_references_pass_through() {
        let t = thing(&[&[0xaa]]);
        let entries = vec![
            BatchEntry::new(t.clone(), "0x1234".parse().unwrap()),
            BatchEntry::new(t, "0x3456".parse().unwrap()),
        ];
        let refs: Vec<String> = ReferenceResolver::for_batch(&entries)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(refs, vec!["0x1234", "0x3456"]);
    }

    #[test]
    fn parse_rejects_bad_hex() {
        assert!("0xnothex".parse::<Reference>().is_err());
    }
}
