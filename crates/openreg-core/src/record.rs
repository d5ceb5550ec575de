//! The `Thing` record model.

use alloy_primitives::Bytes;
use serde::{Deserialize, Serialize};

use crate::reference::Reference;

/// One identity attached to a thing: a raw public key plus the label of the
/// identity scheme it belongs to (e.g. `urn:test`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub pub_key: Bytes,
    #[serde(default)]
    pub schema: String,
}

impl Identity {
    pub fn new(pub_key: impl Into<Bytes>, schema: impl Into<String>) -> Self {
        Self {
            pub_key: pub_key.into(),
            schema: schema.into(),
        }
    }
}

/// Optional descriptive data stored next to the identities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
}

/// A registrable thing: an ordered list of identities and an optional payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Thing {
    pub identities: Vec<Identity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Payload>,
}

impl Thing {
    pub fn new(identities: Vec<Identity>) -> Self {
        Self {
            identities,
            data: None,
        }
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.data = Some(payload);
        self
    }

    /// `true` when more than one identity should index this thing.
    pub fn is_multi_identity(&self) -> bool {
        self.identities.len() > 1
    }
}

/// One element of a batched creation: the thing plus the reference the
/// caller wants it stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub thing: Thing,
    pub reference: Reference,
}

impl BatchEntry {
    pub fn new(thing: Thing, reference: Reference) -> Self {
        Self { thing, reference }
    }
}
