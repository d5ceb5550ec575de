//! Small value types exchanged with the ledger.

use std::fmt;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::chunk::ChunkSequence;

/// Identifier the ledger assigns to a created thing (or transaction).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<u64> for EntityId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

/// Key of a schema registered on the ledger, e.g. a schema index or URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaSelector(String);

impl SchemaSelector {
    pub fn new(selector: impl Into<String>) -> Self {
        Self(selector.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SchemaSelector {
    fn default() -> Self {
        Self("0".into())
    }
}

impl fmt::Display for SchemaSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SchemaSelector {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<u64> for SchemaSelector {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

/// Sender and resource budget attached to every state-changing ledger call.
///
/// Completion is signalled by the returned future; there is no callback slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallOptions {
    /// Account the call is sent from.
    pub from: Address,
    /// Gas budget for the call.
    pub gas: u64,
}

impl CallOptions {
    pub const DEFAULT_GAS: u64 = 2_000_000;

    pub fn new(from: Address) -> Self {
        Self {
            from,
            gas: Self::DEFAULT_GAS,
        }
    }

    pub fn with_gas(mut self, gas: u64) -> Self {
        self.gas = gas;
        self
    }
}

impl Default for CallOptions {
    fn default() -> Self {
        Self::new(Address::ZERO)
    }
}

/// What the ledger returns for a lookup: the schema text the thing was
/// written with, its words and whether it is still active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredThing {
    pub schema: String,
    pub chunks: ChunkSequence,
    pub active: bool,
}
