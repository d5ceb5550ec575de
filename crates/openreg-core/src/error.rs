//! Error types for the OpenRegistry client pipeline.

use thiserror::Error;

/// Errors raised by the word chunking codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkError {
    #[error("Invalid hex input: {reason}")]
    InvalidHex { reason: String },

    #[error("Word {index} is {len} bytes wide, expected 32")]
    WordSize { index: usize, len: usize },
}

/// Errors reported by a ledger binding.
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    /// The call reached the ledger and was rejected by it.
    #[error("Ledger call `{method}` reverted: {reason}")]
    Reverted { method: String, reason: String },

    /// No record is stored under the given lookup key.
    #[error("No thing found for key {key}")]
    NotFound { key: String },

    /// The ledger could not be reached or returned an unreadable response.
    #[error("Ledger call `{method}` failed: {reason}")]
    Call { method: String, reason: String },

    #[error("{0}")]
    Other(String),
}

impl LedgerError {
    /// Returns `true` if the ledger itself rejected the call.
    pub fn is_reverted(&self) -> bool {
        matches!(self, Self::Reverted { .. })
    }

    /// Returns `true` if the lookup key resolved to nothing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors surfaced by every public create / read operation.
#[derive(Debug, Error)]
pub enum ThingError {
    #[error("Malformed input: {0}")]
    MalformedInput(#[from] ChunkError),

    #[error("Schema lookup failed for {reference}: {reason}")]
    LookupFailure { reference: String, reason: String },

    #[error("Encoding failed: {reason}")]
    EncodingFailure { reason: String },

    #[error("Decoding failed: {reason}")]
    DecodingFailure { reason: String },

    #[error("Ledger call failed: {0}")]
    LedgerCall(#[from] LedgerError),
}

impl ThingError {
    pub fn encoding(reason: impl Into<String>) -> Self {
        Self::EncodingFailure { reason: reason.into() }
    }

    pub fn decoding(reason: impl Into<String>) -> Self {
        Self::DecodingFailure { reason: reason.into() }
    }

    pub fn lookup(reference: impl ToString, reason: impl Into<String>) -> Self {
        Self::LookupFailure {
            reference: reference.to_string(),
            reason: reason.into(),
        }
    }
}
