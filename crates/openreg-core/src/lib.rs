//! # openreg-core
//!
//! Core types and pure transforms shared by every OpenRegistry crate.
//!
//! - [`chunk`]: splits payloads into 32-byte ledger words and joins them back
//! - [`record`]: the `Thing` record model (identities + optional payload)
//! - [`reference`]: lookup-key derivation for single, multi-identity and batch creation
//! - [`ledger`]: the async collaborator traits a ledger binding implements
//! - [`error`]: error taxonomy for the whole client

pub mod chunk;
pub mod error;
pub mod ledger;
pub mod record;
pub mod reference;
pub mod types;

pub use chunk::{merge, merge_hex, slice, slice_hex, ChunkSequence, Word, WORD_SIZE};
pub use error::{ChunkError, LedgerError, ThingError};
pub use ledger::{Ledger, RegistrarLedger};
pub use record::{BatchEntry, Identity, Payload, Thing};
pub use reference::{Reference, ReferenceResolver};
pub use types::{CallOptions, EntityId, SchemaSelector, StoredThing};
