//! Ledger collaborator traits.
//!
//! The client never talks to a node directly; a binding implements these
//! traits on top of whatever contract runtime it targets.
//!
//! # Thread Safety
//! Implementations must be `Send + Sync` and can be shared as `Arc<dyn Ledger>`.
//! Ordering of concurrent writes is the ledger's business.

use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;

use crate::chunk::ChunkSequence;
use crate::error::LedgerError;
use crate::reference::Reference;
use crate::types::{CallOptions, EntityId, SchemaSelector, StoredThing};

/// The thing registry contract.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Fetch the schema text registered under `selector`.
    async fn schema(&self, selector: &SchemaSelector) -> Result<String, LedgerError>;

    /// Look a thing up by reference or entity key.
    async fn get_thing(&self, key: &Reference) -> Result<StoredThing, LedgerError>;

    /// Store one thing and index it under `references`.
    async fn create(
        &self,
        schema: &SchemaSelector,
        chunks: &ChunkSequence,
        references: &[Reference],
        options: &CallOptions,
    ) -> Result<EntityId, LedgerError>;

    /// Store several things in one call. `chunk_counts[i]` words of `chunks`
    /// belong to entry `i`, which is indexed under `references[i]`.
    async fn create_many(
        &self,
        schema: &SchemaSelector,
        chunk_counts: &[usize],
        chunks: &ChunkSequence,
        references: &[Reference],
        options: &CallOptions,
    ) -> Result<Vec<EntityId>, LedgerError>;
}

/// The registrar and registry administration contracts used by certifiers.
#[async_trait]
pub trait RegistrarLedger: Send + Sync {
    /// Register an organization under `registrant` with its encoded profile.
    async fn add(
        &self,
        registrant: Address,
        data: Bytes,
        options: &CallOptions,
    ) -> Result<EntityId, LedgerError>;

    /// Replace a registrant's profile and set its active flag.
    async fn edit(
        &self,
        registrant: Address,
        data: Bytes,
        active: bool,
        options: &CallOptions,
    ) -> Result<EntityId, LedgerError>;

    /// Point the registry at a registrar contract.
    async fn configure(
        &self,
        registrar: Address,
        options: &CallOptions,
    ) -> Result<EntityId, LedgerError>;

    /// Publish an encoded schema document.
    async fn create_schema(
        &self,
        data: Bytes,
        options: &CallOptions,
    ) -> Result<EntityId, LedgerError>;
}
