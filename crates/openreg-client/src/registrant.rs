//! `Registrant`: creates and reads things on the ledger.
//!
//! Each operation is one request/response cycle: resolve the schema, encode,
//! cut into words, derive references, call the ledger. Nothing is cached and
//! nothing is retried; errors reach the caller as they happened.

use std::sync::Arc;

use tracing::{debug, info};

use openreg_core::{
    chunk, BatchEntry, CallOptions, ChunkSequence, EntityId, Ledger, Reference,
    ReferenceResolver, SchemaSelector, Thing, ThingError,
};
use openreg_schema::{compile_for, RecordCodec, SchemaRegistry};

use crate::config::ClientConfig;

/// A thing read back from the ledger together with its active flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThingRecord {
    pub thing: Thing,
    pub active: bool,
}

/// Client for the thing registry contract.
#[derive(Clone)]
pub struct Registrant {
    ledger: Arc<dyn Ledger>,
    registry: SchemaRegistry,
    schema: SchemaSelector,
    options: CallOptions,
}

impl Registrant {
    pub fn new(ledger: Arc<dyn Ledger>, config: &ClientConfig) -> Self {
        Self::with_options(ledger, config.schema.clone(), config.call_options())
    }

    pub fn with_options(ledger: Arc<dyn Ledger>, schema: SchemaSelector, options: CallOptions) -> Self {
        Self {
            registry: SchemaRegistry::new(ledger.clone()),
            ledger,
            schema,
            options,
        }
    }

    /// Selector of the schema new things are written with.
    pub fn schema(&self) -> &SchemaSelector {
        &self.schema
    }

    pub fn options(&self) -> &CallOptions {
        &self.options
    }

    /// Store `thing` and return the ledger-assigned id.
    ///
    /// A thing with several identities is indexed under each identity's raw
    /// public key; a single-identity thing gets an unconstrained reference.
    pub async fn create_thing(&self, thing: &Thing) -> Result<EntityId, ThingError> {
        let descriptor = self.registry.resolve(&self.schema).await?;
        let bytes = RecordCodec::encode(thing, &descriptor)?;
        let chunks = chunk::slice(&bytes);
        let references = ReferenceResolver::for_thing(thing);

        debug!(
            schema = %self.schema,
            identities = thing.identities.len(),
            words = chunks.len(),
            references = references.len(),
            "creating thing"
        );
        let id = self
            .ledger
            .create(&self.schema, &chunks, &references, &self.options)
            .await
            .inspect_err(|e| debug!(error = %e, "create failed"))?;
        info!(%id, "thing created");
        Ok(id)
    }

    /// Read the thing stored under `key` (an identity key or explicit reference).
    ///
    /// The schema text comes back with the words, so it is compiled directly
    /// instead of going through the registry.
    pub async fn get_thing(&self, key: &Reference) -> Result<ThingRecord, ThingError> {
        let stored = self
            .ledger
            .get_thing(key)
            .await
            .inspect_err(|e| debug!(%key, error = %e, "getThing failed"))?;
        let descriptor = compile_for(key, &stored.schema)?;
        let bytes = chunk::merge(stored.chunks.words());
        let thing = RecordCodec::decode(&bytes, &descriptor)?;
        debug!(%key, words = stored.chunks.len(), active = stored.active, "thing read");
        Ok(ThingRecord {
            thing,
            active: stored.active,
        })
    }

    /// Store every entry in one ledger call. Ids come back in input order.
    ///
    /// All entries are encoded before the ledger is called; one bad entry
    /// aborts the whole batch and nothing is submitted.
    pub async fn create_many(&self, entries: &[BatchEntry]) -> Result<Vec<EntityId>, ThingError> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }
        let descriptor = self.registry.resolve(&self.schema).await?;

        let mut chunk_counts = Vec::with_capacity(entries.len());
        let mut chunks = ChunkSequence::new();
        for (index, entry) in entries.iter().enumerate() {
            let bytes = RecordCodec::encode(&entry.thing, &descriptor).map_err(|e| match e {
                ThingError::EncodingFailure { reason } => ThingError::EncodingFailure {
                    reason: format!("entry {index}: {reason}"),
                },
                other => other,
            })?;
            let words = chunk::slice(&bytes);
            chunk_counts.push(words.len());
            chunks.extend_from(&words);
        }
        let references = ReferenceResolver::for_batch(entries);

        debug!(
            schema = %self.schema,
            entries = entries.len(),
            words = chunks.len(),
            "creating things in batch"
        );
        let ids = self
            .ledger
            .create_many(&self.schema, &chunk_counts, &chunks, &references, &self.options)
            .await
            .inspect_err(|e| debug!(error = %e, "createMany failed"))?;
        info!(count = ids.len(), "things created");
        Ok(ids)
    }
}
