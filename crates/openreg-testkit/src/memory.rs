//! In-memory ledger that stores things and records every call it receives.
//!
//! Thread-safe via `Arc<RwLock<Inner>>`; clones share state, so a test can
//! hand one clone to the client and inspect the other.
//!
//! Entity ids are 32-byte words (`0x` + 64 hex digits) numbered from 1, and
//! every stored thing is also indexed under its own id. A thing created with
//! only the unconstrained reference is therefore still readable through
//! `get_thing(&id.as_str().parse()?)`.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;

use openreg_core::{
    CallOptions, ChunkSequence, EntityId, Ledger, LedgerError, Reference, RegistrarLedger,
    SchemaSelector, StoredThing,
};

/// One call received by a [`MemoryLedger`], with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCall {
    Schema(SchemaSelector),
    GetThing(Reference),
    Create {
        schema: SchemaSelector,
        chunks: ChunkSequence,
        references: Vec<Reference>,
        options: CallOptions,
    },
    CreateMany {
        schema: SchemaSelector,
        chunk_counts: Vec<usize>,
        chunks: ChunkSequence,
        references: Vec<Reference>,
        options: CallOptions,
    },
    Add {
        registrant: Address,
        data: Bytes,
        options: CallOptions,
    },
    Edit {
        registrant: Address,
        data: Bytes,
        active: bool,
        options: CallOptions,
    },
    Configure {
        registrar: Address,
        options: CallOptions,
    },
    CreateSchema {
        data: Bytes,
        options: CallOptions,
    },
}

impl LedgerCall {
    /// Contract method name of the call.
    pub fn method(&self) -> &'static str {
        match self {
            Self::Schema(_) => "schemas",
            Self::GetThing(_) => "getThing",
            Self::Create { .. } => "create",
            Self::CreateMany { .. } => "createMany",
            Self::Add { .. } => "add",
            Self::Edit { .. } => "edit",
            Self::Configure { .. } => "configure",
            Self::CreateSchema { .. } => "createSchema",
        }
    }
}

#[derive(Default)]
struct Inner {
    calls: Vec<LedgerCall>,
    schemas: HashMap<SchemaSelector, String>,
    things: Vec<StoredThing>,
    /// reference bytes → index into `things`
    by_reference: HashMap<Vec<u8>, usize>,
    /// method name → error returned instead of executing
    failures: HashMap<String, LedgerError>,
    registrants: HashMap<Address, (Bytes, bool)>,
    registrar: Option<Address>,
    schema_documents: Vec<Bytes>,
    transactions: u64,
}

impl Inner {
    fn check(&self, method: &str) -> Result<(), LedgerError> {
        match self.failures.get(method) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Append `thing`, index it under its entity id and return the index.
    fn push(&mut self, thing: StoredThing) -> usize {
        let index = self.things.len();
        self.things.push(thing);
        self.by_reference.insert(entity_word(index).to_vec(), index);
        index
    }

    fn store(&mut self, schema: &SchemaSelector, chunks: ChunkSequence, references: &[Reference]) -> EntityId {
        let thing = StoredThing {
            schema: self.schemas.get(schema).cloned().unwrap_or_default(),
            chunks,
            active: true,
        };
        let index = self.push(thing);
        for reference in references.iter().filter(|r| !r.is_unconstrained()) {
            self.by_reference.insert(reference.as_bytes().to_vec(), index);
        }
        MemoryLedger::entity_id(index)
    }

    fn next_tx(&mut self) -> EntityId {
        self.transactions += 1;
        EntityId::new(format!("0x{:064x}", self.transactions))
    }
}

/// Id word of the thing at `index`. Numbering starts at 1 so no id collides
/// with the all-zero unconstrained reference.
fn entity_word(index: usize) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&(index as u64 + 1).to_be_bytes());
    word
}

fn index_of(id: &EntityId) -> Option<usize> {
    let digits = id.as_str().strip_prefix("0x")?;
    let n = u64::from_str_radix(digits, 16).ok()?;
    usize::try_from(n.checked_sub(1)?).ok()
}

/// Thread-safe in-memory ledger.
#[derive(Clone, Default)]
pub struct MemoryLedger {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id assigned to the `index`-th thing stored (0-based).
    pub fn entity_id(index: usize) -> EntityId {
        EntityId::new(format!("0x{}", hex::encode(entity_word(index))))
    }

    /// Register schema text under `selector`.
    pub fn with_schema(self, selector: impl Into<SchemaSelector>, text: impl Into<String>) -> Self {
        self.inner
            .write()
            .unwrap()
            .schemas
            .insert(selector.into(), text.into());
        self
    }

    /// Seed a stored thing reachable under `key`, bypassing `create`.
    pub fn with_thing(self, key: Reference, thing: StoredThing) -> Self {
        {
            let mut inner = self.inner.write().unwrap();
            let index = inner.push(thing);
            inner.by_reference.insert(key.as_bytes().to_vec(), index);
        }
        self
    }

    /// Make every call to `method` fail with `error` until cleared.
    pub fn fail_on(&self, method: &str, error: LedgerError) {
        self.inner
            .write()
            .unwrap()
            .failures
            .insert(method.to_string(), error);
    }

    pub fn clear_failures(&self) {
        self.inner.write().unwrap().failures.clear();
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<LedgerCall> {
        self.inner.read().unwrap().calls.clone()
    }

    /// Calls received for one contract method.
    pub fn calls_to(&self, method: &str) -> Vec<LedgerCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.method() == method)
            .collect()
    }

    /// The thing stored under an entity id returned by `create` / `create_many`.
    pub fn stored(&self, id: &EntityId) -> Option<StoredThing> {
        let index = index_of(id)?;
        self.inner.read().unwrap().things.get(index).cloned()
    }

    /// Flip the active flag of a stored thing.
    pub fn set_active(&self, id: &EntityId, active: bool) -> bool {
        let Some(index) = index_of(id) else {
            return false;
        };
        match self.inner.write().unwrap().things.get_mut(index) {
            Some(thing) => {
                thing.active = active;
                true
            }
            None => false,
        }
    }

    pub fn registrant(&self, address: &Address) -> Option<(Bytes, bool)> {
        self.inner.read().unwrap().registrants.get(address).cloned()
    }

    pub fn registrar(&self) -> Option<Address> {
        self.inner.read().unwrap().registrar
    }

    pub fn schema_documents(&self) -> Vec<Bytes> {
        self.inner.read().unwrap().schema_documents.clone()
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn schema(&self, selector: &SchemaSelector) -> Result<String, LedgerError> {
        let mut inner = self.inner.write().unwrap();
        inner.calls.push(LedgerCall::Schema(selector.clone()));
        inner.check("schemas")?;
        inner
            .schemas
            .get(selector)
            .cloned()
            .ok_or_else(|| LedgerError::Reverted {
                method: "schemas".into(),
                reason: format!("no schema at {selector}"),
            })
    }

    async fn get_thing(&self, key: &Reference) -> Result<StoredThing, LedgerError> {
        let mut inner = self.inner.write().unwrap();
        inner.calls.push(LedgerCall::GetThing(key.clone()));
        inner.check("getThing")?;
        inner
            .by_reference
            .get(key.as_bytes())
            .and_then(|&i| inner.things.get(i))
            .cloned()
            .ok_or_else(|| LedgerError::NotFound {
                key: key.to_string(),
            })
    }

    async fn create(
        &self,
        schema: &SchemaSelector,
        chunks: &ChunkSequence,
        references: &[Reference],
        options: &CallOptions,
    ) -> Result<EntityId, LedgerError> {
        let mut inner = self.inner.write().unwrap();
        inner.calls.push(LedgerCall::Create {
            schema: schema.clone(),
            chunks: chunks.clone(),
            references: references.to_vec(),
            options: *options,
        });
        inner.check("create")?;
        Ok(inner.store(schema, chunks.clone(), references))
    }

    async fn create_many(
        &self,
        schema: &SchemaSelector,
        chunk_counts: &[usize],
        chunks: &ChunkSequence,
        references: &[Reference],
        options: &CallOptions,
    ) -> Result<Vec<EntityId>, LedgerError> {
        let mut inner = self.inner.write().unwrap();
        inner.calls.push(LedgerCall::CreateMany {
            schema: schema.clone(),
            chunk_counts: chunk_counts.to_vec(),
            chunks: chunks.clone(),
            references: references.to_vec(),
            options: *options,
        });
        inner.check("createMany")?;

        let total: usize = chunk_counts.iter().sum();
        if total != chunks.len() || chunk_counts.len() != references.len() {
            return Err(LedgerError::Reverted {
                method: "createMany".into(),
                reason: format!(
                    "{} counts / {} references for {} words",
                    chunk_counts.len(),
                    references.len(),
                    chunks.len()
                ),
            });
        }

        let mut ids = Vec::with_capacity(chunk_counts.len());
        let mut offset = 0;
        for (count, reference) in chunk_counts.iter().zip(references) {
            let entry: ChunkSequence = chunks.words()[offset..offset + count].to_vec().into();
            offset += count;
            ids.push(inner.store(schema, entry, std::slice::from_ref(reference)));
        }
        Ok(ids)
    }
}

#[async_trait]
impl RegistrarLedger for MemoryLedger {
    async fn add(
        &self,
        registrant: Address,
        data: Bytes,
        options: &CallOptions,
    ) -> Result<EntityId, LedgerError> {
        let mut inner = self.inner.write().unwrap();
        inner.calls.push(LedgerCall::Add {
            registrant,
            data: data.clone(),
            options: *options,
        });
        inner.check("add")?;
        inner.registrants.insert(registrant, (data, true));
        Ok(inner.next_tx())
    }

    async fn edit(
        &self,
        registrant: Address,
        data: Bytes,
        active: bool,
        options: &CallOptions,
    ) -> Result<EntityId, LedgerError> {
        let mut inner = self.inner.write().unwrap();
        inner.calls.push(LedgerCall::Edit {
            registrant,
            data: data.clone(),
            active,
            options: *options,
        });
        inner.check("edit")?;
        match inner.registrants.get_mut(&registrant) {
            Some(entry) => *entry = (data, active),
            None => {
                return Err(LedgerError::Reverted {
                    method: "edit".into(),
                    reason: format!("unknown registrant {registrant}"),
                })
            }
        }
        Ok(inner.next_tx())
    }

    async fn configure(
        &self,
        registrar: Address,
        options: &CallOptions,
    ) -> Result<EntityId, LedgerError> {
        let mut inner = self.inner.write().unwrap();
        inner.calls.push(LedgerCall::Configure {
            registrar,
            options: *options,
        });
        inner.check("configure")?;
        inner.registrar = Some(registrar);
        Ok(inner.next_tx())
    }

    async fn create_schema(
        &self,
        data: Bytes,
        options: &CallOptions,
    ) -> Result<EntityId, LedgerError> {
        let mut inner = self.inner.write().unwrap();
        inner.calls.push(LedgerCall::CreateSchema {
            data: data.clone(),
            options: *options,
        });
        inner.check("createSchema")?;
        inner.schema_documents.push(data);
        Ok(inner.next_tx())
    }
}
