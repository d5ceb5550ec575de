//! `SchemaRegistry`: resolves schema selectors to compiled descriptors by
//! asking the ledger for the schema text.
//!
//! Every call fetches and compiles again. Schemas live on the ledger and may
//! change between calls, so no compiled descriptor is kept around.

use std::fmt::Display;
use std::sync::Arc;

use tracing::debug;

use openreg_core::{Ledger, SchemaSelector, ThingError};

use crate::descriptor::SchemaDescriptor;

/// Fetch-and-compile front end over a [`Ledger`].
#[derive(Clone)]
pub struct SchemaRegistry {
    ledger: Arc<dyn Ledger>,
}

impl SchemaRegistry {
    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        Self { ledger }
    }

    /// Fetch the schema registered under `selector` and compile it.
    pub async fn resolve(&self, selector: &SchemaSelector) -> Result<SchemaDescriptor, ThingError> {
        let text = self.ledger.schema(selector).await.map_err(|e| {
            debug!(%selector, error = %e, "schema fetch failed");
            ThingError::lookup(selector, e.to_string())
        })?;
        compile_for(selector, &text)
    }
}

/// Compile schema text that arrived for `origin`, reporting failures as
/// lookup failures against it.
pub fn compile_for(origin: impl Display, text: &str) -> Result<SchemaDescriptor, ThingError> {
    SchemaDescriptor::compile(text).map_err(|e| {
        debug!(%origin, error = %e, "schema text rejected");
        ThingError::lookup(origin, e.to_string())
    })
}
