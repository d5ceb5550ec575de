//! `Certifier`: administers registrants and schema documents.

use std::sync::Arc;

use alloy_primitives::{Address, Bytes};
use tracing::{debug, info};

use openreg_core::{CallOptions, EntityId, RegistrarLedger, ThingError};
use openreg_schema::{check_definition, DocumentCodec, RegistrantProfile, SchemaDocument};

use crate::config::ClientConfig;

/// Client for the registrar and registry administration contracts.
pub struct Certifier {
    registrar: Arc<dyn RegistrarLedger>,
    documents: DocumentCodec,
    options: CallOptions,
}

impl Certifier {
    /// Compiles the built-in document schemas; fails only if they do not compile.
    pub fn new(registrar: Arc<dyn RegistrarLedger>, config: &ClientConfig) -> Result<Self, ThingError> {
        let documents =
            DocumentCodec::compile().map_err(|e| ThingError::lookup("built-in documents", e.to_string()))?;
        Ok(Self {
            registrar,
            documents,
            options: config.call_options(),
        })
    }

    pub fn documents(&self) -> &DocumentCodec {
        &self.documents
    }

    /// Register `registrant` with its organization profile.
    pub async fn add_registrant(
        &self,
        registrant: Address,
        profile: &RegistrantProfile,
    ) -> Result<EntityId, ThingError> {
        let data = Bytes::from(self.documents.encode_registrant(profile)?);
        let tx = self
            .registrar
            .add(registrant, data, &self.options)
            .await
            .inspect_err(|e| debug!(%registrant, error = %e, "add failed"))?;
        info!(%registrant, %tx, "registrant added");
        Ok(tx)
    }

    /// Replace a registrant's profile and set whether it is active.
    pub async fn edit_registrant(
        &self,
        registrant: Address,
        profile: &RegistrantProfile,
        active: bool,
    ) -> Result<EntityId, ThingError> {
        let data = Bytes::from(self.documents.encode_registrant(profile)?);
        let tx = self
            .registrar
            .edit(registrant, data, active, &self.options)
            .await
            .inspect_err(|e| debug!(%registrant, error = %e, "edit failed"))?;
        info!(%registrant, active, %tx, "registrant edited");
        Ok(tx)
    }

    /// Point the registry at `registrar`.
    pub async fn set_registrar(&self, registrar: Address) -> Result<EntityId, ThingError> {
        let tx = self
            .registrar
            .configure(registrar, &self.options)
            .await
            .inspect_err(|e| debug!(%registrar, error = %e, "configure failed"))?;
        info!(%registrar, %tx, "registrar configured");
        Ok(tx)
    }

    /// Publish a schema document. The definition must compile.
    pub async fn create_schema(&self, document: &SchemaDocument) -> Result<EntityId, ThingError> {
        if let Some(definition) = &document.definition {
            check_definition(definition).map_err(|e| ThingError::encoding(e.to_string()))?;
        }
        let data = Bytes::from(self.documents.encode_schema(document)?);
        let tx = self
            .registrar
            .create_schema(data, &self.options)
            .await
            .inspect_err(|e| debug!(error = %e, "createSchema failed"))?;
        info!(name = document.name.as_deref().unwrap_or_default(), %tx, "schema published");
        Ok(tx)
    }
}
