//! # openreg-client
//!
//! SDK for storing identity records on a word-oriented ledger.
//!
//! - [`Registrant`]: `create_thing`, `get_thing`, `create_many`
//! - [`Certifier`]: registrant profiles, registrar configuration, schema publishing
//! - [`ClientConfig`]: sender, gas budget, default schema and logging
//!
//! The ledger itself is supplied by the caller as an
//! `Arc<dyn Ledger>` / `Arc<dyn RegistrarLedger>`.
//!
//! ```rust,ignore
//! let registrant = Registrant::new(ledger, &ClientConfig::for_sender(sender));
//! let id = registrant.create_thing(&thing).await?;
//! let record = registrant.get_thing(&key).await?;
//! ```

pub mod certifier;
pub mod config;
pub mod registrant;
pub mod telemetry;

pub use certifier::Certifier;
pub use config::{ClientConfig, ConfigError};
pub use registrant::{Registrant, ThingRecord};
pub use telemetry::{init_tracing, LogConfig, LogFormat};

pub use openreg_core::{
    BatchEntry, CallOptions, EntityId, Identity, Ledger, LedgerError, Payload, Reference,
    RegistrarLedger, SchemaSelector, Thing, ThingError,
};
pub use openreg_schema::{RegistrantProfile, SchemaDocument};
