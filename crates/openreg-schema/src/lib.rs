//! # openreg-schema
//!
//! Runtime protobuf schemas for OpenRegistry.
//!
//! Thing schemas are stored on the ledger as `.proto` text. This crate
//! compiles that text on demand ([`SchemaDescriptor`]), fetches it through a
//! [`Ledger`](openreg_core::Ledger) ([`SchemaRegistry`]) and encodes or
//! decodes things against it ([`RecordCodec`]).
//!
//! The registrant profile and schema document formats used by certifiers are
//! built in ([`DocumentCodec`]).

pub mod codec;
pub mod descriptor;
pub mod document;
pub mod registry;

pub use codec::{strip_padding, RecordCodec};
pub use descriptor::{check_definition, SchemaDescriptor, SchemaError};
pub use document::{DocumentCodec, RegistrantProfile, SchemaDocument, THING_PROTO};
pub use registry::{compile_for, SchemaRegistry};
