//! Built-in documents handled by certifiers: organization profiles and
//! schema definitions.
//!
//! Unlike thing schemas these formats ship with the crate, so their field
//! names are fixed. They are still compiled at runtime through
//! [`DocumentCodec::compile`].

use prost::Message;
use prost_reflect::{DynamicMessage, MessageDescriptor, ReflectMessage, Value};
use serde::{Deserialize, Serialize};

use openreg_core::ThingError;

use crate::descriptor::{compile_pool, SchemaError};

pub const THING_PROTO: &str = include_str!("../proto/thing.proto");
pub const REGISTRANT_PROTO: &str = include_str!("../proto/registrant.proto");
pub const SCHEMA_PROTO: &str = include_str!("../proto/schema.proto");

/// Public profile of an organization acting as registrant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrantProfile {
    pub name: Option<String>,
    pub description: Option<String>,
    pub contact: Option<String>,
    pub website: Option<String>,
    pub legal_name: Option<String>,
    pub legal_address: Option<String>,
}

/// A schema definition as published to the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDocument {
    pub name: Option<String>,
    pub description: Option<String>,
    /// `.proto` source of the schema.
    pub definition: Option<String>,
}

/// Encoder / decoder for the built-in document formats.
#[derive(Debug, Clone)]
pub struct DocumentCodec {
    registrant: MessageDescriptor,
    schema: MessageDescriptor,
}

impl DocumentCodec {
    pub fn compile() -> Result<Self, SchemaError> {
        Ok(Self {
            registrant: load("registrant.proto", REGISTRANT_PROTO, "Registrant")?,
            schema: load("schema.proto", SCHEMA_PROTO, "Schema")?,
        })
    }

    pub fn encode_registrant(&self, profile: &RegistrantProfile) -> Result<Vec<u8>, ThingError> {
        encode_strings(
            &self.registrant,
            &[
                ("name", &profile.name),
                ("description", &profile.description),
                ("contact", &profile.contact),
                ("website", &profile.website),
                ("legalName", &profile.legal_name),
                ("legalAddress", &profile.legal_address),
            ],
        )
    }

    pub fn decode_registrant(&self, bytes: &[u8]) -> Result<RegistrantProfile, ThingError> {
        let msg = decode(&self.registrant, bytes)?;
        Ok(RegistrantProfile {
            name: read(&msg, "name"),
            description: read(&msg, "description"),
            contact: read(&msg, "contact"),
            website: read(&msg, "website"),
            legal_name: read(&msg, "legalName"),
            legal_address: read(&msg, "legalAddress"),
        })
    }

    pub fn encode_schema(&self, document: &SchemaDocument) -> Result<Vec<u8>, ThingError> {
        encode_strings(
            &self.schema,
            &[
                ("name", &document.name),
                ("description", &document.description),
                ("definition", &document.definition),
            ],
        )
    }

    pub fn decode_schema(&self, bytes: &[u8]) -> Result<SchemaDocument, ThingError> {
        let msg = decode(&self.schema, bytes)?;
        Ok(SchemaDocument {
            name: read(&msg, "name"),
            description: read(&msg, "description"),
            definition: read(&msg, "definition"),
        })
    }
}

fn load(file: &str, text: &str, message: &str) -> Result<MessageDescriptor, SchemaError> {
    compile_pool(file, text)?
        .get_message_by_name(message)
        .ok_or_else(|| SchemaError::MissingMessage {
            name: message.to_string(),
        })
}

fn encode_strings(
    desc: &MessageDescriptor,
    fields: &[(&str, &Option<String>)],
) -> Result<Vec<u8>, ThingError> {
    let mut msg = DynamicMessage::new(desc.clone());
    for (name, value) in fields {
        let Some(value) = value else { continue };
        let field = desc.get_field_by_name(name).ok_or_else(|| {
            ThingError::encoding(format!("'{}' has no field '{name}'", desc.name()))
        })?;
        msg.set_field(&field, Value::String(value.clone()));
    }
    Ok(msg.encode_to_vec())
}

fn decode(desc: &MessageDescriptor, bytes: &[u8]) -> Result<DynamicMessage, ThingError> {
    DynamicMessage::decode(desc.clone(), bytes)
        .map_err(|e| ThingError::decoding(format!("'{}': {e}", desc.name())))
}

fn read(msg: &DynamicMessage, name: &str) -> Option<String> {
    let field = msg.descriptor().get_field_by_name(name)?;
    if !msg.has_field(&field) {
        return None;
    }
    msg.get_field(&field).as_str().map(str::to_string)
}
