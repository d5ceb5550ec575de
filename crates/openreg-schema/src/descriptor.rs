//! `SchemaDescriptor`: a protobuf schema compiled at runtime.
//!
//! Schema text arrives from the ledger as a `.proto` document, so nothing
//! about the wire layout is known at build time. `compile` runs the text
//! through `protox` and then binds the roles the record codec needs:
//!
//! - **container**: the message named `Thing`, or else the first message
//!   with a repeated message-typed field; only messages declared in the
//!   schema text itself are candidates, never imported ones
//! - **identities**: the container's first repeated message field
//! - **public key / label**: the identity message's first `bytes` field and
//!   first `string` field
//! - **payload**: the container's first singular message field; its first
//!   and second `string` fields are mime type and brand name
//!
//! "First" always means lowest field number.

use std::path::Path;

use prost_reflect::{DescriptorPool, FieldDescriptor, Kind, MessageDescriptor};
use protox::file::{ChainFileResolver, File, FileResolver, GoogleFileResolver};
use protox::Compiler;
use thiserror::Error;
use tracing::debug;

use openreg_core::{Thing, ThingError};

use crate::codec::RecordCodec;

/// Name the container message is expected to carry.
pub const THING_MESSAGE: &str = "Thing";

const SOURCE_NAME: &str = "ledger-schema.proto";

/// Errors from compiling schema text.
#[derive(Debug, Clone, Error)]
pub enum SchemaError {
    #[error("Schema does not compile: {reason}")]
    Compile { reason: String },

    #[error("Message '{name}' not found in schema")]
    MissingMessage { name: String },

    #[error("Schema layout unusable: {reason}")]
    Layout { reason: String },
}

/// A compiled thing schema: the descriptor pool plus the resolved field roles.
#[derive(Debug, Clone)]
pub struct SchemaDescriptor {
    pool: DescriptorPool,
    pub(crate) layout: ThingLayout,
}

impl SchemaDescriptor {
    /// Compile `.proto` schema text into a descriptor.
    pub fn compile(text: &str) -> Result<Self, SchemaError> {
        let pool = compile_pool(SOURCE_NAME, text)?;
        let layout = ThingLayout::bind(&pool)?;
        debug!(
            container = layout.message.full_name(),
            identity = layout.identity.message.full_name(),
            payload = layout.payload.is_some(),
            "compiled thing schema"
        );
        Ok(Self { pool, layout })
    }

    /// The underlying descriptor pool.
    pub fn pool(&self) -> &DescriptorPool {
        &self.pool
    }

    /// The container message everything is encoded as.
    pub fn container(&self) -> &MessageDescriptor {
        &self.layout.message
    }

    /// Whether the schema declares a payload field.
    pub fn has_payload(&self) -> bool {
        self.layout.payload.is_some()
    }

    pub fn encode(&self, thing: &Thing) -> Result<Vec<u8>, ThingError> {
        RecordCodec::encode(thing, self)
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<Thing, ThingError> {
        RecordCodec::decode(bytes, self)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct IdentityLayout {
    pub message: MessageDescriptor,
    pub pub_key: FieldDescriptor,
    pub schema: Option<FieldDescriptor>,
}

#[derive(Debug, Clone)]
pub(crate) struct PayloadLayout {
    pub field: FieldDescriptor,
    pub message: MessageDescriptor,
    pub mime_type: Option<FieldDescriptor>,
    pub brand_name: Option<FieldDescriptor>,
}

#[derive(Debug, Clone)]
pub(crate) struct ThingLayout {
    pub message: MessageDescriptor,
    pub identities: FieldDescriptor,
    pub identity: IdentityLayout,
    pub payload: Option<PayloadLayout>,
}

impl ThingLayout {
    fn bind(pool: &DescriptorPool) -> Result<Self, SchemaError> {
        // imported files (well-known types) never provide the container
        let own = || {
            pool.all_messages()
                .filter(|m| m.parent_file().name() == SOURCE_NAME)
        };
        let message = own()
            .find(|m| m.name() == THING_MESSAGE)
            .or_else(|| own().find(|m| repeated_message_field(m).is_some()))
            .ok_or_else(|| SchemaError::MissingMessage {
                name: THING_MESSAGE.into(),
            })?;

        let (identities, identity_message) =
            repeated_message_field(&message).ok_or_else(|| SchemaError::Layout {
                reason: format!("'{}' has no repeated identity field", message.name()),
            })?;

        let identity_fields = by_number(&identity_message);
        let pub_key = first_singular(&identity_fields, |k| matches!(k, Kind::Bytes), 0)
            .ok_or_else(|| SchemaError::Layout {
                reason: format!("'{}' has no bytes field for the public key", identity_message.name()),
            })?;
        let schema = first_singular(&identity_fields, |k| matches!(k, Kind::String), 0);

        let payload = by_number(&message)
            .into_iter()
            .filter(|f| !f.is_list() && !f.is_map())
            .find_map(|f| message_kind(&f).map(|m| (f, m)))
            .map(|(field, payload_message)| {
                let fields = by_number(&payload_message);
                PayloadLayout {
                    mime_type: first_singular(&fields, |k| matches!(k, Kind::String), 0),
                    brand_name: first_singular(&fields, |k| matches!(k, Kind::String), 1),
                    field,
                    message: payload_message,
                }
            });

        Ok(Self {
            message,
            identities,
            identity: IdentityLayout {
                message: identity_message,
                pub_key,
                schema,
            },
            payload,
        })
    }
}

/// Check that `.proto` text compiles, without binding any thing layout.
pub fn check_definition(text: &str) -> Result<(), SchemaError> {
    compile_pool(SOURCE_NAME, text).map(|_| ())
}

/// Compile a single in-memory `.proto` document into a descriptor pool.
///
/// Imports of the well-known `google/protobuf/*.proto` files resolve; any
/// other import fails.
pub(crate) fn compile_pool(name: &str, text: &str) -> Result<DescriptorPool, SchemaError> {
    let mut resolver = ChainFileResolver::new();
    resolver.add(InlineSource {
        name: name.to_string(),
        text: text.to_string(),
    });
    resolver.add(GoogleFileResolver::new());

    let mut compiler = Compiler::with_file_resolver(resolver);
    compiler.include_imports(true);
    compiler.open_file(name).map_err(|e| SchemaError::Compile {
        reason: e.to_string(),
    })?;
    Ok(compiler.descriptor_pool())
}

struct InlineSource {
    name: String,
    text: String,
}

impl FileResolver for InlineSource {
    fn resolve_path(&self, path: &Path) -> Option<String> {
        (path == Path::new(&self.name)).then(|| self.name.clone())
    }

    fn open_file(&self, name: &str) -> Result<File, protox::Error> {
        if name == self.name {
            File::from_source(name, &self.text)
        } else {
            Err(protox::Error::file_not_found(name))
        }
    }
}

fn by_number(message: &MessageDescriptor) -> Vec<FieldDescriptor> {
    let mut fields: Vec<_> = message.fields().collect();
    fields.sort_by_key(|f| f.number());
    fields
}

fn message_kind(field: &FieldDescriptor) -> Option<MessageDescriptor> {
    match field.kind() {
        Kind::Message(m) => Some(m),
        _ => None,
    }
}

fn repeated_message_field(message: &MessageDescriptor) -> Option<(FieldDescriptor, MessageDescriptor)> {
    by_number(message)
        .into_iter()
        .filter(|f| f.is_list())
        .find_map(|f| message_kind(&f).map(|m| (f, m)))
}

fn first_singular(
    fields: &[FieldDescriptor],
    kind: impl Fn(&Kind) -> bool,
    skip: usize,
) -> Option<FieldDescriptor> {
    fields
        .iter()
        .filter(|f| !f.is_list() && !f.is_map() && kind(&f.kind()))
        .nth(skip)
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const THING_PROTO: &str = include_str!("../proto/thing.proto");

    #[test]
    fn binds_roles_of_the_default_schema() {
        let desc = SchemaDescriptor::compile(THING_PROTO).unwrap();
        let layout = &desc.layout;
        assert_eq!(layout.message.name(), "Thing");
        assert_eq!(layout.identities.name(), "identities");
        assert_eq!(layout.identity.pub_key.name(), "pubKey");
        assert_eq!(layout.identity.schema.as_ref().unwrap().name(), "schema");
        let payload = layout.payload.as_ref().unwrap();
        assert_eq!(payload.field.name(), "data");
        assert_eq!(payload.mime_type.as_ref().unwrap().name(), "MymeType");
        assert_eq!(payload.brand_name.as_ref().unwrap().name(), "brandName");
    }

    #[test]
    fn binds_by_structure_when_names_differ() {
        let text = r#"
            syntax = "proto3";
            package acme.v1;
            message Holder { repeated Key keys = 3; }
            message Key { string label = 2; bytes raw = 5; }
        "#;
        let desc = SchemaDescriptor::compile(text).unwrap();
        assert_eq!(desc.container().name(), "Holder");
        assert_eq!(desc.layout.identity.pub_key.name(), "raw");
        assert_eq!(desc.layout.identity.schema.as_ref().unwrap().name(), "label");
        assert!(!desc.has_payload());
    }

    #[test]
    fn imported_messages_never_become_the_container() {
        // descriptor.proto declares FileDescriptorSet { repeated FileDescriptorProto file }
        let text = r#"
            syntax = "proto3";
            import "google/protobuf/descriptor.proto";
            message Holder { repeated Key keys = 1; }
            message Key { bytes raw = 1; google.protobuf.FileOptions options = 2; }
        "#;
        let desc = SchemaDescriptor::compile(text).unwrap();
        assert_eq!(desc.container().full_name(), "Holder");
        assert_eq!(desc.layout.identity.message.name(), "Key");
        assert_eq!(desc.layout.identity.pub_key.name(), "raw");
    }

    #[test]
    fn rejects_text_that_does_not_parse() {
        let err = SchemaDescriptor::compile("message Thing {").unwrap_err();
        assert!(matches!(err, SchemaError::Compile { .. }));
    }

    #[test]
    fn rejects_schema_without_identity_list() {
        let err = SchemaDescriptor::compile("message Other { optional string a = 1; }").unwrap_err();
        assert!(matches!(err, SchemaError::MissingMessage { .. }));

        let err = SchemaDescriptor::compile("message Thing { optional string a = 1; }").unwrap_err();
        assert!(matches!(err, SchemaError::Layout { .. }));
    }

    #[test]
    fn rejects_identity_without_key_bytes() {
        let text = "message Thing { repeated Id ids = 1; } message Id { optional string s = 1; }";
        assert!(matches!(
            SchemaDescriptor::compile(text),
            Err(SchemaError::Layout { .. })
        ));
    }
}
