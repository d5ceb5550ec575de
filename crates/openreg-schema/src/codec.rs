//! `RecordCodec`: encodes a [`Thing`] against a compiled schema and back.
//!
//! # Padding
//! Payloads read back from the ledger carry the zero bytes `slice` appended
//! to fill the last word. A protobuf field key is never zero (field number 0
//! is invalid), so before parsing, the codec walks the top-level fields and
//! cuts the payload at the first field boundary followed only by zeros.
//! Zero bytes inside a field value are skipped over by the walk and never
//! mistaken for padding. Input the walk cannot follow is handed to the
//! parser untouched, which then reports the real error.

use bytes::Buf;
use prost::Message;
use prost_reflect::{DynamicMessage, Value};

use openreg_core::{Identity, Payload, Thing, ThingError};

use crate::descriptor::{IdentityLayout, PayloadLayout, SchemaDescriptor};

/// Stateless encoder / decoder for things.
pub struct RecordCodec;

impl RecordCodec {
    /// Serialize `thing` with the layout of `schema`.
    ///
    /// Public keys are embedded as raw bytes. Fails before touching the ledger
    /// if an identity has no key or the schema cannot hold a field the thing
    /// sets.
    pub fn encode(thing: &Thing, schema: &SchemaDescriptor) -> Result<Vec<u8>, ThingError> {
        let layout = &schema.layout;
        let mut message = DynamicMessage::new(layout.message.clone());

        let identities = thing
            .identities
            .iter()
            .enumerate()
            .map(|(i, id)| encode_identity(i, id, &layout.identity).map(Value::Message))
            .collect::<Result<Vec<_>, _>>()?;
        if !identities.is_empty() {
            message.set_field(&layout.identities, Value::List(identities));
        }

        if let Some(payload) = &thing.data {
            let payload_layout = layout.payload.as_ref().ok_or_else(|| {
                ThingError::encoding(format!(
                    "schema '{}' declares no payload field",
                    layout.message.name()
                ))
            })?;
            let encoded = encode_payload(payload, payload_layout)?;
            message.set_field(&payload_layout.field, Value::Message(encoded));
        }

        Ok(message.encode_to_vec())
    }

    /// Parse bytes produced by [`encode`](Self::encode), possibly followed by
    /// word padding.
    pub fn decode(bytes: &[u8], schema: &SchemaDescriptor) -> Result<Thing, ThingError> {
        let layout = &schema.layout;
        let payload = strip_padding(bytes);
        let message = DynamicMessage::decode(layout.message.clone(), payload)
            .map_err(|e| ThingError::decoding(format!("'{}': {e}", layout.message.name())))?;

        let mut identities = Vec::new();
        if let Some(list) = message.get_field(&layout.identities).as_list() {
            for (i, item) in list.iter().enumerate() {
                let item = item.as_message().ok_or_else(|| {
                    ThingError::decoding(format!("identity {i} is not a message"))
                })?;
                identities.push(decode_identity(i, item, &layout.identity)?);
            }
        }

        let data = match &layout.payload {
            Some(p) if message.has_field(&p.field) => {
                let value = message.get_field(&p.field);
                let item = value
                    .as_message()
                    .ok_or_else(|| ThingError::decoding("payload is not a message"))?;
                Some(decode_payload(item, p))
            }
            _ => None,
        };

        Ok(Thing { identities, data })
    }
}

/// Cut trailing word padding off an encoded payload.
///
/// Returns the input unchanged if it is not a well-formed field sequence.
pub fn strip_padding(bytes: &[u8]) -> &[u8] {
    let mut rest = bytes;
    loop {
        if rest.iter().all(|b| *b == 0) {
            return &bytes[..bytes.len() - rest.len()];
        }
        if skip_field(&mut rest).is_none() {
            return bytes;
        }
    }
}

fn skip_field(buf: &mut &[u8]) -> Option<()> {
    let key = prost::encoding::decode_varint(buf).ok()?;
    if key >> 3 == 0 {
        return None;
    }
    let len = match key & 0x7 {
        0 => {
            prost::encoding::decode_varint(buf).ok()?;
            0
        }
        1 => 8,
        2 => usize::try_from(prost::encoding::decode_varint(buf).ok()?).ok()?,
        5 => 4,
        // groups are not walked
        _ => return None,
    };
    if buf.remaining() < len {
        return None;
    }
    buf.advance(len);
    Some(())
}

fn encode_identity(
    index: usize,
    identity: &Identity,
    layout: &IdentityLayout,
) -> Result<DynamicMessage, ThingError> {
    if identity.pub_key.is_empty() {
        return Err(ThingError::encoding(format!(
            "identity {index} has no public key"
        )));
    }
    let mut message = DynamicMessage::new(layout.message.clone());
    message.set_field(
        &layout.pub_key,
        Value::Bytes(bytes::Bytes::copy_from_slice(&identity.pub_key)),
    );
    match &layout.schema {
        Some(field) => message.set_field(field, Value::String(identity.schema.clone())),
        None if identity.schema.is_empty() => {}
        None => {
            return Err(ThingError::encoding(format!(
                "'{}' has no field for the schema label of identity {index}",
                layout.message.name()
            )))
        }
    }
    Ok(message)
}

fn decode_identity(
    index: usize,
    message: &DynamicMessage,
    layout: &IdentityLayout,
) -> Result<Identity, ThingError> {
    if !message.has_field(&layout.pub_key) {
        return Err(ThingError::decoding(format!(
            "identity {index} is missing its public key"
        )));
    }
    let pub_key = message
        .get_field(&layout.pub_key)
        .as_bytes()
        .map(|b| b.to_vec())
        .unwrap_or_default();
    let schema = layout
        .schema
        .as_ref()
        .and_then(|f| message.get_field(f).as_str().map(str::to_string))
        .unwrap_or_default();
    Ok(Identity::new(pub_key, schema))
}

fn encode_payload(payload: &Payload, layout: &PayloadLayout) -> Result<DynamicMessage, ThingError> {
    let mut message = DynamicMessage::new(layout.message.clone());
    for (value, field, what) in [
        (&payload.mime_type, &layout.mime_type, "mime type"),
        (&payload.brand_name, &layout.brand_name, "brand name"),
    ] {
        let Some(value) = value else { continue };
        let field = field.as_ref().ok_or_else(|| {
            ThingError::encoding(format!(
                "'{}' has no field for the {what}",
                layout.message.name()
            ))
        })?;
        message.set_field(field, Value::String(value.clone()));
    }
    Ok(message)
}

fn decode_payload(message: &DynamicMessage, layout: &PayloadLayout) -> Payload {
    let read = |field: &Option<prost_reflect::FieldDescriptor>| {
        field
            .as_ref()
            .filter(|f| message.has_field(f))
            .and_then(|f| message.get_field(f).as_str().map(str::to_string))
    };
    Payload {
        mime_type: read(&layout.mime_type),
        brand_name: read(&layout.brand_name),
    }
}
