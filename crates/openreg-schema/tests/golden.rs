//! Golden vectors: things encoded with the default thing schema, cut into
//! ledger words, and read back.

use openreg_core::{chunk, Identity, Thing};
use openreg_schema::{RecordCodec, SchemaDescriptor, THING_PROTO};

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn key(s: &str) -> Vec<u8> {
    hex::decode(s).unwrap_or_else(|e| panic!("bad hex '{s}': {e}"))
}

fn schema() -> SchemaDescriptor {
    SchemaDescriptor::compile(THING_PROTO).expect("default schema compiles")
}

const KEY_A: &str = "1233333333333333333333333333333333333333333333333333333333333321";
const KEY_B: &str = "1234444444444444444444444444444444444444444444444444444444444321";

// ─── Single identity ──────────────────────────────────────────────────────────

#[test]
fn single_identity_fits_one_word() {
    let thing = Thing::new(vec![Identity::new(key("aabb"), "urn:test")]);
    let bytes = RecordCodec::encode(&thing, &schema()).unwrap();
    assert_eq!(hex::encode(&bytes), "0a0e0a02aabb120875726e3a74657374");

    let words = chunk::slice(&bytes);
    assert_eq!(
        words.to_hex(),
        vec!["0x0a0e0a02aabb120875726e3a7465737400000000000000000000000000000000"]
    );

    let merged = chunk::merge(words.words());
    assert_eq!(RecordCodec::decode(&merged, &schema()).unwrap(), thing);
}

// ─── Two identities ───────────────────────────────────────────────────────────

#[test]
fn two_identities_span_three_words() {
    let thing = Thing::new(vec![
        Identity::new(key(KEY_A), "urn:test"),
        Identity::new(key(KEY_B), "urn:test"),
    ]);
    let bytes = RecordCodec::encode(&thing, &schema()).unwrap();
    assert_eq!(bytes.len(), 92);

    let words = chunk::slice(&bytes);
    assert_eq!(
        words.to_hex(),
        vec![
            "0x0a2c0a2012333333333333333333333333333333333333333333333333333333",
            "0x33333321120875726e3a746573740a2c0a201234444444444444444444444444",
            "0x444444444444444444444444444444444321120875726e3a7465737400000000",
        ]
    );

    let merged = chunk::merge(words.words());
    assert_eq!(RecordCodec::decode(&merged, &schema()).unwrap(), thing);
}

// ─── Exact word multiple ──────────────────────────────────────────────────────

#[test]
fn payload_filling_whole_words_round_trips() {
    // 2 (outer key/len) + 2 (key tag/len) + 26 key bytes + 2 (label tag/len) = 32
    let thing = Thing::new(vec![Identity::new(vec![0x5a; 26], "")]);
    let bytes = RecordCodec::encode(&thing, &schema()).unwrap();
    assert_eq!(bytes.len(), 32);

    let merged = chunk::merge(chunk::slice(&bytes).words());
    assert_eq!(merged, bytes);
    assert_eq!(RecordCodec::decode(&merged, &schema()).unwrap(), thing);
}
