//! Golden things and keys shared by the client test suites.

use openreg_core::{Identity, Reference, Thing};

pub use openreg_schema::THING_PROTO;

/// Encoding of [`single_identity`] under [`THING_PROTO`].
pub const SINGLE_IDENTITY_HEX: &str = "0a0e0a02aabb120875726e3a74657374";

/// The single-identity encoding as one zero-padded ledger word.
pub const SINGLE_IDENTITY_WORD: &str =
    "0x0a0e0a02aabb120875726e3a7465737400000000000000000000000000000000";

pub const KEY_A: &str = "0x1233333333333333333333333333333333333333333333333333333333333321";
pub const KEY_B: &str = "0x1234444444444444444444444444444444444444444444444444444444444321";

/// Words of [`multi_identity`] under [`THING_PROTO`].
pub const MULTI_IDENTITY_WORDS: [&str; 3] = [
    "0x0a2c0a2012333333333333333333333333333333333333333333333333333333",
    "0x33333321120875726e3a746573740a2c0a201234444444444444444444444444",
    "0x444444444444444444444444444444444321120875726e3a7465737400000000",
];

pub fn key(hex_str: &str) -> Vec<u8> {
    let digits = hex_str.strip_prefix("0x").unwrap_or(hex_str);
    hex::decode(digits).unwrap_or_else(|e| panic!("bad fixture hex '{hex_str}': {e}"))
}

/// One identity: key `aabb`, label `urn:test`, no payload.
pub fn single_identity() -> Thing {
    Thing::new(vec![Identity::new(key("aabb"), "urn:test")])
}

/// Two 32-byte identities, [`KEY_A`] then [`KEY_B`].
pub fn multi_identity() -> Thing {
    Thing::new(vec![
        Identity::new(key(KEY_A), "urn:test"),
        Identity::new(key(KEY_B), "urn:test"),
    ])
}

pub fn reference(hex_str: &str) -> Reference {
    Reference::from(key(hex_str))
}
