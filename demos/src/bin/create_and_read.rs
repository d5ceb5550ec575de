//! # create_and_read
//!
//! Stores a two-identity thing and a small batch on an in-memory ledger,
//! then reads each of them back by key.
//!
//! Run with:
//! ```sh
//! cargo run --bin create_and_read
//! ```
//!
//! Set `OPENREG_CONFIG=path/to/config.yaml` to load sender, gas and logging
//! settings from a file.

use std::path::Path;
use std::sync::Arc;

use alloy_primitives::Address;
use openreg_client::{
    init_tracing, BatchEntry, ClientConfig, Identity, Payload, Reference, Registrant, Thing,
};
use openreg_testkit::fixtures::THING_PROTO;
use openreg_testkit::MemoryLedger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match std::env::var("OPENREG_CONFIG") {
        Ok(path) => ClientConfig::from_file(Path::new(&path))?,
        Err(_) => ClientConfig::for_sender(Address::repeat_byte(0x11)),
    };
    init_tracing(&config.log)?;

    println!("OpenRegistry: Create and Read");
    println!("═══════════════════════════════════════════════════════");

    // The registry holds the thing schema at the configured selector.
    let ledger = MemoryLedger::new().with_schema(config.schema.clone(), THING_PROTO);
    let registrant = Registrant::new(Arc::new(ledger.clone()), &config);

    // ── 1. One thing, two identities ───────────────────────────────────────────
    let device = Thing::new(vec![
        Identity::new(vec![0x12; 32], "urn:device:serial"),
        Identity::new(vec![0x34; 33], "urn:device:secp256k1"),
    ])
    .with_payload(Payload {
        mime_type: Some("application/json".into()),
        brand_name: Some("Acme".into()),
    });

    let id = registrant.create_thing(&device).await?;
    let words = ledger.stored(&id).map(|s| s.chunks.len()).unwrap_or_default();
    println!("\ncreated thing {id} ({words} words)");

    for identity in &device.identities {
        let key = Reference::new(identity.pub_key.clone());
        let record = registrant.get_thing(&key).await?;
        println!("  {:<24} → {} identities, active={}", identity.schema, record.thing.identities.len(), record.active);
    }

    // ── 2. Batch with explicit references ──────────────────────────────────────
    let entries = vec![
        BatchEntry::new(
            Thing::new(vec![Identity::new(vec![0xaa, 0xbb], "urn:tag")]),
            "0x1234".parse()?,
        ),
        BatchEntry::new(
            Thing::new(vec![Identity::new(vec![0xcc, 0xdd], "urn:tag")]),
            "0x3456".parse()?,
        ),
    ];
    let ids = registrant.create_many(&entries).await?;
    println!("\ncreated batch {:?}", ids.iter().map(|id| id.as_str()).collect::<Vec<_>>());

    for entry in &entries {
        let record = registrant.get_thing(&entry.reference).await?;
        let key = &record.thing.identities[0].pub_key;
        println!("  {:<24} → key {key}", entry.reference.to_string());
    }

    tracing::info!(calls = ledger.calls().len(), "demo finished");
    Ok(())
}
