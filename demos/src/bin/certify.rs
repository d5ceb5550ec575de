//! # certify
//!
//! Registers an organization, publishes a schema document and points the
//! registry at a registrar, all against an in-memory ledger.
//!
//! Run with:
//! ```sh
//! cargo run --bin certify
//! ```

use std::sync::Arc;

use alloy_primitives::Address;
use openreg_client::{
    init_tracing, Certifier, ClientConfig, LogConfig, RegistrantProfile, SchemaDocument,
};
use openreg_testkit::fixtures::THING_PROTO;
use openreg_testkit::MemoryLedger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ClientConfig {
        log: LogConfig {
            level: "debug".into(),
            ..LogConfig::default()
        },
        ..ClientConfig::for_sender(Address::repeat_byte(0xce))
    };
    init_tracing(&config.log)?;

    let ledger = MemoryLedger::new();
    let certifier = Certifier::new(Arc::new(ledger.clone()), &config)?;

    println!("OpenRegistry: Certifier");
    println!("═══════════════════════════════════════════════════════");

    // ── 1. Registrant profile ──────────────────────────────────────────────────
    let org = Address::repeat_byte(0x42);
    let profile = RegistrantProfile {
        name: Some("Acme".into()),
        website: Some("https://acme.example".into()),
        legal_name: Some("Acme Holdings Ltd".into()),
        ..Default::default()
    };
    let tx = certifier.add_registrant(org, &profile).await?;
    println!("\nadded {org}\n  tx {tx}");

    if let Some((data, active)) = ledger.registrant(&org) {
        let stored = certifier.documents().decode_registrant(&data)?;
        println!("  name={:?} active={active} ({} bytes)", stored.name, data.len());
    }

    // ── 2. Schema document ─────────────────────────────────────────────────────
    let document = SchemaDocument {
        name: Some("thing".into()),
        description: Some("identities plus optional payload".into()),
        definition: Some(THING_PROTO.into()),
    };
    let tx = certifier.create_schema(&document).await?;
    println!("\npublished schema '{}'\n  tx {tx}", document.name.as_deref().unwrap_or_default());

    // ── 3. Registrar ───────────────────────────────────────────────────────────
    let registrar = Address::repeat_byte(0x77);
    let tx = certifier.set_registrar(registrar).await?;
    println!("\nregistrar set to {registrar}\n  tx {tx}");

    Ok(())
}
