//! Certifier flows against the in-memory ledger.

use std::sync::Arc;

use alloy_primitives::Address;
use openreg_client::{
    Certifier, ClientConfig, LedgerError, RegistrantProfile, SchemaDocument, ThingError,
};
use openreg_testkit::fixtures::THING_PROTO;
use openreg_testkit::{LedgerCall, MemoryLedger};

fn setup() -> (Certifier, MemoryLedger) {
    let ledger = MemoryLedger::new();
    let config = ClientConfig::for_sender(Address::repeat_byte(0xce));
    let certifier = Certifier::new(Arc::new(ledger.clone()), &config).unwrap();
    (certifier, ledger)
}

fn profile() -> RegistrantProfile {
    RegistrantProfile {
        name: Some("Acme".into()),
        website: Some("https://acme.example".into()),
        ..Default::default()
    }
}

#[tokio::test]
async fn add_registrant_stores_encoded_profile() {
    let (certifier, ledger) = setup();
    let org = Address::repeat_byte(0x42);
    let tx = certifier.add_registrant(org, &profile()).await.unwrap();
    assert!(tx.as_str().starts_with("0x"));

    let (data, active) = ledger.registrant(&org).unwrap();
    assert!(active);
    assert_eq!(certifier.documents().decode_registrant(&data).unwrap(), profile());

    let calls = ledger.calls_to("add");
    let [LedgerCall::Add { options, .. }] = calls.as_slice() else {
        panic!("expected one add call, got {calls:?}");
    };
    assert_eq!(options.from, Address::repeat_byte(0xce));
}

#[tokio::test]
async fn edit_registrant_replaces_profile_and_flag() {
    let (certifier, ledger) = setup();
    let org = Address::repeat_byte(0x42);
    certifier.add_registrant(org, &profile()).await.unwrap();

    let updated = RegistrantProfile {
        legal_name: Some("Acme Holdings".into()),
        ..profile()
    };
    certifier.edit_registrant(org, &updated, false).await.unwrap();

    let (data, active) = ledger.registrant(&org).unwrap();
    assert!(!active);
    assert_eq!(certifier.documents().decode_registrant(&data).unwrap(), updated);
}

#[tokio::test]
async fn edit_unknown_registrant_is_a_ledger_failure() {
    let (certifier, _) = setup();
    let err = certifier
        .edit_registrant(Address::repeat_byte(0x01), &profile(), true)
        .await
        .unwrap_err();
    assert!(matches!(err, ThingError::LedgerCall(ref e) if e.is_reverted()));
}

#[tokio::test]
async fn set_registrar_configures_the_registry() {
    let (certifier, ledger) = setup();
    let registrar = Address::repeat_byte(0x77);
    certifier.set_registrar(registrar).await.unwrap();
    assert_eq!(ledger.registrar(), Some(registrar));
}

#[tokio::test]
async fn create_schema_publishes_the_document() {
    let (certifier, ledger) = setup();
    let document = SchemaDocument {
        name: Some("thing".into()),
        description: Some("default thing layout".into()),
        definition: Some(THING_PROTO.into()),
    };
    certifier.create_schema(&document).await.unwrap();

    let published = ledger.schema_documents();
    assert_eq!(published.len(), 1);
    assert_eq!(certifier.documents().decode_schema(&published[0]).unwrap(), document);
}

#[tokio::test]
async fn invalid_definition_is_rejected_before_submission() {
    let (certifier, ledger) = setup();
    let document = SchemaDocument {
        name: Some("broken".into()),
        definition: Some("message Thing { repeated".into()),
        ..Default::default()
    };
    let err = certifier.create_schema(&document).await.unwrap_err();
    assert!(matches!(err, ThingError::EncodingFailure { .. }));
    assert!(ledger.calls().is_empty());
}

#[tokio::test]
async fn registrar_failures_are_not_retried() {
    let (certifier, ledger) = setup();
    ledger.fail_on("configure", LedgerError::Other("rejected".into()));
    let err = certifier.set_registrar(Address::ZERO).await.unwrap_err();
    assert_eq!(err.to_string(), ThingError::LedgerCall(LedgerError::Other("rejected".into())).to_string());
    assert_eq!(ledger.calls_to("configure").len(), 1);
    assert_eq!(ledger.registrar(), None);
}
