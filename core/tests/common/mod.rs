//! Shared fixtures. RSA key generation dominates test time, so each identity is
//! generated once per test binary and reused.

#![allow(dead_code)]

use std::sync::{Arc, OnceLock};

use envelope_core::prelude::*;
use tempfile::TempDir;

/// Route `tracing` output to the test harness. Filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn fixture(slot: &'static OnceLock<KeyPair>) -> &'static KeyPair {
    slot.get_or_init(|| generate_keypair(2048).expect("fixture keygen"))
}

pub fn alice() -> &'static KeyPair {
    static KEY: OnceLock<KeyPair> = OnceLock::new();
    fixture(&KEY)
}

pub fn bob() -> &'static KeyPair {
    static KEY: OnceLock<KeyPair> = OnceLock::new();
    fixture(&KEY)
}

pub fn mallory() -> &'static KeyPair {
    static KEY: OnceLock<KeyPair> = OnceLock::new();
    fixture(&KEY)
}

/// Headers used by the alice → bob scenarios.
pub fn scenario_headers() -> MailHeaders {
    MailHeaders::new("alice", "bob", "hi", "2024-01-01")
}

pub const SCENARIO_BODY: &[u8] = b"meet at noon";

/// Fresh directory with alice, bob and mallory installed (unencrypted private keys).
pub fn populated_dir() -> (TempDir, EnvelopeConfig) {
    let tmp = TempDir::new().expect("tempdir");
    let config = EnvelopeConfig {
        keygen_workers: 2,
        ..EnvelopeConfig::rooted_at(tmp.path())
    };

    let store = KeyStore::new(config.key_layout());
    for (name, pair) in [("alice", alice()), ("bob", bob()), ("mallory", mallory())] {
        store.install(name, pair, None).expect("install fixture key");
    }
    (tmp, config)
}

pub fn mailbox() -> (TempDir, Mailbox) {
    init_tracing();
    let (tmp, config) = populated_dir();
    let mailbox = Mailbox::from_config(&config).expect("mailbox");
    (tmp, mailbox)
}

/// Public keys addressed by their default key reference.
pub fn sender_keys() -> std::collections::BTreeMap<String, Arc<rsa::RsaPublicKey>> {
    [("alice", alice()), ("bob", bob()), ("mallory", mallory())]
        .into_iter()
        .map(|(name, pair)| (format!("{name}_pub.pem"), Arc::new(pair.public.clone())))
        .collect()
}

pub fn alice_to_bob() -> SignedMessage {
    compose(
        scenario_headers(),
        SCENARIO_BODY,
        "alice_pub.pem",
        &alice().private,
        &bob().public,
    )
    .expect("compose")
}

pub fn open_for_bob(message: &SignedMessage, revocation: &RevocationChecker) -> VerifyReport {
    open_message(message, revocation, &sender_keys(), &bob().private).expect("open")
}

pub fn no_revocations() -> RevocationChecker {
    RevocationChecker::from_list(RevocationList::default(), RevocationPolicy::FailOpen)
}
