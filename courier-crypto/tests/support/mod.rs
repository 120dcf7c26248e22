//! Shared key pair fixtures for integration tests.
//!
//! RSA generation dominates test time, so each test binary generates its key
//! pairs once and reuses them.

#![allow(dead_code)]

use courier_crypto::{KeyPair, PrivateKey, PublicKey, generate_key_pair};
use std::sync::OnceLock;

/// The recipient every test encrypts to.
pub fn alice() -> &'static KeyPair {
    static KP: OnceLock<KeyPair> = OnceLock::new();
    KP.get_or_init(|| generate_key_pair().expect("key generation must succeed"))
}

/// An unrelated second identity.
pub fn bob() -> &'static KeyPair {
    static KP: OnceLock<KeyPair> = OnceLock::new();
    KP.get_or_init(|| generate_key_pair().expect("key generation must succeed"))
}

pub fn alice_public() -> &'static PublicKey {
    static KEY: OnceLock<PublicKey> = OnceLock::new();
    KEY.get_or_init(|| alice().public().expect("public key must import"))
}

pub fn alice_private() -> &'static PrivateKey {
    static KEY: OnceLock<PrivateKey> = OnceLock::new();
    KEY.get_or_init(|| alice().private().expect("private key must import"))
}
