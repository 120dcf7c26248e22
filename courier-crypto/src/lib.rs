//! Encryption core for Courier end-to-end encrypted messages.
//!
//! Provides hybrid (envelope) encryption using:
//! - RSA-OAEP with SHA-256 for wrapping per-message keys
//! - AES-256-GCM for authenticated message encryption
//! - OS-backed randomness and zeroization of transient key material
//!
//! # Architecture
//!
//! 1. **Key Pair**: A long-lived RSA key pair per identity, generated by
//!    [`generate_key_pair`] and exported as base64 DER. Storage and
//!    distribution belong to the host application.
//!
//! 2. **Content Key**: A random AES-256 key generated for every message. It
//!    encrypts the message, is wrapped with the recipient's public key, and
//!    is then discarded.
//!
//! The resulting [`Envelope`] carries the nonce, ciphertext and wrapped key,
//! and can be opened only with the recipient's private key. Keys are always
//! passed explicitly; nothing here holds global key state.
//!
//! AAD is empty and there is no forward secrecy across messages sent to the
//! same long-lived key pair.

mod cipher;
mod encoding;
pub mod envelope;
mod error;
pub mod key;
mod params;
pub mod task;

pub use cipher::{CONTENT_KEY_SIZE, NONCE_SIZE, TAG_SIZE};
pub use envelope::{
    Envelope, decrypt, decrypt_with_key, encrypt, encrypt_with_key, open, seal,
};
pub use error::{CryptoError, CryptoResult, DECRYPTION_FAILED_MESSAGE};
pub use key::{KeyPair, PrivateKey, PublicKey, generate_key_pair, generate_key_pair_with};
pub use params::{DEFAULT_MODULUS_BITS, KeyParams, MIN_MODULUS_BITS, PUBLIC_EXPONENT};
pub use task::{decrypt_async, encrypt_async, generate_key_pair_async};
