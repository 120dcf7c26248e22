//! Envelope encryption for point-to-point messages.
//!
//! Each message is encrypted with a fresh AES-256-GCM content key and nonce.
//! The content key is then wrapped with the recipient's RSA-OAEP (SHA-256)
//! public key, so only the holder of the matching private key can open it.

use crate::cipher::{self, ContentKey, NONCE_SIZE, TAG_SIZE};
use crate::encoding::base64_bytes;
use crate::error::{CryptoError, CryptoResult};
use crate::key::{PrivateKey, PublicKey};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use zeroize::Zeroize;

/// One encrypted message, as stored or sent over the wire.
///
/// Serialized as JSON with base64 fields:
/// `{"nonce": ..., "ciphertext": ..., "wrappedKey": ...}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// AES-GCM nonce (12 bytes).
    #[serde(with = "base64_bytes")]
    pub nonce: Vec<u8>,
    /// AES-256-GCM ciphertext with the 16-byte tag appended.
    #[serde(with = "base64_bytes")]
    pub ciphertext: Vec<u8>,
    /// Content key encrypted with RSA-OAEP under the recipient's public key.
    #[serde(with = "base64_bytes")]
    pub wrapped_key: Vec<u8>,
}

impl Envelope {
    /// Serializes to the JSON wire form.
    pub fn to_json(&self) -> CryptoResult<String> {
        serde_json::to_string(self)
            .map_err(|e| CryptoError::Encryption(format!("envelope serialization failed: {e}")))
    }

    /// Parses the JSON wire form. Missing or undecodable fields are
    /// `MalformedEnvelope`.
    pub fn from_json(json: &str) -> CryptoResult<Self> {
        serde_json::from_str(json).map_err(|e| CryptoError::MalformedEnvelope(e.to_string()))
    }

    fn checked_nonce(&self) -> CryptoResult<[u8; NONCE_SIZE]> {
        self.nonce.as_slice().try_into().map_err(|_| {
            CryptoError::MalformedEnvelope(format!(
                "nonce: expected {NONCE_SIZE} bytes, got {}",
                self.nonce.len()
            ))
        })
    }

    fn check_layout(&self) -> CryptoResult<[u8; NONCE_SIZE]> {
        let nonce = self.checked_nonce()?;
        if self.ciphertext.len() < TAG_SIZE {
            return Err(CryptoError::MalformedEnvelope(format!(
                "ciphertext: expected at least {TAG_SIZE} bytes, got {}",
                self.ciphertext.len()
            )));
        }
        if self.wrapped_key.is_empty() {
            return Err(CryptoError::MalformedEnvelope(
                "wrappedKey: empty".to_string(),
            ));
        }
        Ok(nonce)
    }
}

/// Encrypts `message` for the holder of `recipient_public_key` (base64 SPKI).
pub fn encrypt(message: &str, recipient_public_key: &str) -> CryptoResult<Envelope> {
    let recipient = PublicKey::from_base64(recipient_public_key)?;
    encrypt_with_key(message, &recipient)
}

/// Encrypts `message` with an already imported recipient key.
pub fn encrypt_with_key(message: &str, recipient: &PublicKey) -> CryptoResult<Envelope> {
    seal(message.as_bytes(), recipient)
}

/// Encrypts raw bytes for `recipient`.
///
/// The content key lives only for this call and is wiped once wrapped.
pub fn seal(plaintext: &[u8], recipient: &PublicKey) -> CryptoResult<Envelope> {
    let content_key = ContentKey::generate()?;
    let nonce = cipher::random_nonce()?;

    let ciphertext = cipher::seal_content(&content_key, &nonce, plaintext)?;
    let wrapped_key = recipient.wrap(content_key.as_bytes())?;
    drop(content_key);

    debug!(
        "sealed {} byte message ({} byte ciphertext, {}-bit recipient key)",
        plaintext.len(),
        ciphertext.len(),
        recipient.modulus_bits()
    );

    Ok(Envelope {
        nonce: nonce.to_vec(),
        ciphertext,
        wrapped_key,
    })
}

/// Decrypts `envelope` with `private_key` (base64 PKCS#8).
pub fn decrypt(envelope: &Envelope, private_key: &str) -> CryptoResult<String> {
    let private = PrivateKey::from_base64(private_key)?;
    decrypt_with_key(envelope, &private)
}

/// Decrypts `envelope` with an already imported private key.
pub fn decrypt_with_key(envelope: &Envelope, private: &PrivateKey) -> CryptoResult<String> {
    let plaintext = open(envelope, private)?;
    String::from_utf8(plaintext).map_err(|e| {
        e.into_bytes().zeroize();
        CryptoError::Encoding
    })
}

/// Opens `envelope`, returning the raw plaintext bytes.
///
/// Fails with `KeyUnwrap` when the envelope was addressed to another key and
/// `Authentication` when the ciphertext was altered. Never returns
/// unauthenticated bytes.
pub fn open(envelope: &Envelope, private: &PrivateKey) -> CryptoResult<Vec<u8>> {
    let nonce = envelope.check_layout()?;

    let raw_key = private.unwrap_content_key(&envelope.wrapped_key).inspect_err(|_| {
        debug!("content key unwrap failed; envelope not addressed to this key");
    })?;
    let content_key = ContentKey::from_slice(&raw_key).ok_or(CryptoError::KeyUnwrap)?;
    drop(raw_key);

    cipher::open_content(&content_key, &nonce, &envelope.ciphertext).inspect_err(|_| {
        warn!("envelope authentication failed; ciphertext tampered or corrupted");
    })
}
