//! AES-256-GCM content encryption.
//!
//! Every message gets its own [`ContentKey`] and nonce, both drawn from the OS
//! random source. AAD is always empty.

use crate::error::{CryptoError, CryptoResult};
use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use zeroize::Zeroizing;

/// AES-GCM nonce size in bytes (96 bits).
pub const NONCE_SIZE: usize = 12;

/// AES-GCM authentication tag size in bytes.
pub const TAG_SIZE: usize = 16;

/// Content key size in bytes (AES-256).
pub const CONTENT_KEY_SIZE: usize = 32;

/// Ephemeral AES-256 key protecting exactly one message.
///
/// Zeroized on drop.
pub(crate) struct ContentKey(Zeroizing<[u8; CONTENT_KEY_SIZE]>);

impl ContentKey {
    /// Draws a fresh key from the OS random source.
    pub(crate) fn generate() -> CryptoResult<Self> {
        let mut bytes = Zeroizing::new([0u8; CONTENT_KEY_SIZE]);
        OsRng
            .try_fill_bytes(bytes.as_mut())
            .map_err(|e| CryptoError::Encryption(format!("random source unavailable: {e}")))?;
        Ok(Self(bytes))
    }

    /// Rebuilds a key from unwrapped bytes. Returns `None` on a length mismatch.
    pub(crate) fn from_slice(bytes: &[u8]) -> Option<Self> {
        let array: [u8; CONTENT_KEY_SIZE] = bytes.try_into().ok()?;
        Some(Self(Zeroizing::new(array)))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_ref()
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(self.as_bytes()))
    }
}

/// Draws a fresh 96-bit nonce from the OS random source.
pub(crate) fn random_nonce() -> CryptoResult<[u8; NONCE_SIZE]> {
    let mut nonce = [0u8; NONCE_SIZE];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|e| CryptoError::Encryption(format!("random source unavailable: {e}")))?;
    Ok(nonce)
}

/// Encrypts `plaintext`, returning ciphertext with the tag appended.
pub(crate) fn seal_content(
    key: &ContentKey,
    nonce: &[u8; NONCE_SIZE],
    plaintext: &[u8],
) -> CryptoResult<Vec<u8>> {
    key.cipher()
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|_| CryptoError::Encryption("AES-256-GCM rejected the plaintext".to_string()))
}

/// Decrypts and verifies `ciphertext`. Nothing is returned unless the tag verifies.
pub(crate) fn open_content(
    key: &ContentKey,
    nonce: &[u8; NONCE_SIZE],
    ciphertext: &[u8],
) -> CryptoResult<Vec<u8>> {
    key.cipher()
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::Authentication)
}
