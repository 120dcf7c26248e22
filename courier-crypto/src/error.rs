//! Error types for envelope encryption.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Text shown to users for any failure to open a message addressed to them.
pub const DECRYPTION_FAILED_MESSAGE: &str = "message could not be decrypted";

/// Errors that can occur while generating keys or sealing/opening envelopes.
///
/// No variant is retried internally. `KeyUnwrap` and `Authentication` must be
/// presented identically to end users; see [`CryptoError::user_message`].
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The random source or RSA key generation failed.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// Key material is malformed or not an RSA key of the expected kind.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// An envelope field is missing, undecodable or has the wrong size.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// The wrapped content key could not be recovered with this private key.
    #[error("content key unwrap failed (envelope not addressed to this key)")]
    KeyUnwrap,

    /// The AES-GCM tag did not verify.
    #[error("authentication failed (tampered or corrupted ciphertext)")]
    Authentication,

    /// The decrypted bytes are not valid UTF-8.
    #[error("decrypted message is not valid UTF-8")]
    Encoding,

    /// The cipher refused to process the input.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Unsupported key generation parameters.
    #[error("invalid key parameters: {0}")]
    InvalidParams(String),

    /// A background task running a crypto operation did not complete.
    #[error("crypto task failed: {0}")]
    Task(String),
}

impl CryptoError {
    /// Returns true for failures that mean "this message cannot be opened by
    /// this recipient", whichever sub-step detected it.
    pub fn is_decryption_failure(&self) -> bool {
        matches!(self, Self::KeyUnwrap | Self::Authentication)
    }

    /// Returns text safe to show an end user.
    ///
    /// Unwrap and tag failures share one message so the caller cannot tell
    /// which step rejected the envelope.
    pub fn user_message(&self) -> String {
        if self.is_decryption_failure() {
            DECRYPTION_FAILED_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}
