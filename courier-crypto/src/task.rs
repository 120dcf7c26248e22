//! Async wrappers that run RSA work on tokio's blocking pool.
//!
//! Key generation takes tens of milliseconds and OAEP private-key operations
//! a few; both would stall an async executor if run inline.

use crate::envelope::{self, Envelope};
use crate::error::{CryptoError, CryptoResult};
use crate::key::{self, KeyPair};
use crate::params::KeyParams;
use tokio::task::{self, JoinError};

fn join_err(e: JoinError) -> CryptoError {
    if e.is_cancelled() {
        CryptoError::Task("cancelled".to_string())
    } else {
        CryptoError::Task(e.to_string())
    }
}

/// Async form of [`key::generate_key_pair_with`].
pub async fn generate_key_pair_async(params: KeyParams) -> CryptoResult<KeyPair> {
    task::spawn_blocking(move || key::generate_key_pair_with(&params))
        .await
        .map_err(join_err)?
}

/// Async form of [`envelope::encrypt`].
pub async fn encrypt_async(
    message: String,
    recipient_public_key: String,
) -> CryptoResult<Envelope> {
    task::spawn_blocking(move || envelope::encrypt(&message, &recipient_public_key))
        .await
        .map_err(join_err)?
}

/// Async form of [`envelope::decrypt`].
pub async fn decrypt_async(envelope: Envelope, private_key: String) -> CryptoResult<String> {
    task::spawn_blocking(move || {
        let private_key = zeroize::Zeroizing::new(private_key);
        envelope::decrypt(&envelope, &private_key)
    })
    .await
    .map_err(join_err)?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn async_round_trip() {
        let kp = generate_key_pair_async(KeyParams::default()).await.unwrap();
        let envelope = encrypt_async("async hello".into(), kp.public_key.clone())
            .await
            .unwrap();
        let plaintext = decrypt_async(envelope, kp.private_key.clone()).await.unwrap();
        assert_eq!(plaintext, "async hello");
    }

    #[tokio::test]
    async fn async_errors_pass_through() {
        let err = generate_key_pair_async(KeyParams::with_modulus_bits(512))
            .await
            .unwrap_err();
        assert!(matches!(err, CryptoError::InvalidParams(_)));

        let err = encrypt_async("x".into(), "bogus".into()).await.unwrap_err();
        assert!(matches!(err, CryptoError::InvalidKey(_)));
    }
}
