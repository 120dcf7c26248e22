//! RSA-OAEP key pairs and content-key wrapping.
//!
//! Public keys travel as base64 DER `SubjectPublicKeyInfo`, private keys as
//! base64 DER PKCS#8. Both are imported into [`PublicKey`] / [`PrivateKey`]
//! handles, which are read-only and safe to share between threads.

use crate::encoding;
use crate::error::{CryptoError, CryptoResult};
use crate::params::{KeyParams, MIN_MODULUS_BITS, PUBLIC_EXPONENT};
use aes_gcm::aead::OsRng;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, Oaep, RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Exported RSA key pair, as handed to the host for storage and distribution.
///
/// Only `public_key` may leave the device. The private half is wiped on drop
/// and redacted from `Debug` output.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct KeyPair {
    /// Base64 DER SubjectPublicKeyInfo.
    pub public_key: String,
    /// Base64 DER PKCS#8 PrivateKeyInfo.
    pub private_key: String,
}

impl KeyPair {
    /// Imports the public half.
    pub fn public(&self) -> CryptoResult<PublicKey> {
        PublicKey::from_base64(&self.public_key)
    }

    /// Imports the private half.
    pub fn private(&self) -> CryptoResult<PrivateKey> {
        PrivateKey::from_base64(&self.private_key)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Imported RSA-OAEP public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey(RsaPublicKey);

impl PublicKey {
    /// Imports a base64 DER SubjectPublicKeyInfo.
    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        let der = encoding::decode(encoded)
            .map_err(|e| CryptoError::InvalidKey(format!("public key is not base64: {e}")))?;
        Self::from_der(&der)
    }

    /// Imports a DER SubjectPublicKeyInfo.
    pub fn from_der(der: &[u8]) -> CryptoResult<Self> {
        let key = RsaPublicKey::from_public_key_der(der)
            .map_err(|e| CryptoError::InvalidKey(format!("not an RSA public key: {e}")))?;
        Self::checked(key)
    }

    /// Imports a PEM `PUBLIC KEY` block.
    pub fn from_pem(pem: &str) -> CryptoResult<Self> {
        let key = RsaPublicKey::from_public_key_pem(pem)
            .map_err(|e| CryptoError::InvalidKey(format!("not an RSA public key: {e}")))?;
        Self::checked(key)
    }

    fn checked(key: RsaPublicKey) -> CryptoResult<Self> {
        check_modulus(key.n().bits())?;
        Ok(Self(key))
    }

    /// Exports as DER SubjectPublicKeyInfo.
    pub fn to_der(&self) -> CryptoResult<Vec<u8>> {
        self.0
            .to_public_key_der()
            .map(|doc| doc.as_bytes().to_vec())
            .map_err(|e| CryptoError::InvalidKey(format!("public key export failed: {e}")))
    }

    /// Exports as base64 DER SubjectPublicKeyInfo.
    pub fn to_base64(&self) -> CryptoResult<String> {
        Ok(encoding::encode(&self.to_der()?))
    }

    /// Exports as a PEM `PUBLIC KEY` block.
    pub fn to_pem(&self) -> CryptoResult<String> {
        self.0
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| CryptoError::InvalidKey(format!("public key export failed: {e}")))
    }

    /// Lowercase hex SHA-256 of the DER SubjectPublicKeyInfo.
    pub fn fingerprint(&self) -> CryptoResult<String> {
        Ok(hex::encode(Sha256::digest(self.to_der()?)))
    }

    /// Exact bit length of the RSA modulus.
    pub fn modulus_bits(&self) -> usize {
        self.0.n().bits()
    }

    /// Wraps a content key with RSA-OAEP (SHA-256).
    pub(crate) fn wrap(&self, key: &[u8]) -> CryptoResult<Vec<u8>> {
        self.0
            .encrypt(&mut OsRng, Oaep::new::<Sha256>(), key)
            .map_err(|e| CryptoError::Encryption(format!("content key wrap failed: {e}")))
    }
}

/// Imported RSA-OAEP private key. The underlying key is zeroized on drop.
#[derive(Clone)]
pub struct PrivateKey(RsaPrivateKey);

impl PrivateKey {
    /// Imports a base64 DER PKCS#8 PrivateKeyInfo.
    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        let der = Zeroizing::new(
            encoding::decode(encoded)
                .map_err(|e| CryptoError::InvalidKey(format!("private key is not base64: {e}")))?,
        );
        Self::from_der(&der)
    }

    /// Imports a DER PKCS#8 PrivateKeyInfo.
    pub fn from_der(der: &[u8]) -> CryptoResult<Self> {
        let key = RsaPrivateKey::from_pkcs8_der(der)
            .map_err(|e| CryptoError::InvalidKey(format!("not an RSA private key: {e}")))?;
        Self::checked(key)
    }

    /// Imports a PEM `PRIVATE KEY` block.
    pub fn from_pem(pem: &str) -> CryptoResult<Self> {
        let key = RsaPrivateKey::from_pkcs8_pem(pem)
            .map_err(|e| CryptoError::InvalidKey(format!("not an RSA private key: {e}")))?;
        Self::checked(key)
    }

    fn checked(key: RsaPrivateKey) -> CryptoResult<Self> {
        check_modulus(key.n().bits())?;
        key.validate()
            .map_err(|e| CryptoError::InvalidKey(format!("inconsistent private key: {e}")))?;
        Ok(Self(key))
    }

    /// Exports as DER PKCS#8.
    pub fn to_der(&self) -> CryptoResult<Zeroizing<Vec<u8>>> {
        self.0
            .to_pkcs8_der()
            .map(|doc| Zeroizing::new(doc.as_bytes().to_vec()))
            .map_err(|e| CryptoError::InvalidKey(format!("private key export failed: {e}")))
    }

    /// Exports as base64 DER PKCS#8.
    pub fn to_base64(&self) -> CryptoResult<Zeroizing<String>> {
        Ok(Zeroizing::new(encoding::encode(&self.to_der()?)))
    }

    /// Exports as a PEM `PRIVATE KEY` block.
    pub fn to_pem(&self) -> CryptoResult<Zeroizing<String>> {
        self.0
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| CryptoError::InvalidKey(format!("private key export failed: {e}")))
    }

    /// Derives the matching public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.0.to_public_key())
    }

    /// Exact bit length of the RSA modulus.
    pub fn modulus_bits(&self) -> usize {
        self.0.n().bits()
    }

    /// Recovers a wrapped content key. Any OAEP failure is `KeyUnwrap`.
    pub(crate) fn unwrap_content_key(&self, wrapped: &[u8]) -> CryptoResult<Zeroizing<Vec<u8>>> {
        self.0
            .decrypt_blinded(&mut OsRng, Oaep::new::<Sha256>(), wrapped)
            .map(Zeroizing::new)
            .map_err(|_| CryptoError::KeyUnwrap)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("modulus_bits", &self.modulus_bits())
            .finish_non_exhaustive()
    }
}

fn check_modulus(bits: usize) -> CryptoResult<()> {
    if bits < MIN_MODULUS_BITS {
        return Err(CryptoError::InvalidKey(format!(
            "RSA modulus of {bits} bits is below the {MIN_MODULUS_BITS}-bit minimum"
        )));
    }
    Ok(())
}

/// Generates a 2048-bit RSA-OAEP key pair with public exponent 65537.
pub fn generate_key_pair() -> CryptoResult<KeyPair> {
    generate_key_pair_with(&KeyParams::default())
}

/// Generates an RSA-OAEP key pair with the given parameters.
///
/// Entropy comes from the OS random source only; a failure there is a
/// `KeyGeneration` error, never a fallback.
pub fn generate_key_pair_with(params: &KeyParams) -> CryptoResult<KeyPair> {
    params.validate()?;

    let exponent = BigUint::from(PUBLIC_EXPONENT);
    let rsa_key = RsaPrivateKey::new_with_exp(&mut OsRng, params.modulus_bits, &exponent)
        .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;
    let private = PrivateKey(rsa_key);
    let public = private.public_key();

    let export_err = |e: CryptoError| CryptoError::KeyGeneration(format!("export failed: {e}"));
    let public_key = public.to_base64().map_err(export_err)?;
    let private_key = private.to_base64().map_err(export_err)?;

    debug!("generated {}-bit RSA-OAEP key pair", params.modulus_bits);

    Ok(KeyPair {
        public_key,
        private_key: String::clone(&private_key),
    })
}
