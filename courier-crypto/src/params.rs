//! Key generation parameters.

use crate::error::{CryptoError, CryptoResult};
use serde::{Deserialize, Serialize};

/// Default RSA modulus size in bits.
pub const DEFAULT_MODULUS_BITS: usize = 2048;

/// Smallest modulus accepted for generation or import.
pub const MIN_MODULUS_BITS: usize = 2048;

/// RSA public exponent (F4).
pub const PUBLIC_EXPONENT: u64 = 65_537;

const SUPPORTED_MODULUS_BITS: [usize; 3] = [2048, 3072, 4096];

/// Parameters for RSA-OAEP key pair generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyParams {
    /// RSA modulus size in bits.
    pub modulus_bits: usize,
}

impl Default for KeyParams {
    fn default() -> Self {
        Self {
            modulus_bits: DEFAULT_MODULUS_BITS,
        }
    }
}

impl KeyParams {
    /// Parameters with a specific modulus size.
    pub fn with_modulus_bits(modulus_bits: usize) -> Self {
        Self { modulus_bits }
    }

    /// Checks that the parameters describe a supported key size.
    pub fn validate(&self) -> CryptoResult<()> {
        if SUPPORTED_MODULUS_BITS.contains(&self.modulus_bits) {
            Ok(())
        } else {
            Err(CryptoError::InvalidParams(format!(
                "unsupported modulus size {} (expected one of {SUPPORTED_MODULUS_BITS:?})",
                self.modulus_bits
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_2048() {
        let params = KeyParams::default();
        assert_eq!(params.modulus_bits, 2048);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn rejects_weak_and_odd_sizes() {
        for bits in [0, 512, 1024, 2047, 2049, 8192] {
            let err = KeyParams::with_modulus_bits(bits).validate().unwrap_err();
            assert!(matches!(err, CryptoError::InvalidParams(_)), "{bits}: {err:?}");
        }
    }

    #[test]
    fn serde_uses_camel_case() {
        let json = serde_json::to_string(&KeyParams::with_modulus_bits(3072)).unwrap();
        assert_eq!(json, r#"{"modulusBits":3072}"#);
        let parsed: KeyParams = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.modulus_bits, 3072);
    }
}
