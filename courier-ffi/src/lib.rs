//! C ABI exports for Courier message encryption.
//!
//! Exposes the crypto core to the host application (desktop and mobile
//! shells) through C-compatible functions:
//! - key pairs and envelopes cross the boundary as JSON strings
//! - keys are passed in explicitly on every call; nothing is cached here
//! - errors are reported via return codes
//!
//! Strings written to out pointers must be released with
//! [`courier_free_string`].

use courier_crypto::{CryptoError, Envelope};
use std::ffi::{CStr, CString, c_char};
use tracing::debug;
use zeroize::{Zeroize, Zeroizing};

/// Error codes returned by FFI functions.
///
/// Failures to unwrap the content key and tag mismatches share
/// `DecryptionFailed`; hosts must not be able to tell them apart.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourierError {
    /// Operation succeeded.
    Ok = 0,
    /// Null pointer argument.
    NullPointer = 1,
    /// Invalid UTF-8 string.
    InvalidUtf8 = 2,
    /// JSON serialization error.
    JsonError = 3,
    /// Key pair generation failed.
    KeyGenerationFailed = 4,
    /// Key material is malformed or of the wrong kind.
    InvalidKey = 5,
    /// Envelope is structurally invalid.
    MalformedEnvelope = 6,
    /// The message could not be decrypted with this key.
    DecryptionFailed = 7,
    /// Decrypted message is not valid UTF-8.
    InvalidEncoding = 8,
    /// Encryption failed.
    EncryptionFailed = 9,
    /// Result contains a NUL byte and cannot be returned as a C string.
    EmbeddedNul = 10,
    /// Unknown error.
    Unknown = 99,
}

impl From<&CryptoError> for CourierError {
    fn from(err: &CryptoError) -> Self {
        match err {
            CryptoError::KeyGeneration(_) | CryptoError::InvalidParams(_) => {
                Self::KeyGenerationFailed
            }
            CryptoError::InvalidKey(_) => Self::InvalidKey,
            CryptoError::MalformedEnvelope(_) => Self::MalformedEnvelope,
            CryptoError::KeyUnwrap | CryptoError::Authentication => Self::DecryptionFailed,
            CryptoError::Encoding => Self::InvalidEncoding,
            CryptoError::Encryption(_) => Self::EncryptionFailed,
            CryptoError::Task(_) => Self::Unknown,
        }
    }
}

fn crypto_err(op: &str, err: &CryptoError) -> CourierError {
    debug!("{op} failed: {}", err.user_message());
    CourierError::from(err)
}

/// Helper: parse a C string pointer to &str.
unsafe fn parse_cstr<'a>(ptr: *const c_char) -> Result<&'a str, CourierError> {
    if ptr.is_null() {
        return Err(CourierError::NullPointer);
    }
    unsafe { CStr::from_ptr(ptr).to_str().map_err(|_| CourierError::InvalidUtf8) }
}

/// Helper: hand a Rust string to the caller through an out pointer.
unsafe fn write_string_out(out: *mut *mut c_char, value: &str) -> CourierError {
    match CString::new(value) {
        Ok(c_value) => {
            unsafe { *out = c_value.into_raw() };
            CourierError::Ok
        }
        Err(e) => {
            e.into_vec().zeroize();
            CourierError::EmbeddedNul
        }
    }
}

// ============================================================================
// Core Functions
// ============================================================================

/// Installs the tracing subscriber. `RUST_LOG` controls the filter
/// (default `info`). Safe to call more than once.
#[unsafe(no_mangle)]
pub extern "C" fn courier_init() -> CourierError {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    CourierError::Ok
}

/// Returns the library version as a string.
///
/// # Safety
/// - The returned string is statically allocated and must not be freed.
#[unsafe(no_mangle)]
pub extern "C" fn courier_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

/// Frees a string allocated by this library.
///
/// # Safety
/// - `s` must be a string allocated by this library, or null.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn courier_free_string(s: *mut c_char) { unsafe {
    if !s.is_null() {
        let mut bytes = CString::from_raw(s).into_bytes();
        bytes.zeroize();
    }
}}

// ============================================================================
// Key Pairs
// ============================================================================

/// Generates a 2048-bit RSA-OAEP key pair.
///
/// Writes `{"publicKey": ..., "privateKey": ...}` to `out_json`.
///
/// # Safety
/// - `out_json` must be a valid pointer. The result must be freed with `courier_free_string`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn courier_generate_key_pair(out_json: *mut *mut c_char) -> CourierError { unsafe {
    if out_json.is_null() {
        return CourierError::NullPointer;
    }

    let key_pair = match courier_crypto::generate_key_pair() {
        Ok(kp) => kp,
        Err(e) => return crypto_err("key generation", &e),
    };

    match serde_json::to_string(&key_pair) {
        Ok(json) => write_string_out(out_json, &Zeroizing::new(json)),
        Err(_) => CourierError::JsonError,
    }
}}

/// Computes the SHA-256 fingerprint (lowercase hex) of a base64 public key.
///
/// # Safety
/// - `public_key` must be a valid null-terminated UTF-8 string.
/// - `out_hex` must be a valid pointer. The result must be freed with `courier_free_string`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn courier_fingerprint(
    public_key: *const c_char,
    out_hex: *mut *mut c_char,
) -> CourierError { unsafe {
    if out_hex.is_null() {
        return CourierError::NullPointer;
    }
    let public_key = match parse_cstr(public_key) {
        Ok(s) => s,
        Err(e) => return e,
    };

    let fingerprint = courier_crypto::PublicKey::from_base64(public_key)
        .and_then(|pk| pk.fingerprint());
    match fingerprint {
        Ok(hex) => write_string_out(out_hex, &hex),
        Err(e) => crypto_err("fingerprint", &e),
    }
}}

// ============================================================================
// Envelopes
// ============================================================================

/// Encrypts `message` for the owner of `public_key` (base64).
///
/// Writes the envelope JSON to `out_json`.
///
/// # Safety
/// - `message` and `public_key` must be valid null-terminated UTF-8 strings.
/// - `out_json` must be a valid pointer. The result must be freed with `courier_free_string`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn courier_encrypt(
    message: *const c_char,
    public_key: *const c_char,
    out_json: *mut *mut c_char,
) -> CourierError { unsafe {
    if out_json.is_null() {
        return CourierError::NullPointer;
    }
    let message = match parse_cstr(message) {
        Ok(s) => s,
        Err(e) => return e,
    };
    let public_key = match parse_cstr(public_key) {
        Ok(s) => s,
        Err(e) => return e,
    };

    let envelope = match courier_crypto::encrypt(message, public_key) {
        Ok(env) => env,
        Err(e) => return crypto_err("encrypt", &e),
    };

    match envelope.to_json() {
        Ok(json) => write_string_out(out_json, &json),
        Err(_) => CourierError::JsonError,
    }
}}

/// Decrypts an envelope (JSON) with `private_key` (base64).
///
/// Writes the plaintext to `out_plaintext`.
///
/// # Safety
/// - `envelope_json` and `private_key` must be valid null-terminated UTF-8 strings.
/// - `out_plaintext` must be a valid pointer. The result must be freed with `courier_free_string`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn courier_decrypt(
    envelope_json: *const c_char,
    private_key: *const c_char,
    out_plaintext: *mut *mut c_char,
) -> CourierError { unsafe {
    if out_plaintext.is_null() {
        return CourierError::NullPointer;
    }
    let envelope_json = match parse_cstr(envelope_json) {
        Ok(s) => s,
        Err(e) => return e,
    };
    let private_key = match parse_cstr(private_key) {
        Ok(s) => s,
        Err(e) => return e,
    };

    // Key import comes before envelope parsing, matching the core's order.
    let private = match courier_crypto::PrivateKey::from_base64(private_key) {
        Ok(pk) => pk,
        Err(e) => return crypto_err("decrypt", &e),
    };
    let envelope = match Envelope::from_json(envelope_json) {
        Ok(env) => env,
        Err(e) => return crypto_err("decrypt", &e),
    };

    match courier_crypto::decrypt_with_key(&envelope, &private) {
        Ok(plaintext) => write_string_out(out_plaintext, &Zeroizing::new(plaintext)),
        Err(e) => crypto_err("decrypt", &e),
    }
}}
