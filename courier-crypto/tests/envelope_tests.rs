mod support;

use courier_crypto::{
    CryptoError, Envelope, NONCE_SIZE, TAG_SIZE, decrypt, decrypt_with_key, encrypt,
    encrypt_with_key,
};
use pretty_assertions::assert_eq;
use support::{alice, alice_private, alice_public, bob};

#[test]
fn encrypt_decrypt_roundtrip() {
    let kp = alice();
    let envelope = encrypt("meet at noon", &kp.public_key).unwrap();
    let plaintext = decrypt(&envelope, &kp.private_key).unwrap();

    assert_eq!(plaintext, "meet at noon");
}

#[test]
fn empty_message_roundtrip() {
    let kp = alice();
    let envelope = encrypt("", &kp.public_key).unwrap();

    assert_eq!(envelope.ciphertext.len(), TAG_SIZE);
    assert_eq!(decrypt(&envelope, &kp.private_key).unwrap(), "");
}

#[test]
fn multibyte_unicode_roundtrip() {
    let kp = alice();
    let message = "Grüße, 世界! Ünïcödé ✓ 👩‍👩‍👧 \u{0}";

    let envelope = encrypt(message, &kp.public_key).unwrap();
    assert_eq!(decrypt(&envelope, &kp.private_key).unwrap(), message);
}

#[test]
fn large_message_roundtrip() {
    let kp = alice();
    let message = "x".repeat(1 << 20);

    let envelope = encrypt(&message, &kp.public_key).unwrap();
    assert_eq!(envelope.ciphertext.len(), message.len() + TAG_SIZE);
    assert_eq!(decrypt(&envelope, &kp.private_key).unwrap(), message);
}

#[test]
fn imported_keys_roundtrip() {
    let envelope = encrypt_with_key("via handles", alice_public()).unwrap();
    assert_eq!(
        decrypt_with_key(&envelope, alice_private()).unwrap(),
        "via handles"
    );
}

// Scenario A
#[test]
fn hello_world_ciphertext_hides_plaintext() {
    let kp = alice();
    let message = "hello world 🌍";

    let envelope = encrypt(message, &kp.public_key).unwrap();

    assert_eq!(envelope.nonce.len(), NONCE_SIZE);
    assert_eq!(envelope.wrapped_key.len(), 256);
    assert_ne!(envelope.ciphertext.as_slice(), message.as_bytes());
    assert!(envelope.ciphertext.len() >= message.len() + TAG_SIZE);
    assert_eq!(decrypt(&envelope, &kp.private_key).unwrap(), message);
}

// Scenario B
#[test]
fn other_key_pair_cannot_decrypt() {
    let envelope = encrypt("secret", &alice().public_key).unwrap();
    let result = decrypt(&envelope, &bob().private_key);

    match result {
        Err(CryptoError::KeyUnwrap) | Err(CryptoError::Authentication) => {}
        other => panic!("expected unwrap/authentication failure, got: {other:?}"),
    }
}

#[test]
fn each_encryption_uses_fresh_key_and_nonce() {
    let kp = alice();

    let env1 = encrypt("same message", &kp.public_key).unwrap();
    let env2 = encrypt("same message", &kp.public_key).unwrap();

    assert_ne!(env1.nonce, env2.nonce);
    assert_ne!(env1.ciphertext, env2.ciphertext);
    assert_ne!(env1.wrapped_key, env2.wrapped_key);

    assert_eq!(decrypt(&env1, &kp.private_key).unwrap(), "same message");
    assert_eq!(decrypt(&env2, &kp.private_key).unwrap(), "same message");
}

#[test]
fn envelope_json_roundtrip() {
    let kp = alice();
    let envelope = encrypt("serialize me", &kp.public_key).unwrap();

    let json = envelope.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    for field in ["nonce", "ciphertext", "wrappedKey"] {
        assert!(value[field].is_string(), "missing string field {field}: {json}");
    }

    let parsed = Envelope::from_json(&json).unwrap();
    assert_eq!(parsed, envelope);
    assert_eq!(decrypt(&parsed, &kp.private_key).unwrap(), "serialize me");
}

#[test]
fn invalid_public_key_rejected() {
    for bad in ["", "not base64 at all!", "AAAA", "aGVsbG8gd29ybGQ="] {
        let err = encrypt("msg", bad).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidKey(_)), "{bad:?}: {err:?}");
    }
}

#[test]
fn private_key_is_not_a_public_key() {
    let err = encrypt("msg", &alice().private_key).unwrap_err();
    assert!(matches!(err, CryptoError::InvalidKey(_)));
}

#[test]
fn invalid_private_key_rejected() {
    let envelope = encrypt("msg", &alice().public_key).unwrap();

    let err = decrypt(&envelope, "bm90IGEga2V5").unwrap_err();
    assert!(matches!(err, CryptoError::InvalidKey(_)));

    let err = decrypt(&envelope, &alice().public_key).unwrap_err();
    assert!(matches!(err, CryptoError::InvalidKey(_)));
}

// Property-based tests
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn encrypt_decrypt_always_roundtrips(message in any::<String>()) {
            let envelope = encrypt_with_key(&message, alice_public()).unwrap();
            let recovered = decrypt_with_key(&envelope, alice_private()).unwrap();
            prop_assert_eq!(recovered, message);
        }

        #[test]
        fn json_form_always_roundtrips(message in "\\PC{0,64}") {
            let envelope = encrypt_with_key(&message, alice_public()).unwrap();
            let parsed = Envelope::from_json(&envelope.to_json().unwrap()).unwrap();
            prop_assert_eq!(decrypt_with_key(&parsed, alice_private()).unwrap(), message);
        }
    }
}
