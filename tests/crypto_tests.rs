//! Integration tests for the cryptographic envelope.

use goingenv::crypto::{decrypt, derive_key, encrypt, generate_salt, MIN_ENVELOPE_LEN};
use goingenv::errors::CryptoError;

// ---------------------------------------------------------------------------
// Round-trip
// ---------------------------------------------------------------------------

#[test]
fn encrypt_decrypt_roundtrip() {
    let plaintext = b"DATABASE_URL=postgres://localhost/mydb";

    let envelope = encrypt(plaintext, b"p@ss").expect("encrypt should succeed");

    // Envelope adds 32-byte salt + 12-byte nonce + 16-byte tag.
    assert_eq!(envelope.len(), plaintext.len() + MIN_ENVELOPE_LEN);

    let recovered = decrypt(&envelope, b"p@ss").expect("decrypt should succeed");
    assert_eq!(recovered, plaintext);
}

#[test]
fn empty_plaintext_roundtrips() {
    let envelope = encrypt(b"", b"p@ss").expect("encrypt");
    assert_eq!(envelope.len(), MIN_ENVELOPE_LEN);
    assert_eq!(decrypt(&envelope, b"p@ss").expect("decrypt"), b"");
}

#[test]
fn large_plaintext_roundtrips() {
    let plaintext: Vec<u8> = (0..1_000_000u32).map(|i| (i % 251) as u8).collect();
    let envelope = encrypt(&plaintext, b"p@ss").expect("encrypt");
    assert_eq!(decrypt(&envelope, b"p@ss").expect("decrypt"), plaintext);
}

// ---------------------------------------------------------------------------
// Fresh randomness
// ---------------------------------------------------------------------------

#[test]
fn successive_encryptions_never_repeat() {
    let plaintext = b"SECRET=hello";
    let envelopes: Vec<Vec<u8>> = (0..3)
        .map(|_| encrypt(plaintext, b"same-password").expect("encrypt"))
        .collect();

    // Fresh salt and nonce per call: every ciphertext is distinct, and so
    // is every salt and nonce region.
    for i in 0..envelopes.len() {
        for j in (i + 1)..envelopes.len() {
            assert_ne!(envelopes[i], envelopes[j]);
            assert_ne!(envelopes[i][..32], envelopes[j][..32], "salt reused");
            assert_ne!(envelopes[i][32..44], envelopes[j][32..44], "nonce reused");
        }
    }
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[test]
fn wrong_password_fails_with_authentication() {
    let envelope = encrypt(b"VALUE=42", b"correct").expect("encrypt");
    let err = decrypt(&envelope, b"wrong").unwrap_err();
    assert!(matches!(err, CryptoError::Authentication));
}

#[test]
fn every_single_byte_flip_is_detected() {
    // Property: a flip at *any* offset — salt, nonce, ciphertext, or tag —
    // must surface as the same authentication failure.
    let envelope = encrypt(b"X=1", b"p").expect("encrypt");

    for offset in 0..envelope.len() {
        let mut tampered = envelope.clone();
        tampered[offset] ^= 0x01;
        let err = decrypt(&tampered, b"p").unwrap_err();
        assert!(
            matches!(err, CryptoError::Authentication),
            "flip at offset {offset} gave {err:?}"
        );
    }
}

#[test]
fn truncated_envelope_is_too_short() {
    let envelope = encrypt(b"VALUE=42", b"p").expect("encrypt");
    let err = decrypt(&envelope[..MIN_ENVELOPE_LEN - 1], b"p").unwrap_err();
    assert!(matches!(err, CryptoError::TooShort));

    let err = decrypt(&[], b"p").unwrap_err();
    assert!(matches!(err, CryptoError::TooShort));
}

#[test]
fn empty_password_is_rejected_on_both_paths() {
    assert!(matches!(
        encrypt(b"data", b"").unwrap_err(),
        CryptoError::EmptyPassword
    ));

    let envelope = encrypt(b"data", b"p").expect("encrypt");
    assert!(matches!(
        decrypt(&envelope, b"").unwrap_err(),
        CryptoError::EmptyPassword
    ));
}

// ---------------------------------------------------------------------------
// Key derivation
// ---------------------------------------------------------------------------

#[test]
fn derive_key_is_deterministic() {
    let salt = generate_salt().expect("salt");
    assert_eq!(derive_key(b"pw", &salt), derive_key(b"pw", &salt));
    assert_ne!(derive_key(b"pw", &salt), derive_key(b"other", &salt));
}
