//! AES-256-GCM authenticated encryption envelope.
//!
//! Each call to `encrypt` draws a fresh random salt and nonce and prepends
//! both to the ciphertext, so the caller only needs to store one blob.
//!
//! Layout of the returned byte buffer:
//!   [ 32-byte salt | 12-byte nonce | ciphertext + 16-byte auth tag ]

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroize;

use crate::crypto::kdf::{derive_key, generate_salt, SALT_LEN};
use crate::errors::CryptoError;

/// Size of the AES-256-GCM nonce in bytes.
const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
const TAG_LEN: usize = 16;

/// Smallest possible envelope: salt + nonce + tag over empty plaintext.
pub const MIN_ENVELOPE_LEN: usize = SALT_LEN + NONCE_LEN + TAG_LEN;

/// Encrypt `plaintext` under a key derived from `password`.
///
/// Returns the full envelope (salt || nonce || ciphertext). A fresh salt
/// and nonce are drawn from the OS RNG on every call; neither is ever
/// reused.
pub fn encrypt(plaintext: &[u8], password: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if password.is_empty() {
        return Err(CryptoError::EmptyPassword);
    }

    let salt = generate_salt()?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng
        .try_fill_bytes(&mut nonce_bytes)
        .map_err(|e| CryptoError::Random(e.to_string()))?;

    let mut key = derive_key(password, &salt);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
    key.zeroize();

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .map_err(|e| CryptoError::Encrypt(e.to_string()))?;

    let mut output = Vec::with_capacity(SALT_LEN + NONCE_LEN + ciphertext.len());
    output.extend_from_slice(&salt);
    output.extend_from_slice(&nonce_bytes);
    output.extend_from_slice(&ciphertext);
    Ok(output)
}

/// Decrypt an envelope produced by `encrypt`.
///
/// Fails with `Authentication` when the password is wrong or any byte of
/// the envelope has been altered; the two cases are indistinguishable.
/// No plaintext is ever surfaced on tag failure.
pub fn decrypt(data: &[u8], password: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if password.is_empty() {
        return Err(CryptoError::EmptyPassword);
    }
    if data.len() < MIN_ENVELOPE_LEN {
        return Err(CryptoError::TooShort);
    }

    let (salt, rest) = data.split_at(SALT_LEN);
    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_LEN);

    let mut key = derive_key(password, salt);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
    key.zeroize();

    cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| CryptoError::Authentication)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_layout_has_salt_then_nonce_then_ciphertext() {
        let envelope = encrypt(b"VALUE=1", b"pw").unwrap();
        // salt + nonce + plaintext + tag
        assert_eq!(envelope.len(), SALT_LEN + NONCE_LEN + 7 + TAG_LEN);
    }

    #[test]
    fn empty_plaintext_produces_minimum_envelope() {
        let envelope = encrypt(b"", b"pw").unwrap();
        assert_eq!(envelope.len(), MIN_ENVELOPE_LEN);
    }

    #[test]
    fn empty_password_is_rejected() {
        assert!(matches!(
            encrypt(b"data", b""),
            Err(CryptoError::EmptyPassword)
        ));
        assert!(matches!(
            decrypt(&[0u8; 64], b""),
            Err(CryptoError::EmptyPassword)
        ));
    }

    #[test]
    fn short_input_is_rejected_before_key_derivation() {
        assert!(matches!(
            decrypt(&[0u8; MIN_ENVELOPE_LEN - 1], b"pw"),
            Err(CryptoError::TooShort)
        ));
    }
}
