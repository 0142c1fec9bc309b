//! Cryptographic envelope: key derivation and authenticated encryption.
//!
//! This is the only module that knows about keys. Everything above it works
//! with opaque blobs and a borrowed password.

pub mod envelope;
pub mod kdf;

pub use envelope::{decrypt, encrypt, MIN_ENVELOPE_LEN};
pub use kdf::{derive_key, generate_salt};

use crate::errors::CryptoError;

/// Seam between the archive layer and the cipher, so the container codec
/// can be exercised with a pass-through double in tests.
pub trait Cryptor {
    fn encrypt(&self, plaintext: &[u8], password: &[u8]) -> Result<Vec<u8>, CryptoError>;
    fn decrypt(&self, data: &[u8], password: &[u8]) -> Result<Vec<u8>, CryptoError>;
}

/// The production cryptor: PBKDF2-derived key, AES-256-GCM envelope.
#[derive(Debug, Default, Clone, Copy)]
pub struct PasswordCryptor;

impl Cryptor for PasswordCryptor {
    fn encrypt(&self, plaintext: &[u8], password: &[u8]) -> Result<Vec<u8>, CryptoError> {
        envelope::encrypt(plaintext, password)
    }

    fn decrypt(&self, data: &[u8], password: &[u8]) -> Result<Vec<u8>, CryptoError> {
        envelope::decrypt(data, password)
    }
}
