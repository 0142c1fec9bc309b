//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! The iteration count is a fixed policy, not a per-archive parameter, so
//! the archive format never needs to carry KDF settings.

use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;

use crate::errors::CryptoError;

/// Length of the per-archive salt in bytes (256 bits).
pub const SALT_LEN: usize = 32;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// PBKDF2 iteration count.
const PBKDF2_ROUNDS: u32 = 100_000;

/// Derive a 32-byte encryption key from a password and salt.
///
/// The same password + salt always produce the same key.
pub fn derive_key(password: &[u8], salt: &[u8]) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password, salt, PBKDF2_ROUNDS, &mut key);
    key
}

/// Generate a cryptographically random 32-byte salt.
pub fn generate_salt() -> Result<[u8; SALT_LEN], CryptoError> {
    let mut salt = [0u8; SALT_LEN];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| CryptoError::Random(e.to_string()))?;
    Ok(salt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_inputs_same_key() {
        let salt = [7u8; SALT_LEN];
        let k1 = derive_key(b"hunter2", &salt);
        let k2 = derive_key(b"hunter2", &salt);
        assert_eq!(k1, k2);
    }

    #[test]
    fn different_salts_different_keys() {
        let k1 = derive_key(b"hunter2", &[1u8; SALT_LEN]);
        let k2 = derive_key(b"hunter2", &[2u8; SALT_LEN]);
        assert_ne!(k1, k2);
    }

    #[test]
    fn different_passwords_different_keys() {
        let salt = [9u8; SALT_LEN];
        assert_ne!(derive_key(b"one", &salt), derive_key(b"two", &salt));
    }

    #[test]
    fn salts_are_random() {
        let s1 = generate_salt().unwrap();
        let s2 = generate_salt().unwrap();
        assert_ne!(s1, s2);
    }
}
