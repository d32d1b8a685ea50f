//! Password encryption for wallet files.
//!
//! The key is derived with Argon2id and the payload sealed with
//! AES-256-GCM.
//!
//! # Wire format
//! ```text
//! salt (32 bytes) || nonce (12 bytes) || ciphertext + auth_tag
//! ```

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::error::WalletError;

/// Salt length in bytes.
pub const SALT_LEN: usize = 32;

/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes.
const TAG_LEN: usize = 16;

/// Minimum encrypted payload size (salt + nonce + auth tag).
const MIN_ENCRYPTED_LEN: usize = SALT_LEN + NONCE_LEN + TAG_LEN;

/// Argon2id memory cost in KiB.
const KDF_MEMORY_KIB: u32 = 19 * 1024;

/// Argon2id passes.
const KDF_ITERATIONS: u32 = 2;

/// Argon2id lanes.
const KDF_PARALLELISM: u32 = 1;

/// Derive a 256-bit encryption key from a password and salt with Argon2id.
pub fn derive_key(password: &[u8], salt: &[u8]) -> Result<Zeroizing<[u8; 32]>, WalletError> {
    let params = Params::new(KDF_MEMORY_KIB, KDF_ITERATIONS, KDF_PARALLELISM, Some(32))
        .map_err(|e| WalletError::Encryption(format!("argon2 params: {e}")))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new([0u8; 32]);
    argon2
        .hash_password_into(password, salt, &mut key[..])
        .map_err(|e| WalletError::Encryption(format!("argon2: {e}")))?;
    Ok(key)
}

/// Encrypt plaintext with a password.
///
/// Generates a random salt and nonce. Returns `salt || nonce || ciphertext+tag`.
pub fn encrypt(plaintext: &[u8], password: &[u8]) -> Result<Vec<u8>, WalletError> {
    let mut salt = [0u8; SALT_LEN];
    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng
        .try_fill_bytes(&mut salt)
        .and_then(|()| OsRng.try_fill_bytes(&mut nonce_bytes))
        .map_err(|e| WalletError::EntropySourceFailure(e.to_string()))?;

    let key = derive_key(password, &salt)?;
    let cipher = Aes256Gcm::new_from_slice(&key[..])
        .map_err(|e| WalletError::Encryption(e.to_string()))?;
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| WalletError::Encryption(e.to_string()))?;

    let mut result = Vec::with_capacity(SALT_LEN + NONCE_LEN + ciphertext.len());
    result.extend_from_slice(&salt);
    result.extend_from_slice(&nonce_bytes);
    result.extend_from_slice(&ciphertext);
    Ok(result)
}

/// Decrypt data produced by [`encrypt`].
///
/// A wrong password and a tampered payload are indistinguishable; both
/// return [`WalletError::InvalidPassword`].
pub fn decrypt(encrypted: &[u8], password: &[u8]) -> Result<Zeroizing<Vec<u8>>, WalletError> {
    if encrypted.len() < MIN_ENCRYPTED_LEN {
        return Err(WalletError::CorruptedFile(format!(
            "encrypted data too short: {} < {MIN_ENCRYPTED_LEN}",
            encrypted.len()
        )));
    }

    let (salt, rest) = encrypted.split_at(SALT_LEN);
    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_LEN);

    let key = derive_key(password, salt)?;
    let cipher = Aes256Gcm::new_from_slice(&key[..])
        .map_err(|e| WalletError::Decryption(e.to_string()))?;
    let nonce = Nonce::from_slice(nonce_bytes);

    cipher
        .decrypt(nonce, ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| WalletError::InvalidPassword)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let password = b"correct horse battery staple";
        let plaintext = b"{\"mnemonics\":[]}";

        let encrypted = encrypt(plaintext, password).unwrap();
        let decrypted = decrypt(&encrypted, password).unwrap();
        assert_eq!(decrypted.as_slice(), plaintext);
    }

    #[test]
    fn empty_plaintext() {
        let encrypted = encrypt(b"", b"pw").unwrap();
        assert_eq!(encrypted.len(), MIN_ENCRYPTED_LEN);
        assert!(decrypt(&encrypted, b"pw").unwrap().is_empty());
    }

    #[test]
    fn salt_and_nonce_are_fresh() {
        let a = encrypt(b"same", b"pw").unwrap();
        let b = encrypt(b"same", b"pw").unwrap();
        assert_ne!(&a[..SALT_LEN + NONCE_LEN], &b[..SALT_LEN + NONCE_LEN]);
    }

    #[test]
    fn wrong_password_fails() {
        let encrypted = encrypt(b"secret", b"correct").unwrap();
        assert_eq!(
            decrypt(&encrypted, b"wrong").unwrap_err(),
            WalletError::InvalidPassword
        );
    }

    #[test]
    fn truncated_data_fails() {
        let err = decrypt(&[0u8; 10], b"password").unwrap_err();
        assert!(matches!(err, WalletError::CorruptedFile(_)));
    }

    #[test]
    fn tampering_is_detected() {
        let encrypted = encrypt(b"secret data", b"password").unwrap();
        // Salt, nonce, and ciphertext bytes respectively.
        for pos in [0, SALT_LEN, encrypted.len() - 1] {
            let mut tampered = encrypted.clone();
            tampered[pos] ^= 0xFF;
            assert_eq!(
                decrypt(&tampered, b"password").unwrap_err(),
                WalletError::InvalidPassword,
                "tampering at byte {pos} went unnoticed"
            );
        }
    }

    #[test]
    fn derive_key_depends_on_inputs() {
        let salt = [9u8; SALT_LEN];
        let k1 = derive_key(b"password1", &salt).unwrap();
        let k1_again = derive_key(b"password1", &salt).unwrap();
        let k2 = derive_key(b"password2", &salt).unwrap();
        let k3 = derive_key(b"password1", &[8u8; SALT_LEN]).unwrap();
        assert_eq!(*k1, *k1_again);
        assert_ne!(*k1, *k2);
        assert_ne!(*k1, *k3);
    }

    #[test]
    fn short_salt_is_rejected() {
        assert!(matches!(
            derive_key(b"pw", b"abc"),
            Err(WalletError::Encryption(_))
        ));
    }
}
