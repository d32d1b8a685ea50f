//! Solana key encoding.
//!
//! The derived 32 bytes are an Ed25519 seed. The secret key handed to
//! wallets is the 64-byte `seed || public_key` form, base58-encoded; the
//! public key is the base58 of the 32-byte verifying key.

use ed25519_dalek::{SigningKey, VerifyingKey};
use zeroize::{Zeroize, Zeroizing};

use crate::error::WalletError;
use crate::keys::PrivateKey;

/// Length of the `seed || public_key` secret key.
pub const SECRET_KEY_LEN: usize = 64;

/// Base58 public key for a derived seed.
pub fn public_key(seed: &PrivateKey) -> String {
    let signing_key = SigningKey::from_bytes(seed.as_bytes());
    bs58::encode(signing_key.verifying_key().as_bytes()).into_string()
}

/// Base58 of the 64-byte secret key.
pub fn encode_secret_key(seed: &PrivateKey) -> Zeroizing<String> {
    let signing_key = SigningKey::from_bytes(seed.as_bytes());
    let mut keypair_bytes = signing_key.to_keypair_bytes();
    let encoded = bs58::encode(&keypair_bytes).into_string();
    keypair_bytes.zeroize();
    Zeroizing::new(encoded)
}

/// Decode a base58 64-byte secret key back to its 32-byte seed.
///
/// The public half must match the key derived from the seed half.
pub fn decode_secret_key(encoded: &str) -> Result<PrivateKey, WalletError> {
    let mut bytes = Zeroizing::new(
        bs58::decode(encoded.trim())
            .into_vec()
            .map_err(|e| WalletError::InvalidKey(format!("solana secret key base58: {e}")))?,
    );
    if bytes.len() != SECRET_KEY_LEN {
        return Err(WalletError::InvalidKey(format!(
            "solana secret key must be {SECRET_KEY_LEN} bytes, got {}",
            bytes.len()
        )));
    }

    let mut keypair_bytes = [0u8; SECRET_KEY_LEN];
    keypair_bytes.copy_from_slice(&bytes);
    bytes.zeroize();
    let signing_key = SigningKey::from_keypair_bytes(&keypair_bytes);
    keypair_bytes.zeroize();
    let signing_key = signing_key.map_err(|_| {
        WalletError::InvalidKey("solana secret key public half does not match".into())
    })?;

    Ok(PrivateKey::from_bytes(signing_key.to_bytes()))
}

/// Check that a string is a base58 encoding of a valid Ed25519 point.
pub fn is_valid_public_key(encoded: &str) -> bool {
    let mut bytes = [0u8; 32];
    match bs58::decode(encoded.trim()).onto(&mut bytes) {
        Ok(32) => VerifyingKey::from_bytes(&bytes).is_ok(),
        _ => false,
    }
}
