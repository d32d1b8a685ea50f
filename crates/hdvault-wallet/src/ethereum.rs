//! Ethereum key encoding and EIP-55 addresses.

use k256::SecretKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use tiny_keccak::{Hasher, Keccak};
use zeroize::{Zeroize, Zeroizing};

use crate::error::WalletError;
use crate::keys::{PRIVATE_KEY_LEN, PrivateKey};

/// Keccak-256 digest.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}

/// Checksummed address for a private key.
///
/// Fails if the bytes are zero or not below the curve order.
pub fn address(private_key: &PrivateKey) -> Result<String, WalletError> {
    let secret = SecretKey::from_slice(private_key.as_bytes()).map_err(|_| {
        WalletError::KeyDerivation("derived bytes are not a valid secp256k1 scalar".into())
    })?;
    let point = secret.public_key().to_encoded_point(false);
    // Uncompressed SEC1: 0x04 || X || Y. The address hashes X || Y.
    let hash = keccak256(&point.as_bytes()[1..]);
    Ok(to_checksum_address(&hash[12..]))
}

/// EIP-55 mixed-case encoding of a 20-byte address.
pub fn to_checksum_address(address: &[u8]) -> String {
    let lower = hex::encode(address);
    let hash = keccak256(lower.as_bytes());

    let mut out = String::with_capacity(2 + lower.len());
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = (hash[i / 2] >> if i % 2 == 0 { 4 } else { 0 }) & 0x0f;
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Check an address string.
///
/// All-lowercase or all-uppercase hex is accepted as unchecksummed; mixed
/// case must match the EIP-55 checksum.
pub fn is_valid_address(candidate: &str) -> bool {
    let Some(body) = candidate.strip_prefix("0x") else {
        return false;
    };
    let mut bytes = [0u8; 20];
    if hex::decode_to_slice(body, &mut bytes).is_err() {
        return false;
    }
    let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = body.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        to_checksum_address(&bytes) == candidate
    } else {
        true
    }
}

/// Lowercase hex of the 32-byte private key, without `0x`.
pub fn encode_private_key(private_key: &PrivateKey) -> Zeroizing<String> {
    Zeroizing::new(hex::encode(private_key.as_bytes()))
}

/// Parse a hex private key, with or without `0x`.
pub fn decode_private_key(encoded: &str) -> Result<PrivateKey, WalletError> {
    let trimmed = encoded.trim();
    let body = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let mut bytes = [0u8; PRIVATE_KEY_LEN];
    if let Err(e) = hex::decode_to_slice(body, &mut bytes) {
        bytes.zeroize();
        return Err(WalletError::InvalidKey(format!(
            "ethereum private key must be {PRIVATE_KEY_LEN} hex bytes: {e}"
        )));
    }
    if SecretKey::from_slice(&bytes).is_err() {
        bytes.zeroize();
        return Err(WalletError::InvalidKey(
            "ethereum private key is not a valid secp256k1 scalar".into(),
        ));
    }
    Ok(PrivateKey::from_bytes(bytes))
}
