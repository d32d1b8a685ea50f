//! Hardened-only hierarchical deterministic derivation (SLIP-0010, ed25519
//! curve parameters).
//!
//! Master key: `I = HMAC-SHA512(key = "ed25519 seed", data = seed)`.
//! Child key: `I = HMAC-SHA512(key = chain_code, data = 0x00 || key || ser32(i + 2^31))`.
//! In both cases the left half of `I` is the key and the right half is the
//! chain code. Only hardened children exist, so there is no public-key
//! derivation and no range check on the child key.
//!
//! The same 32-byte output is used as an Ed25519 seed for Solana and as a
//! secp256k1 scalar for Ethereum, which is what wallets built on the
//! `ed25519-hd-key` scheme do.

use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::WalletError;
use crate::keys::PrivateKey;
use crate::path::{HARDENED_OFFSET, parse_hardened_segments};

type HmacSha512 = Hmac<Sha512>;

/// HMAC key for the master node.
const MASTER_HMAC_KEY: &[u8] = b"ed25519 seed";

/// A node in the derivation tree: key plus chain code.
#[derive(Zeroize, ZeroizeOnDrop)]
struct ExtendedKey {
    key: [u8; 32],
    chain_code: [u8; 32],
}

impl ExtendedKey {
    fn master(seed: &[u8]) -> Result<Self, WalletError> {
        let mut mac = HmacSha512::new_from_slice(MASTER_HMAC_KEY)
            .map_err(|e| WalletError::KeyDerivation(format!("HMAC init: {e}")))?;
        mac.update(seed);
        Ok(Self::split(mac))
    }

    fn child(&self, index: u32) -> Result<Self, WalletError> {
        if index >= HARDENED_OFFSET {
            return Err(WalletError::InvalidPath(format!(
                "child index {index} exceeds the hardened range"
            )));
        }
        let mut mac = HmacSha512::new_from_slice(&self.chain_code)
            .map_err(|e| WalletError::KeyDerivation(format!("HMAC init: {e}")))?;
        mac.update(&[0x00]);
        mac.update(&self.key);
        mac.update(&(index | HARDENED_OFFSET).to_be_bytes());
        Ok(Self::split(mac))
    }

    fn split(mac: HmacSha512) -> Self {
        let mut out = [0u8; 64];
        out.copy_from_slice(&mac.finalize().into_bytes());
        let mut node = Self {
            key: [0u8; 32],
            chain_code: [0u8; 32],
        };
        node.key.copy_from_slice(&out[..32]);
        node.chain_code.copy_from_slice(&out[32..]);
        out.zeroize();
        node
    }
}

/// Derive the private key at the given hardened segments.
///
/// `segments` are raw indices; the hardened offset is applied here.
pub fn derive_hardened(seed: &[u8], segments: &[u32]) -> Result<PrivateKey, WalletError> {
    if seed.len() < 16 || seed.len() > 64 {
        return Err(WalletError::KeyDerivation(format!(
            "seed must be 16..=64 bytes, got {}",
            seed.len()
        )));
    }

    let mut node = ExtendedKey::master(seed)?;
    for &index in segments {
        // The parent is dropped (and zeroized) on reassignment.
        node = node.child(index)?;
    }
    Ok(PrivateKey::from_bytes(node.key))
}

/// Derive the private key at a path string such as `m/44'/501'/0'/0'`.
pub fn derive_path(seed: &[u8], path: &str) -> Result<PrivateKey, WalletError> {
    let segments = parse_hardened_segments(path)?;
    derive_hardened(seed, &segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    // SLIP-0010 test vector 1 for ed25519.
    const VECTOR_SEED: &str = "000102030405060708090a0b0c0d0e0f";

    fn vector_seed() -> Vec<u8> {
        hex::decode(VECTOR_SEED).unwrap()
    }

    #[test]
    fn slip10_master() {
        let key = derive_path(&vector_seed(), "m").unwrap();
        assert_eq!(
            hex::encode(key.as_bytes()),
            "2b4be7f19ee27bbf30c667b642d5f4aa69fd169872f8fc3059c08ebae2eb19e7"
        );
    }

    #[test]
    fn slip10_chain_code_master() {
        let node = ExtendedKey::master(&vector_seed()).unwrap();
        assert_eq!(
            hex::encode(node.chain_code),
            "90046a93de5380a72b5e45010748567d5ea02bbf6522f979e05c0d8d8ca9fffb"
        );
    }

    #[test]
    fn slip10_m_0h() {
        let key = derive_path(&vector_seed(), "m/0'").unwrap();
        assert_eq!(
            hex::encode(key.as_bytes()),
            "68e0fe46dfb67e368c75379acec591dad19df3cde26e63b93a8e704f1dade7a3"
        );
    }

    #[test]
    fn slip10_m_0h_1h() {
        let key = derive_path(&vector_seed(), "m/0'/1'").unwrap();
        assert_eq!(
            hex::encode(key.as_bytes()),
            "b1d0bad404bf35da785a64ca1ac54b2617211d2777696fbffaf208f746ae84f2"
        );
    }

    #[test]
    fn slip10_m_0h_1h_2h() {
        let key = derive_hardened(&vector_seed(), &[0, 1, 2]).unwrap();
        assert_eq!(
            hex::encode(key.as_bytes()),
            "92a5b23c0b8a99e37d07df3fb9966917f5d06e02ddbd909c7e184371463e9fc9"
        );
    }

    #[test]
    fn path_and_segments_agree() {
        let seed = [7u8; 64];
        let a = derive_path(&seed, "m/44'/501'/0'/5'").unwrap();
        let b = derive_hardened(&seed, &[44, 501, 0, 5]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unhardened_path_rejected() {
        let err = derive_path(&[1u8; 64], "m/44'/501'/0'/0").unwrap_err();
        assert!(err.to_string().contains("hardened"), "error was: {err}");
    }

    #[test]
    fn out_of_range_segment_rejected() {
        assert!(derive_hardened(&[1u8; 64], &[HARDENED_OFFSET]).is_err());
    }

    #[test]
    fn seed_length_checked() {
        assert!(derive_hardened(&[0u8; 15], &[0]).is_err());
        assert!(derive_hardened(&[0u8; 65], &[0]).is_err());
        assert!(derive_hardened(&[0u8; 16], &[0]).is_ok());
    }

    #[test]
    fn deterministic_and_index_sensitive() {
        let seed = [3u8; 64];
        let k0 = derive_hardened(&seed, &[44, 60, 0, 0]).unwrap();
        let k0_again = derive_hardened(&seed, &[44, 60, 0, 0]).unwrap();
        let k1 = derive_hardened(&seed, &[44, 60, 0, 1]).unwrap();
        assert_eq!(k0, k0_again);
        assert_ne!(k0, k1);
    }
}
