//! Owned secret buffers.
//!
//! Seeds and derived private keys live in fixed-size buffers that are
//! zeroized on drop. Neither type implements `Clone` or `Copy`; callers that
//! need the raw bytes borrow them for the duration of one computation.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of a BIP-39 seed in bytes.
pub const SEED_LEN: usize = 64;

/// Length of a derived private key in bytes.
pub const PRIVATE_KEY_LEN: usize = 32;

/// A 64-byte BIP-39 seed.
///
/// Pure function of the mnemonic and passphrase. Never persisted; recompute
/// it from the mnemonic when needed.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Seed {
    bytes: [u8; SEED_LEN],
}

impl Seed {
    /// Wrap raw seed bytes.
    pub fn from_bytes(bytes: [u8; SEED_LEN]) -> Self {
        Self { bytes }
    }

    /// Get the raw seed bytes. Handle with care.
    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.bytes
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Seed")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

impl PartialEq for Seed {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for Seed {}

/// A 32-byte private key produced by hardened derivation.
///
/// Interpreted as an Ed25519 seed on the Solana chain and as a secp256k1
/// scalar on the Ethereum chain.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    bytes: [u8; PRIVATE_KEY_LEN],
}

impl PrivateKey {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; PRIVATE_KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Get the raw key bytes. Handle with care.
    pub fn as_bytes(&self) -> &[u8; PRIVATE_KEY_LEN] {
        &self.bytes
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for PrivateKey {}
