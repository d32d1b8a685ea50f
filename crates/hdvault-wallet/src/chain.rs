//! Supported chains and their derived keypairs.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::WalletError;
use crate::keys::PrivateKey;
use crate::path::DerivationPath;
use crate::{ethereum, solana};

/// SLIP-44 coin types of the supported chains.
pub mod coin_type {
    /// Solana.
    pub const SOLANA: u32 = 501;
    /// Ethereum.
    pub const ETHEREUM: u32 = 60;
}

/// The closed set of chains a wallet derives keys for.
///
/// Each variant fixes the curve used to interpret the derived 32 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainKind {
    /// Ed25519 keys, base58 encoding.
    Solana,
    /// secp256k1 keys, hex private key, EIP-55 address.
    Ethereum,
}

impl ChainKind {
    /// All supported chains, in record order.
    pub const ALL: [ChainKind; 2] = [ChainKind::Solana, ChainKind::Ethereum];

    /// SLIP-44 coin type used in this chain's derivation path.
    pub const fn coin_type(self) -> u32 {
        match self {
            ChainKind::Solana => coin_type::SOLANA,
            ChainKind::Ethereum => coin_type::ETHEREUM,
        }
    }

    /// Look up the chain registered for a coin type.
    pub fn from_coin_type(value: u32) -> Result<Self, WalletError> {
        match value {
            coin_type::SOLANA => Ok(ChainKind::Solana),
            coin_type::ETHEREUM => Ok(ChainKind::Ethereum),
            other => Err(WalletError::UnsupportedCoinType(other)),
        }
    }

    /// Human-readable chain name.
    pub const fn name(self) -> &'static str {
        match self {
            ChainKind::Solana => "Solana",
            ChainKind::Ethereum => "Ethereum",
        }
    }

    /// Curve the derived key is interpreted on.
    pub const fn curve(self) -> Curve {
        match self {
            ChainKind::Solana => Curve::Ed25519,
            ChainKind::Ethereum => Curve::Secp256k1,
        }
    }
}

impl fmt::Display for ChainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Elliptic curve of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Curve {
    /// Edwards25519.
    Ed25519,
    /// secp256k1.
    Secp256k1,
}

/// A chain-tagged keypair derived at one path.
///
/// Holds the raw 32-byte derived key; encoded private keys are produced on
/// demand as zeroizing strings. Not `Clone`: re-derive instead of copying.
pub struct ChainKeypair {
    chain: ChainKind,
    path: DerivationPath,
    private_key: PrivateKey,
    public_key: String,
}

impl ChainKeypair {
    /// Build a keypair for `chain` from a derived private key.
    ///
    /// Fails if the bytes are not a valid key on the chain's curve.
    pub fn from_private_key(
        chain: ChainKind,
        path: DerivationPath,
        private_key: PrivateKey,
    ) -> Result<Self, WalletError> {
        if path.coin_type() != chain.coin_type() {
            return Err(WalletError::InvalidPath(format!(
                "{path} does not belong to {chain}"
            )));
        }
        let public_key = match chain {
            ChainKind::Solana => solana::public_key(&private_key),
            ChainKind::Ethereum => ethereum::address(&private_key)?,
        };
        Ok(Self {
            chain,
            path,
            private_key,
            public_key,
        })
    }

    /// Chain this keypair belongs to.
    pub fn chain(&self) -> ChainKind {
        self.chain
    }

    /// Path that produced this keypair.
    pub fn path(&self) -> DerivationPath {
        self.path
    }

    /// Account index of the path.
    pub fn account_index(&self) -> u32 {
        self.path.account_index()
    }

    /// Public identifier: base58 public key (Solana) or checksummed
    /// address (Ethereum).
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Private key in the chain's native text encoding.
    ///
    /// Solana: base58 of the 64-byte `seed || public` secret key.
    /// Ethereum: lowercase hex of the 32-byte scalar, no `0x`.
    pub fn encoded_private_key(&self) -> Zeroizing<String> {
        match self.chain {
            ChainKind::Solana => solana::encode_secret_key(&self.private_key),
            ChainKind::Ethereum => ethereum::encode_private_key(&self.private_key),
        }
    }

    /// Raw derived private key. Handle with care.
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }
}

impl fmt::Debug for ChainKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainKeypair")
            .field("chain", &self.chain)
            .field("path", &self.path.to_string())
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

impl PartialEq for ChainKeypair {
    fn eq(&self, other: &Self) -> bool {
        self.chain == other.chain
            && self.path == other.path
            && self.private_key == other.private_key
            && self.public_key == other.public_key
    }
}

impl Eq for ChainKeypair {}

/// Decode a private key from a chain's native text encoding.
pub fn decode_private_key(chain: ChainKind, encoded: &str) -> Result<PrivateKey, WalletError> {
    match chain {
        ChainKind::Solana => solana::decode_secret_key(encoded),
        ChainKind::Ethereum => ethereum::decode_private_key(encoded),
    }
}
