//! Shared fixtures for the integration tests.

use hdvault_wallet::{MnemonicPhrase, Seed, Strength, Wallet};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// The all-`abandon` BIP-39 test phrase.
pub const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

/// A second 12-word BIP-39 test phrase.
pub const LEGAL_WINNER: &str =
    "legal winner thank year wave sausage worth useful legal winner thank yellow";

/// Expected derivations for one account index of a fixed phrase.
pub struct Vector {
    pub account_index: u32,
    pub solana_public_key: &'static str,
    pub ethereum_address: &'static str,
}

/// Known derivations of [`ABANDON`].
pub const ABANDON_VECTORS: [Vector; 3] = [
    Vector {
        account_index: 0,
        solana_public_key: "HAgk14JpMQLgt6rVgv7cBQFJWFto5Dqxi472uT3DKpqk",
        ethereum_address: "0x2759A6Ad812b8A7B73A63a243816D66F5b72A0A7",
    },
    Vector {
        account_index: 1,
        solana_public_key: "GKreMsHvt8A79VApjboYDq3J4ZCXSJRYYQk9BscMbi1H",
        ethereum_address: "0x904f5439276a7CfE0adC19921aa1b604806f4C0d",
    },
    Vector {
        account_index: 2,
        solana_public_key: "9RYreF1nBs8Gvq94ACMBtVSVAVUBKSB9p6xdJBFyGApo",
        ethereum_address: "0xd48228905FFD1C9235AaA5Bb70783c27dE8cc76A",
    },
];

/// Known derivations of [`LEGAL_WINNER`] at index 0.
pub const LEGAL_WINNER_VECTOR: Vector = Vector {
    account_index: 0,
    solana_public_key: "BLeUXTx9thHGT7VJUtF9vHEmfMDgW1nnKZ9UVer2CoLX",
    ethereum_address: "0xD4a31a23f1ac1fF78649B2c5B5838805Da4c11C0",
};

/// Parse a phrase known to be valid.
pub fn phrase(words: &str) -> MnemonicPhrase {
    MnemonicPhrase::parse(words).unwrap()
}

/// Seed of a phrase known to be valid, empty passphrase.
pub fn seed_of(words: &str) -> Seed {
    phrase(words).to_seed("")
}

/// Wallet imported from [`ABANDON`].
pub fn abandon_wallet() -> Wallet {
    Wallet::import(ABANDON).unwrap()
}

/// Deterministic mnemonic from a 64-bit test seed.
pub fn mnemonic_from_u64(seed: u64, strength: Strength) -> MnemonicPhrase {
    let mut rng = StdRng::seed_from_u64(seed);
    hdvault_wallet::mnemonic::generate_mnemonic_with(&mut rng, strength).unwrap()
}
