//! # hdvault-wallet — multi-chain HD wallet core.
//!
//! Turns one BIP-39 mnemonic into reproducible Solana and Ethereum
//! keypairs at any account index, and manages the set of accounts a wallet
//! holds. Derivation is hardened-only SLIP-0010 over HMAC-SHA512.
//!
//! # Modules
//!
//! - [`error`] — `WalletError` enum
//! - [`keys`] — zeroizing `Seed` and `PrivateKey` buffers
//! - [`mnemonic`] — BIP-39 generation, validation, seed expansion
//! - [`path`] — `m/44'/<coin>'/0'/<index>'` paths
//! - [`hd`] — hardened child key derivation
//! - [`chain`] — `ChainKind` and chain-tagged keypairs
//! - [`solana`] — Ed25519 keys and base58 encodings
//! - [`ethereum`] — secp256k1 keys and EIP-55 addresses
//! - [`derive`] — seed + coin type + index to keypair
//! - [`wallet`] — `Wallet`, `CombinedWallet`, `WalletState`
//! - [`encryption`] — Argon2id + AES-256-GCM
//! - [`store`] — persisted JSON layout and encrypted wallet file

pub mod chain;
pub mod derive;
pub mod encryption;
pub mod error;
pub mod ethereum;
pub mod hd;
pub mod keys;
pub mod mnemonic;
pub mod path;
pub mod solana;
pub mod store;
pub mod wallet;

// Re-exports for convenient access
pub use chain::{ChainKeypair, ChainKind, Curve, coin_type};
pub use derive::{derive_account, derive_combined};
pub use error::WalletError;
pub use keys::{PrivateKey, Seed};
pub use mnemonic::{MnemonicPhrase, Strength, generate_mnemonic, validate_mnemonic};
pub use path::DerivationPath;
pub use store::{RecordLayout, StoredWallet};
pub use wallet::{CombinedWallet, Wallet, WalletState};
