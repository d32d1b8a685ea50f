//! Persisted wallet layout and the encrypted wallet file.
//!
//! The JSON layout keeps the three top-level keys the browser wallet used
//! (`mnemonics`, `paths`, `wallets`) so existing exports load unchanged.
//! Only the mnemonic and the account indices are authoritative: every
//! stored key is re-derived on load and must match.
//!
//! # File format
//! ```text
//! header_len (4 bytes LE) || header_json || encrypted_payload
//! ```
//! The header is unencrypted JSON with magic and version. The payload is the
//! compact JSON layout sealed by [`encryption::encrypt`].

use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::chain::{ChainKind, coin_type, decode_private_key};
use crate::derive::derive_combined;
use crate::encryption;
use crate::error::WalletError;
use crate::mnemonic::MnemonicPhrase;
use crate::path::DerivationPath;
use crate::wallet::{CombinedWallet, Wallet};

/// Magic bytes identifying an hdvault wallet file.
pub const WALLET_MAGIC: &[u8; 4] = b"HDVW";

/// Current wallet file format version.
pub const WALLET_VERSION: u32 = 1;

/// Whether each record repeats the wallet mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordLayout {
    /// Mnemonic stored once, at the top level.
    #[default]
    Compact,
    /// Mnemonic also copied into every record, as the browser wallet wrote it.
    Legacy,
}

/// One persisted account record.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mnemonic: Option<String>,
    pub solana_public_key: String,
    pub solana_private_key: String,
    pub solana_path: String,
    pub ethereum_public_key: String,
    pub ethereum_private_key: String,
    pub ethereum_path: String,
}

/// The persisted wallet.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct StoredWallet {
    pub mnemonics: Vec<String>,
    /// Coin type per record. Written for compatibility, ignored on read.
    #[serde(default)]
    pub paths: Vec<String>,
    pub wallets: Vec<StoredRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_account_index: Option<u32>,
}

impl StoredWallet {
    /// Snapshot a wallet.
    pub fn from_wallet(wallet: &Wallet, layout: RecordLayout) -> Self {
        let mnemonic = wallet.mnemonic();
        let wallets = wallet
            .accounts()
            .iter()
            .map(|account| {
                let sol = account.solana();
                let eth = account.ethereum();
                StoredRecord {
                    mnemonic: match layout {
                        RecordLayout::Compact => None,
                        RecordLayout::Legacy => Some(mnemonic.phrase().to_string()),
                    },
                    solana_public_key: sol.public_key().to_string(),
                    solana_private_key: sol.encoded_private_key().to_string(),
                    solana_path: sol.path().to_string(),
                    ethereum_public_key: eth.public_key().to_string(),
                    ethereum_private_key: eth.encoded_private_key().to_string(),
                    ethereum_path: eth.path().to_string(),
                }
            })
            .collect::<Vec<_>>();

        Self {
            mnemonics: mnemonic.words().map(str::to_string).collect(),
            paths: vec![coin_type::SOLANA.to_string(); wallets.len()],
            wallets,
            next_account_index: Some(wallet.next_account_index()),
        }
    }

    /// Rebuild and verify the wallet.
    ///
    /// The mnemonic is validated first. Each record must carry well-formed
    /// paths for the right chains at one shared index, and its keys must be
    /// exactly what the mnemonic derives there.
    ///
    /// Layouts without `nextAccountIndex` picked the next index from the
    /// record count, so deleting and then adding could store one index
    /// twice. There a verified repeat is dropped; with a counter present
    /// it is rejected.
    pub fn into_wallet(self) -> Result<Wallet, WalletError> {
        let mnemonic = MnemonicPhrase::parse(&self.mnemonics.join(" "))?;
        if self.wallets.is_empty() {
            return Err(WalletError::InvariantViolation(
                "stored wallet has no accounts".into(),
            ));
        }

        let seed = mnemonic.to_seed("");
        let legacy_counter = self.next_account_index.is_none();
        let mut accounts = Vec::with_capacity(self.wallets.len());
        let mut seen = BTreeSet::new();
        for record in &self.wallets {
            let account_index = record_index(record)?;
            let same_mnemonic = match &record.mnemonic {
                Some(stored) => MnemonicPhrase::parse(stored).is_ok_and(|m| m == mnemonic),
                None => true,
            };
            if !same_mnemonic {
                return Err(WalletError::RecordMismatch {
                    account_index,
                    reason: "record mnemonic differs from the wallet mnemonic".into(),
                });
            }
            let derived = derive_combined(&seed, account_index)?;
            verify_record(record, &derived)?;
            if !seen.insert(account_index) && legacy_counter {
                warn!(account_index, "dropped duplicate account record");
                continue;
            }
            accounts.push(derived);
        }

        let next_account_index = match self.next_account_index {
            Some(next) => next,
            None => accounts
                .iter()
                .map(CombinedWallet::account_index)
                .max()
                .unwrap_or(0)
                .saturating_add(1),
        };
        let wallet = Wallet::from_records(mnemonic, accounts, next_account_index)?;
        info!(
            accounts = wallet.len(),
            next_account_index = wallet.next_account_index(),
            "restored wallet"
        );
        Ok(wallet)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<Zeroizing<String>, WalletError> {
        serde_json::to_string_pretty(self)
            .map(Zeroizing::new)
            .map_err(|e| WalletError::Serialization(e.to_string()))
    }

    /// Parse JSON without verifying it; see [`into_wallet`](Self::into_wallet).
    pub fn from_json(json: &str) -> Result<Self, WalletError> {
        serde_json::from_str(json).map_err(|e| WalletError::Serialization(e.to_string()))
    }
}

impl std::fmt::Debug for StoredWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredWallet")
            .field("words", &self.mnemonics.len())
            .field("records", &self.wallets.len())
            .field("next_account_index", &self.next_account_index)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for StoredRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredRecord")
            .field("solana_public_key", &self.solana_public_key)
            .field("solana_path", &self.solana_path)
            .field("ethereum_public_key", &self.ethereum_public_key)
            .field("ethereum_path", &self.ethereum_path)
            .finish_non_exhaustive()
    }
}

/// Account index of a record; both paths must agree on it.
fn record_index(record: &StoredRecord) -> Result<u32, WalletError> {
    let sol: DerivationPath = record.solana_path.parse()?;
    let eth: DerivationPath = record.ethereum_path.parse()?;
    let account_index = sol.account_index();

    if sol.coin_type() != coin_type::SOLANA || eth.coin_type() != coin_type::ETHEREUM {
        return Err(WalletError::RecordMismatch {
            account_index,
            reason: format!("unexpected coin types in {sol} / {eth}"),
        });
    }
    if eth.account_index() != account_index {
        return Err(WalletError::RecordMismatch {
            account_index,
            reason: format!("paths disagree on the account index: {sol} / {eth}"),
        });
    }
    Ok(account_index)
}

fn verify_record(record: &StoredRecord, derived: &CombinedWallet) -> Result<(), WalletError> {
    let account_index = derived.account_index();
    let mismatch = |what: &str| WalletError::RecordMismatch {
        account_index,
        reason: format!("{what} does not match the mnemonic"),
    };

    if record.solana_public_key != derived.solana().public_key() {
        return Err(mismatch("solana public key"));
    }
    if !record
        .ethereum_public_key
        .eq_ignore_ascii_case(derived.ethereum().public_key())
    {
        return Err(mismatch("ethereum address"));
    }

    for (chain, encoded, what) in [
        (ChainKind::Solana, &record.solana_private_key, "solana private key"),
        (ChainKind::Ethereum, &record.ethereum_private_key, "ethereum private key"),
    ] {
        let stored = decode_private_key(chain, encoded).map_err(|_| mismatch(what))?;
        if &stored != derived.keypair(chain).private_key() {
            return Err(mismatch(what));
        }
    }
    Ok(())
}

/// Wallet file header serialized as JSON.
#[derive(Serialize, Deserialize)]
struct WalletFileHeader {
    magic: String,
    version: u32,
}

/// Save a wallet to an encrypted file, creating parent directories.
pub fn save_to_file(path: &Path, wallet: &Wallet, password: &[u8]) -> Result<(), WalletError> {
    let header = WalletFileHeader {
        magic: String::from_utf8_lossy(WALLET_MAGIC).to_string(),
        version: WALLET_VERSION,
    };
    let header_json =
        serde_json::to_vec(&header).map_err(|e| WalletError::Serialization(e.to_string()))?;

    let stored = StoredWallet::from_wallet(wallet, RecordLayout::Compact);
    let payload = Zeroizing::new(
        serde_json::to_vec(&stored).map_err(|e| WalletError::Serialization(e.to_string()))?,
    );
    let encrypted = encryption::encrypt(&payload, password)?;

    let header_len = header_json.len() as u32;
    let mut file_data = Vec::with_capacity(4 + header_json.len() + encrypted.len());
    file_data.extend_from_slice(&header_len.to_le_bytes());
    file_data.extend_from_slice(&header_json);
    file_data.extend_from_slice(&encrypted);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| WalletError::IoError(e.to_string()))?;
    }
    fs::write(path, &file_data).map_err(|e| WalletError::IoError(e.to_string()))?;
    info!(path = %path.display(), accounts = wallet.len(), "saved wallet file");
    Ok(())
}

/// Load and verify a wallet from an encrypted file.
pub fn load_from_file(path: &Path, password: &[u8]) -> Result<Wallet, WalletError> {
    let file_data = fs::read(path).map_err(|e| WalletError::IoError(e.to_string()))?;

    let Some((len_bytes, rest)) = file_data.split_first_chunk::<4>() else {
        return Err(WalletError::CorruptedFile("file too short".into()));
    };
    let header_len = u32::from_le_bytes(*len_bytes) as usize;
    if rest.len() < header_len {
        return Err(WalletError::CorruptedFile("header truncated".into()));
    }
    let (header_json, encrypted) = rest.split_at(header_len);

    let header: WalletFileHeader = serde_json::from_slice(header_json)
        .map_err(|e| WalletError::CorruptedFile(format!("invalid header: {e}")))?;
    if header.magic.as_bytes() != WALLET_MAGIC {
        return Err(WalletError::CorruptedFile("invalid magic bytes".into()));
    }
    if header.version != WALLET_VERSION {
        return Err(WalletError::CorruptedFile(format!(
            "unsupported version: {}",
            header.version
        )));
    }

    let payload = encryption::decrypt(encrypted, password)?;
    let stored: StoredWallet = serde_json::from_slice(&payload)
        .map_err(|e| WalletError::CorruptedFile(format!("invalid payload: {e}")))?;
    let wallet = stored.into_wallet()?;
    info!(path = %path.display(), "loaded wallet file");
    Ok(wallet)
}

/// Delete a wallet file. Returns `false` if there was nothing to delete.
pub fn remove_file(path: &Path) -> Result<bool, WalletError> {
    match fs::remove_file(path) {
        Ok(()) => {
            info!(path = %path.display(), "removed wallet file");
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(WalletError::IoError(e.to_string())),
    }
}
