//! Wallet records: the mnemonic plus an ordered set of combined accounts.
//!
//! A [`Wallet`] always holds at least one [`CombinedWallet`]. Account
//! indices come from a monotonic counter and are never handed out twice,
//! even after the account that used them is deleted. [`WalletState`] wraps
//! the `Uninitialized -> Active -> Uninitialized` lifecycle.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tracing::{info, warn};

use crate::chain::{ChainKeypair, ChainKind};
use crate::derive::derive_combined;
use crate::error::WalletError;
use crate::keys::Seed;
use crate::mnemonic::{MnemonicPhrase, Strength, generate_mnemonic};
use crate::path::HARDENED_OFFSET;

/// One account index with a keypair for every supported chain.
pub struct CombinedWallet {
    account_index: u32,
    keypairs: BTreeMap<ChainKind, ChainKeypair>,
}

impl CombinedWallet {
    /// Assemble a record. Callers pass exactly one keypair per chain, all at
    /// `account_index`.
    pub(crate) fn new(account_index: u32, keypairs: Vec<ChainKeypair>) -> Self {
        let keypairs: BTreeMap<_, _> = keypairs.into_iter().map(|kp| (kp.chain(), kp)).collect();
        debug_assert!(ChainKind::ALL.iter().all(|c| keypairs.contains_key(c)));
        debug_assert!(keypairs.values().all(|kp| kp.account_index() == account_index));
        Self {
            account_index,
            keypairs,
        }
    }

    /// Account index shared by every keypair in the record.
    pub fn account_index(&self) -> u32 {
        self.account_index
    }

    /// Keypair for one chain.
    pub fn keypair(&self, chain: ChainKind) -> &ChainKeypair {
        self.keypairs
            .get(&chain)
            .expect("records hold a keypair for every chain")
    }

    /// Keypairs in chain order.
    pub fn keypairs(&self) -> impl Iterator<Item = &ChainKeypair> {
        self.keypairs.values()
    }

    /// Shorthand for the Solana keypair.
    pub fn solana(&self) -> &ChainKeypair {
        self.keypair(ChainKind::Solana)
    }

    /// Shorthand for the Ethereum keypair.
    pub fn ethereum(&self) -> &ChainKeypair {
        self.keypair(ChainKind::Ethereum)
    }
}

impl fmt::Debug for CombinedWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombinedWallet")
            .field("account_index", &self.account_index)
            .field("keypairs", &self.keypairs.values().collect::<Vec<_>>())
            .finish()
    }
}

impl PartialEq for CombinedWallet {
    fn eq(&self, other: &Self) -> bool {
        self.account_index == other.account_index && self.keypairs == other.keypairs
    }
}

impl Eq for CombinedWallet {}

/// A mnemonic and the accounts derived from it.
pub struct Wallet {
    mnemonic: MnemonicPhrase,
    accounts: Vec<CombinedWallet>,
    next_account_index: u32,
}

impl Wallet {
    /// Create a wallet from a validated mnemonic, deriving account 0.
    pub fn create(mnemonic: MnemonicPhrase) -> Result<Self, WalletError> {
        let first = derive_combined(&mnemonic.to_seed(""), 0)?;
        info!(words = mnemonic.word_count(), "created wallet");
        Ok(Self {
            mnemonic,
            accounts: vec![first],
            next_account_index: 1,
        })
    }

    /// Create a wallet from user-supplied words.
    ///
    /// The phrase is validated before anything is derived.
    pub fn import(candidate: &str) -> Result<Self, WalletError> {
        let mnemonic = MnemonicPhrase::parse(candidate).inspect_err(|e| {
            warn!("rejected mnemonic import: {e}");
        })?;
        Self::create(mnemonic)
    }

    /// Generate a fresh mnemonic and create a wallet from it.
    pub fn generate(strength: Strength) -> Result<Self, WalletError> {
        Self::create(generate_mnemonic(strength)?)
    }

    /// Rebuild a wallet from already-verified records.
    pub(crate) fn from_records(
        mnemonic: MnemonicPhrase,
        accounts: Vec<CombinedWallet>,
        next_account_index: u32,
    ) -> Result<Self, WalletError> {
        if accounts.is_empty() {
            return Err(WalletError::InvariantViolation(
                "a wallet needs at least one account".into(),
            ));
        }
        let mut seen = BTreeSet::new();
        for account in &accounts {
            if !seen.insert(account.account_index) {
                return Err(WalletError::InvariantViolation(format!(
                    "account index {} appears twice",
                    account.account_index
                )));
            }
        }
        let max = seen.last().copied().unwrap_or(0);
        if next_account_index <= max {
            return Err(WalletError::InvariantViolation(format!(
                "next account index {next_account_index} is not above existing index {max}"
            )));
        }
        Ok(Self {
            mnemonic,
            accounts,
            next_account_index,
        })
    }

    /// The wallet's mnemonic.
    pub fn mnemonic(&self) -> &MnemonicPhrase {
        &self.mnemonic
    }

    /// BIP-39 seed of the mnemonic, empty passphrase.
    pub fn seed(&self) -> Seed {
        self.mnemonic.to_seed("")
    }

    /// Accounts in insertion order.
    pub fn accounts(&self) -> &[CombinedWallet] {
        &self.accounts
    }

    /// Account at a position in the ordered sequence.
    pub fn account(&self, position: usize) -> Option<&CombinedWallet> {
        self.accounts.get(position)
    }

    /// Account with the given account index, if it still exists.
    pub fn find_account(&self, account_index: u32) -> Option<&CombinedWallet> {
        self.accounts
            .iter()
            .find(|a| a.account_index == account_index)
    }

    /// Number of accounts. Never zero.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the wallet has no accounts. Never true once constructed.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Index the next [`add_account`](Self::add_account) will use.
    pub fn next_account_index(&self) -> u32 {
        self.next_account_index
    }

    /// Derive and append an account at the next unused index.
    ///
    /// On error the wallet is unchanged.
    pub fn add_account(&mut self) -> Result<&CombinedWallet, WalletError> {
        let index = self.next_account_index;
        if index >= HARDENED_OFFSET {
            return Err(WalletError::InvariantViolation(format!(
                "account index space exhausted at {index}"
            )));
        }
        let record = derive_combined(&self.seed(), index)?;
        self.accounts.push(record);
        self.next_account_index = index + 1;
        info!(account_index = index, total = self.accounts.len(), "added account");
        Ok(self.accounts.last().expect("record was just pushed"))
    }

    /// Remove the account at `position` and return it.
    ///
    /// The last remaining account cannot be deleted. The freed index is not
    /// reused.
    pub fn delete_account(&mut self, position: usize) -> Result<CombinedWallet, WalletError> {
        let len = self.accounts.len();
        if position >= len {
            return Err(WalletError::AccountNotFound { position, len });
        }
        if len == 1 {
            warn!("refused to delete the only account");
            return Err(WalletError::InvariantViolation(
                "cannot delete the last account".into(),
            ));
        }
        let removed = self.accounts.remove(position);
        info!(
            account_index = removed.account_index,
            remaining = self.accounts.len(),
            "deleted account"
        );
        Ok(removed)
    }

    /// Recompute the record for an account index from the mnemonic.
    pub fn rederive(&self, account_index: u32) -> Result<CombinedWallet, WalletError> {
        derive_combined(&self.seed(), account_index)
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("mnemonic", &self.mnemonic)
            .field("accounts", &self.accounts.len())
            .field("next_account_index", &self.next_account_index)
            .finish()
    }
}

/// Lifecycle of the single wallet an application holds.
#[derive(Debug, Default)]
pub enum WalletState {
    /// No mnemonic and no accounts.
    #[default]
    Uninitialized,
    /// A wallet with at least one account.
    Active(Wallet),
}

impl WalletState {
    /// Whether a wallet is loaded.
    pub fn is_active(&self) -> bool {
        matches!(self, WalletState::Active(_))
    }

    /// The active wallet, if any.
    pub fn wallet(&self) -> Option<&Wallet> {
        match self {
            WalletState::Active(wallet) => Some(wallet),
            WalletState::Uninitialized => None,
        }
    }

    /// Activate with a wallet created from `mnemonic`.
    pub fn create(&mut self, mnemonic: MnemonicPhrase) -> Result<&Wallet, WalletError> {
        self.ensure_uninitialized()?;
        Ok(self.activate(Wallet::create(mnemonic)?))
    }

    /// Activate with a wallet imported from user-supplied words.
    pub fn import(&mut self, candidate: &str) -> Result<&Wallet, WalletError> {
        self.ensure_uninitialized()?;
        Ok(self.activate(Wallet::import(candidate)?))
    }

    /// Add an account to the active wallet.
    pub fn add_account(&mut self) -> Result<&CombinedWallet, WalletError> {
        self.active_mut()?.add_account()
    }

    /// Delete an account from the active wallet.
    pub fn delete_account(&mut self, position: usize) -> Result<CombinedWallet, WalletError> {
        self.active_mut()?.delete_account(position)
    }

    /// Drop the wallet and return to `Uninitialized`.
    ///
    /// The mnemonic and keys are zeroized as they drop.
    pub fn reset(&mut self) {
        if self.is_active() {
            info!("wallet reset");
        }
        *self = WalletState::Uninitialized;
    }

    fn ensure_uninitialized(&self) -> Result<(), WalletError> {
        match self {
            WalletState::Uninitialized => Ok(()),
            WalletState::Active(_) => Err(WalletError::AlreadyInitialized),
        }
    }

    fn active_mut(&mut self) -> Result<&mut Wallet, WalletError> {
        match self {
            WalletState::Active(wallet) => Ok(wallet),
            WalletState::Uninitialized => Err(WalletError::NotInitialized),
        }
    }

    fn activate(&mut self, wallet: Wallet) -> &Wallet {
        *self = WalletState::Active(wallet);
        match self {
            WalletState::Active(wallet) => wallet,
            WalletState::Uninitialized => unreachable!("just activated"),
        }
    }
}

impl From<Wallet> for WalletState {
    fn from(wallet: Wallet) -> Self {
        WalletState::Active(wallet)
    }
}
