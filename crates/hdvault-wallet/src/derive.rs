//! Account derivation: seed + coin type + index to a chain keypair.

use tracing::debug;

use crate::chain::{ChainKeypair, ChainKind};
use crate::error::WalletError;
use crate::hd;
use crate::keys::Seed;
use crate::path::DerivationPath;
use crate::wallet::CombinedWallet;

/// Derive the keypair for `coin_type` at `account_index`.
///
/// The path is `m/44'/<coin_type>'/0'/<account_index>'`. Unknown coin types
/// fail with [`WalletError::UnsupportedCoinType`] before any derivation.
pub fn derive_account(
    seed: &Seed,
    coin_type: u32,
    account_index: u32,
) -> Result<ChainKeypair, WalletError> {
    let chain = ChainKind::from_coin_type(coin_type)?;
    derive_chain(seed, chain, account_index)
}

/// Derive the keypair for a known chain at `account_index`.
pub fn derive_chain(
    seed: &Seed,
    chain: ChainKind,
    account_index: u32,
) -> Result<ChainKeypair, WalletError> {
    let path = DerivationPath::new(chain.coin_type(), account_index)?;
    let private_key = hd::derive_hardened(seed.as_bytes(), &path.segments())?;
    let keypair = ChainKeypair::from_private_key(chain, path, private_key)?;
    debug!(%path, public_key = keypair.public_key(), "derived {chain} account");
    Ok(keypair)
}

/// Derive every supported chain at one account index.
///
/// Either all chains succeed or no record is produced.
pub fn derive_combined(seed: &Seed, account_index: u32) -> Result<CombinedWallet, WalletError> {
    let keypairs = ChainKind::ALL
        .into_iter()
        .map(|chain| derive_chain(seed, chain, account_index))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CombinedWallet::new(account_index, keypairs))
}
