//! Wallet error types.

use thiserror::Error;

/// Errors that can occur in wallet operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// Mnemonic failed word-count, wordlist or checksum validation.
    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// Derivation requested for a coin type with no registered chain.
    #[error("unsupported coin type: {0}")]
    UnsupportedCoinType(u32),

    /// The OS random generator could not produce entropy.
    #[error("entropy source failure: {0}")]
    EntropySourceFailure(String),

    /// Operation rejected because it would break a wallet invariant.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// Malformed or non-hardened derivation path.
    #[error("invalid derivation path: {0}")]
    InvalidPath(String),

    /// Key derivation failure.
    #[error("key derivation: {0}")]
    KeyDerivation(String),

    /// Encoded key could not be decoded.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// No account record at the requested position.
    #[error("account not found at position {position} (wallet has {len})")]
    AccountNotFound {
        /// Requested position.
        position: usize,
        /// Number of records in the wallet.
        len: usize,
    },

    /// Account operation on a wallet state with no wallet.
    #[error("wallet is not initialized")]
    NotInitialized,

    /// Create or import on a wallet state that already holds a wallet.
    #[error("wallet is already initialized")]
    AlreadyInitialized,

    /// A stored record disagrees with what its mnemonic derives.
    #[error("record mismatch at account {account_index}: {reason}")]
    RecordMismatch {
        /// Account index of the offending record.
        account_index: u32,
        /// What did not match.
        reason: String,
    },

    /// Encryption failure.
    #[error("encryption: {0}")]
    Encryption(String),

    /// Decryption failure.
    #[error("decryption: {0}")]
    Decryption(String),

    /// Wrong password for wallet file.
    #[error("invalid password")]
    InvalidPassword,

    /// Wallet file is corrupted or has invalid format.
    #[error("corrupted file: {0}")]
    CorruptedFile(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(String),

    /// Serialization error.
    #[error("serialization: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_mnemonic() {
        let e = WalletError::InvalidMnemonic("checksum mismatch".into());
        assert_eq!(e.to_string(), "invalid mnemonic: checksum mismatch");
    }

    #[test]
    fn display_unsupported_coin_type() {
        let e = WalletError::UnsupportedCoinType(0);
        assert_eq!(e.to_string(), "unsupported coin type: 0");
    }

    #[test]
    fn display_account_not_found() {
        let e = WalletError::AccountNotFound { position: 4, len: 2 };
        assert_eq!(e.to_string(), "account not found at position 4 (wallet has 2)");
    }

    #[test]
    fn display_invalid_password() {
        let e = WalletError::InvalidPassword;
        assert_eq!(e.to_string(), "invalid password");
    }

    #[test]
    fn display_record_mismatch() {
        let e = WalletError::RecordMismatch {
            account_index: 3,
            reason: "solana public key".into(),
        };
        assert_eq!(e.to_string(), "record mismatch at account 3: solana public key");
    }

    #[test]
    fn clone_and_eq() {
        let e1 = WalletError::InvariantViolation("last account".into());
        let e2 = e1.clone();
        assert_eq!(e1, e2);
    }
}
