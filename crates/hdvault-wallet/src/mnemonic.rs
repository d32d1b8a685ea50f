//! BIP-39 mnemonic generation, validation and seed expansion.

use std::fmt;

use bip39::{Language, Mnemonic};
use rand::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::WalletError;
use crate::keys::Seed;

/// Mnemonic strength, named by word count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strength {
    /// 128-bit entropy.
    #[default]
    Words12,
    /// 160-bit entropy.
    Words15,
    /// 192-bit entropy.
    Words18,
    /// 224-bit entropy.
    Words21,
    /// 256-bit entropy.
    Words24,
}

impl Strength {
    /// Entropy length in bytes.
    pub const fn entropy_bytes(self) -> usize {
        match self {
            Strength::Words12 => 16,
            Strength::Words15 => 20,
            Strength::Words18 => 24,
            Strength::Words21 => 28,
            Strength::Words24 => 32,
        }
    }

    /// Entropy length in bits.
    pub const fn bits(self) -> usize {
        self.entropy_bytes() * 8
    }

    /// Number of words in a phrase of this strength.
    pub const fn word_count(self) -> usize {
        self.bits() * 3 / 32
    }

    /// Strength for a given word count, if BIP-39 defines one.
    pub fn from_word_count(count: usize) -> Option<Self> {
        match count {
            12 => Some(Strength::Words12),
            15 => Some(Strength::Words15),
            18 => Some(Strength::Words18),
            21 => Some(Strength::Words21),
            24 => Some(Strength::Words24),
            _ => None,
        }
    }
}

/// A checksum-validated BIP-39 mnemonic.
///
/// The phrase is stored normalized (lowercase, single spaces) and zeroized
/// on drop. `Debug` never shows the words.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct MnemonicPhrase {
    phrase: String,
}

impl MnemonicPhrase {
    /// Parse and validate a user-supplied phrase.
    ///
    /// Whitespace is trimmed and collapsed, and words are lowercased before
    /// checking word count, wordlist membership and checksum.
    pub fn parse(candidate: &str) -> Result<Self, WalletError> {
        let normalized = normalize(candidate);
        let count = normalized.split(' ').filter(|w| !w.is_empty()).count();
        if Strength::from_word_count(count).is_none() {
            return Err(WalletError::InvalidMnemonic(format!(
                "expected 12, 15, 18, 21 or 24 words, got {count}"
            )));
        }

        Mnemonic::parse_in_normalized(Language::English, &normalized)
            .map_err(|e| WalletError::InvalidMnemonic(describe_bip39_error(&e, &normalized)))?;

        Ok(Self { phrase: normalized })
    }

    /// The normalized phrase. Handle with care.
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// The words of the phrase, in order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.phrase.split(' ')
    }

    /// Number of words.
    pub fn word_count(&self) -> usize {
        self.words().count()
    }

    /// Strength of this phrase.
    pub fn strength(&self) -> Strength {
        Strength::from_word_count(self.word_count()).unwrap_or_default()
    }

    /// Expand to the 64-byte seed via PBKDF2-HMAC-SHA512.
    ///
    /// 2048 iterations, salt `"mnemonic" + passphrase`. Wallets use the empty
    /// passphrase.
    pub fn to_seed(&self, passphrase: &str) -> Seed {
        let m = Mnemonic::parse_in_normalized(Language::English, &self.phrase)
            .expect("phrase is validated at construction");
        Seed::from_bytes(m.to_seed_normalized(passphrase))
    }
}

impl fmt::Debug for MnemonicPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MnemonicPhrase")
            .field("word_count", &self.word_count())
            .field("phrase", &"[REDACTED]")
            .finish()
    }
}

impl PartialEq for MnemonicPhrase {
    fn eq(&self, other: &Self) -> bool {
        self.phrase == other.phrase
    }
}

impl Eq for MnemonicPhrase {}

/// Generate a new mnemonic from the OS cryptographic RNG.
pub fn generate_mnemonic(strength: Strength) -> Result<MnemonicPhrase, WalletError> {
    generate_mnemonic_with(&mut rand::rngs::OsRng, strength)
}

/// Generate a new mnemonic from the given cryptographic RNG.
///
/// An RNG failure is reported as [`WalletError::EntropySourceFailure`] and
/// is not retried.
pub fn generate_mnemonic_with<R: RngCore + CryptoRng>(
    rng: &mut R,
    strength: Strength,
) -> Result<MnemonicPhrase, WalletError> {
    let len = strength.entropy_bytes();
    let mut entropy = [0u8; 32];
    if let Err(e) = rng.try_fill_bytes(&mut entropy[..len]) {
        entropy.zeroize();
        tracing::warn!("entropy source failed; refusing to generate mnemonic");
        return Err(WalletError::EntropySourceFailure(e.to_string()));
    }

    let mnemonic = Mnemonic::from_entropy_in(Language::English, &entropy[..len]);
    entropy.zeroize();
    let mnemonic = mnemonic.map_err(|e| WalletError::EntropySourceFailure(e.to_string()))?;

    Ok(MnemonicPhrase {
        phrase: mnemonic.to_string(),
    })
}

/// Check a candidate phrase for word count, wordlist membership and checksum.
pub fn validate_mnemonic(candidate: &str) -> bool {
    MnemonicPhrase::parse(candidate).is_ok()
}

/// Check whether a single word is in the English BIP-39 wordlist.
pub fn is_valid_word(word: &str) -> bool {
    Language::English
        .find_word(&word.trim().to_lowercase())
        .is_some()
}

/// Lowercase and collapse whitespace to single spaces.
fn normalize(candidate: &str) -> String {
    candidate
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

fn describe_bip39_error(err: &bip39::Error, normalized: &str) -> String {
    match err {
        bip39::Error::UnknownWord(idx) => {
            let word = normalized.split(' ').nth(*idx).unwrap_or("?");
            format!("word {} ('{word}') is not in the BIP-39 wordlist", idx + 1)
        }
        bip39::Error::InvalidChecksum => "checksum mismatch".to_string(),
        bip39::Error::BadWordCount(n) => format!("bad word count: {n}"),
        other => other.to_string(),
    }
}
