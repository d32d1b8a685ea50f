//! CLI configuration: defaults under the home directory, overridden by
//! environment variables, overridden in turn by command-line flags.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use hdvault_wallet::Strength;

/// Default wallet file name inside the data directory.
pub const DEFAULT_WALLET_FILE: &str = "wallet.dat";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliConfig {
    /// Directory holding the wallet file.
    pub data_dir: PathBuf,
    /// Wallet file; relative paths are resolved against `data_dir`.
    pub wallet_file: PathBuf,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Log output format ("text" or "json").
    pub log_format: String,
    /// Mnemonic length for newly created wallets.
    pub default_words: Strength,
}

impl Default for CliConfig {
    fn default() -> Self {
        let data_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".hdvault");

        Self {
            data_dir,
            wallet_file: PathBuf::from(DEFAULT_WALLET_FILE),
            log_level: "warn".to_string(),
            log_format: "text".to_string(),
            default_words: Strength::Words12,
        }
    }
}

impl CliConfig {
    /// Load configuration from `HDVAULT_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::default();

        if let Some(home) = lookup("HDVAULT_HOME") {
            cfg.data_dir = PathBuf::from(home);
        }
        if let Some(file) = lookup("HDVAULT_WALLET") {
            cfg.wallet_file = PathBuf::from(file);
        }
        if let Some(level) = lookup("HDVAULT_LOG") {
            cfg.log_level = level;
        }
        if let Some(format) = lookup("HDVAULT_LOG_FORMAT") {
            cfg.log_format = format;
        }
        if let Some(words) = lookup("HDVAULT_WORDS") {
            let count: usize = words
                .trim()
                .parse()
                .context("HDVAULT_WORDS must be a number")?;
            cfg.default_words = parse_word_count(count)?;
        }
        Ok(cfg)
    }

    /// Full path of the wallet file.
    pub fn wallet_path(&self) -> PathBuf {
        self.data_dir.join(&self.wallet_file)
    }
}

/// Map a word count to a mnemonic strength.
pub fn parse_word_count(count: usize) -> Result<Strength> {
    match Strength::from_word_count(count) {
        Some(strength) => Ok(strength),
        None => bail!("unsupported mnemonic length {count} (use 12, 15, 18, 21 or 24)"),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_data_dir_ends_with_hdvault() {
        let cfg = CliConfig::default();
        assert!(
            cfg.data_dir.ends_with(".hdvault"),
            "data_dir should end with '.hdvault': {:?}",
            cfg.data_dir
        );
    }

    #[test]
    fn default_wallet_path() {
        let cfg = CliConfig::default();
        assert!(cfg.wallet_path().ends_with(".hdvault/wallet.dat"));
        assert_eq!(cfg.default_words, Strength::Words12);
        assert_eq!(cfg.log_format, "text");
    }

    #[test]
    fn empty_environment_is_default() {
        assert_eq!(CliConfig::from_lookup(lookup(&[])).unwrap(), CliConfig::default());
    }

    #[test]
    fn environment_overrides() {
        let cfg = CliConfig::from_lookup(lookup(&[
            ("HDVAULT_HOME", "/tmp/hd"),
            ("HDVAULT_WALLET", "alt.dat"),
            ("HDVAULT_LOG", "debug"),
            ("HDVAULT_LOG_FORMAT", "json"),
            ("HDVAULT_WORDS", "24"),
        ]))
        .unwrap();
        assert_eq!(cfg.wallet_path(), PathBuf::from("/tmp/hd/alt.dat"));
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.log_format, "json");
        assert_eq!(cfg.default_words, Strength::Words24);
    }

    #[test]
    fn absolute_wallet_file_wins_over_data_dir() {
        let cfg = CliConfig::from_lookup(lookup(&[
            ("HDVAULT_HOME", "/tmp/hd"),
            ("HDVAULT_WALLET", "/elsewhere/w.dat"),
        ]))
        .unwrap();
        assert_eq!(cfg.wallet_path(), PathBuf::from("/elsewhere/w.dat"));
    }

    #[test]
    fn bad_word_count_rejected() {
        assert!(CliConfig::from_lookup(lookup(&[("HDVAULT_WORDS", "13")])).is_err());
        assert!(CliConfig::from_lookup(lookup(&[("HDVAULT_WORDS", "twelve")])).is_err());
    }
}
