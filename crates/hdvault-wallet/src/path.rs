//! Account derivation paths.
//!
//! Every account lives at `m/44'/<coin_type>'/0'/<account_index>'`. All four
//! segments are hardened; the Ed25519 scheme used for derivation has no
//! non-hardened children, so a path with an unhardened segment is rejected
//! rather than silently hardened.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::WalletError;

/// Offset added to an index to mark it hardened.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// BIP-44 purpose segment.
pub const PURPOSE: u32 = 44;

/// Fixed BIP-44 account segment; accounts are distinguished by the last
/// segment instead.
pub const ACCOUNT_SEGMENT: u32 = 0;

/// Parse a path string into its hardened segment values (without the offset).
///
/// Accepts `'`, `h` or `H` as the hardened marker. The path must start with
/// `m` and every segment after it must be hardened.
pub fn parse_hardened_segments(path: &str) -> Result<Vec<u32>, WalletError> {
    let path = path.trim();
    let mut parts = path.split('/');

    if parts.next() != Some("m") {
        return Err(WalletError::InvalidPath(format!("'{path}' must start with 'm'")));
    }

    let mut segments = Vec::new();
    for part in parts {
        let digits = part
            .strip_suffix('\'')
            .or_else(|| part.strip_suffix('h'))
            .or_else(|| part.strip_suffix('H'))
            .ok_or_else(|| {
                WalletError::InvalidPath(format!(
                    "segment '{part}' in '{path}' is not hardened"
                ))
            })?;
        let value: u32 = digits.parse().map_err(|_| {
            WalletError::InvalidPath(format!("segment '{part}' in '{path}' is not a number"))
        })?;
        if value >= HARDENED_OFFSET {
            return Err(WalletError::InvalidPath(format!(
                "segment '{part}' in '{path}' is out of range"
            )));
        }
        segments.push(value);
    }
    Ok(segments)
}

/// A BIP-44 style account path with hardened segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DerivationPath {
    coin_type: u32,
    account_index: u32,
}

impl DerivationPath {
    /// Path for the given coin type and account index.
    pub fn new(coin_type: u32, account_index: u32) -> Result<Self, WalletError> {
        if coin_type >= HARDENED_OFFSET || account_index >= HARDENED_OFFSET {
            return Err(WalletError::InvalidPath(format!(
                "coin type {coin_type} / account {account_index} exceeds the hardened range"
            )));
        }
        Ok(Self {
            coin_type,
            account_index,
        })
    }

    /// SLIP-44 coin type.
    pub fn coin_type(&self) -> u32 {
        self.coin_type
    }

    /// Zero-based account index.
    pub fn account_index(&self) -> u32 {
        self.account_index
    }

    /// Segment values in derivation order, without the hardened offset.
    pub fn segments(&self) -> [u32; 4] {
        [PURPOSE, self.coin_type, ACCOUNT_SEGMENT, self.account_index]
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "m/{PURPOSE}'/{}'/{ACCOUNT_SEGMENT}'/{}'",
            self.coin_type, self.account_index
        )
    }
}

impl FromStr for DerivationPath {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments = parse_hardened_segments(s)?;
        match segments.as_slice() {
            [PURPOSE, coin_type, ACCOUNT_SEGMENT, account_index] => {
                DerivationPath::new(*coin_type, *account_index)
            }
            _ => Err(WalletError::InvalidPath(format!(
                "'{s}' is not of the form m/44'/<coin>'/0'/<index>'"
            ))),
        }
    }
}

impl Serialize for DerivationPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DerivationPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        let p = DerivationPath::new(501, 3).unwrap();
        assert_eq!(p.to_string(), "m/44'/501'/0'/3'");
        let p = DerivationPath::new(60, 0).unwrap();
        assert_eq!(p.to_string(), "m/44'/60'/0'/0'");
    }

    #[test]
    fn parse_roundtrip() {
        let p: DerivationPath = "m/44'/501'/0'/7'".parse().unwrap();
        assert_eq!(p.coin_type(), 501);
        assert_eq!(p.account_index(), 7);
        assert_eq!(p.to_string().parse::<DerivationPath>().unwrap(), p);
    }

    #[test]
    fn parse_accepts_h_marker() {
        let p: DerivationPath = "m/44h/60H/0'/2h".parse().unwrap();
        assert_eq!(p, DerivationPath::new(60, 2).unwrap());
    }

    #[test]
    fn parse_rejects_unhardened() {
        let err = "m/44'/501'/0'/0".parse::<DerivationPath>().unwrap_err();
        assert!(err.to_string().contains("not hardened"), "error was: {err}");
    }

    #[test]
    fn parse_rejects_wrong_shape() {
        assert!("44'/501'/0'/0'".parse::<DerivationPath>().is_err());
        assert!("m/44'/501'/0'".parse::<DerivationPath>().is_err());
        assert!("m/49'/501'/0'/0'".parse::<DerivationPath>().is_err());
        assert!("m/44'/501'/1'/0'".parse::<DerivationPath>().is_err());
        assert!("m/44'/x'/0'/0'".parse::<DerivationPath>().is_err());
        assert!("".parse::<DerivationPath>().is_err());
    }

    #[test]
    fn new_rejects_out_of_range() {
        assert!(DerivationPath::new(HARDENED_OFFSET, 0).is_err());
        assert!(DerivationPath::new(60, HARDENED_OFFSET).is_err());
        assert!(DerivationPath::new(60, HARDENED_OFFSET - 1).is_ok());
    }

    #[test]
    fn segments_order() {
        let p = DerivationPath::new(501, 9).unwrap();
        assert_eq!(p.segments(), [44, 501, 0, 9]);
    }

    #[test]
    fn hardened_segments_master_only() {
        assert_eq!(parse_hardened_segments("m").unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn hardened_segments_out_of_range() {
        assert!(parse_hardened_segments("m/2147483648'").is_err());
    }

    #[test]
    fn serde_as_string() {
        let p = DerivationPath::new(60, 4).unwrap();
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "\"m/44'/60'/0'/4'\"");
        let back: DerivationPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
