//! EVM wallet address type, normalized to lowercase hex.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TypeError;

/// A user's EVM wallet address: `0x` followed by 40 hex characters.
///
/// Stored lowercase, so two addresses that differ only in checksum casing
/// compare equal. Every linkage and idempotence check in the workspace
/// relies on this normalization.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    /// The standard prefix for all EVM addresses.
    pub const PREFIX: &'static str = "0x";

    /// Number of hex characters after the prefix.
    pub const HEX_LEN: usize = 40;

    /// Parse and normalize a raw address string.
    pub fn parse(raw: &str) -> Result<Self, TypeError> {
        let hex_part = raw
            .strip_prefix(Self::PREFIX)
            .or_else(|| raw.strip_prefix("0X"))
            .ok_or_else(|| TypeError::InvalidAddress(format!("missing 0x prefix: {raw}")))?;

        if hex_part.len() != Self::HEX_LEN {
            return Err(TypeError::InvalidAddress(format!(
                "expected {} hex characters, got {}",
                Self::HEX_LEN,
                hex_part.len()
            )));
        }
        hex::decode(hex_part)
            .map_err(|e| TypeError::InvalidAddress(format!("invalid hex: {e}")))?;

        Ok(Self(format!("0x{}", hex_part.to_lowercase())))
    }

    /// Return the normalized address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for WalletAddress {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<WalletAddress> for String {
    fn from(addr: WalletAddress) -> Self {
        addr.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "0xAbCd000000000000000000000000000000001234";

    #[test]
    fn parse_normalizes_to_lowercase() {
        let addr = WalletAddress::parse(ADDR).unwrap();
        assert_eq!(addr.as_str(), "0xabcd000000000000000000000000000000001234");
    }

    #[test]
    fn mixed_case_addresses_compare_equal() {
        let upper = WalletAddress::parse(&ADDR.to_uppercase().replace("0X", "0x")).unwrap();
        let lower = WalletAddress::parse(&ADDR.to_lowercase()).unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn missing_prefix_rejected() {
        let err = WalletAddress::parse("abcd000000000000000000000000000000001234");
        assert!(matches!(err, Err(TypeError::InvalidAddress(_))));
    }

    #[test]
    fn wrong_length_rejected() {
        assert!(WalletAddress::parse("0x1234").is_err());
        assert!(WalletAddress::parse(&format!("{ADDR}00")).is_err());
    }

    #[test]
    fn non_hex_rejected() {
        assert!(WalletAddress::parse("0xzzzz000000000000000000000000000000001234").is_err());
    }

    #[test]
    fn deserialization_normalizes_and_validates() {
        let addr: WalletAddress = serde_json::from_str(&format!("\"{ADDR}\"")).unwrap();
        assert_eq!(addr.as_str(), "0xabcd000000000000000000000000000000001234");
        assert!(serde_json::from_str::<WalletAddress>("\"not-an-address\"").is_err());
    }

    #[test]
    fn serde_round_trip_is_transparent() {
        let addr = WalletAddress::parse(ADDR).unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", addr.as_str()));
        let back: WalletAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
