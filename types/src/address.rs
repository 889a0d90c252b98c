//! 20-byte chain account address.

use alloy::primitives::Address;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::TypeError;

/// An EVM account address.
///
/// Parsed from `0x`-prefixed (or bare) hex. All-lowercase and all-uppercase
/// input carries no checksum and is taken as-is; mixed-case input must match
/// its EIP-55 checksum, so a mistyped letter is an error rather than a
/// different account. Displayed checksummed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChainAddress(Address);

impl ChainAddress {
    pub const ZERO: Self = Self(Address::ZERO);

    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(Address::new(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0 .0 .0
    }

    /// `0x`-prefixed EIP-55 mixed-case hex.
    pub fn to_checksum(&self) -> String {
        self.0.to_checksum(None)
    }
}

impl From<Address> for ChainAddress {
    fn from(address: Address) -> Self {
        Self(address)
    }
}

impl From<ChainAddress> for Address {
    fn from(address: ChainAddress) -> Self {
        address.0
    }
}

impl FromStr for ChainAddress {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.len() != 40 {
            return Err(TypeError::InvalidAddress(format!(
                "expected 40 hex digits, got {}",
                digits.len()
            )));
        }
        let address: Address = digits
            .parse()
            .map_err(|e| TypeError::InvalidAddress(format!("{s}: {e}")))?;

        let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
        let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
        if has_lower && has_upper {
            Address::parse_checksummed(format!("0x{digits}"), None)
                .map_err(|_| TypeError::InvalidChecksum(s.to_string()))?;
        }
        Ok(Self(address))
    }
}

impl fmt::Debug for ChainAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChainAddress({})", self.to_checksum())
    }
}

impl fmt::Display for ChainAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl Serialize for ChainAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ChainAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EIP55_VECTORS: [&str; 4] = [
        "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
        "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
        "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
    ];

    #[test]
    fn displays_reference_checksums() {
        for vector in EIP55_VECTORS {
            let addr: ChainAddress = vector.to_lowercase().parse().unwrap();
            assert_eq!(addr.to_string(), vector);
        }
    }

    #[test]
    fn accepts_valid_checksums() {
        for vector in EIP55_VECTORS {
            assert!(vector.parse::<ChainAddress>().is_ok(), "{vector}");
        }
    }

    #[test]
    fn rejects_a_single_flipped_letter() {
        let err = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD"
            .parse::<ChainAddress>()
            .unwrap_err();
        assert!(matches!(err, TypeError::InvalidChecksum(_)));
    }

    #[test]
    fn single_case_needs_no_checksum() {
        let lower: ChainAddress = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed".parse().unwrap();
        let upper: ChainAddress = "0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED".parse().unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn parses_without_prefix() {
        let addr: ChainAddress = "9858effd232b4033e47d90003d41ec34ecaeda94".parse().unwrap();
        assert_eq!(addr.as_bytes()[0], 0x98);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!("0x1234".parse::<ChainAddress>().is_err());
    }

    #[test]
    fn rejects_non_hex() {
        let bad = "0xzz58effd232b4033e47d90003d41ec34ecaeda94";
        assert!(matches!(
            bad.parse::<ChainAddress>(),
            Err(TypeError::InvalidAddress(_))
        ));
    }

    #[test]
    fn serde_uses_checksummed_string() {
        let addr: ChainAddress = EIP55_VECTORS[0].parse().unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", EIP55_VECTORS[0]));
        let back: ChainAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }

    #[test]
    fn serde_rejects_bad_checksum() {
        let json = "\"0x5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed\"";
        assert!(serde_json::from_str::<ChainAddress>(json).is_err());
    }
}
