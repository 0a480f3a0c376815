//! Link-layer address value object.
//!
//! Association events identify the target access point by MAC, not by node
//! id, so the MAC is the join key between events and the AP registry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::MacParseError;

/// A 6-byte IEEE 802 MAC address.
///
/// Two `MacAddr` values are equal when their bytes match, whatever notation
/// they were parsed from.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    /// Parse a MAC address separated by `:` or `-`, such as
    /// `"00:00:00:00:00:01"` or `"00-00-00-00-00-01"`.
    pub fn parse(s: &str) -> Result<Self, MacParseError> {
        let err = || MacParseError {
            input: s.to_owned(),
        };

        let sep = if s.contains('-') { '-' } else { ':' };
        let parts: Vec<&str> = s.trim().split(sep).collect();
        if parts.len() != 6 {
            return Err(err());
        }

        let mut bytes = [0u8; 6];
        for (i, part) in parts.iter().enumerate() {
            if part.is_empty() || part.len() > 2 {
                return Err(err());
            }
            bytes[i] = u8::from_str_radix(part, 16).map_err(|_| err())?;
        }
        Ok(Self(bytes))
    }

    /// Build the address of the n-th simulated device: the node index is
    /// written big-endian into the low bytes, so index 1 is
    /// `00:00:00:00:00:01`.
    pub fn from_index(index: u32) -> Self {
        let [a, b, c, d] = index.to_be_bytes();
        Self([0, 0, a, b, c, d])
    }
}

impl fmt::Debug for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MacAddr({self})")
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl FromStr for MacAddr {
    type Err = MacParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for MacAddr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MacAddr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mac_display_is_lower_case_colon_separated() {
        let mac = MacAddr([0xAA, 0xBB, 0xCC, 0x0D, 0xEE, 0xFF]);
        assert_eq!(mac.to_string(), "aa:bb:cc:0d:ee:ff");
        assert_eq!(MacAddr::parse("aa:bb:cc:0d:ee:ff").unwrap(), mac);
    }

    #[test]
    fn dash_and_colon_notation_are_equal() {
        let colon = MacAddr::parse("00:00:00:00:00:0a").unwrap();
        let dash = MacAddr::parse("00-00-00-00-00-0A").unwrap();
        assert_eq!(colon, dash);
    }

    #[test]
    fn mac_parse_errors() {
        assert!(MacAddr::parse("aa:bb:cc").is_err());
        assert!(MacAddr::parse("zz:bb:cc:dd:ee:ff").is_err());
        assert!(MacAddr::parse("aaa:bb:cc:dd:ee:ff").is_err());
        assert!(MacAddr::parse("").is_err());
    }

    #[test]
    fn from_index_places_index_in_low_bytes() {
        assert_eq!(MacAddr::from_index(1).to_string(), "00:00:00:00:00:01");
        assert_eq!(MacAddr::from_index(0x0102).to_string(), "00:00:00:00:01:02");
    }

    #[test]
    fn serde_uses_string_form() {
        let mac = MacAddr::from_index(3);
        let json = serde_json::to_string(&mac).unwrap();
        assert_eq!(json, "\"00:00:00:00:00:03\"");
        let back: MacAddr = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mac);
    }
}
