//! Hardware (MAC) address handling.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// A 6-byte network hardware address.
///
/// The canonical text form is 12 uppercase hex characters with no
/// separators (`AABBCCDDEEFF`) — the exact string fed into credential
/// derivation. `Display` always renders this form; [`FromStr`] additionally
/// accepts colon- or hyphen-separated input and either letter case, as a
/// convenience for host-side tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// Wraps raw address octets.
    #[must_use]
    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    /// Returns the raw address octets.
    #[must_use]
    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

impl FromStr for MacAddress {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| *c != ':' && *c != '-').collect();
        if compact.len() != 12 {
            return Err(ParseError::InvalidMacAddress(s.to_owned()));
        }
        let bytes =
            hex::decode(&compact).map_err(|_| ParseError::InvalidMacAddress(s.to_owned()))?;
        let mut octets = [0u8; 6];
        octets.copy_from_slice(&bytes);
        Ok(Self(octets))
    }
}
