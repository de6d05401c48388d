//! The registration credential and its deriver.

use std::fmt;

use md5::{Digest, Md5};
use subtle::ConstantTimeEq;

use crate::error::ParseError;
use crate::mac::MacAddress;

/// Length of a credential in ASCII characters (hex of a 128-bit digest).
pub const CREDENTIAL_LEN: usize = 32;

/// Product-line salt baked into stock firmware builds.
///
/// Every unit of one product line shares the salt; production builds
/// override it via [`Deriver::new`].
pub const DEFAULT_SALT: &str = "SALTYFISH";

/// A device registration credential: exactly 32 lowercase hex characters.
///
/// Two credentials exist per unit: the *expected* one, derived from the
/// salt and the unit's MAC address and never persisted, and the *stored*
/// one read from non-volatile media. Exact, case-sensitive equality of the
/// two is the sole authorization predicate. Comparison never case-folds;
/// the registration code format is lowercase by definition and widening
/// the accepted input set would change the device's observable contract.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Credential([u8; CREDENTIAL_LEN]);

impl Credential {
    /// Parses a credential from operator-supplied text.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidCredential`] unless the input is
    /// exactly 32 lowercase hex characters.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let bytes = s.as_bytes();
        if bytes.len() != CREDENTIAL_LEN || !bytes.iter().all(|b| is_lower_hex(*b)) {
            return Err(ParseError::InvalidCredential(s.to_owned()));
        }
        let mut buf = [0u8; CREDENTIAL_LEN];
        buf.copy_from_slice(bytes);
        Ok(Self(buf))
    }

    /// Recovers a credential from raw media bytes.
    ///
    /// Bounds the value to exactly [`CREDENTIAL_LEN`] bytes, discarding any
    /// trailing garbage the caller may have read past it. Returns `None`
    /// when the leading bytes are not a well-formed credential — blank
    /// (never-written) and corrupted media are indistinguishable here and
    /// both simply mean "unregistered".
    #[must_use]
    pub fn from_raw_bytes(raw: &[u8]) -> Option<Self> {
        let head = raw.get(..CREDENTIAL_LEN)?;
        if !head.iter().all(|b| is_lower_hex(*b)) {
            return None;
        }
        let mut buf = [0u8; CREDENTIAL_LEN];
        buf.copy_from_slice(head);
        Some(Self(buf))
    }

    /// The credential as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // The buffer is ASCII hex by construction.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// The credential as raw ASCII bytes, ready for the persistent store.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; CREDENTIAL_LEN] {
        &self.0
    }

    /// Constant-time equality check.
    ///
    /// Semantically identical to `==`; used on the authorization path so
    /// attempt comparison does not leak match length through timing.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.0[..].ct_eq(&other.0[..]).into()
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential({})", self.as_str())
    }
}

const fn is_lower_hex(b: u8) -> bool {
    b.is_ascii_digit() || matches!(b, b'a'..=b'f')
}

/// Derives the expected credential for a device.
///
/// The derivation is `hex(MD5(hex(MD5(salt ‖ mac))))` over the MAC's
/// canonical 12-uppercase-hex form, rendered lowercase at both stages.
/// Double hashing keeps the stored value from being a direct digest of the
/// salt+address pair; it is obfuscation, not a security boundary, since the
/// salt ships inside every firmware image.
///
/// MD5 is load-bearing for compatibility: registered units already hold
/// 32-hex-char double-MD5 credentials, so changing the digest would orphan
/// every one of them. Do not upgrade it silently.
pub struct Deriver {
    salt: String,
}

impl Deriver {
    /// Creates a deriver for the given product salt.
    pub fn new(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }

    /// Computes the expected credential for `mac`.
    ///
    /// Deterministic and total: identical inputs always yield the identical
    /// 32-character output.
    #[must_use]
    pub fn derive(&self, mac: &MacAddress) -> Credential {
        let salt = &self.salt;
        let first = hex::encode(Md5::digest(format!("{salt}{mac}")));
        let second = hex::encode(Md5::digest(&first));
        let mut buf = [0u8; CREDENTIAL_LEN];
        buf.copy_from_slice(second.as_bytes());
        Credential(buf)
    }
}
