//! Error types for the registration gate and its credential stores.

use thiserror::Error;

/// Errors surfaced by credential store backends and their media drivers.
///
/// Malformed or garbage *contents* are never an error: a read that does not
/// yield a well-formed credential reports `Ok(None)` so that blank and
/// corrupted media both present as "unregistered".
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying medium driver reported a failure.
    #[error("driver error during {context}: {message}")]
    Driver {
        /// The operation that was in progress.
        context: &'static str,
        /// Driver-provided failure detail.
        message: String,
    },
    /// An access fell outside the configured backing region.
    #[error("access out of range: offset {offset} + {len} bytes exceeds region of {region} bytes")]
    OutOfRange {
        /// Start offset of the access within the region.
        offset: usize,
        /// Length of the access in bytes.
        len: usize,
        /// Configured region length in bytes.
        region: usize,
    },
    /// A word-granular access was not aligned to the medium's word size.
    #[error("unaligned access at offset {offset} on a word-granular medium")]
    Unaligned {
        /// The offending offset.
        offset: usize,
    },
    /// The configured backing region cannot hold one credential.
    #[error("backing region of {region} bytes cannot hold a credential at offset {offset}")]
    RegionTooSmall {
        /// Configured region length in bytes.
        region: usize,
        /// Requested credential offset within the region.
        offset: usize,
    },
}

impl StoreError {
    /// Builds a [`StoreError::Driver`] from an operation name and detail.
    ///
    /// Intended for medium driver implementations wrapping their native
    /// error type.
    pub fn driver(context: &'static str, message: impl Into<String>) -> Self {
        Self::Driver {
            context,
            message: message.into(),
        }
    }
}

/// Result alias for credential store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors parsing textual forms of the core types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The input was not a 6-byte hardware address.
    #[error("invalid MAC address {0:?}: expected 12 hex characters")]
    InvalidMacAddress(String),
    /// The input was not exactly 32 lowercase hex characters.
    #[error("invalid credential {0:?}: expected 32 lowercase hex characters")]
    InvalidCredential(String),
}
