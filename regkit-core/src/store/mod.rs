//! Persistent credential store over interchangeable physical media.
//!
//! One contract, two backends: [`FlashCredentialStore`] frames the
//! credential over a word-granular flash medium, [`EepromCredentialStore`]
//! uses byte-granular EEPROM with an explicit commit. The gate is written
//! against [`CredentialStore`] and does not know which medium a build
//! selected.

mod eeprom;
mod flash;

pub use eeprom::EepromCredentialStore;
pub use flash::FlashCredentialStore;

use crate::credential::Credential;
use crate::error::StoreResult;

/// EEPROM capacity reserved at driver `begin`, in bytes.
pub const EEPROM_CAPACITY: usize = 512;
/// Offset of the credential within the EEPROM region.
pub const EEPROM_CREDENTIAL_OFFSET: usize = 0;
/// Absolute base address of the flash backing region.
pub const FLASH_BASE_ADDRESS: u32 = 0x0010_0000;
/// Length of the flash backing region, in bytes.
pub const FLASH_REGION_LEN: usize = 0x4000;
/// Offset of the credential within the flash region.
pub const FLASH_CREDENTIAL_OFFSET: usize = 0;

/// Uniform credential persistence contract.
pub trait CredentialStore {
    /// Reads the stored credential.
    ///
    /// Returns `Ok(None)` when the region does not hold a well-formed
    /// credential — blank and garbage media are both "unregistered", never
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns an error only when the medium driver itself fails.
    fn read_credential(&self) -> StoreResult<Option<Credential>>;

    /// Persists `credential`. Durable once this returns.
    ///
    /// # Errors
    ///
    /// Returns an error when the medium driver fails to write or flush.
    fn write_credential(&mut self, credential: &Credential) -> StoreResult<()>;
}
