//! Credential store over byte-granular EEPROM.

use tracing::debug;

use crate::credential::{Credential, CREDENTIAL_LEN};
use crate::error::{StoreError, StoreResult};
use crate::platform::ByteEeprom;

use super::{CredentialStore, EEPROM_CAPACITY, EEPROM_CREDENTIAL_OFFSET};

/// Credential store backed by byte-addressable EEPROM.
///
/// The medium reads and writes single bytes directly but defers durability
/// to an explicit commit; [`write_credential`](CredentialStore::write_credential)
/// always commits before returning.
#[derive(Debug)]
pub struct EepromCredentialStore<D: ByteEeprom> {
    driver: D,
    offset: usize,
}

impl<D: ByteEeprom> EepromCredentialStore<D> {
    /// Opens the store over the stock firmware region layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver cannot provide the capacity.
    pub fn new(driver: D) -> StoreResult<Self> {
        Self::with_layout(driver, EEPROM_CAPACITY, EEPROM_CREDENTIAL_OFFSET)
    }

    /// Opens the store over an explicit capacity and credential offset.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver cannot provide the capacity or the
    /// capacity cannot hold one credential at `credential_offset`.
    pub fn with_layout(
        mut driver: D,
        capacity: usize,
        credential_offset: usize,
    ) -> StoreResult<Self> {
        if credential_offset + CREDENTIAL_LEN > capacity {
            return Err(StoreError::RegionTooSmall {
                region: capacity,
                offset: credential_offset,
            });
        }
        driver.begin(capacity)?;
        Ok(Self {
            driver,
            offset: credential_offset,
        })
    }

    /// Consumes the store, returning the driver.
    #[must_use]
    pub fn into_driver(self) -> D {
        self.driver
    }
}

impl<D: ByteEeprom> CredentialStore for EepromCredentialStore<D> {
    fn read_credential(&self) -> StoreResult<Option<Credential>> {
        let mut raw = [0u8; CREDENTIAL_LEN];
        self.driver.read(self.offset, &mut raw)?;
        let credential = Credential::from_raw_bytes(&raw);
        debug!(found = credential.is_some(), "eeprom credential read");
        Ok(credential)
    }

    fn write_credential(&mut self, credential: &Credential) -> StoreResult<()> {
        self.driver.write(self.offset, credential.as_bytes())?;
        // Durability is only guaranteed after the driver flush.
        self.driver.commit()?;
        debug!("eeprom credential written and committed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::platform::memory::MemoryEeprom;

    use super::*;

    const CODE: &str = "f720a0b7ff5e77da58d3d465c79591c7";

    #[test]
    fn blank_media_reads_as_unregistered() {
        let store = EepromCredentialStore::new(MemoryEeprom::new()).unwrap();
        assert!(store.read_credential().unwrap().is_none());
    }

    #[test]
    fn credential_round_trips_and_commits() {
        let mut store = EepromCredentialStore::new(MemoryEeprom::new()).unwrap();
        let credential = Credential::parse(CODE).unwrap();
        store.write_credential(&credential).unwrap();
        assert_eq!(store.read_credential().unwrap(), Some(credential));

        let driver = store.into_driver();
        assert_eq!(driver.commit_count(), 1);
        assert_eq!(&driver.committed()[..CREDENTIAL_LEN], CODE.as_bytes());
    }

    #[test]
    fn garbage_media_reads_as_unregistered() {
        let mut image = vec![0x5A; EEPROM_CAPACITY];
        image[7] = 0x00;
        let store =
            EepromCredentialStore::new(MemoryEeprom::with_contents(&image)).unwrap();
        assert!(store.read_credential().unwrap().is_none());
    }

    #[test]
    fn capacity_must_hold_the_credential() {
        let err = EepromCredentialStore::with_layout(MemoryEeprom::new(), 16, 0).unwrap_err();
        assert!(matches!(err, StoreError::RegionTooSmall { .. }));
    }
}
