//! Credential store over a word-granular flash medium.

use tracing::debug;

use crate::credential::{Credential, CREDENTIAL_LEN};
use crate::error::{StoreError, StoreResult};
use crate::platform::{WordFlash, FLASH_WORD};

use super::{CredentialStore, FLASH_BASE_ADDRESS, FLASH_CREDENTIAL_OFFSET, FLASH_REGION_LEN};

/// Credential store backed by word-addressable flash.
///
/// The medium only moves aligned 4-byte words, so the 32-byte credential is
/// assembled and disassembled across 8 word operations. The span helpers
/// are general over any length: the final partial word copies
/// `min(4, remaining)` bytes, with writes zero-padding the word tail.
#[derive(Debug)]
pub struct FlashCredentialStore<D: WordFlash> {
    driver: D,
    region_len: usize,
    offset: usize,
}

impl<D: WordFlash> FlashCredentialStore<D> {
    /// Opens the store over the stock firmware region layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver cannot map the region.
    pub fn new(driver: D) -> StoreResult<Self> {
        Self::with_layout(
            driver,
            FLASH_BASE_ADDRESS,
            FLASH_REGION_LEN,
            FLASH_CREDENTIAL_OFFSET,
        )
    }

    /// Opens the store over an explicit region layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver cannot map the region, the credential
    /// offset is not word-aligned, or the region cannot hold one credential
    /// at that offset.
    pub fn with_layout(
        mut driver: D,
        base: u32,
        region_len: usize,
        credential_offset: usize,
    ) -> StoreResult<Self> {
        if credential_offset % FLASH_WORD != 0 {
            return Err(StoreError::Unaligned {
                offset: credential_offset,
            });
        }
        if credential_offset + CREDENTIAL_LEN > region_len {
            return Err(StoreError::RegionTooSmall {
                region: region_len,
                offset: credential_offset,
            });
        }
        driver.begin(base, region_len)?;
        Ok(Self {
            driver,
            region_len,
            offset: credential_offset,
        })
    }

    /// Consumes the store, returning the driver.
    #[must_use]
    pub fn into_driver(self) -> D {
        self.driver
    }

    fn check_span(&self, offset: usize, len: usize) -> StoreResult<()> {
        if offset + len > self.region_len {
            return Err(StoreError::OutOfRange {
                offset,
                len,
                region: self.region_len,
            });
        }
        Ok(())
    }

    /// Reads an arbitrary byte span, a word at a time.
    fn read_bytes(&self, offset: usize, buf: &mut [u8]) -> StoreResult<()> {
        self.check_span(offset, buf.len())?;
        for start in (0..buf.len()).step_by(FLASH_WORD) {
            let word = self.driver.read_word(offset + start)?;
            let take = FLASH_WORD.min(buf.len() - start);
            buf[start..start + take].copy_from_slice(&word[..take]);
        }
        Ok(())
    }

    /// Writes an arbitrary byte span, a word at a time. A partial final
    /// word is zero-padded before the word write.
    fn write_bytes(&mut self, offset: usize, bytes: &[u8]) -> StoreResult<()> {
        self.check_span(offset, bytes.len())?;
        for start in (0..bytes.len()).step_by(FLASH_WORD) {
            let take = FLASH_WORD.min(bytes.len() - start);
            let mut word = [0u8; FLASH_WORD];
            word[..take].copy_from_slice(&bytes[start..start + take]);
            self.driver.write_word(offset + start, word)?;
        }
        Ok(())
    }
}

impl<D: WordFlash> CredentialStore for FlashCredentialStore<D> {
    fn read_credential(&self) -> StoreResult<Option<Credential>> {
        let mut raw = [0u8; CREDENTIAL_LEN];
        self.read_bytes(self.offset, &mut raw)?;
        let credential = Credential::from_raw_bytes(&raw);
        debug!(found = credential.is_some(), "flash credential read");
        Ok(credential)
    }

    fn write_credential(&mut self, credential: &Credential) -> StoreResult<()> {
        self.write_bytes(self.offset, credential.as_bytes())?;
        debug!("flash credential written");
        Ok(())
    }
}
