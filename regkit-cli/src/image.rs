//! File-backed EEPROM image for host-side use of the credential store.

use std::path::{Path, PathBuf};

use eyre::Context;
use regkit_core::platform::ByteEeprom;
use regkit_core::{StoreError, StoreResult};

/// Fill byte for never-written image regions, matching erased media.
const ERASED: u8 = 0xFF;

/// A [`ByteEeprom`] whose backing medium is a plain file.
///
/// The image is held in memory between operations; `commit` writes the
/// whole image back to disk, mirroring the deferred durability of the real
/// driver.
pub(crate) struct FileEeprom {
    path: PathBuf,
    bytes: Vec<u8>,
}

impl FileEeprom {
    /// Opens an image file, starting from an empty image when the file
    /// does not exist yet.
    pub(crate) fn open(path: &Path) -> eyre::Result<Self> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(e).wrap_err_with(|| format!("reading {}", path.display()));
            }
        };
        Ok(Self {
            path: path.to_path_buf(),
            bytes,
        })
    }

    fn check_span(&self, offset: usize, len: usize) -> StoreResult<()> {
        if offset + len > self.bytes.len() {
            return Err(StoreError::OutOfRange {
                offset,
                len,
                region: self.bytes.len(),
            });
        }
        Ok(())
    }
}

impl ByteEeprom for FileEeprom {
    fn begin(&mut self, capacity: usize) -> StoreResult<()> {
        if self.bytes.len() < capacity {
            self.bytes.resize(capacity, ERASED);
        }
        Ok(())
    }

    fn read(&self, offset: usize, buf: &mut [u8]) -> StoreResult<()> {
        self.check_span(offset, buf.len())?;
        buf.copy_from_slice(&self.bytes[offset..offset + buf.len()]);
        Ok(())
    }

    fn write(&mut self, offset: usize, buf: &[u8]) -> StoreResult<()> {
        self.check_span(offset, buf.len())?;
        self.bytes[offset..offset + buf.len()].copy_from_slice(buf);
        Ok(())
    }

    fn commit(&mut self) -> StoreResult<()> {
        std::fs::write(&self.path, &self.bytes)
            .map_err(|e| StoreError::driver("commit", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use regkit_core::store::{CredentialStore, EepromCredentialStore};
    use regkit_core::Credential;

    use super::*;

    const CODE: &str = "f720a0b7ff5e77da58d3d465c79591c7";

    #[test]
    fn image_round_trips_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unit.eeprom");

        let mut store =
            EepromCredentialStore::new(FileEeprom::open(&path).unwrap()).unwrap();
        assert!(store.read_credential().unwrap().is_none());
        store
            .write_credential(&Credential::parse(CODE).unwrap())
            .unwrap();

        // Commit persisted the image; a fresh open sees the credential.
        let reopened =
            EepromCredentialStore::new(FileEeprom::open(&path).unwrap()).unwrap();
        assert_eq!(reopened.read_credential().unwrap().unwrap().as_str(), CODE);

        let on_disk = std::fs::read(&path).unwrap();
        assert_eq!(on_disk.len(), 512);
        assert_eq!(&on_disk[..32], CODE.as_bytes());
    }

    #[test]
    fn uncommitted_writes_stay_off_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unit.eeprom");

        let mut eeprom = FileEeprom::open(&path).unwrap();
        eeprom.begin(512).unwrap();
        eeprom.write(0, CODE.as_bytes()).unwrap();
        assert!(!path.exists());

        eeprom.commit().unwrap();
        assert!(path.exists());
    }
}
