//! In-memory implementations of the platform traits for testing.
//!
//! These implementations are NOT real media or transports. They exist so
//! the stores and the gate can be exercised in unit and integration tests
//! without hardware.

#![allow(clippy::missing_panics_doc)]

use std::collections::VecDeque;

use crate::error::{StoreError, StoreResult};
use crate::mac::MacAddress;

use super::{ByteEeprom, NetworkInterface, SerialConsole, SystemReset, WordFlash, FLASH_WORD};

/// Fill byte of erased/never-written media.
const ERASED: u8 = 0xFF;

/// In-memory word-granular flash medium.
///
/// Fresh instances read back as erased (`0xFF`) until written, matching
/// the garbage-on-first-boot behavior of the real part.
#[derive(Default)]
#[derive(Debug)]
pub struct MemoryFlash {
    cells: Vec<u8>,
    base: u32,
}

impl MemoryFlash {
    /// Creates an erased flash medium.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a medium preloaded with `contents` at the region start.
    #[must_use]
    pub fn with_contents(contents: &[u8]) -> Self {
        Self {
            cells: contents.to_vec(),
            base: 0,
        }
    }

    /// The absolute base address the region was configured with.
    #[must_use]
    pub const fn base(&self) -> u32 {
        self.base
    }

    /// Raw region bytes, for assertions.
    #[must_use]
    pub fn contents(&self) -> &[u8] {
        &self.cells
    }

    fn check_word(&self, offset: usize) -> StoreResult<()> {
        if offset % FLASH_WORD != 0 {
            return Err(StoreError::Unaligned { offset });
        }
        if offset + FLASH_WORD > self.cells.len() {
            return Err(StoreError::OutOfRange {
                offset,
                len: FLASH_WORD,
                region: self.cells.len(),
            });
        }
        Ok(())
    }
}

impl WordFlash for MemoryFlash {
    fn begin(&mut self, base: u32, region_len: usize) -> StoreResult<()> {
        self.base = base;
        self.cells.resize(region_len, ERASED);
        Ok(())
    }

    fn read_word(&self, offset: usize) -> StoreResult<[u8; FLASH_WORD]> {
        self.check_word(offset)?;
        let mut word = [0u8; FLASH_WORD];
        word.copy_from_slice(&self.cells[offset..offset + FLASH_WORD]);
        Ok(word)
    }

    fn write_word(&mut self, offset: usize, word: [u8; FLASH_WORD]) -> StoreResult<()> {
        self.check_word(offset)?;
        self.cells[offset..offset + FLASH_WORD].copy_from_slice(&word);
        Ok(())
    }
}

/// In-memory byte-granular EEPROM with staged-versus-committed tracking.
///
/// Reads observe the staged image (like the RAM shadow of the real
/// driver); [`committed`](Self::committed) exposes only what `commit`
/// flushed, so a missing commit is visible to tests.
#[derive(Default)]
#[derive(Debug)]
pub struct MemoryEeprom {
    staged: Vec<u8>,
    committed: Vec<u8>,
    commits: usize,
}

impl MemoryEeprom {
    /// Creates an erased EEPROM medium.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a medium whose committed image starts as `contents`.
    #[must_use]
    pub fn with_contents(contents: &[u8]) -> Self {
        Self {
            staged: contents.to_vec(),
            committed: contents.to_vec(),
            commits: 0,
        }
    }

    /// The durable (committed) image.
    #[must_use]
    pub fn committed(&self) -> &[u8] {
        &self.committed
    }

    /// Number of commits performed.
    #[must_use]
    pub const fn commit_count(&self) -> usize {
        self.commits
    }

    fn check_span(&self, offset: usize, len: usize) -> StoreResult<()> {
        if offset + len > self.staged.len() {
            return Err(StoreError::OutOfRange {
                offset,
                len,
                region: self.staged.len(),
            });
        }
        Ok(())
    }
}

impl ByteEeprom for MemoryEeprom {
    fn begin(&mut self, capacity: usize) -> StoreResult<()> {
        if self.staged.len() < capacity {
            self.staged.resize(capacity, ERASED);
        }
        if self.committed.len() < capacity {
            self.committed.resize(capacity, ERASED);
        }
        Ok(())
    }

    fn read(&self, offset: usize, buf: &mut [u8]) -> StoreResult<()> {
        self.check_span(offset, buf.len())?;
        buf.copy_from_slice(&self.staged[offset..offset + buf.len()]);
        Ok(())
    }

    fn write(&mut self, offset: usize, buf: &[u8]) -> StoreResult<()> {
        self.check_span(offset, buf.len())?;
        self.staged[offset..offset + buf.len()].copy_from_slice(buf);
        Ok(())
    }

    fn commit(&mut self) -> StoreResult<()> {
        self.committed.clone_from(&self.staged);
        self.commits += 1;
        Ok(())
    }
}

/// Network interface reporting a fixed hardware address.
pub struct StaticNetwork {
    mac: MacAddress,
}

impl StaticNetwork {
    /// Creates an interface with the given address octets.
    #[must_use]
    pub const fn new(octets: [u8; 6]) -> Self {
        Self {
            mac: MacAddress::new(octets),
        }
    }
}

impl NetworkInterface for StaticNetwork {
    fn mac_address(&self) -> MacAddress {
        self.mac
    }
}

/// Serial console fed from a fixed script of operator attempts.
///
/// Every line written by the gate is captured in the transcript. Reading
/// past the end of the script panics: a well-formed test script ends with
/// input that terminates the registration loop.
#[derive(Default)]
pub struct ScriptedConsole {
    script: VecDeque<String>,
    transcript: Vec<String>,
}

impl ScriptedConsole {
    /// Creates a console that will replay `script`, one entry per attempt.
    #[must_use]
    pub fn new<I, S>(script: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: script.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    /// Everything the gate printed, one line per entry.
    #[must_use]
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }
}

impl SerialConsole for ScriptedConsole {
    fn bytes_available(&self) -> bool {
        !self.script.is_empty()
    }

    fn read_attempt(&mut self) -> String {
        self.script.pop_front().expect("console script exhausted")
    }

    fn write_line(&mut self, line: &str) {
        self.transcript.push(line.to_owned());
    }
}

/// Reset double that records delays and restarts instead of resetting.
#[derive(Default)]
pub struct RecordingReset {
    delays_ms: Vec<u32>,
    restarts: usize,
}

impl RecordingReset {
    /// Creates a reset double with nothing recorded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays requested so far, in call order.
    #[must_use]
    pub fn delays_ms(&self) -> &[u32] {
        &self.delays_ms
    }

    /// Number of restarts requested.
    #[must_use]
    pub const fn restart_count(&self) -> usize {
        self.restarts
    }
}

impl SystemReset for RecordingReset {
    fn delay_ms(&mut self, ms: u32) {
        self.delays_ms.push(ms);
    }

    fn restart(&mut self) {
        self.restarts += 1;
    }
}
