//! Device collaborator traits.
//!
//! The gate and the credential stores never touch hardware directly; every
//! device service they need is injected through one of these traits. A
//! firmware build supplies implementations bound to the real drivers, host
//! tooling supplies file- or stdio-backed ones, and tests use the in-memory
//! doubles in [`memory`].

pub mod memory;

use crate::error::StoreResult;
use crate::mac::MacAddress;

/// Word size of a [`WordFlash`] medium in bytes.
pub const FLASH_WORD: usize = 4;

/// A word-granular flash medium.
///
/// The medium only supports fixed-width, aligned word accesses; byte-level
/// framing on top of it is the store's job. Offsets are relative to the
/// region configured by [`begin`](Self::begin) and must be multiples of
/// [`FLASH_WORD`].
///
/// Reading a region that was never written yields whatever the erased
/// medium holds (typically `0xFF` fill). That is not an error.
pub trait WordFlash {
    /// Prepares a backing region of `region_len` bytes at absolute address
    /// `base`. Called once before any other operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver cannot map the requested region.
    fn begin(&mut self, base: u32, region_len: usize) -> StoreResult<()>;

    /// Reads the aligned word at `offset` within the region.
    ///
    /// # Errors
    ///
    /// Returns an error on driver failure or an out-of-region access.
    fn read_word(&self, offset: usize) -> StoreResult<[u8; FLASH_WORD]>;

    /// Writes the aligned word at `offset` within the region.
    ///
    /// # Errors
    ///
    /// Returns an error on driver failure or an out-of-region access.
    fn write_word(&mut self, offset: usize, word: [u8; FLASH_WORD]) -> StoreResult<()>;
}

/// A byte-granular EEPROM medium with deferred durability.
///
/// Reads and writes address individual bytes, but writes only become
/// durable after [`commit`](Self::commit). Callers that need persistence
/// MUST commit before reporting success.
pub trait ByteEeprom {
    /// Reserves `capacity` bytes of backing storage. Called once before any
    /// other operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver cannot provide the capacity.
    fn begin(&mut self, capacity: usize) -> StoreResult<()>;

    /// Fills `buf` from the bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error on driver failure or an out-of-capacity access.
    fn read(&self, offset: usize, buf: &mut [u8]) -> StoreResult<()>;

    /// Stages `buf` at `offset`. Not durable until committed.
    ///
    /// # Errors
    ///
    /// Returns an error on driver failure or an out-of-capacity access.
    fn write(&mut self, offset: usize, buf: &[u8]) -> StoreResult<()>;

    /// Flushes all staged writes to the medium.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails; staged data may then be lost on
    /// power loss.
    fn commit(&mut self) -> StoreResult<()>;
}

/// Source of the device's hardware address.
pub trait NetworkInterface {
    /// Returns the device's 6-byte hardware address.
    fn mac_address(&self) -> MacAddress;
}

/// The operator-facing serial link.
///
/// Input is whatever the transport buffers between reads; the gate treats
/// one read as one registration attempt.
pub trait SerialConsole {
    /// Whether at least one byte of input is pending.
    fn bytes_available(&self) -> bool;

    /// Reads all currently buffered input as one attempt string.
    ///
    /// May block; the gate only calls it after
    /// [`bytes_available`](Self::bytes_available) reports pending input.
    fn read_attempt(&mut self) -> String;

    /// Writes one line of status output.
    fn write_line(&mut self, line: &str);
}

/// Delay and hard-restart primitives.
pub trait SystemReset {
    /// Blocks for `ms` milliseconds. Used to let a final serial message
    /// drain before the restart cuts it off.
    fn delay_ms(&mut self, ms: u32);

    /// Irrecoverable system reset. On real hardware this never returns;
    /// test doubles record the call and return so callers can unwind.
    fn restart(&mut self);
}
