//! Device-binding registration gate for embedded units.
//!
//! A unit is considered *registered* when non-volatile storage holds a
//! credential equal to the one derived from the product salt and the unit's
//! own MAC address. On boot the [`RegistrationGate`] reads the stored
//! credential and compares it against the derived one; when they differ it
//! blocks normal startup and runs an interactive registration loop over the
//! serial console until the operator supplies the correct code, then
//! persists it and restarts the device.
//!
//! The physical medium behind the credential store and the device services
//! the gate depends on (network interface, serial console, system reset)
//! are abstracted behind the traits in [`platform`]; in-memory test doubles
//! live in [`platform::memory`].
//!
//! ```
//! use regkit_core::platform::memory::{
//!     MemoryEeprom, RecordingReset, ScriptedConsole, StaticNetwork,
//! };
//! use regkit_core::store::EepromCredentialStore;
//! use regkit_core::{Deriver, RegistrationGate, RegistrationStatus, DEFAULT_SALT};
//!
//! let store = EepromCredentialStore::new(MemoryEeprom::new()).unwrap();
//! let gate = RegistrationGate::new(
//!     Deriver::new(DEFAULT_SALT),
//!     store,
//!     StaticNetwork::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]),
//!     ScriptedConsole::default(),
//!     RecordingReset::new(),
//! );
//!
//! // Blank media: the unit is not registered.
//! assert_eq!(gate.status().unwrap(), RegistrationStatus::Unregistered);
//! ```
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]

mod credential;
mod error;
mod gate;
mod mac;
pub mod platform;
pub mod store;

pub use credential::{Credential, Deriver, CREDENTIAL_LEN, DEFAULT_SALT};
pub use error::{ParseError, StoreError, StoreResult};
pub use gate::{RegistrationGate, RegistrationStatus};
pub use mac::MacAddress;
