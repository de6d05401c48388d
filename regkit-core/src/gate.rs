//! Boot-time registration gate and the interactive registration loop.

use tracing::{info, warn};

use crate::credential::{Credential, Deriver, CREDENTIAL_LEN};
use crate::error::StoreResult;
use crate::mac::MacAddress;
use crate::platform::{NetworkInterface, SerialConsole, SystemReset};
use crate::store::CredentialStore;

/// Outcome of the boot-time registration check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStatus {
    /// Stored credential equals the expected one; normal boot continues.
    Registered,
    /// No or wrong stored credential; the unit must be registered.
    Unregistered,
}

// Operator-facing serial protocol. Fielded units and their provisioning
// scripts key on these exact strings.
const MSG_REGISTERED: &str = "Device is Registered";
const MSG_NOT_REGISTERED: &str = "Device Not Registered";
const MSG_ENTER_CODE: &str = "Please Enter Registration Code:";
const MSG_INVALID_LENGTH: &str = "Invalid hash length. Please try again.";
const MSG_INVALID_CODE: &str = "Invalid registration code. Please try again.";
const MSG_SUCCESS: &str = "Hash registered successfully. Restarting...";

/// Delay before restart so the success message drains off the serial link.
const RESTART_DELAY_MS: u32 = 1000;

/// The device-binding registration gate.
///
/// Built once at boot from the credential store and the device
/// collaborators, before any application logic runs. [`status`](Self::status)
/// answers the registration question without side effects;
/// [`enforce`](Self::enforce) additionally blocks an unregistered unit in
/// the registration loop until the operator supplies the correct code.
pub struct RegistrationGate<S, N, C, R> {
    deriver: Deriver,
    store: S,
    network: N,
    console: C,
    reset: R,
}

impl<S, N, C, R> RegistrationGate<S, N, C, R>
where
    S: CredentialStore,
    N: NetworkInterface,
    C: SerialConsole,
    R: SystemReset,
{
    /// Assembles the gate from its collaborators.
    pub const fn new(deriver: Deriver, store: S, network: N, console: C, reset: R) -> Self {
        Self {
            deriver,
            store,
            network,
            console,
            reset,
        }
    }

    /// Answers whether this unit is registered.
    ///
    /// Reads the MAC, derives the expected credential, reads the stored one
    /// and compares — exact, case-sensitive, all 32 characters. No mutation
    /// and no console output: calling this twice against the same state
    /// yields the same answer.
    ///
    /// # Errors
    ///
    /// Returns an error only when the store driver fails; an absent or
    /// garbage credential is a normal [`RegistrationStatus::Unregistered`].
    pub fn status(&self) -> StoreResult<RegistrationStatus> {
        let mac = self.network.mac_address();
        let expected = self.deriver.derive(&mac);
        let stored = self.store.read_credential()?;
        let registered = stored.is_some_and(|s| s.matches(&expected));
        Ok(if registered {
            RegistrationStatus::Registered
        } else {
            RegistrationStatus::Unregistered
        })
    }

    /// Runs the boot-time check, holding an unregistered unit in the
    /// registration loop.
    ///
    /// Prints the MAC banner, then either confirms registration and
    /// returns, or enters the loop. On real hardware the loop exits only
    /// through the post-registration device restart (or power loss); with
    /// test doubles whose `restart` returns, it unwinds with
    /// [`RegistrationStatus::Registered`] after exactly one restart
    /// request.
    ///
    /// # Errors
    ///
    /// Returns an error when the store driver fails to read or persist.
    pub fn enforce(&mut self) -> StoreResult<RegistrationStatus> {
        let mac = self.network.mac_address();
        self.console.write_line(&format!("MAC Address: {mac}"));
        match self.status()? {
            RegistrationStatus::Registered => {
                info!(%mac, "device is registered");
                self.console.write_line(MSG_REGISTERED);
                Ok(RegistrationStatus::Registered)
            }
            RegistrationStatus::Unregistered => {
                info!(%mac, "device not registered, awaiting code");
                self.register(mac)
            }
        }
    }

    /// The registration loop: prompt, wait, validate, persist, restart.
    ///
    /// No retry limit, no lockout, no timeout. The unit is inert until
    /// registered, so there is nothing better to do than keep asking.
    fn register(&mut self, mac: MacAddress) -> StoreResult<RegistrationStatus> {
        // Computed once; the address cannot change while the loop runs.
        let expected = self.deriver.derive(&mac);
        loop {
            self.console.write_line(MSG_NOT_REGISTERED);
            self.console.write_line(MSG_ENTER_CODE);
            while !self.console.bytes_available() {
                std::hint::spin_loop();
            }
            let attempt = self.console.read_attempt();
            let attempt = attempt.trim();
            if attempt.len() != CREDENTIAL_LEN {
                warn!(len = attempt.len(), "attempt rejected: wrong length");
                self.console.write_line(MSG_INVALID_LENGTH);
                continue;
            }
            // Anything that is not 32 lowercase hex characters can never
            // equal a derived credential, including uppercased input: the
            // comparison is exact and never case-folds.
            let matched = Credential::parse(attempt)
                .is_ok_and(|candidate| candidate.matches(&expected));
            if !matched {
                warn!("attempt rejected: wrong code");
                self.console.write_line(MSG_INVALID_CODE);
                continue;
            }
            self.store.write_credential(&expected)?;
            info!(%mac, "credential registered, restarting");
            self.console.write_line(MSG_SUCCESS);
            self.reset.delay_ms(RESTART_DELAY_MS);
            self.reset.restart();
            // Unreachable on hardware; lets test doubles unwind.
            return Ok(RegistrationStatus::Registered);
        }
    }

    /// Tears the gate down, handing back the collaborators for inspection.
    #[must_use]
    pub fn into_parts(self) -> (S, N, C, R) {
        (self.store, self.network, self.console, self.reset)
    }
}
