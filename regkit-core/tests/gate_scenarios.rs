//! End-to-end scenarios for the boot-time registration gate, driven
//! entirely through the in-memory platform doubles.

use regkit_core::platform::memory::{
    MemoryEeprom, MemoryFlash, RecordingReset, ScriptedConsole, StaticNetwork,
};
use regkit_core::store::{
    CredentialStore, EepromCredentialStore, FlashCredentialStore,
};
use regkit_core::{Deriver, RegistrationGate, RegistrationStatus, DEFAULT_SALT};

const MAC: [u8; 6] = [0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF];
/// derive("SALTYFISH", "AABBCCDDEEFF")
const EXPECTED: &str = "f720a0b7ff5e77da58d3d465c79591c7";

type EepromGate =
    RegistrationGate<EepromCredentialStore<MemoryEeprom>, StaticNetwork, ScriptedConsole, RecordingReset>;

fn gate<I, S>(eeprom: MemoryEeprom, script: I) -> EepromGate
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    RegistrationGate::new(
        Deriver::new(DEFAULT_SALT),
        EepromCredentialStore::new(eeprom).unwrap(),
        StaticNetwork::new(MAC),
        ScriptedConsole::new(script),
        RecordingReset::new(),
    )
}

fn gate_no_script(eeprom: MemoryEeprom) -> EepromGate {
    gate(eeprom, Vec::<String>::new())
}

fn registered_eeprom() -> MemoryEeprom {
    let mut image = EXPECTED.as_bytes().to_vec();
    image.resize(512, 0xFF);
    MemoryEeprom::with_contents(&image)
}

#[test]
fn blank_storage_is_unregistered() {
    // Scenario A, on both media.
    let gate = gate_no_script(MemoryEeprom::new());
    assert_eq!(gate.status().unwrap(), RegistrationStatus::Unregistered);

    let flash_gate = RegistrationGate::new(
        Deriver::new(DEFAULT_SALT),
        FlashCredentialStore::new(MemoryFlash::new()).unwrap(),
        StaticNetwork::new(MAC),
        ScriptedConsole::default(),
        RecordingReset::new(),
    );
    assert_eq!(flash_gate.status().unwrap(), RegistrationStatus::Unregistered);
}

#[test]
fn status_is_idempotent() {
    let gate = gate_no_script(MemoryEeprom::new());
    assert_eq!(gate.status().unwrap(), gate.status().unwrap());

    let gate = gate_with_registered_storage();
    assert_eq!(gate.status().unwrap(), RegistrationStatus::Registered);
    assert_eq!(gate.status().unwrap(), RegistrationStatus::Registered);
}

fn gate_with_registered_storage() -> EepromGate {
    gate_no_script(registered_eeprom())
}

#[test]
fn wrong_length_attempt_is_rejected_then_loop_continues() {
    // Scenario B: a 20-character attempt, then the real code.
    let mut gate = gate(MemoryEeprom::new(), ["aabbccddeeff00112233", EXPECTED]);
    assert_eq!(gate.enforce().unwrap(), RegistrationStatus::Registered);

    let (store, _, console, _) = gate.into_parts();
    let transcript = console.transcript();
    assert!(transcript.contains(&"Invalid hash length. Please try again.".to_owned()));
    // The prompt was repeated for the second attempt.
    assert_eq!(
        transcript
            .iter()
            .filter(|l| *l == "Device Not Registered")
            .count(),
        2
    );
    // Storage was written only by the successful attempt.
    let driver = store.into_driver();
    assert_eq!(driver.commit_count(), 1);
    assert_eq!(&driver.committed()[..32], EXPECTED.as_bytes());
}

#[test]
fn correct_attempt_registers_and_restarts_once() {
    // Scenario C. Surrounding whitespace is trimmed off the attempt.
    let mut gate = gate(MemoryEeprom::new(), [format!("  {EXPECTED}\r\n")]);
    assert_eq!(gate.enforce().unwrap(), RegistrationStatus::Registered);

    let (store, _, console, reset) = gate.into_parts();
    assert_eq!(reset.restart_count(), 1);
    assert_eq!(reset.delays_ms(), &[1000]);

    let transcript = console.transcript();
    assert_eq!(
        transcript.last().unwrap(),
        "Hash registered successfully. Restarting..."
    );
    // No prompt after success.
    assert_ne!(transcript[transcript.len() - 2], "Device Not Registered");

    assert_eq!(
        store.read_credential().unwrap().unwrap().as_str(),
        EXPECTED
    );
}

#[test]
fn registered_unit_boots_without_prompts() {
    // Scenario D: stored credential already matches.
    let mut gate = gate_with_registered_storage();
    assert_eq!(gate.enforce().unwrap(), RegistrationStatus::Registered);

    let (_, _, console, reset) = gate.into_parts();
    assert_eq!(reset.restart_count(), 0);
    let transcript = console.transcript();
    assert_eq!(transcript[0], "MAC Address: AABBCCDDEEFF");
    assert!(transcript.contains(&"Device is Registered".to_owned()));
    assert!(!transcript.iter().any(|l| l == "Device Not Registered"));
    assert!(!transcript
        .iter()
        .any(|l| l == "Please Enter Registration Code:"));
}

#[test]
fn uppercased_code_is_rejected() {
    // Scenario E: comparison is exact, never case-folded.
    let mut gate = gate(
        MemoryEeprom::new(),
        [EXPECTED.to_uppercase(), EXPECTED.to_owned()],
    );
    assert_eq!(gate.enforce().unwrap(), RegistrationStatus::Registered);

    let (_, _, console, reset) = gate.into_parts();
    assert!(console
        .transcript()
        .contains(&"Invalid registration code. Please try again.".to_owned()));
    assert_eq!(reset.restart_count(), 1);
}

#[test]
fn wrong_code_of_correct_shape_is_rejected() {
    // Well-formed but not this unit's credential.
    let mut gate = gate(
        MemoryEeprom::new(),
        ["a0a149dd55a8ff2e295fe2a66a173d68", EXPECTED],
    );
    assert_eq!(gate.enforce().unwrap(), RegistrationStatus::Registered);

    let (_, _, console, _) = gate.into_parts();
    assert!(console
        .transcript()
        .contains(&"Invalid registration code. Please try again.".to_owned()));
}

#[test]
fn stale_credential_from_another_unit_blocks_boot() {
    // Storage holding some other device's credential is just "wrong".
    let mut image = b"a0a149dd55a8ff2e295fe2a66a173d68".to_vec();
    image.resize(512, 0xFF);
    let gate = gate_no_script(MemoryEeprom::with_contents(&image));
    assert_eq!(gate.status().unwrap(), RegistrationStatus::Unregistered);
}

#[test]
fn flash_backed_gate_registers_end_to_end() {
    let mut gate = RegistrationGate::new(
        Deriver::new(DEFAULT_SALT),
        FlashCredentialStore::new(MemoryFlash::new()).unwrap(),
        StaticNetwork::new(MAC),
        ScriptedConsole::new([EXPECTED]),
        RecordingReset::new(),
    );
    assert_eq!(gate.enforce().unwrap(), RegistrationStatus::Registered);

    let (store, _, _, reset) = gate.into_parts();
    assert_eq!(reset.restart_count(), 1);
    assert_eq!(
        store.read_credential().unwrap().unwrap().as_str(),
        EXPECTED
    );
}
