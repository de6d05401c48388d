//! Developer CLI for RegKit.
//!
//! `regkit code` is the manufacturing-side counterpart of the on-device
//! deriver: it prints the registration code an operator must enter on a
//! given unit. `regkit inspect` reports what a credential store image
//! holds, and `regkit simulate` runs the real gate on the host against a
//! file-backed EEPROM image, with stdin/stdout standing in for the serial
//! link.

mod console;
mod image;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use eyre::Context;
use regkit_core::store::EepromCredentialStore;
use regkit_core::{Credential, Deriver, MacAddress, RegistrationGate, DEFAULT_SALT};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use console::{FixedNetwork, HostReset, StdioConsole};
use image::FileEeprom;

#[derive(Parser)]
#[command(name = "regkit", version, about = "RegKit device registration tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the registration code for a device.
    Code {
        /// Device MAC address (compact, colon- or hyphen-separated).
        #[arg(long)]
        mac: MacAddress,
        /// Product salt the device firmware was built with.
        #[arg(long, env = "REGKIT_SALT", default_value = DEFAULT_SALT)]
        salt: String,
    },
    /// Report what a credential store image holds.
    Inspect {
        /// Path to the EEPROM image file.
        #[arg(long)]
        image: PathBuf,
    },
    /// Run the registration gate against an image, serial on stdin/stdout.
    Simulate {
        /// Path to the EEPROM image file (created when absent).
        #[arg(long)]
        image: PathBuf,
        /// MAC address of the simulated device.
        #[arg(long)]
        mac: MacAddress,
        /// Product salt the simulated firmware was built with.
        #[arg(long, env = "REGKIT_SALT", default_value = DEFAULT_SALT)]
        salt: String,
    },
}

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match Cli::parse().command {
        Commands::Code { mac, salt } => {
            println!("{}", expected_code(&salt, &mac));
            Ok(())
        }
        Commands::Inspect { image } => inspect(&image),
        Commands::Simulate { image, mac, salt } => simulate(&image, mac, &salt),
    }
}

/// The registration code an operator must enter on the unit with `mac`.
fn expected_code(salt: &str, mac: &MacAddress) -> Credential {
    Deriver::new(salt).derive(mac)
}

fn inspect(path: &Path) -> eyre::Result<()> {
    let raw = std::fs::read(path).wrap_err_with(|| format!("reading {}", path.display()))?;
    let head = raw.get(..32).unwrap_or(raw.as_slice());
    println!("image: {} ({} bytes)", path.display(), raw.len());
    println!("credential region: {}", hex::encode(head));
    match Credential::from_raw_bytes(&raw) {
        Some(credential) => println!("stored credential: {credential}"),
        None => println!("stored credential: none (blank or garbage)"),
    }
    Ok(())
}

fn simulate(path: &Path, mac: MacAddress, salt: &str) -> eyre::Result<()> {
    debug!(image = %path.display(), %mac, "starting gate simulation");
    let store = EepromCredentialStore::new(FileEeprom::open(path)?)?;
    let mut gate = RegistrationGate::new(
        Deriver::new(salt),
        store,
        FixedNetwork::new(mac),
        StdioConsole::new(),
        HostReset,
    );
    gate.enforce()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("AABBCCDDEEFF", "f720a0b7ff5e77da58d3d465c79591c7"; "reference unit")]
    #[test_case("AA:BB:CC:DD:EE:FE", "a0a149dd55a8ff2e295fe2a66a173d68"; "separated form")]
    fn code_matches_the_device_deriver(mac: &str, expected: &str) {
        let mac: MacAddress = mac.parse().unwrap();
        assert_eq!(expected_code(DEFAULT_SALT, &mac).as_str(), expected);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
