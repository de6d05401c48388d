//! Host-side stand-ins for the device collaborators.

use std::io::{BufRead, Write};

use regkit_core::platform::{NetworkInterface, SerialConsole, SystemReset};
use regkit_core::MacAddress;

/// Network interface reporting the MAC given on the command line.
pub(crate) struct FixedNetwork {
    mac: MacAddress,
}

impl FixedNetwork {
    pub(crate) const fn new(mac: MacAddress) -> Self {
        Self { mac }
    }
}

impl NetworkInterface for FixedNetwork {
    fn mac_address(&self) -> MacAddress {
        self.mac
    }
}

/// Serial console over stdin/stdout.
///
/// On the device the gate busy-waits on an "available" predicate before
/// reading; here the blocking line read itself is the wait, so
/// `bytes_available` always answers yes and the gate proceeds straight to
/// the read.
pub(crate) struct StdioConsole {
    _private: (),
}

impl StdioConsole {
    pub(crate) const fn new() -> Self {
        Self { _private: () }
    }
}

impl SerialConsole for StdioConsole {
    fn bytes_available(&self) -> bool {
        true
    }

    fn read_attempt(&mut self) -> String {
        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            // A real device waits forever; a host pipe that hit EOF never
            // produces another attempt, so end the simulation instead of
            // spinning on empty reads.
            Ok(0) => {
                eprintln!("[simulation] input closed before registration");
                std::process::exit(1);
            }
            _ => line,
        }
    }

    fn write_line(&mut self, line: &str) {
        println!("{line}");
        let _ = std::io::stdout().flush();
    }
}

/// Reset primitive for the simulation: sleep for the delay, then end the
/// process where the device would reboot.
pub(crate) struct HostReset;

impl SystemReset for HostReset {
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }

    fn restart(&mut self) {
        println!("[simulation] device restart");
        std::process::exit(0);
    }
}
