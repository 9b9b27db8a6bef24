//! Connected device discovery

use droidbuild_core::error::Result;
use droidbuild_core::process::{command_exists, run_command};

/// Check if adb is available
pub fn is_adb_available() -> bool {
    command_exists("adb")
}

/// List serials of connected devices, deduplicated.
///
/// An emulator often shows up twice, once as `emulator-5554` and once as
/// `localhost:5555`; when both are present the localhost entry is dropped.
pub fn list_devices() -> Result<Vec<String>> {
    let result = run_command("adb", &["devices"])?;
    Ok(parse_device_list(&result.stdout))
}

fn parse_device_list(output: &str) -> Vec<String> {
    let mut devices: Vec<String> = output
        .lines()
        .skip(1) // Skip "List of devices attached" header
        .filter(|l| l.split_whitespace().nth(1) == Some("device"))
        .filter_map(|l| l.split_whitespace().next())
        .map(String::from)
        .collect();

    if devices.iter().any(|d| d == "emulator-5554") {
        devices.retain(|d| d != "localhost:5555");
    }

    devices
}
