//! APK installation and app lifecycle over adb

use droidbuild_core::error::{Error, ErrorCode, Result};
use droidbuild_core::process::run_command;
use std::path::Path;
use tracing::info;

/// Install an APK on a device, replacing any existing install
pub fn install(serial: &str, apk: &Path) -> Result<()> {
    info!(serial, apk = %apk.display(), "Installing APK");

    let apk_str = apk.to_string_lossy();
    let result = run_command("adb", &["-s", serial, "install", "-r", &apk_str])?;
    if !result.success {
        return Err(Error::new(
            ErrorCode::DeployFailed,
            format!("Install failed on {}", serial),
        )
        .with_context(result.combined_output()));
    }
    Ok(())
}

/// Launch an activity on a device
pub fn launch(serial: &str, package: &str, activity: &str) -> Result<()> {
    let component = format!("{}/{}", package, activity);
    info!(serial, %component, "Launching app");

    let result = run_command(
        "adb",
        &["-s", serial, "shell", "am", "start", "-n", &component],
    )?;
    if !result.success {
        return Err(Error::new(
            ErrorCode::DeployFailed,
            format!("Launch of {} failed on {}", component, serial),
        )
        .with_context(result.combined_output()));
    }
    Ok(())
}

/// Force-stop a running app
pub fn force_stop(serial: &str, package: &str) -> Result<()> {
    let result = run_command(
        "adb",
        &["-s", serial, "shell", "am", "force-stop", package],
    )?;
    if !result.success {
        return Err(Error::device(format!(
            "Failed to stop {} on {}",
            package, serial
        )));
    }
    Ok(())
}
