//! APK badging inspection via aapt
//!
//! Reads the package name and launchable activity out of a built APK so the
//! deploy step knows what to launch.

use droidbuild_core::error::{Error, Result};
use droidbuild_core::process::{run_command, which_command};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;

static PACKAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"package: name='([^']+)'").unwrap());
static ACTIVITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"launchable-activity: name='([^']+)'").unwrap());

/// Identity extracted from `aapt dump badging`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badging {
    /// Application package name
    pub package: String,
    /// Launchable activity, when the manifest declares one
    pub launchable_activity: Option<String>,
}

impl Badging {
    /// Activity to launch, defaulting to `<package>.MainActivity`
    pub fn launch_activity(&self) -> String {
        self.launchable_activity
            .clone()
            .unwrap_or_else(|| format!("{}.MainActivity", self.package))
    }
}

/// Find an aapt binary: the lexically-latest build-tools entry under the SDK,
/// falling back to whatever `aapt` is on PATH.
pub fn find_aapt(sdk_dir: &Path) -> Option<PathBuf> {
    let build_tools = sdk_dir.join("build-tools");
    let mut versions: Vec<PathBuf> = std::fs::read_dir(&build_tools)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.is_dir())
                .collect()
        })
        .unwrap_or_default();
    versions.sort();

    if let Some(latest) = versions.last() {
        let aapt = latest.join("aapt");
        if aapt.exists() {
            return Some(aapt);
        }
    }

    which_command("aapt")
}

/// Read badging information from an APK
pub fn read_badging(aapt: &Path, apk: &Path) -> Result<Badging> {
    let aapt_str = aapt.to_string_lossy();
    let apk_str = apk.to_string_lossy();
    let result = run_command(&aapt_str, &["dump", "badging", &apk_str])?;

    if !result.success {
        return Err(Error::device(format!(
            "aapt dump badging failed for {}",
            apk.display()
        ))
        .with_context(result.stderr));
    }

    parse_badging(&result.stdout)
}

fn parse_badging(output: &str) -> Result<Badging> {
    let package = PACKAGE_RE
        .captures(output)
        .map(|c| c[1].to_string())
        .ok_or_else(|| {
            Error::malformed_input("aapt output contains no package declaration")
        })?;

    let launchable_activity = ACTIVITY_RE.captures(output).map(|c| c[1].to_string());

    debug!(%package, ?launchable_activity, "Parsed badging");
    Ok(Badging {
        package,
        launchable_activity,
    })
}
