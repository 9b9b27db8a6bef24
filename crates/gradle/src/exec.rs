//! Gradle build invocation
//!
//! Runs exactly one task through the project's Gradle wrapper, streaming
//! build output straight to the terminal. The build is an opaque synchronous
//! step; a non-zero exit is fatal and never retried here.

use droidbuild_core::error::{Error, Result};
use droidbuild_core::process::run_command_streaming_in_dir;
use std::path::Path;
use tracing::info;

/// Platform-appropriate Gradle wrapper invocation
fn gradle_wrapper() -> &'static str {
    if cfg!(windows) {
        "gradlew.bat"
    } else {
        "./gradlew"
    }
}

/// Run one Gradle task in the project root, streaming output.
///
/// Fails with `BuildFailed` when the task exits non-zero.
pub fn run_task(project_root: &Path, task: &str) -> Result<()> {
    let wrapper = gradle_wrapper();

    if !project_root.join(wrapper.trim_start_matches("./")).exists() {
        return Err(Error::command_not_found(wrapper)
            .with_context(format!("In project root {}", project_root.display()))
            .with_suggestion("Run from a Gradle project with a checked-in wrapper"));
    }

    info!(task, root = %project_root.display(), "Starting Gradle build");

    let exit_code = run_command_streaming_in_dir(wrapper, &[task], project_root)?;
    if exit_code != 0 {
        return Err(Error::build_failed(task, exit_code));
    }

    Ok(())
}
