//! droidbuild CLI
//!
//! Build, deploy and debug helper for Android projects: resolves the build
//! variant from the Gradle file, runs the build, finds the APK and deploys
//! it to a connected device.

use clap::{Parser, Subcommand};
use droidbuild_adb::{badging, deploy, devices};
use droidbuild_cli::output::{format_duration, Status};
use droidbuild_cli::prompt::{choose_from_list, TermPrompt};
use droidbuild_core::config::Config;
use droidbuild_core::error::{exit_codes, Error, ErrorCode, Result};
use droidbuild_gradle::{exec, locator, parse_variants, resolve, TaskSpec};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "droidbuild")]
#[command(about = "Build, deploy and debug helper for Android projects")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase output verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an APK for one variant
    Build {
        /// Project root directory
        #[arg(default_value = ".")]
        project_root: PathBuf,
        /// Pin a flavor for a dimension (e.g. mode=prod); repeatable
        #[arg(long = "flavor")]
        flavors: Vec<String>,
        /// Build type (Debug or Release); prompted when absent
        #[arg(long)]
        build_type: Option<String>,
    },

    /// Build, install and launch on a device
    Run {
        /// Project root directory
        #[arg(default_value = ".")]
        project_root: PathBuf,
        /// Pin a flavor for a dimension (e.g. mode=prod); repeatable
        #[arg(long = "flavor")]
        flavors: Vec<String>,
        /// Build type (Debug or Release); prompted when absent
        #[arg(long)]
        build_type: Option<String>,
        /// Target device serial; prompted when several are connected
        #[arg(long)]
        device: Option<String>,
    },

    /// List connected devices
    Devices,

    /// Force-stop an app on a device
    Stop {
        /// Application package name
        package: String,
        /// Target device serial
        #[arg(long)]
        device: Option<String>,
    },

    /// Diagnose the build and deploy environment
    Doctor {
        /// Project root directory
        #[arg(default_value = ".")]
        project_root: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }

    init_tracing(cli.verbose);

    let config = match Config::load(cli.config.as_deref().and_then(|p| p.to_str())) {
        Ok(config) => config,
        Err(e) => {
            Status::error(&e.to_string());
            std::process::exit(exit_codes::CONFIG_ERROR);
        }
    };

    let result = match cli.command {
        Commands::Build {
            project_root,
            flavors,
            build_type,
        } => run_build(&project_root, &flavors, build_type.as_deref(), &config).map(|_| ()),
        Commands::Run {
            project_root,
            flavors,
            build_type,
            device,
        } => run_deploy(
            &project_root,
            &flavors,
            build_type.as_deref(),
            device.as_deref(),
            &config,
        ),
        Commands::Devices => run_devices(),
        Commands::Stop { package, device } => run_stop(&package, device.as_deref()),
        Commands::Doctor { project_root } => run_doctor(&project_root, &config),
    };

    match result {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            Status::error(&e.to_string());
            std::process::exit(exit_code_for(&e));
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn exit_code_for(error: &Error) -> i32 {
    match error.code {
        ErrorCode::ConfigError | ErrorCode::ConfigParseError => exit_codes::CONFIG_ERROR,
        ErrorCode::SelectionCancelled => exit_codes::CANCELLED,
        ErrorCode::CommandNotFound => exit_codes::COMMAND_NOT_FOUND,
        _ => exit_codes::FAILURE,
    }
}

/// Parse repeated `dimension=flavor` arguments into overrides
fn parse_flavor_overrides(flavors: &[String]) -> HashMap<String, String> {
    let mut overrides = HashMap::new();
    for arg in flavors {
        match arg.split_once('=') {
            Some((dimension, flavor)) if !dimension.is_empty() && !flavor.is_empty() => {
                overrides.insert(dimension.to_string(), flavor.to_string());
            }
            _ => warn!(%arg, "Ignoring flavor argument; expected dimension=flavor"),
        }
    }
    overrides
}

/// Build type from the CLI, the config, or an interactive choice
fn resolve_build_type(arg: Option<&str>, config: &Config) -> Result<String> {
    if let Some(bt) = arg {
        return Ok(bt.to_string());
    }
    if let Some(bt) = &config.schema.build.default_type {
        return Ok(bt.clone());
    }

    let options = vec!["Debug".to_string(), "Release".to_string()];
    choose_from_list("Select build type", &options)?.ok_or_else(|| {
        Error::new(ErrorCode::SelectionCancelled, "Build type selection cancelled")
    })
}

/// Resolve the variant and run the Gradle build. Returns the derived task
/// spec and the app module directory for the deploy step.
fn run_build(
    project_root: &Path,
    flavors: &[String],
    build_type: Option<&str>,
    config: &Config,
) -> Result<(TaskSpec, PathBuf)> {
    let app_dir = project_root.join(&config.schema.project.app_dir);
    let gradle_file = app_dir.join(&config.schema.project.gradle_file);

    if !gradle_file.exists() {
        return Err(Error::file_not_found(&gradle_file)
            .with_suggestion("Run from an Android project root, or set [project] in .droidbuild.toml"));
    }

    let content = std::fs::read_to_string(&gradle_file)?;
    let catalog = parse_variants(&content);

    let build_type = resolve_build_type(build_type, config)?;
    let overrides = parse_flavor_overrides(flavors);

    let spec = if catalog.has_dimensions() {
        let selection = resolve(&catalog, &overrides, &TermPrompt)?;
        TaskSpec::derive(&selection, &build_type)
    } else {
        Status::info("No flavor dimensions declared; building default variant");
        TaskSpec::default_for(&build_type)
    };

    Status::info(&format!("Building task {}", spec.task_id));

    let started = Instant::now();
    exec::run_task(project_root, &spec.task_id)?;
    Status::success(&format!(
        "Build succeeded in {}",
        format_duration(started.elapsed())
    ));

    Ok((spec, app_dir))
}

/// Build, locate the APK, then install and launch it on a device
fn run_deploy(
    project_root: &Path,
    flavors: &[String],
    build_type: Option<&str>,
    device: Option<&str>,
    config: &Config,
) -> Result<()> {
    let (spec, app_dir) = run_build(project_root, flavors, build_type, config)?;

    let outputs_root = app_dir.join("build").join("outputs").join("apk");
    let apk = locator::locate(
        &outputs_root,
        &spec.output_subpath,
        &spec.build_type,
        spec.is_debug_like(),
    )?;
    Status::info(&format!("Artifact: {}", apk.display()));

    let serial = pick_device(device)?;

    deploy::install(&serial, &apk)?;
    Status::success(&format!("Installed on {}", serial));

    let sdk_dir = config.schema.android.expanded_sdk_dir();
    let aapt = badging::find_aapt(&sdk_dir).ok_or_else(|| {
        Error::command_not_found("aapt")
            .with_context(format!("SDK dir: {}", sdk_dir.display()))
    })?;
    let badging = badging::read_badging(&aapt, &apk)?;
    let activity = badging.launch_activity();

    deploy::launch(&serial, &badging.package, &activity)?;
    Status::success(&format!("Launched {}/{}", badging.package, activity));

    Ok(())
}

/// Choose the target device: explicit serial, sole device, or a prompt
fn pick_device(requested: Option<&str>) -> Result<String> {
    if let Some(serial) = requested {
        return Ok(serial.to_string());
    }

    let connected = devices::list_devices()?;
    match connected.len() {
        0 => Err(Error::no_device_connected()),
        1 => Ok(connected.into_iter().next().unwrap()),
        _ => choose_from_list("Select device", &connected)?.ok_or_else(|| {
            Error::new(ErrorCode::SelectionCancelled, "Device selection cancelled")
        }),
    }
}

fn run_devices() -> Result<()> {
    let connected = devices::list_devices()?;
    if connected.is_empty() {
        Status::warning("No devices connected");
        return Ok(());
    }

    println!("Connected devices:");
    for serial in connected {
        println!("  - {}", serial);
    }
    Ok(())
}

fn run_stop(package: &str, device: Option<&str>) -> Result<()> {
    let serial = pick_device(device)?;
    deploy::force_stop(&serial, package)?;
    Status::success(&format!("Stopped {} on {}", package, serial));
    Ok(())
}

fn run_doctor(project_root: &Path, config: &Config) -> Result<()> {
    Status::header("Environment Check");

    if devices::is_adb_available() {
        Status::success("adb: installed");
    } else {
        Status::error("adb: not found");
    }

    let sdk_dir = config.schema.android.expanded_sdk_dir();
    match badging::find_aapt(&sdk_dir) {
        Some(aapt) => Status::success(&format!("aapt: {}", aapt.display())),
        None => Status::warning(&format!("aapt: not found under {}", sdk_dir.display())),
    }

    let wrapper = project_root.join("gradlew");
    if wrapper.exists() {
        Status::success("gradlew: present");
    } else {
        Status::warning(&format!("gradlew: not found in {}", project_root.display()));
    }

    let gradle_file = project_root
        .join(&config.schema.project.app_dir)
        .join(&config.schema.project.gradle_file);
    if gradle_file.exists() {
        Status::success(&format!("build file: {}", gradle_file.display()));
    } else {
        Status::warning(&format!("build file: {} missing", gradle_file.display()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flavor_overrides() {
        let overrides = parse_flavor_overrides(&[
            "mode=prod".to_string(),
            "device=tablet".to_string(),
        ]);
        assert_eq!(overrides.get("mode").map(String::as_str), Some("prod"));
        assert_eq!(overrides.get("device").map(String::as_str), Some("tablet"));
    }

    #[test]
    fn test_parse_flavor_overrides_ignores_malformed() {
        let overrides = parse_flavor_overrides(&[
            "prod".to_string(),
            "=x".to_string(),
            "mode=".to_string(),
        ]);
        assert!(overrides.is_empty());
    }

    #[test]
    fn test_value_splits_only_on_first_equals() {
        let overrides = parse_flavor_overrides(&["mode=a=b".to_string()]);
        assert_eq!(overrides.get("mode").map(String::as_str), Some("a=b"));
    }

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(
            exit_code_for(&Error::selection_cancelled("mode")),
            exit_codes::CANCELLED
        );
        assert_eq!(
            exit_code_for(&Error::command_not_found("adb")),
            exit_codes::COMMAND_NOT_FOUND
        );
        assert_eq!(
            exit_code_for(&Error::build_failed("assembleDebug", 1)),
            exit_codes::FAILURE
        );
    }
}
