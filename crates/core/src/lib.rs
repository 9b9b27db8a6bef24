//! Core utilities for the droidbuild tools
//!
//! Shared plumbing used by the variant engine, the adb wrappers and the CLI:
//!
//! - **Error handling**: coded errors with context and recovery suggestions
//! - **Process execution**: capture and streaming command runners
//! - **Configuration**: TOML-based configuration with defaults

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod process;

pub use error::{Error, ErrorCode, Result, ResultExt};
