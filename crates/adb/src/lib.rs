//! adb and aapt wrappers for droidbuild
//!
//! Thin shells around the platform tools:
//! - Device listing with emulator deduplication
//! - APK install / launch / force-stop
//! - Badging inspection for package and activity discovery

#![warn(missing_docs)]

pub mod badging;
pub mod deploy;
pub mod devices;
