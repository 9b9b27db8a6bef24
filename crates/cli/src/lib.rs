//! Terminal utilities for droidbuild
//!
//! Provides shared CLI functionality:
//! - Terminal output formatting
//! - Interactive list selection

#![warn(missing_docs)]

pub mod output;
pub mod prompt;
