//! Gradle build variant resolution engine
//!
//! The pipeline runs strictly forward:
//! scanner → parser → resolver → deriver → (external build) → locator.
//!
//! - [`scanner`]: nested-brace block extraction
//! - [`parser`]: flavor dimension and product flavor discovery
//! - [`resolver`]: one flavor per dimension, overrides before prompts
//! - [`task`]: task name and expected output path derivation
//! - [`exec`]: Gradle wrapper invocation
//! - [`locator`]: multi-strategy artifact search after the build
//!
//! Each invocation is stateless; the build file and the outputs tree are
//! read-only inputs snapshotted at call time.

#![warn(missing_docs)]

pub mod exec;
pub mod locator;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod task;

pub use parser::{parse_variants, VariantCatalog};
pub use resolver::{resolve, FlavorPrompt, Selection};
pub use task::TaskSpec;
