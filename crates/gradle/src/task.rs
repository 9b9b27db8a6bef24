//! Task and output-path derivation
//!
//! Turns a resolved selection plus a build type into the Gradle task name and
//! the output folder Gradle is expected to use. The two use different
//! capitalization rules on purpose: task names capitalize every flavor, but
//! the output folder keeps the first flavor in its original lower camel-case
//! and the build-type segment always lower-cased. That asymmetry mirrors
//! Gradle's own output layout and must not be "fixed" here.

use crate::resolver::Selection;

/// Derived build task identifier and expected output sub-path.
///
/// A pure value object; identical inputs always derive identical specs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSpec {
    /// Gradle task name, e.g. `assembleProdTabletDebug`
    pub task_id: String,
    /// Flavor folder segment under `build/outputs/apk`, e.g. `prodTablet`.
    /// Empty when no flavors were selected.
    pub output_subpath: String,
    /// Build type label as given, e.g. `Debug`
    pub build_type: String,
}

impl TaskSpec {
    /// Derive the task and output path from an ordered selection.
    pub fn derive(selection: &Selection, build_type: &str) -> Self {
        let mut task_flavors = String::new();
        let mut folder = String::new();

        for (i, flavor) in selection.flavors().enumerate() {
            task_flavors.push_str(&capitalize(flavor));
            if i == 0 {
                folder.push_str(flavor);
            } else {
                folder.push_str(&capitalize(flavor));
            }
        }

        Self {
            task_id: format!("assemble{}{}", task_flavors, build_type),
            output_subpath: folder,
            build_type: build_type.to_string(),
        }
    }

    /// The fixed build-type-only task used when no dimensions are declared.
    pub fn default_for(build_type: &str) -> Self {
        Self {
            task_id: format!("assemble{}", build_type),
            output_subpath: String::new(),
            build_type: build_type.to_string(),
        }
    }

    /// Build-type path segment, always lower-cased
    pub fn build_type_segment(&self) -> String {
        self.build_type.to_lowercase()
    }

    /// Whether this build type is debug-like (drives artifact suffix search)
    pub fn is_debug_like(&self) -> bool {
        self.build_type.eq_ignore_ascii_case("debug")
    }
}

/// Upper-case only the first character; the rest keeps its casing.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::VariantCatalog;
    use crate::resolver::{self, FlavorPrompt};
    use droidbuild_core::error::Result;
    use std::collections::HashMap;

    struct NoPrompt;

    impl FlavorPrompt for NoPrompt {
        fn choose(&self, _dimension: &str, _options: &[String]) -> Result<Option<String>> {
            Ok(None)
        }
    }

    fn selection(pairs: &[(&str, &str)]) -> Selection {
        let catalog = VariantCatalog {
            dimensions: pairs.iter().map(|(d, _)| d.to_string()).collect(),
            flavors_by_dimension: pairs
                .iter()
                .map(|(d, f)| (d.to_string(), vec![f.to_string()]))
                .collect(),
        };
        let overrides: HashMap<String, String> = pairs
            .iter()
            .map(|(d, f)| (d.to_string(), f.to_string()))
            .collect();
        resolver::resolve(&catalog, &overrides, &NoPrompt).unwrap()
    }

    #[test]
    fn test_task_id_capitalizes_every_flavor() {
        let spec = TaskSpec::derive(&selection(&[("mode", "prod"), ("device", "tablet")]), "Debug");
        assert_eq!(spec.task_id, "assembleProdTabletDebug");
    }

    #[test]
    fn test_output_subpath_keeps_first_flavor_lowercase() {
        let spec = TaskSpec::derive(&selection(&[("mode", "prod"), ("device", "tablet")]), "Debug");
        assert_eq!(spec.output_subpath, "prodTablet");
        assert_eq!(spec.build_type_segment(), "debug");
    }

    #[test]
    fn test_capitalize_touches_only_first_char() {
        // Multi-word flavor names keep their internal casing.
        let spec = TaskSpec::derive(&selection(&[("mode", "devFree")]), "Release");
        assert_eq!(spec.task_id, "assembleDevFreeRelease");
        assert_eq!(spec.output_subpath, "devFree");
    }

    #[test]
    fn test_single_flavor() {
        let spec = TaskSpec::derive(&selection(&[("mode", "prod")]), "Release");
        assert_eq!(spec.task_id, "assembleProdRelease");
        assert_eq!(spec.output_subpath, "prod");
        assert_eq!(spec.build_type_segment(), "release");
    }

    #[test]
    fn test_derive_is_pure() {
        let sel = selection(&[("mode", "prod"), ("device", "phone")]);
        assert_eq!(TaskSpec::derive(&sel, "Debug"), TaskSpec::derive(&sel, "Debug"));
    }

    #[test]
    fn test_default_task_for_no_dimensions() {
        let spec = TaskSpec::default_for("Debug");
        assert_eq!(spec.task_id, "assembleDebug");
        assert!(spec.output_subpath.is_empty());
        assert!(spec.is_debug_like());
    }

    #[test]
    fn test_is_debug_like() {
        assert!(TaskSpec::default_for("Debug").is_debug_like());
        assert!(!TaskSpec::default_for("Release").is_debug_like());
    }
}
