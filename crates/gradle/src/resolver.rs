//! Flavor selection resolution
//!
//! Merges caller-supplied overrides with interactively-obtained choices into
//! one flavor per declared dimension, in declaration order. The interactive
//! side lives behind [`FlavorPrompt`]; the engine never talks to a terminal
//! itself.

use crate::parser::VariantCatalog;
use droidbuild_core::error::{Error, Result};
use std::collections::HashMap;
use tracing::{debug, warn};

/// External collaborator that picks one flavor from a dimension's options.
///
/// Returns `Ok(None)` when the user cancels, which fails the whole
/// resolution with `SelectionCancelled`.
pub trait FlavorPrompt {
    /// Choose one of `options` for `dimension`
    fn choose(&self, dimension: &str, options: &[String]) -> Result<Option<String>>;
}

/// One chosen flavor per dimension, in declaration order.
///
/// Read-only once resolution completes; the deriver consumes it as-is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    entries: Vec<(String, String)>,
}

impl Selection {
    /// Whether no dimension contributed a flavor
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of resolved dimensions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The flavor chosen for a dimension, if any
    pub fn get(&self, dimension: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(dim, _)| dim == dimension)
            .map(|(_, flavor)| flavor.as_str())
    }

    /// Chosen flavor names in dimension order
    pub fn flavors(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, flavor)| flavor.as_str())
    }

    /// (dimension, flavor) pairs in dimension order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(dim, flavor)| (dim.as_str(), flavor.as_str()))
    }

    fn push(&mut self, dimension: &str, flavor: String) {
        self.entries.push((dimension.to_string(), flavor));
    }
}

/// Resolve one flavor per declared dimension.
///
/// For each dimension in declaration order: a caller override wins verbatim
/// (overrides are trusted, an unknown flavor only logs a warning), a
/// dimension with zero known flavors is skipped, and anything else goes to
/// the interactive prompt. Overrides keyed by undeclared dimensions are
/// ignored.
///
/// With zero declared dimensions the result is an empty [`Selection`] and the
/// caller falls back to the default build-type-only task.
pub fn resolve(
    catalog: &VariantCatalog,
    overrides: &HashMap<String, String>,
    prompt: &dyn FlavorPrompt,
) -> Result<Selection> {
    let mut selection = Selection::default();

    if !catalog.has_dimensions() {
        debug!("No flavor dimensions declared; using default build");
        return Ok(selection);
    }

    for dimension in &catalog.dimensions {
        let options = catalog.options(dimension);

        if let Some(flavor) = overrides.get(dimension) {
            if !options.iter().any(|o| o == flavor) {
                warn!(
                    %dimension,
                    %flavor, "Override does not match any declared flavor; using it anyway"
                );
            }
            selection.push(dimension, flavor.clone());
            continue;
        }

        if options.is_empty() {
            debug!(%dimension, "Dimension has no flavors; skipping");
            continue;
        }

        match prompt.choose(dimension, options)? {
            Some(flavor) => selection.push(dimension, flavor),
            None => return Err(Error::selection_cancelled(dimension)),
        }
    }

    Ok(selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use droidbuild_core::ErrorCode;
    use std::cell::RefCell;

    /// Prompt stub that hands out queued answers
    struct QueuedPrompt {
        answers: RefCell<Vec<Option<String>>>,
    }

    impl QueuedPrompt {
        fn new(answers: &[Option<&str>]) -> Self {
            Self {
                answers: RefCell::new(
                    answers.iter().map(|a| a.map(String::from)).collect(),
                ),
            }
        }
    }

    impl FlavorPrompt for QueuedPrompt {
        fn choose(&self, _dimension: &str, _options: &[String]) -> Result<Option<String>> {
            Ok(self.answers.borrow_mut().remove(0))
        }
    }

    /// Prompt stub that must never be consulted
    struct NoPrompt;

    impl FlavorPrompt for NoPrompt {
        fn choose(&self, dimension: &str, _options: &[String]) -> Result<Option<String>> {
            panic!("prompt consulted for dimension {}", dimension);
        }
    }

    fn catalog() -> VariantCatalog {
        let mut flavors = HashMap::new();
        flavors.insert("mode".to_string(), vec!["prod".to_string(), "dev".to_string()]);
        flavors.insert(
            "device".to_string(),
            vec!["phone".to_string(), "tablet".to_string()],
        );
        VariantCatalog {
            dimensions: vec!["mode".to_string(), "device".to_string()],
            flavors_by_dimension: flavors,
        }
    }

    #[test]
    fn test_overrides_win_without_prompting() {
        let overrides = HashMap::from([
            ("mode".to_string(), "prod".to_string()),
            ("device".to_string(), "tablet".to_string()),
        ]);

        let selection = resolve(&catalog(), &overrides, &NoPrompt).unwrap();
        assert_eq!(selection.get("mode"), Some("prod"));
        assert_eq!(selection.get("device"), Some("tablet"));
    }

    #[test]
    fn test_prompt_fills_missing_dimensions_in_order() {
        let overrides = HashMap::from([("mode".to_string(), "dev".to_string())]);
        let prompt = QueuedPrompt::new(&[Some("phone")]);

        let selection = resolve(&catalog(), &overrides, &prompt).unwrap();
        let flavors: Vec<_> = selection.flavors().collect();
        assert_eq!(flavors, ["dev", "phone"]);
    }

    #[test]
    fn test_unknown_override_is_trusted() {
        let overrides = HashMap::from([
            ("mode".to_string(), "staging".to_string()),
            ("device".to_string(), "phone".to_string()),
        ]);

        let selection = resolve(&catalog(), &overrides, &NoPrompt).unwrap();
        assert_eq!(selection.get("mode"), Some("staging"));
    }

    #[test]
    fn test_override_for_undeclared_dimension_is_ignored() {
        let overrides = HashMap::from([
            ("mode".to_string(), "prod".to_string()),
            ("device".to_string(), "phone".to_string()),
            ("region".to_string(), "eu".to_string()),
        ]);

        let selection = resolve(&catalog(), &overrides, &NoPrompt).unwrap();
        assert_eq!(selection.len(), 2);
        assert_eq!(selection.get("region"), None);
    }

    #[test]
    fn test_empty_dimension_is_skipped() {
        let mut cat = catalog();
        cat.dimensions.push("tier".to_string());
        let overrides = HashMap::from([
            ("mode".to_string(), "prod".to_string()),
            ("device".to_string(), "phone".to_string()),
        ]);

        let selection = resolve(&cat, &overrides, &NoPrompt).unwrap();
        assert_eq!(selection.len(), 2);
        assert_eq!(selection.get("tier"), None);
    }

    #[test]
    fn test_no_dimensions_short_circuits() {
        let selection = resolve(&VariantCatalog::default(), &HashMap::new(), &NoPrompt).unwrap();
        assert!(selection.is_empty());
    }

    #[test]
    fn test_cancel_fails_with_selection_cancelled() {
        let prompt = QueuedPrompt::new(&[Some("prod"), None]);
        let err = resolve(&catalog(), &HashMap::new(), &prompt).unwrap_err();
        assert_eq!(err.code, ErrorCode::SelectionCancelled);
    }
}
