//! Build configuration parsing
//!
//! Extracts flavor dimensions and product flavors from a Gradle build file.
//! This is not a Groovy/Kotlin-DSL parser; it understands exactly the
//! `flavorDimensions` statement and the `productFlavors { ... }` block, using
//! the block scanner for extents and regexes for the keywords.

use crate::scanner::find_block_end;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

static DIMENSIONS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"flavorDimensions\s+(.*)").unwrap());
static COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"//.*").unwrap());
static FLAVORS_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"productFlavors\s*\{").unwrap());
static FLAVOR_DEF_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w+)\s*\{").unwrap());
static DIMENSION_ASSIGN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"dimension\s+["'](\w+)["']"#).unwrap());

/// Dimensions and flavors declared by one build file.
///
/// `dimensions` preserves declaration order; flavor lists preserve first-seen
/// order within each dimension. Both are snapshots of one parse and are not
/// mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct VariantCatalog {
    /// Dimension names in declaration order
    pub dimensions: Vec<String>,
    /// Flavor names keyed by the dimension they declare
    pub flavors_by_dimension: HashMap<String, Vec<String>>,
}

impl VariantCatalog {
    /// Flavor options for one dimension, in first-seen order
    pub fn options(&self, dimension: &str) -> &[String] {
        self.flavors_by_dimension
            .get(dimension)
            .map_or(&[], Vec::as_slice)
    }

    /// Whether the build file declares any dimensions at all
    pub fn has_dimensions(&self) -> bool {
        !self.dimensions.is_empty()
    }
}

/// Parse a build configuration document into a [`VariantCatalog`].
///
/// Parsing anomalies degrade to empty results rather than failing: a missing
/// `flavorDimensions` statement yields no dimensions (signalling a single
/// default build), an absent or unbalanced `productFlavors` block yields no
/// flavors, and a flavor block without a `dimension` assignment is dropped.
pub fn parse_variants(content: &str) -> VariantCatalog {
    let dimensions = parse_dimensions(content);
    let flavors_by_dimension = parse_flavors(content);

    debug!(
        dimensions = ?dimensions,
        flavors = ?flavors_by_dimension,
        "Parsed build configuration"
    );

    VariantCatalog {
        dimensions,
        flavors_by_dimension,
    }
}

/// Extract the ordered dimension list from the `flavorDimensions` statement.
fn parse_dimensions(content: &str) -> Vec<String> {
    let Some(caps) = DIMENSIONS_RE.captures(content) else {
        return Vec::new();
    };

    // Comments are stripped from this one line only; offsets elsewhere in the
    // document stay valid for brace scanning.
    let raw = COMMENT_RE.replace(&caps[1], "");

    raw.split(',')
        .map(|token| token.trim().trim_matches(['"', '\'']).to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Extract the flavor map from the first `productFlavors { ... }` block.
fn parse_flavors(content: &str) -> HashMap<String, Vec<String>> {
    let mut flavors: HashMap<String, Vec<String>> = HashMap::new();

    let Some(open) = FLAVORS_BLOCK_RE.find(content) else {
        return flavors;
    };

    let block_start = open.end();
    let block = match find_block_end(content, block_start) {
        Ok(block_end) => &content[block_start..block_end - 1],
        Err(err) => {
            // Unsupported syntax degrades to "no flavors", not a failure.
            debug!(%err, "productFlavors block never closes; treating as empty");
            return flavors;
        }
    };

    // Flat scan for `name {` over the whole block. This deliberately also
    // matches identifiers one level down inside a flavor's own sub-blocks;
    // those only register when they carry a `dimension` assignment.
    for def in FLAVOR_DEF_RE.captures_iter(block) {
        let name = &def[1];
        let body_start = def.get(0).map_or(0, |m| m.end());

        let body = match find_block_end(block, body_start) {
            Ok(body_end) => &block[body_start..body_end - 1],
            Err(err) => {
                debug!(flavor = name, %err, "Skipping flavor with unclosed body");
                continue;
            }
        };

        if let Some(dim) = DIMENSION_ASSIGN_RE.captures(body) {
            flavors
                .entry(dim[1].to_string())
                .or_default()
                .push(name.to_string());
        }
    }

    flavors
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRADLE: &str = r#"
        android {
            compileSdkVersion 34

            flavorDimensions "mode", "device" // axes of variation

            productFlavors {
                prod {
                    dimension "mode"
                    applicationIdSuffix ".prod"
                }
                dev {
                    dimension "mode"
                }
                phone {
                    dimension 'device'
                }
                tablet {
                    dimension 'device'
                }
            }
        }
    "#;

    #[test]
    fn test_dimensions_preserve_declaration_order() {
        let catalog = parse_variants(GRADLE);
        assert_eq!(catalog.dimensions, vec!["mode", "device"]);
    }

    #[test]
    fn test_flavors_preserve_first_seen_order() {
        let catalog = parse_variants(GRADLE);
        assert_eq!(catalog.options("mode"), ["prod", "dev"]);
        assert_eq!(catalog.options("device"), ["phone", "tablet"]);
    }

    #[test]
    fn test_missing_dimensions_statement() {
        let catalog = parse_variants("android { buildTypes { debug { } } }");
        assert!(!catalog.has_dimensions());
        assert!(catalog.flavors_by_dimension.is_empty());
    }

    #[test]
    fn test_flavor_without_dimension_is_dropped() {
        let catalog = parse_variants(
            r#"
            flavorDimensions "mode"
            productFlavors {
                prod { dimension "mode" }
                orphan { applicationIdSuffix ".orphan" }
            }
            "#,
        );
        assert_eq!(catalog.options("mode"), ["prod"]);
        assert_eq!(catalog.flavors_by_dimension.len(), 1);
    }

    #[test]
    fn test_dimension_with_no_flavors_stays_listed() {
        let catalog = parse_variants(
            r#"
            flavorDimensions "mode", "tier"
            productFlavors {
                prod { dimension "mode" }
            }
            "#,
        );
        assert_eq!(catalog.dimensions, vec!["mode", "tier"]);
        assert!(catalog.options("tier").is_empty());
    }

    #[test]
    fn test_comment_stripped_from_dimension_line() {
        let catalog = parse_variants(r#"flavorDimensions "mode" // , "legacy""#);
        assert_eq!(catalog.dimensions, vec!["mode"]);
    }

    #[test]
    fn test_mixed_quote_styles() {
        let catalog = parse_variants(
            r#"
            flavorDimensions 'mode', "device"
            productFlavors {
                prod { dimension 'mode' }
            }
            "#,
        );
        assert_eq!(catalog.dimensions, vec!["mode", "device"]);
        assert_eq!(catalog.options("mode"), ["prod"]);
    }

    #[test]
    fn test_unbalanced_flavors_block_degrades_to_empty() {
        let catalog = parse_variants(
            r#"
            flavorDimensions "mode"
            productFlavors {
                prod { dimension "mode"
            "#,
        );
        assert_eq!(catalog.dimensions, vec!["mode"]);
        assert!(catalog.flavors_by_dimension.is_empty());
    }

    #[test]
    fn test_nested_sub_blocks_inside_flavor() {
        // The flat scan also visits `ndk { ... }`; without a dimension
        // assignment it never registers.
        let catalog = parse_variants(
            r#"
            flavorDimensions "mode"
            productFlavors {
                prod {
                    dimension "mode"
                    ndk {
                        abiFilters "arm64-v8a"
                    }
                }
            }
            "#,
        );
        assert_eq!(catalog.options("mode"), ["prod"]);
    }
}
