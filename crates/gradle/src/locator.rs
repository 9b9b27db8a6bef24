//! Build artifact location
//!
//! After a build finishes, finds the produced APK under the outputs tree.
//! Gradle's folder layout drifts between versions and signing setups, so the
//! search runs an ordered list of lazy strategies and stops at the first one
//! that yields candidates:
//!
//! 1. The conventional `<subpath>/<buildtype>` directory, non-recursive
//! 2. A recursive search for the `-debug.apk` / `-release.apk` suffix
//! 3. For non-debug builds only, a recursive search for any `.apk`
//!    (covers unsigned release artifacts)
//!
//! The previously-copied convenience alias `selected-debug.apk` and
//! `output-metadata` sidecars are never valid candidates.

use droidbuild_core::error::{Error, Result};
use glob::Pattern;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;
use walkdir::WalkDir;

/// Fixed alias filename some workflows copy the last build to; always a decoy.
const DECOY_ALIAS: &str = "selected-debug.apk";

/// Prefix of Gradle's metadata sidecar files
const METADATA_PREFIX: &str = "output-metadata";

/// Everything one locate call needs to know
struct LocateContext<'a> {
    outputs_root: &'a Path,
    expected_subpath: &'a str,
    build_type_segment: String,
    is_debug_like: bool,
}

impl LocateContext<'_> {
    fn expected_dir(&self) -> PathBuf {
        // An empty subpath collapses to outputs_root/<buildtype>.
        self.outputs_root
            .join(self.expected_subpath)
            .join(&self.build_type_segment)
    }
}

/// One way of searching the outputs tree for candidate artifacts
trait SearchStrategy {
    /// Name used in logs and in the not-found report
    fn describe(&self, ctx: &LocateContext) -> String;

    /// Candidate files, possibly empty; decoy filtering happens outside
    fn candidates(&self, ctx: &LocateContext) -> Vec<PathBuf>;
}

/// Non-recursive listing of the conventional output directory
struct ExpectedDir;

impl SearchStrategy for ExpectedDir {
    fn describe(&self, ctx: &LocateContext) -> String {
        ctx.expected_dir().display().to_string()
    }

    fn candidates(&self, ctx: &LocateContext) -> Vec<PathBuf> {
        let dir = ctx.expected_dir();
        let Ok(entries) = std::fs::read_dir(&dir) else {
            return Vec::new();
        };

        entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && matches_name(p, "*.apk"))
            .collect()
    }
}

/// Recursive search for the build-type suffix convention
struct SuffixSearch;

impl SuffixSearch {
    fn pattern(ctx: &LocateContext) -> &'static str {
        if ctx.is_debug_like {
            "*-debug.apk"
        } else {
            "*-release.apk"
        }
    }
}

impl SearchStrategy for SuffixSearch {
    fn describe(&self, ctx: &LocateContext) -> String {
        format!(
            "{}/**/{}",
            ctx.outputs_root.display(),
            Self::pattern(ctx)
        )
    }

    fn candidates(&self, ctx: &LocateContext) -> Vec<PathBuf> {
        find_recursive(ctx.outputs_root, Self::pattern(ctx))
    }
}

/// Unrestricted recursive search, for artifacts without the expected suffix
/// (e.g. `app-release-unsigned.apk`). Only consulted for non-debug builds.
struct AnyApk;

impl SearchStrategy for AnyApk {
    fn describe(&self, ctx: &LocateContext) -> String {
        format!("{}/**/*.apk", ctx.outputs_root.display())
    }

    fn candidates(&self, ctx: &LocateContext) -> Vec<PathBuf> {
        find_recursive(ctx.outputs_root, "*.apk")
    }
}

/// Locate the artifact produced by one build invocation.
///
/// Strategies run in order until one yields a candidate that survives the
/// decoy filter; among survivors the most recently created file wins, with
/// ties kept in traversal order. Fails with `ArtifactNotFound` naming every
/// searched location once all strategies are exhausted.
///
/// Read-only: looking twice at the same tree returns the same file.
pub fn locate(
    outputs_root: &Path,
    expected_subpath: &str,
    build_type: &str,
    is_debug_like: bool,
) -> Result<PathBuf> {
    let ctx = LocateContext {
        outputs_root,
        expected_subpath,
        build_type_segment: build_type.to_lowercase(),
        is_debug_like,
    };

    let mut strategies: Vec<Box<dyn SearchStrategy>> =
        vec![Box::new(ExpectedDir), Box::new(SuffixSearch)];
    if !is_debug_like {
        strategies.push(Box::new(AnyApk));
    }

    let mut searched = Vec::new();

    for strategy in &strategies {
        let described = strategy.describe(&ctx);
        let candidates: Vec<PathBuf> = strategy
            .candidates(&ctx)
            .into_iter()
            .filter(|p| !is_decoy(p))
            .collect();

        debug!(strategy = %described, count = candidates.len(), "Artifact search");

        if let Some(newest) = pick_newest(candidates) {
            return Ok(newest);
        }
        searched.push(PathBuf::from(described));
    }

    Err(Error::artifact_not_found(&searched))
}

/// Match a file's name (not its full path) against a glob pattern
fn matches_name(path: &Path, pattern: &str) -> bool {
    let Ok(pat) = Pattern::new(pattern) else {
        return false;
    };
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| pat.matches(n))
        .unwrap_or(false)
}

/// Recursively collect files whose name matches a glob pattern
fn find_recursive(root: &Path, pattern: &str) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().to_path_buf())
        .filter(|p| matches_name(p, pattern))
        .collect()
}

/// Known non-artifacts: the copied convenience alias and metadata sidecars
fn is_decoy(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|name| name == DECOY_ALIAS || name.starts_with(METADATA_PREFIX))
        .unwrap_or(true)
}

/// Most recently created candidate; first encountered wins on ties
fn pick_newest(candidates: Vec<PathBuf>) -> Option<PathBuf> {
    let mut best: Option<(PathBuf, SystemTime)> = None;

    for candidate in candidates {
        let created = creation_time(&candidate);
        match &best {
            Some((_, best_time)) if created <= *best_time => {}
            _ => best = Some((candidate, created)),
        }
    }

    best.map(|(path, _)| path)
}

/// Creation timestamp, falling back to mtime on filesystems without btime
fn creation_time(path: &Path) -> SystemTime {
    std::fs::metadata(path)
        .and_then(|m| m.created().or_else(|_| m.modified()))
        .unwrap_or(SystemTime::UNIX_EPOCH)
}
