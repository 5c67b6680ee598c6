// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Screenshot comparison seam and artifact naming.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

const PNG_EXTENSION: &str = ".png";
const DIFF_SUFFIX: &str = "-diff";

/// Failure while persisting, comparing, or pruning screenshot artifacts.
#[derive(Debug, Error)]
pub enum ComparatorError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {what}: {source}")]
    Decode {
        what: String,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("no baseline screenshot at {}", .0.display())]
    MissingBaseline(PathBuf),

    #[error("comparison task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Outcome of comparing a capture against its baseline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comparison {
    pub matched: bool,
    /// Where the diff artifact was written, on mismatch.
    pub diff_path: Option<PathBuf>,
}

impl Comparison {
    pub fn matched() -> Self {
        Self {
            matched: true,
            diff_path: None,
        }
    }

    pub fn mismatched(diff_path: impl Into<PathBuf>) -> Self {
        Self {
            matched: false,
            diff_path: Some(diff_path.into()),
        }
    }
}

/// Baseline storage and visual comparison.
#[async_trait]
pub trait Comparator: Send + Sync {
    /// Persist `image` as the new baseline at `path`.
    async fn write_baseline(&self, path: &Path, image: &[u8]) -> Result<(), ComparatorError>;

    /// Compare `image` against the baseline, saving a diff into `record_path`
    /// when they differ.
    async fn compare_and_save_diff(
        &self,
        image: &[u8],
        baseline_path: &Path,
        record_path: &Path,
    ) -> Result<Comparison, ComparatorError>;

    /// Remove this browser's screenshot artifacts with an index above `index`.
    async fn remove_artifacts_above(
        &self,
        record_path: &Path,
        browser_name: &str,
        index: u32,
    ) -> Result<(), ComparatorError>;
}

/// File name of the `index`th screenshot for a browser, e.g. `firefox-1.png`.
pub fn screenshot_name(browser_name: &str, index: u32) -> String {
    format!("{browser_name}-{index}{PNG_EXTENSION}")
}

/// File name of the diff for the `index`th screenshot, e.g. `firefox-1-diff.png`.
pub fn diff_name(browser_name: &str, index: u32) -> String {
    format!("{browser_name}-{index}{DIFF_SUFFIX}{PNG_EXTENSION}")
}

/// Diff artifact path for a baseline, placed in `record_path`.
pub fn diff_path(baseline_path: &Path, record_path: &Path) -> PathBuf {
    let stem = baseline_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    record_path.join(format!("{stem}{DIFF_SUFFIX}{PNG_EXTENSION}"))
}

/// Screenshot index encoded in a baseline or diff file name for `browser_name`.
///
/// Returns `None` for files belonging to other browsers or not produced by
/// playback at all. Indices too long for `u64` saturate to `u64::MAX`.
pub fn artifact_index(browser_name: &str, file_name: &str) -> Option<u64> {
    let rest = file_name
        .strip_prefix(browser_name)?
        .strip_prefix('-')?
        .strip_suffix(PNG_EXTENSION)?;
    let digits = rest.strip_suffix(DIFF_SUFFIX).unwrap_or(rest);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(digits.parse().unwrap_or(u64::MAX))
}

#[cfg(test)]
#[path = "comparator_tests.rs"]
mod tests;
