// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem comparator over PNG baselines.
//!
//! Baselines and diffs live flat in the recording directory:
//! `firefox-1.png`, `firefox-1-diff.png`, `chrome-1.png`, ...

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use image::{ImageFormat, Rgba, RgbaImage};

use crate::comparator::{artifact_index, diff_path, Comparator, ComparatorError, Comparison};

/// Colour of pixels that differ from the baseline.
const DIFF_PIXEL: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Compares captures pixel-for-pixel against PNG files on disk.
#[derive(Clone, Debug, Default)]
pub struct FsComparator;

impl FsComparator {
    pub fn new() -> Self {
        Self
    }

    /// Delete artifacts above `index`, returning the removed paths.
    pub async fn prune_above(
        &self,
        record_path: &Path,
        browser_name: &str,
        index: u32,
    ) -> Result<Vec<PathBuf>, ComparatorError> {
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| ComparatorError::Io { path, source }
        };

        let mut entries = match tokio::fs::read_dir(record_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_err(record_path)(e)),
        };

        let mut removed = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_err(record_path))? {
            let name = entry.file_name();
            let Some(found) = name.to_str().and_then(|n| artifact_index(browser_name, n)) else {
                continue;
            };
            if found <= u64::from(index) {
                continue;
            }
            let path = entry.path();
            match tokio::fs::remove_file(&path).await {
                Ok(()) => removed.push(path),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(io_err(&path)(e)),
            }
        }

        removed.sort();
        Ok(removed)
    }
}

#[async_trait]
impl Comparator for FsComparator {
    async fn write_baseline(&self, path: &Path, image: &[u8]) -> Result<(), ComparatorError> {
        let parent = path.parent().unwrap_or(Path::new(""));
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| ComparatorError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        tokio::fs::write(path, image)
            .await
            .map_err(|source| ComparatorError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        // The new baseline supersedes whatever mismatch an earlier run recorded.
        let stale = diff_path(path, parent);
        match tokio::fs::remove_file(&stale).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(ComparatorError::Io {
                path: stale,
                source,
            }),
        }
    }

    async fn compare_and_save_diff(
        &self,
        image: &[u8],
        baseline_path: &Path,
        record_path: &Path,
    ) -> Result<Comparison, ComparatorError> {
        let capture = image.to_vec();
        let baseline_path = baseline_path.to_path_buf();
        let diff_path = diff_path(&baseline_path, record_path);
        tokio::task::spawn_blocking(move || compare_files(&capture, &baseline_path, &diff_path))
            .await?
    }

    async fn remove_artifacts_above(
        &self,
        record_path: &Path,
        browser_name: &str,
        index: u32,
    ) -> Result<(), ComparatorError> {
        let removed = self.prune_above(record_path, browser_name, index).await?;
        tracing::debug!(
            record = %record_path.display(),
            browser = browser_name,
            above = index,
            removed = removed.len(),
            "pruned dangling screenshots"
        );
        Ok(())
    }
}

fn compare_files(
    capture: &[u8],
    baseline_path: &Path,
    diff_path: &Path,
) -> Result<Comparison, ComparatorError> {
    if !baseline_path.exists() {
        return Err(ComparatorError::MissingBaseline(baseline_path.to_path_buf()));
    }

    let baseline = image::open(baseline_path)
        .map_err(|source| ComparatorError::Decode {
            what: baseline_path.display().to_string(),
            source,
        })?
        .to_rgba8();
    let actual = image::load_from_memory(capture)
        .map_err(|source| ComparatorError::Decode {
            what: "captured screenshot".to_string(),
            source,
        })?
        .to_rgba8();

    match diff_image(&baseline, &actual) {
        None => {
            // A diff left by an earlier failing run no longer describes anything.
            match std::fs::remove_file(diff_path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(source) => {
                    return Err(ComparatorError::Io {
                        path: diff_path.to_path_buf(),
                        source,
                    })
                }
            }
            Ok(Comparison::matched())
        }
        Some(diff) => {
            diff.save_with_format(diff_path, ImageFormat::Png)
                .map_err(|source| ComparatorError::Encode {
                    path: diff_path.to_path_buf(),
                    source,
                })?;
            Ok(Comparison::mismatched(diff_path))
        }
    }
}

/// Build a diff image, or `None` when both images are identical.
///
/// The diff covers the union of both sizes. Differing or out-of-bounds pixels
/// are solid red; identical pixels are the baseline faded towards white.
pub fn diff_image(expected: &RgbaImage, actual: &RgbaImage) -> Option<RgbaImage> {
    if expected.dimensions() == actual.dimensions() && expected.as_raw() == actual.as_raw() {
        return None;
    }

    let width = expected.width().max(actual.width());
    let height = expected.height().max(actual.height());
    let mut diff = RgbaImage::new(width, height);
    for (x, y, pixel) in diff.enumerate_pixels_mut() {
        *pixel = match (expected.get_pixel_checked(x, y), actual.get_pixel_checked(x, y)) {
            (Some(e), Some(a)) if e == a => faded(*e),
            _ => DIFF_PIXEL,
        };
    }
    Some(diff)
}

fn faded(Rgba([r, g, b, _]): Rgba<u8>) -> Rgba<u8> {
    let fade = |c: u8| c / 4 + 191;
    Rgba([fade(r), fade(g), fade(b), 255])
}

#[cfg(test)]
#[path = "fs_comparator_tests.rs"]
mod tests;
