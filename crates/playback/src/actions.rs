// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Simulators for individual recorded actions.
//!
//! Each simulator performs exactly one driver round-trip sequence and never
//! retries. Failures are reported to the engine, which attaches the event
//! they belong to.

use std::path::Path;
use std::time::Duration;

use tracing::info;

use crate::comparator::{diff_path, Comparator, ComparatorError};
use crate::driver::{Driver, DriverError, Element};
use crate::error::{PlaybackError, Step};
use crate::time::Clock;

/// Script returning the topmost element at a viewport point.
///
/// Focusing a text field by click does not move the caret to the clicked
/// position, so where the browser exposes `caretPositionFromPoint` the
/// selection is placed explicitly first.
pub fn click_script(x: i64, y: i64) -> String {
    format!(
        r#"var el = document.elementFromPoint({x}, {y});
if (el && (el.tagName === "TEXTAREA" || el.tagName === "INPUT") && document.caretPositionFromPoint) {{
  var caret = document.caretPositionFromPoint({x}, {y});
  if (caret) {{ el.setSelectionRange(caret.offset, caret.offset); }}
}}
return el;"#
    )
}

/// Script scrolling the window to an absolute offset.
pub fn scroll_script(x: i64, y: i64) -> String {
    format!("window.scrollTo({x}, {y});")
}

/// Click the element under `(x, y)`.
pub async fn click<D: Driver>(driver: &D, x: i64, y: i64) -> Result<(), DriverError> {
    info!(x, y, "Clicking ({x}, {y})");
    let element = driver
        .query_element(&click_script(x, y))
        .await?
        .ok_or(DriverError::NoElementAt { x, y })?;
    element.click().await
}

/// Type `key` into the focused element. Without focus this is a no-op.
pub async fn keypress<D: Driver>(driver: &D, key: &str) -> Result<(), DriverError> {
    info!(key, "Typing {key}");
    let Some(element) = driver.active_element().await? else {
        return Ok(());
    };
    let text = driver.special_keys().resolve(key)?;
    element.send_keys(text).await
}

/// Scroll the window to `(x, y)`.
pub async fn scroll<D: Driver>(driver: &D, x: i64, y: i64) -> Result<(), DriverError> {
    info!(x, y, "Scrolling to ({x}, {y})");
    driver.execute_script(&scroll_script(x, y)).await?;
    Ok(())
}

/// Wait for `ms` milliseconds.
pub async fn pause(clock: &dyn Clock, ms: u64) {
    info!(ms, "Pause for {ms} ms");
    clock.sleep(Duration::from_millis(ms)).await;
}

/// One capture-and-compare step.
#[derive(Clone, Debug)]
pub struct ScreenshotStep<'a> {
    /// Directory holding this recording's baselines.
    pub record_path: &'a Path,
    /// Screenshot file name, see [`crate::screenshot_name`].
    pub name: String,
    /// Replace the baseline instead of comparing against it.
    pub override_baseline: bool,
}

impl ScreenshotStep<'_> {
    /// Capture the page, then either rebase or compare.
    ///
    /// `step` identifies the event for capture failures.
    pub async fn run<D, C>(&self, driver: &D, comparator: &C, step: Step) -> Result<(), PlaybackError>
    where
        D: Driver,
        C: Comparator + ?Sized,
    {
        info!(screenshot = %self.name, "Taking screenshot {}", self.name);
        let image = driver
            .take_screenshot()
            .await
            .map_err(|source| PlaybackError::Action { step, source })?;

        let baseline = self.record_path.join(&self.name);
        let artifact = |source: ComparatorError| PlaybackError::Artifact {
            screenshot: self.name.clone(),
            source,
        };

        if self.override_baseline {
            return comparator
                .write_baseline(&baseline, &image)
                .await
                .map_err(artifact);
        }

        let comparison = comparator
            .compare_and_save_diff(&image, &baseline, self.record_path)
            .await
            .map_err(artifact)?;
        if comparison.matched {
            return Ok(());
        }

        Err(PlaybackError::VisualMismatch {
            screenshot: self.name.clone(),
            diff_path: comparison
                .diff_path
                .unwrap_or_else(|| diff_path(&baseline, self.record_path)),
        })
    }
}

#[cfg(test)]
#[path = "actions_tests.rs"]
mod tests;
