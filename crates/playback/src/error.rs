// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Playback errors.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use visreplay_record::EventKind;

use crate::comparator::ComparatorError;
use crate::driver::DriverError;

/// Where in a run an action failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Browser normalization before the first event.
    Setup,
    /// The event at `index`.
    Event { index: usize, kind: EventKind },
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Setup => f.write_str("browser setup"),
            Step::Event { index, kind } => write!(f, "event #{index} ({kind})"),
        }
    }
}

/// Why a playback run failed.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("recording has no events")]
    EmptyRecording,

    #[error("{step} failed: {source}")]
    Action {
        step: Step,
        #[source]
        source: DriverError,
    },

    #[error(
        "New screenshot {screenshot} looks different. The diff image is saved for you to examine at {}.",
        .diff_path.display()
    )]
    VisualMismatch {
        screenshot: String,
        diff_path: PathBuf,
    },

    #[error("screenshot {screenshot} could not be stored or compared: {source}")]
    Artifact {
        screenshot: String,
        #[source]
        source: ComparatorError,
    },

    #[error("failed to remove dangling screenshots: {0}")]
    Cleanup(#[source] ComparatorError),
}

impl PlaybackError {
    /// Whether the run failed because a screenshot differs from its baseline.
    pub fn is_visual_mismatch(&self) -> bool {
        matches!(self, PlaybackError::VisualMismatch { .. })
    }
}
