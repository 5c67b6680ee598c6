// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSON file persistence for recordings.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// File name of the event list inside a recording directory.
pub const RECORD_FILE: &str = "record.json";

/// Errors from loading or saving JSON files.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Path of the event list for a recording directory.
pub fn record_file(dir: &Path) -> PathBuf {
    dir.join(RECORD_FILE)
}

/// Load and deserialize a JSON file.
pub fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, RecordError> {
    let content = std::fs::read_to_string(path).map_err(|source| RecordError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| RecordError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize to pretty JSON and write it, creating missing parent directories.
pub fn save_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), RecordError> {
    let mut json = serde_json::to_string_pretty(value).map_err(|source| RecordError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    json.push('\n');

    let io_err = |source| RecordError::Io {
        path: path.to_path_buf(),
        source,
    };
    ensure_parent_exists(path).map_err(io_err)?;
    std::fs::write(path, json).map_err(io_err)
}

/// Ensure a file's parent directory exists, creating it and ancestors if needed.
pub fn ensure_parent_exists(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "io_tests.rs"]
mod tests;
