// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Run settings loaded from TOML.
//!
//! ```toml
//! browser = "chrome"
//! record_path = "tests/fixtures/login.hux"
//! override_screenshots = false
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use visreplay_record::{record_file, Event, Record, RecordError};

use crate::engine::PlaybackInfo;
use crate::env;

/// Browser used when none is configured.
pub const DEFAULT_BROWSER: &str = "firefox";

fn default_browser() -> String {
    DEFAULT_BROWSER.to_string()
}

/// Errors from loading run settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid value for {name}: {value:?}")]
    InvalidEnv { name: &'static str, value: String },
}

/// Everything needed to replay one recording, apart from the driver.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RunSettings {
    /// Browser under test (default: "firefox")
    #[serde(default = "default_browser")]
    pub browser: String,

    /// Directory containing `record.json` and the baseline screenshots
    pub record_path: PathBuf,

    /// Rebase baselines instead of comparing (default: false)
    #[serde(default)]
    pub override_screenshots: bool,
}

impl RunSettings {
    pub fn new(record_path: impl Into<PathBuf>) -> Self {
        Self {
            browser: default_browser(),
            record_path: record_path.into(),
            override_screenshots: false,
        }
    }

    pub fn with_browser(mut self, browser: impl Into<String>) -> Self {
        self.browser = browser.into();
        self
    }

    pub fn with_override_screenshots(mut self, override_screenshots: bool) -> Self {
        self.override_screenshots = override_screenshots;
        self
    }

    /// Parse settings from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings from a TOML file.
    ///
    /// A relative `record_path` is resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut settings = Self::from_toml_str(&content)?;
        if settings.record_path.is_relative() {
            if let Some(dir) = path.parent() {
                settings.record_path = dir.join(&settings.record_path);
            }
        }
        Ok(settings)
    }

    /// Apply `VISREPLAY_*` environment overrides.
    pub fn with_env_overrides(self) -> Result<Self, SettingsError> {
        self.with_overrides_from(env::var)
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn with_overrides_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SettingsError> {
        if let Some(browser) = lookup(env::VISREPLAY_BROWSER).filter(|b| !b.is_empty()) {
            self.browser = browser;
        }
        if let Some(path) = lookup(env::VISREPLAY_RECORD_PATH).filter(|p| !p.is_empty()) {
            self.record_path = PathBuf::from(path);
        }
        if let Some(value) = lookup(env::VISREPLAY_OVERRIDE_SCREENSHOTS) {
            self.override_screenshots =
                env::parse_flag(&value).ok_or_else(|| SettingsError::InvalidEnv {
                    name: env::VISREPLAY_OVERRIDE_SCREENSHOTS,
                    value,
                })?;
        }
        Ok(self)
    }

    /// Path of the recording's event list.
    pub fn record_file(&self) -> PathBuf {
        record_file(&self.record_path)
    }

    /// Load the recording's events.
    pub fn load_record(&self) -> Result<Record, RecordError> {
        Record::load(&self.record_file())
    }

    /// Playback configuration for these settings.
    pub fn playback_info<'a, D>(&self, driver: &'a D, events: &'a [Event]) -> PlaybackInfo<'a, D> {
        PlaybackInfo::new(self.browser.clone(), driver, events, self.record_path.clone())
            .with_override_screenshots(self.override_screenshots)
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
