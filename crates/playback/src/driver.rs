// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Browser automation seam.
//!
//! Playback only needs a handful of primitives from a browser driver. Any
//! WebDriver or DevTools client can back these traits; the engine borrows the
//! driver for one run and never closes it.

use async_trait::async_trait;
use thiserror::Error;

use crate::keys::SpecialKeys;

/// Failure reported by a driver call.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("script execution failed: {0}")]
    Script(String),

    #[error("screenshot capture failed: {0}")]
    Capture(String),

    #[error("no element at ({x}, {y})")]
    NoElementAt { x: i64, y: i64 },

    #[error("unknown special key: {0}")]
    UnknownSpecialKey(String),

    #[error("{0}")]
    Backend(String),
}

/// An element reference returned by the driver.
#[async_trait]
pub trait Element: Send + Sync {
    /// Type text into the element.
    async fn send_keys(&self, text: &str) -> Result<(), DriverError>;

    /// Click the element.
    async fn click(&self) -> Result<(), DriverError>;
}

/// Browser automation primitives used during playback.
#[async_trait]
pub trait Driver: Send + Sync {
    type Element: Element;

    /// Capture the viewport as PNG bytes.
    async fn take_screenshot(&self) -> Result<Vec<u8>, DriverError>;

    /// Run a script in the page and return its JSON result.
    async fn execute_script(&self, source: &str) -> Result<serde_json::Value, DriverError>;

    /// Run a script whose result is an element, or null.
    async fn query_element(&self, source: &str) -> Result<Option<Self::Element>, DriverError>;

    /// The focused element, if any.
    async fn active_element(&self) -> Result<Option<Self::Element>, DriverError>;

    /// Table used to translate named keys.
    fn special_keys(&self) -> &SpecialKeys {
        SpecialKeys::webdriver_shared()
    }
}
