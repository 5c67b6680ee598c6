// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All environment variables read by visreplay are named here. Use [`var`]
//! instead of calling `std::env::var()` directly.

/// `VISREPLAY_BROWSER`: browser name override.
pub const VISREPLAY_BROWSER: &str = "VISREPLAY_BROWSER";

/// `VISREPLAY_RECORD_PATH`: recording directory override.
pub const VISREPLAY_RECORD_PATH: &str = "VISREPLAY_RECORD_PATH";

/// `VISREPLAY_OVERRIDE_SCREENSHOTS`: rebase baselines instead of comparing.
pub const VISREPLAY_OVERRIDE_SCREENSHOTS: &str = "VISREPLAY_OVERRIDE_SCREENSHOTS";

/// Read a variable, treating unset and non-unicode values as absent.
pub fn var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Parse a boolean flag value. Returns `None` for unrecognized input.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
