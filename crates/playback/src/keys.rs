// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Special key table.
//!
//! The recorder stores printable keys as the character itself and named keys
//! as identifiers like `ARROW_LEFT`. Named keys are resolved to the code the
//! driver expects before being sent.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::driver::DriverError;

/// Named key → driver-native key code.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpecialKeys {
    codes: HashMap<String, String>,
}

impl SpecialKeys {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The W3C WebDriver key table (private-use code points U+E000..).
    pub fn webdriver() -> Self {
        const TABLE: &[(&str, char)] = &[
            ("NULL", '\u{E000}'),
            ("CANCEL", '\u{E001}'),
            ("HELP", '\u{E002}'),
            ("BACK_SPACE", '\u{E003}'),
            ("TAB", '\u{E004}'),
            ("CLEAR", '\u{E005}'),
            ("RETURN", '\u{E006}'),
            ("ENTER", '\u{E007}'),
            ("SHIFT", '\u{E008}'),
            ("CONTROL", '\u{E009}'),
            ("ALT", '\u{E00A}'),
            ("PAUSE", '\u{E00B}'),
            ("ESCAPE", '\u{E00C}'),
            ("SPACE", '\u{E00D}'),
            ("PAGE_UP", '\u{E00E}'),
            ("PAGE_DOWN", '\u{E00F}'),
            ("END", '\u{E010}'),
            ("HOME", '\u{E011}'),
            ("ARROW_LEFT", '\u{E012}'),
            ("LEFT", '\u{E012}'),
            ("ARROW_UP", '\u{E013}'),
            ("UP", '\u{E013}'),
            ("ARROW_RIGHT", '\u{E014}'),
            ("RIGHT", '\u{E014}'),
            ("ARROW_DOWN", '\u{E015}'),
            ("DOWN", '\u{E015}'),
            ("INSERT", '\u{E016}'),
            ("DELETE", '\u{E017}'),
            ("SEMICOLON", '\u{E018}'),
            ("EQUALS", '\u{E019}'),
            ("NUMPAD0", '\u{E01A}'),
            ("NUMPAD1", '\u{E01B}'),
            ("NUMPAD2", '\u{E01C}'),
            ("NUMPAD3", '\u{E01D}'),
            ("NUMPAD4", '\u{E01E}'),
            ("NUMPAD5", '\u{E01F}'),
            ("NUMPAD6", '\u{E020}'),
            ("NUMPAD7", '\u{E021}'),
            ("NUMPAD8", '\u{E022}'),
            ("NUMPAD9", '\u{E023}'),
            ("MULTIPLY", '\u{E024}'),
            ("ADD", '\u{E025}'),
            ("SEPARATOR", '\u{E026}'),
            ("SUBTRACT", '\u{E027}'),
            ("DECIMAL", '\u{E028}'),
            ("DIVIDE", '\u{E029}'),
            ("F1", '\u{E031}'),
            ("F2", '\u{E032}'),
            ("F3", '\u{E033}'),
            ("F4", '\u{E034}'),
            ("F5", '\u{E035}'),
            ("F6", '\u{E036}'),
            ("F7", '\u{E037}'),
            ("F8", '\u{E038}'),
            ("F9", '\u{E039}'),
            ("F10", '\u{E03A}'),
            ("F11", '\u{E03B}'),
            ("F12", '\u{E03C}'),
            ("META", '\u{E03D}'),
            ("COMMAND", '\u{E03D}'),
        ];

        TABLE
            .iter()
            .fold(Self::new(), |keys, (name, code)| keys.with(*name, code.to_string()))
    }

    /// Shared instance of [`SpecialKeys::webdriver`].
    pub fn webdriver_shared() -> &'static SpecialKeys {
        static TABLE: OnceLock<SpecialKeys> = OnceLock::new();
        TABLE.get_or_init(Self::webdriver)
    }

    /// Add or replace a mapping.
    pub fn with(mut self, name: impl Into<String>, code: impl Into<String>) -> Self {
        self.codes.insert(name.into(), code.into());
        self
    }

    /// Look up a named key.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.codes.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Text to send for a recorded key.
    ///
    /// Anything longer than one character is taken to be a key name. Literal
    /// multi-character text therefore never reaches the driver as-is; the
    /// recorder only ever emits single characters or names.
    pub fn resolve<'a>(&'a self, key: &'a str) -> Result<&'a str, DriverError> {
        if key.chars().count() > 1 {
            self.get(key)
                .ok_or_else(|| DriverError::UnknownSpecialKey(key.to_string()))
        } else {
            Ok(key)
        }
    }
}

#[cfg(test)]
#[path = "keys_tests.rs"]
mod tests;
