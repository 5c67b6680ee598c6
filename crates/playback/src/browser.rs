// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-browser capture quirks.

/// Hides the scrollbar so its fading overlay never shows up in captures.
///
/// Restyling only takes effect after a layout pass, so the page is scrolled
/// away and back while overflow is hidden.
pub const SCROLLBAR_WORKAROUND_SCRIPT: &str = r#"var style = document.createElement("style");
style.textContent = "body::-webkit-scrollbar { width: 0 !important; }";
document.head.appendChild(style);
var previousOverflow = document.body.style.overflow;
document.body.style.overflow = "hidden";
window.scrollTo(0, 10);
window.scrollTo(0, 0);
document.body.style.overflow = previousOverflow;"#;

/// Capture quirks of the browser under test, resolved once per run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BrowserQuirks {
    /// Screenshots include a scrollbar whose transparency changes over time.
    pub needs_scrollbar_workaround: bool,
}

impl BrowserQuirks {
    pub fn for_browser(browser_name: &str) -> Self {
        let needs_scrollbar_workaround = ["chrome", "chromium"]
            .iter()
            .any(|name| browser_name.eq_ignore_ascii_case(name));
        Self {
            needs_scrollbar_workaround,
        }
    }
}
