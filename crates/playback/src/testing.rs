// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory driver and comparator fakes.
//!
//! Both fakes append to one shared [`CallLog`], so a test can assert the exact
//! interleaving of driver and comparator calls across a playback run.

use std::collections::HashSet;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use image::{ImageFormat, Rgba, RgbaImage};
use parking_lot::Mutex;

use crate::comparator::{diff_path, Comparator, ComparatorError, Comparison};
use crate::driver::{Driver, DriverError, Element};
use crate::keys::SpecialKeys;

/// A recorded call against a fake.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    ExecuteScript(String),
    QueryElement(String),
    ActiveElement,
    TakeScreenshot,
    SendKeys { element: String, text: String },
    Click { element: String },
    WriteBaseline(PathBuf),
    Compare { baseline: PathBuf },
    RemoveAbove { browser: String, index: u32 },
}

impl Call {
    /// Short label used by [`CallLog::summary`].
    pub fn label(&self) -> String {
        fn file(path: &Path) -> String {
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        }

        match self {
            Call::ExecuteScript(_) => "script".to_string(),
            Call::QueryElement(_) => "query".to_string(),
            Call::ActiveElement => "focus".to_string(),
            Call::TakeScreenshot => "capture".to_string(),
            Call::SendKeys { text, .. } => format!("keys:{text}"),
            Call::Click { element } => format!("click:{element}"),
            Call::WriteBaseline(path) => format!("baseline:{}", file(path)),
            Call::Compare { baseline } => format!("compare:{}", file(baseline)),
            Call::RemoveAbove { browser, index } => format!("cleanup:{browser}>{index}"),
        }
    }
}

/// Predicate selecting the call that should fail.
pub type Fault = Arc<dyn Fn(&Call) -> bool + Send + Sync>;

/// Ordered log shared between fakes.
#[derive(Clone, Debug, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, call: Call) {
        self.calls.lock().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Labels of every call, in order.
    pub fn summary(&self) -> Vec<String> {
        self.calls.lock().iter().map(Call::label).collect()
    }

    /// Scripts passed to `execute_script`, in order.
    pub fn scripts(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                Call::ExecuteScript(s) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }
}

fn injected(call: &Call) -> String {
    format!("injected failure on {}", call.label())
}

/// Element handed out by [`FakeDriver`].
pub struct FakeElement {
    id: String,
    log: CallLog,
    fault: Option<Fault>,
}

impl FakeElement {
    fn record(&self, call: Call) -> Result<(), DriverError> {
        let failed = self.fault.as_ref().is_some_and(|f| f(&call));
        let message = injected(&call);
        self.log.push(call);
        if failed {
            return Err(DriverError::Backend(message));
        }
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

#[async_trait]
impl Element for FakeElement {
    async fn send_keys(&self, text: &str) -> Result<(), DriverError> {
        self.record(Call::SendKeys {
            element: self.id.clone(),
            text: text.to_string(),
        })
    }

    async fn click(&self) -> Result<(), DriverError> {
        self.record(Call::Click {
            element: self.id.clone(),
        })
    }
}

/// Scriptable browser driver.
pub struct FakeDriver {
    log: CallLog,
    screenshot: Vec<u8>,
    focused: Option<String>,
    element_at_point: bool,
    keys: SpecialKeys,
    fault: Option<Fault>,
}

impl FakeDriver {
    /// A driver with a focused `input`, an element under every point, and an
    /// empty screenshot payload.
    pub fn new() -> Self {
        Self {
            log: CallLog::new(),
            screenshot: Vec::new(),
            focused: Some("input".to_string()),
            element_at_point: true,
            keys: SpecialKeys::webdriver(),
            fault: None,
        }
    }

    /// Share an existing log.
    pub fn with_log(mut self, log: CallLog) -> Self {
        self.log = log;
        self
    }

    /// Bytes returned by `take_screenshot`.
    pub fn with_screenshot(mut self, png: Vec<u8>) -> Self {
        self.screenshot = png;
        self
    }

    /// Id of the focused element, or `None` for no focus.
    pub fn with_focus(mut self, focused: Option<&str>) -> Self {
        self.focused = focused.map(str::to_string);
        self
    }

    /// Whether point queries find an element.
    pub fn with_element_at_point(mut self, present: bool) -> Self {
        self.element_at_point = present;
        self
    }

    pub fn with_keys(mut self, keys: SpecialKeys) -> Self {
        self.keys = keys;
        self
    }

    /// Fail every call matching `fault`.
    pub fn failing_when(mut self, fault: impl Fn(&Call) -> bool + Send + Sync + 'static) -> Self {
        self.fault = Some(Arc::new(fault));
        self
    }

    pub fn log(&self) -> &CallLog {
        &self.log
    }

    fn record(&self, call: Call) -> Result<(), DriverError> {
        let failed = self.fault.as_ref().is_some_and(|f| f(&call));
        let message = injected(&call);
        self.log.push(call);
        if failed {
            return Err(DriverError::Backend(message));
        }
        Ok(())
    }

    fn element(&self, id: &str) -> FakeElement {
        FakeElement {
            id: id.to_string(),
            log: self.log.clone(),
            fault: self.fault.clone(),
        }
    }
}

impl Default for FakeDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Driver for FakeDriver {
    type Element = FakeElement;

    async fn take_screenshot(&self) -> Result<Vec<u8>, DriverError> {
        self.record(Call::TakeScreenshot)?;
        Ok(self.screenshot.clone())
    }

    async fn execute_script(&self, source: &str) -> Result<serde_json::Value, DriverError> {
        self.record(Call::ExecuteScript(source.to_string()))?;
        Ok(serde_json::Value::Null)
    }

    async fn query_element(&self, source: &str) -> Result<Option<FakeElement>, DriverError> {
        self.record(Call::QueryElement(source.to_string()))?;
        Ok(self.element_at_point.then(|| self.element("point")))
    }

    async fn active_element(&self) -> Result<Option<FakeElement>, DriverError> {
        self.record(Call::ActiveElement)?;
        Ok(self.focused.as_deref().map(|id| self.element(id)))
    }

    fn special_keys(&self) -> &SpecialKeys {
        &self.keys
    }
}

/// Comparator that matches everything unless told otherwise.
#[derive(Default)]
pub struct FakeComparator {
    log: CallLog,
    mismatches: HashSet<String>,
    fault: Option<Fault>,
}

impl FakeComparator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log(mut self, log: CallLog) -> Self {
        self.log = log;
        self
    }

    /// Report a mismatch for the screenshot with this file name.
    pub fn mismatching(mut self, screenshot: impl Into<String>) -> Self {
        self.mismatches.insert(screenshot.into());
        self
    }

    /// Fail every call matching `fault`.
    pub fn failing_when(mut self, fault: impl Fn(&Call) -> bool + Send + Sync + 'static) -> Self {
        self.fault = Some(Arc::new(fault));
        self
    }

    pub fn log(&self) -> &CallLog {
        &self.log
    }

    fn record(&self, call: Call, path: &Path) -> Result<(), ComparatorError> {
        let failed = self.fault.as_ref().is_some_and(|f| f(&call));
        let message = injected(&call);
        self.log.push(call);
        if failed {
            return Err(ComparatorError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::other(message),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Comparator for FakeComparator {
    async fn write_baseline(&self, path: &Path, _image: &[u8]) -> Result<(), ComparatorError> {
        self.record(Call::WriteBaseline(path.to_path_buf()), path)
    }

    async fn compare_and_save_diff(
        &self,
        _image: &[u8],
        baseline_path: &Path,
        record_path: &Path,
    ) -> Result<Comparison, ComparatorError> {
        self.record(
            Call::Compare {
                baseline: baseline_path.to_path_buf(),
            },
            baseline_path,
        )?;
        let name = baseline_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.mismatches.contains(&name) {
            Ok(Comparison::mismatched(diff_path(baseline_path, record_path)))
        } else {
            Ok(Comparison::matched())
        }
    }

    async fn remove_artifacts_above(
        &self,
        record_path: &Path,
        browser_name: &str,
        index: u32,
    ) -> Result<(), ComparatorError> {
        self.record(
            Call::RemoveAbove {
                browser: browser_name.to_string(),
                index,
            },
            record_path,
        )
    }
}

/// Encode a solid-colour PNG.
pub fn solid_png(width: u32, height: u32, rgba: [u8; 4]) -> Result<Vec<u8>, image::ImageError> {
    encode_png(&RgbaImage::from_pixel(width, height, Rgba(rgba)))
}

/// Encode an image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, image::ImageError> {
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png)?;
    Ok(bytes.into_inner())
}
