// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Event types produced by the recorder.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::io::{load_json, save_json, RecordError};

/// A single recorded interaction.
///
/// Serialized with an `action` tag, e.g. `{"action":"click","x":10,"y":20}`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Event {
    /// Click at viewport coordinates.
    Click { x: i64, y: i64 },
    /// A printable character, or a named special key such as `ARROW_LEFT`.
    Keypress { key: String },
    /// Scroll the window to an absolute offset.
    Scroll { x: i64, y: i64 },
    /// Wait before the next event.
    Pause { ms: u64 },
    /// Capture and compare a screenshot.
    Screenshot,
}

impl Event {
    /// The fieldless kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Click { .. } => EventKind::Click,
            Event::Keypress { .. } => EventKind::Keypress,
            Event::Scroll { .. } => EventKind::Scroll,
            Event::Pause { .. } => EventKind::Pause,
            Event::Screenshot => EventKind::Screenshot,
        }
    }

    pub fn is_screenshot(&self) -> bool {
        matches!(self, Event::Screenshot)
    }
}

/// Event tag without payload, for logging and error context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Keypress,
    Scroll,
    Pause,
    Screenshot,
}

impl EventKind {
    /// Wire name of the action.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::Keypress => "keypress",
            EventKind::Scroll => "scroll",
            EventKind::Pause => "pause",
            EventKind::Screenshot => "screenshot",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered recording, serialized as a bare JSON array of events.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Record(Vec<Event>);

impl Record {
    pub fn new(events: Vec<Event>) -> Self {
        Self(events)
    }

    /// Load a recording from a JSON file.
    pub fn load(path: &Path) -> Result<Self, RecordError> {
        load_json(path)
    }

    /// Save the recording, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), RecordError> {
        save_json(path, self)
    }

    pub fn events(&self) -> &[Event] {
        &self.0
    }

    pub fn into_events(self) -> Vec<Event> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of declared `screenshot` events.
    pub fn screenshot_count(&self) -> usize {
        self.0.iter().filter(|e| e.is_screenshot()).count()
    }

    /// Number of screenshots a full playback of this recording produces.
    ///
    /// The final event always ends in the terminal screenshot, so a declared
    /// screenshot in the last position does not add a second one.
    pub fn expected_screenshots(&self) -> usize {
        match self.0.split_last() {
            None => 0,
            Some((_, rest)) => rest.iter().filter(|e| e.is_screenshot()).count() + 1,
        }
    }
}

impl From<Vec<Event>> for Record {
    fn from(events: Vec<Event>) -> Self {
        Self(events)
    }
}

impl AsRef<[Event]> for Record {
    fn as_ref(&self) -> &[Event] {
        &self.0
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
