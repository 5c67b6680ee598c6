// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Recorded browser interactions for visreplay.
//!
//! A recording is an ordered list of [`Event`]s stored as a JSON array in
//! `record.json`, next to the baseline screenshots it is validated against.

mod event;
mod io;

pub use event::{Event, EventKind, Record};
pub use io::{ensure_parent_exists, load_json, record_file, save_json, RecordError, RECORD_FILE};
