// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Visual regression playback for web UIs.
//!
//! Replays a recorded list of clicks, keypresses, scrolls, pauses and
//! screenshots against a live browser, and diffs every screenshot against a
//! saved baseline.
//!
//! ```no_run
//! use std::path::Path;
//! use visreplay::{play, Driver, PlaybackInfo, PlaybackError};
//! use visreplay::record::Record;
//!
//! # async fn example<D: Driver>(driver: &D) -> Result<(), Box<dyn std::error::Error>> {
//! let record = Record::load(Path::new("login.hux/record.json"))?;
//! let info = PlaybackInfo::new("firefox", driver, record.events(), "login.hux");
//! match play(&info).await {
//!     Ok(()) => println!("no visual changes"),
//!     Err(PlaybackError::VisualMismatch { diff_path, .. }) => {
//!         println!("see {}", diff_path.display())
//!     }
//!     Err(e) => return Err(e.into()),
//! }
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod browser;
pub mod comparator;
pub mod driver;
pub mod engine;
pub mod env;
pub mod error;
pub mod fs_comparator;
pub mod keys;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod time;

/// Re-exported recording types from the visreplay-record crate.
pub mod record {
    pub use visreplay_record::{load_json, record_file, save_json, Event, EventKind, Record, RecordError};
}

pub use browser::BrowserQuirks;
pub use comparator::{diff_name, screenshot_name, Comparator, ComparatorError, Comparison};
pub use driver::{Driver, DriverError, Element};
pub use engine::{play, PlaybackInfo, Player};
pub use error::{PlaybackError, Step};
pub use fs_comparator::FsComparator;
pub use keys::SpecialKeys;
pub use settings::{RunSettings, SettingsError};
pub use time::{Clock, FakeClock, SystemClock};
