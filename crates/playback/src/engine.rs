// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Playback engine.
//!
//! Walks a recording one event at a time. Every event's action completes
//! before the next one is selected. The last event always ends in a terminal
//! screenshot, after which artifacts from longer previous runs are pruned.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, warn};
use visreplay_record::Event;

use crate::actions::{self, ScreenshotStep};
use crate::browser::{BrowserQuirks, SCROLLBAR_WORKAROUND_SCRIPT};
use crate::comparator::{screenshot_name, Comparator};
use crate::driver::Driver;
use crate::error::{PlaybackError, Step};
use crate::fs_comparator::FsComparator;
use crate::time::{Clock, SystemClock};

/// Configuration for one playback run.
pub struct PlaybackInfo<'a, D> {
    /// Browser under test; selects quirks and names screenshots.
    pub browser_name: String,
    /// Borrowed for the run, never closed by the engine.
    pub driver: &'a D,
    pub events: &'a [Event],
    /// Rebase every screenshot instead of comparing.
    pub override_screenshots: bool,
    /// Directory holding this recording's baselines.
    pub record_path: PathBuf,
}

impl<'a, D> PlaybackInfo<'a, D> {
    pub fn new(
        browser_name: impl Into<String>,
        driver: &'a D,
        events: &'a [Event],
        record_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            browser_name: browser_name.into(),
            driver,
            events,
            override_screenshots: false,
            record_path: record_path.into(),
        }
    }

    pub fn with_override_screenshots(mut self, override_screenshots: bool) -> Self {
        self.override_screenshots = override_screenshots;
        self
    }
}

/// What the engine does next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Dispatch<'e> {
    /// Run the event's action, then continue.
    Step { index: usize, event: &'e Event },
    /// Run the event's action, then the terminal screenshot and cleanup.
    Final { index: usize, event: &'e Event },
}

/// Counters owned by a single run.
#[derive(Debug)]
pub(crate) struct RunState {
    /// Next event to schedule.
    current_event_index: usize,
    /// 1-based; advances only when a screenshot is taken.
    screenshot_index: u32,
}

impl RunState {
    pub(crate) fn new() -> Self {
        Self {
            current_event_index: 0,
            screenshot_index: 1,
        }
    }

    /// Select the next event and move past it.
    pub(crate) fn advance<'e>(&mut self, events: &'e [Event]) -> Option<Dispatch<'e>> {
        let index = self.current_event_index;
        let event = events.get(index)?;
        self.current_event_index += 1;
        if index + 1 == events.len() {
            Some(Dispatch::Final { index, event })
        } else {
            Some(Dispatch::Step { index, event })
        }
    }

    /// Claim the current screenshot index for a non-terminal screenshot.
    pub(crate) fn claim_screenshot_index(&mut self) -> u32 {
        let index = self.screenshot_index;
        self.screenshot_index += 1;
        index
    }

    pub(crate) fn screenshot_index(&self) -> u32 {
        self.screenshot_index
    }

    #[cfg(test)]
    pub(crate) fn current_event_index(&self) -> usize {
        self.current_event_index
    }
}

/// Replays recordings against a comparator.
pub struct Player<C> {
    comparator: C,
    clock: Arc<dyn Clock>,
}

impl<C: Comparator> Player<C> {
    pub fn new(comparator: C) -> Self {
        Self {
            comparator,
            clock: Arc::new(SystemClock::new()),
        }
    }

    /// Use `clock` for pauses.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Replay `info.events`, returning the first failure.
    pub async fn play<D: Driver>(&self, info: &PlaybackInfo<'_, D>) -> Result<(), PlaybackError> {
        if info.events.is_empty() {
            return Err(PlaybackError::EmptyRecording);
        }

        let quirks = BrowserQuirks::for_browser(&info.browser_name);
        debug!(
            browser = %info.browser_name,
            events = info.events.len(),
            record = %info.record_path.display(),
            override_screenshots = info.override_screenshots,
            scrollbar_workaround = quirks.needs_scrollbar_workaround,
            "starting playback"
        );

        let result = self.run(info, quirks).await;
        if let Err(e) = &result {
            warn!(browser = %info.browser_name, error = %e, "playback failed");
        }
        result
    }

    async fn run<D: Driver>(
        &self,
        info: &PlaybackInfo<'_, D>,
        quirks: BrowserQuirks,
    ) -> Result<(), PlaybackError> {
        if quirks.needs_scrollbar_workaround {
            info.driver
                .execute_script(SCROLLBAR_WORKAROUND_SCRIPT)
                .await
                .map_err(|source| PlaybackError::Action {
                    step: Step::Setup,
                    source,
                })?;
        }

        let mut state = RunState::new();
        while let Some(dispatch) = state.advance(info.events) {
            match dispatch {
                Dispatch::Step { index, event } => {
                    let step = Step::Event {
                        index,
                        kind: event.kind(),
                    };
                    if event.is_screenshot() {
                        let screenshot_index = state.claim_screenshot_index();
                        self.screenshot(info, step, screenshot_index).await?;
                    } else {
                        self.simulate(info, step, event).await?;
                    }
                }
                Dispatch::Final { index, event } => {
                    let step = Step::Event {
                        index,
                        kind: event.kind(),
                    };
                    return self.finish(info, step, event, state.screenshot_index()).await;
                }
            }
        }
        Ok(())
    }

    /// Run the action an event carries. Screenshots carry none of their own.
    async fn simulate<D: Driver>(
        &self,
        info: &PlaybackInfo<'_, D>,
        step: Step,
        event: &Event,
    ) -> Result<(), PlaybackError> {
        let result = match event {
            Event::Click { x, y } => actions::click(info.driver, *x, *y).await,
            Event::Keypress { key } => actions::keypress(info.driver, key).await,
            Event::Scroll { x, y } => actions::scroll(info.driver, *x, *y).await,
            Event::Pause { ms } => {
                actions::pause(self.clock.as_ref(), *ms).await;
                Ok(())
            }
            Event::Screenshot => Ok(()),
        };
        result.map_err(|source| PlaybackError::Action { step, source })
    }

    async fn screenshot<D: Driver>(
        &self,
        info: &PlaybackInfo<'_, D>,
        step: Step,
        screenshot_index: u32,
    ) -> Result<(), PlaybackError> {
        ScreenshotStep {
            record_path: &info.record_path,
            name: screenshot_name(&info.browser_name, screenshot_index),
            override_baseline: info.override_screenshots,
        }
        .run(info.driver, &self.comparator, step)
        .await
    }

    /// Last event: its own action, the terminal screenshot, then cleanup.
    ///
    /// Cleanup runs whether or not the screenshot succeeded; the screenshot's
    /// error wins when both fail.
    async fn finish<D: Driver>(
        &self,
        info: &PlaybackInfo<'_, D>,
        step: Step,
        event: &Event,
        screenshot_index: u32,
    ) -> Result<(), PlaybackError> {
        self.simulate(info, step, event).await?;

        let captured = self.screenshot(info, step, screenshot_index).await;
        debug!(above = screenshot_index, "removing dangling screenshots");
        let cleaned = self
            .comparator
            .remove_artifacts_above(&info.record_path, &info.browser_name, screenshot_index)
            .await
            .map_err(PlaybackError::Cleanup);

        captured.and(cleaned)
    }
}

/// Replay with the filesystem comparator and the system clock.
pub async fn play<D: Driver>(info: &PlaybackInfo<'_, D>) -> Result<(), PlaybackError> {
    Player::new(FsComparator::new()).play(info).await
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
