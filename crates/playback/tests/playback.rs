// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Dispatch order, counters and failure propagation of the playback engine.

use std::sync::Arc;
use std::time::Duration;

use rstest::rstest;
use visreplay::browser::SCROLLBAR_WORKAROUND_SCRIPT;
use visreplay::record::{Event, EventKind};
use visreplay::testing::{Call, CallLog, FakeComparator, FakeDriver};
use visreplay::{DriverError, FakeClock, PlaybackError, PlaybackInfo, Player, Step};

const RECORD: &str = "/recordings/login.hux";

struct Harness {
    log: CallLog,
    driver: FakeDriver,
    comparator: FakeComparator,
    clock: FakeClock,
}

impl Harness {
    fn new() -> Self {
        let log = CallLog::new();
        Self {
            driver: FakeDriver::new().with_log(log.clone()),
            comparator: FakeComparator::new().with_log(log.clone()),
            clock: FakeClock::default(),
            log,
        }
    }

    fn driver(mut self, f: impl FnOnce(FakeDriver) -> FakeDriver) -> Self {
        self.driver = f(self.driver);
        self
    }

    fn comparator(mut self, f: impl FnOnce(FakeComparator) -> FakeComparator) -> Self {
        self.comparator = f(self.comparator);
        self
    }

    async fn play(self, browser: &str, events: &[Event]) -> (Result<(), PlaybackError>, Outcome) {
        self.play_with(browser, events, false).await
    }

    async fn play_with(
        self,
        browser: &str,
        events: &[Event],
        override_screenshots: bool,
    ) -> (Result<(), PlaybackError>, Outcome) {
        let player = Player::new(self.comparator).with_clock(Arc::new(self.clock.clone()));
        let info = PlaybackInfo::new(browser, &self.driver, events, RECORD)
            .with_override_screenshots(override_screenshots);
        let result = player.play(&info).await;
        (
            result,
            Outcome {
                log: self.log,
                clock: self.clock,
            },
        )
    }
}

/// What a run left behind.
struct Outcome {
    log: CallLog,
    clock: FakeClock,
}

fn labels(log: &CallLog) -> Vec<String> {
    log.summary()
}

#[tokio::test]
async fn click_screenshot_pause_example() {
    let events = vec![
        Event::Click { x: 10, y: 20 },
        Event::Screenshot,
        Event::Pause { ms: 500 },
    ];

    let (result, h) = Harness::new().play("firefox", &events).await;

    result.unwrap();
    assert_eq!(
        labels(&h.log),
        vec![
            "query",
            "click:point",
            "capture",
            "compare:firefox-1.png",
            "capture",
            "compare:firefox-2.png",
            "cleanup:firefox>2",
        ]
    );
    assert_eq!(h.clock.sleeps(), vec![Duration::from_millis(500)]);
}

#[tokio::test]
async fn single_scroll_example() {
    let events = vec![Event::Scroll { x: 0, y: 100 }];

    let (result, h) = Harness::new().play("firefox", &events).await;

    result.unwrap();
    assert_eq!(
        labels(&h.log),
        vec!["script", "capture", "compare:firefox-1.png", "cleanup:firefox>1"]
    );
    assert_eq!(h.log.scripts(), vec!["window.scrollTo(0, 100);"]);
}

#[rstest]
#[case::click(Event::Click { x: 1, y: 2 }, &["query", "click:point"])]
#[case::keypress(Event::Keypress { key: "a".into() }, &["focus", "keys:a"])]
#[case::scroll(Event::Scroll { x: 3, y: 4 }, &["script"])]
#[case::pause(Event::Pause { ms: 10 }, &[])]
#[case::screenshot(Event::Screenshot, &[])]
#[tokio::test]
async fn final_event_fires_its_action_then_terminal_screenshot(
    #[case] last: Event,
    #[case] action: &[&str],
) {
    let events = vec![Event::Screenshot, last];

    let (result, h) = Harness::new().play("firefox", &events).await;

    result.unwrap();
    let mut expected = vec!["capture", "compare:firefox-1.png"];
    expected.extend_from_slice(action);
    expected.extend(["capture", "compare:firefox-2.png", "cleanup:firefox>2"]);
    assert_eq!(labels(&h.log), expected);
}

#[tokio::test]
async fn non_screenshot_events_never_advance_the_screenshot_index() {
    let events = vec![
        Event::Click { x: 1, y: 1 },
        Event::Keypress { key: "x".into() },
        Event::Scroll { x: 0, y: 50 },
        Event::Pause { ms: 1 },
        Event::Screenshot,
        Event::Pause { ms: 1 },
        Event::Click { x: 2, y: 2 },
    ];

    let (result, h) = Harness::new().play("safari", &events).await;

    result.unwrap();
    let compares: Vec<String> = labels(&h.log)
        .into_iter()
        .filter(|l| l.starts_with("compare:") || l.starts_with("cleanup:"))
        .collect();
    assert_eq!(
        compares,
        vec!["compare:safari-1.png", "compare:safari-2.png", "cleanup:safari>2"]
    );
}

#[tokio::test]
async fn consecutive_screenshots_get_distinct_names() {
    let events = vec![Event::Screenshot, Event::Screenshot, Event::Screenshot];

    let (result, h) = Harness::new().play("firefox", &events).await;

    result.unwrap();
    assert_eq!(
        labels(&h.log),
        vec![
            "capture",
            "compare:firefox-1.png",
            "capture",
            "compare:firefox-2.png",
            "capture",
            "compare:firefox-3.png",
            "cleanup:firefox>3",
        ]
    );
}

#[tokio::test]
async fn override_mode_rebases_every_screenshot() {
    let events = vec![Event::Screenshot, Event::Click { x: 5, y: 5 }];

    let (result, h) = Harness::new()
        .comparator(|c| c.mismatching("firefox-1.png").mismatching("firefox-2.png"))
        .play_with("firefox", &events, true)
        .await;

    result.unwrap();
    assert_eq!(
        h.log.calls()[1],
        Call::WriteBaseline(format!("{RECORD}/firefox-1.png").into())
    );
    assert!(!labels(&h.log).iter().any(|l| l.starts_with("compare:")));
    assert_eq!(labels(&h.log).last().unwrap(), "cleanup:firefox>2");
}

#[tokio::test]
async fn mismatch_on_intermediate_screenshot_aborts() {
    let events = vec![
        Event::Screenshot,
        Event::Click { x: 1, y: 1 },
        Event::Screenshot,
    ];

    let (result, h) = Harness::new()
        .comparator(|c| c.mismatching("firefox-1.png"))
        .play("firefox", &events)
        .await;

    match result.unwrap_err() {
        PlaybackError::VisualMismatch {
            screenshot,
            diff_path,
        } => {
            assert_eq!(screenshot, "firefox-1.png");
            assert_eq!(diff_path, std::path::PathBuf::from(format!("{RECORD}/firefox-1-diff.png")));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(labels(&h.log), vec!["capture", "compare:firefox-1.png"]);
}

#[tokio::test]
async fn failing_action_stops_dispatch() {
    let events = vec![
        Event::Keypress { key: "a".into() },
        Event::Click { x: 7, y: 8 },
        Event::Keypress { key: "b".into() },
        Event::Screenshot,
    ];

    let (result, h) = Harness::new()
        .driver(|d| d.failing_when(|c| matches!(c, Call::Click { .. })))
        .play("firefox", &events)
        .await;

    match result.unwrap_err() {
        PlaybackError::Action { step, source } => {
            assert_eq!(
                step,
                Step::Event {
                    index: 1,
                    kind: EventKind::Click
                }
            );
            assert!(matches!(source, DriverError::Backend(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(
        labels(&h.log),
        vec!["focus", "keys:a", "query", "click:point"]
    );
}

#[tokio::test]
async fn failing_final_action_skips_terminal_screenshot() {
    let events = vec![Event::Screenshot, Event::Keypress { key: "NOPE".into() }];

    let (result, h) = Harness::new().play("firefox", &events).await;

    let err = result.unwrap_err();
    assert!(matches!(
        err,
        PlaybackError::Action {
            source: DriverError::UnknownSpecialKey(_),
            ..
        }
    ));
    assert_eq!(
        labels(&h.log),
        vec!["capture", "compare:firefox-1.png", "focus"]
    );
}

#[tokio::test]
async fn cleanup_runs_after_terminal_mismatch() {
    let events = vec![Event::Click { x: 1, y: 1 }];

    let (result, h) = Harness::new()
        .comparator(|c| c.mismatching("firefox-1.png"))
        .play("firefox", &events)
        .await;

    assert!(result.unwrap_err().is_visual_mismatch());
    assert_eq!(labels(&h.log).last().unwrap(), "cleanup:firefox>1");
}

#[tokio::test]
async fn cleanup_runs_after_terminal_capture_failure() {
    let events = vec![Event::Pause { ms: 0 }];

    let (result, h) = Harness::new()
        .driver(|d| d.failing_when(|c| *c == Call::TakeScreenshot))
        .play("firefox", &events)
        .await;

    assert!(matches!(
        result.unwrap_err(),
        PlaybackError::Action {
            step: Step::Event {
                index: 0,
                kind: EventKind::Pause
            },
            ..
        }
    ));
    assert_eq!(labels(&h.log), vec!["capture", "cleanup:firefox>1"]);
}

#[tokio::test]
async fn cleanup_failure_fails_an_otherwise_clean_run() {
    let events = vec![Event::Screenshot];

    let (result, _) = Harness::new()
        .comparator(|c| c.failing_when(|call| matches!(call, Call::RemoveAbove { .. })))
        .play("firefox", &events)
        .await;

    assert!(matches!(result.unwrap_err(), PlaybackError::Cleanup(_)));
}

#[tokio::test]
async fn screenshot_error_wins_over_cleanup_error() {
    let events = vec![Event::Screenshot];

    let (result, _) = Harness::new()
        .comparator(|c| {
            c.mismatching("firefox-1.png")
                .failing_when(|call| matches!(call, Call::RemoveAbove { .. }))
        })
        .play("firefox", &events)
        .await;

    assert!(result.unwrap_err().is_visual_mismatch());
}

#[tokio::test]
async fn chrome_hides_scrollbar_before_first_event() {
    let events = vec![Event::Click { x: 1, y: 1 }];

    let (result, h) = Harness::new().play("chrome", &events).await;

    result.unwrap();
    assert_eq!(
        h.log.calls()[0],
        Call::ExecuteScript(SCROLLBAR_WORKAROUND_SCRIPT.to_string())
    );
    assert_eq!(labels(&h.log)[1], "query");
}

#[tokio::test]
async fn firefox_skips_scrollbar_workaround() {
    let events = vec![Event::Screenshot];

    let (result, h) = Harness::new().play("firefox", &events).await;

    result.unwrap();
    assert!(h.log.scripts().is_empty());
}

#[tokio::test]
async fn setup_failure_aborts_before_any_event() {
    let events = vec![Event::Click { x: 1, y: 1 }];

    let (result, h) = Harness::new()
        .driver(|d| d.failing_when(|c| matches!(c, Call::ExecuteScript(_))))
        .play("chrome", &events)
        .await;

    assert!(matches!(
        result.unwrap_err(),
        PlaybackError::Action {
            step: Step::Setup,
            ..
        }
    ));
    assert_eq!(labels(&h.log), vec!["script"]);
}

#[tokio::test]
async fn empty_recording_touches_nothing() {
    let (result, h) = Harness::new().play("chrome", &[]).await;

    assert!(matches!(result.unwrap_err(), PlaybackError::EmptyRecording));
    assert!(h.log.is_empty());
}

#[tokio::test]
async fn keypress_without_focus_still_reaches_terminal_step() {
    let events = vec![Event::Keypress { key: "a".into() }, Event::Screenshot];

    let (result, h) = Harness::new()
        .driver(|d| d.with_focus(None))
        .play("firefox", &events)
        .await;

    result.unwrap();
    assert_eq!(
        labels(&h.log),
        vec!["focus", "capture", "compare:firefox-1.png", "cleanup:firefox>1"]
    );
}

#[tokio::test]
async fn pauses_accumulate_on_the_clock() {
    let events = vec![
        Event::Pause { ms: 200 },
        Event::Pause { ms: 300 },
        Event::Pause { ms: 500 },
    ];

    let (result, h) = Harness::new().play("firefox", &events).await;

    result.unwrap();
    assert_eq!(h.clock.total_slept(), Duration::from_millis(1000));
}
