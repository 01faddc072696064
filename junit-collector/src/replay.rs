// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Replays a recorded log of lifecycle events into a [`TestEventListener`].
//!
//! The log is JSON lines: one object per line, tagged by its `event` field. Durations are
//! human-readable strings such as `"350ms"` or `"1s 200ms"`.
//!
//! ```text
//! {"event":"suite-starting","suite":"pkg"}
//! {"event":"test-passed","suite":"pkg","test":"A","time":"100ms"}
//! {"event":"test-failed","suite":"pkg","test":"B","time":"200ms","file":"x.rs","line":10,"message":"boom"}
//! {"event":"suite-finished","suite":"pkg","time":"350ms"}
//! {"event":"run-finished"}
//! ```

use crate::{
    errors::{EventLogError, WriteReportError},
    events::{SuiteFinishedStats, TestEventListener, TestFailedStats, TestPassedStats},
};
use serde::{Deserialize, Serialize};
use std::{io::BufRead, time::Duration};

/// A single recorded lifecycle event.
#[derive(Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum LifecycleEvent {
    /// The run is starting.
    RunStarting,

    /// A suite is starting.
    SuiteStarting {
        /// The suite name.
        suite: String,
    },

    /// A test is starting.
    TestStarting {
        /// The suite name.
        suite: String,
        /// The test name.
        test: String,
    },

    /// A test passed.
    TestPassed {
        /// The suite name.
        suite: String,
        /// The test name.
        test: String,
        /// The time the test took.
        #[serde(with = "humantime_serde")]
        time: Duration,
    },

    /// A test failed.
    TestFailed {
        /// The suite name.
        suite: String,
        /// The test name.
        test: String,
        /// The time the test took.
        #[serde(with = "humantime_serde")]
        time: Duration,
        /// The source file the failure was raised in.
        file: String,
        /// The line the failure was raised on.
        line: u32,
        /// The failure message.
        message: String,
    },

    /// A suite finished.
    SuiteFinished {
        /// The suite name.
        suite: String,
        /// The time the suite took.
        #[serde(with = "humantime_serde")]
        time: Duration,
    },

    /// The run finished.
    RunFinished,
}

impl LifecycleEvent {
    /// Delivers this event to the listener.
    ///
    /// Only [`LifecycleEvent::RunFinished`] can fail.
    pub fn dispatch<L>(self, listener: &mut L) -> Result<(), WriteReportError>
    where
        L: TestEventListener + ?Sized,
    {
        match self {
            Self::RunStarting => listener.run_starting(),
            Self::SuiteStarting { suite } => listener.suite_starting(&suite),
            Self::TestStarting { suite, test } => listener.test_starting(&suite, &test),
            Self::TestPassed { suite, test, time } => {
                listener.test_passed(&suite, &test, &TestPassedStats { time })
            }
            Self::TestFailed {
                suite,
                test,
                time,
                file,
                line,
                message,
            } => listener.test_failed(
                &suite,
                &test,
                &TestFailedStats {
                    time,
                    file,
                    line,
                    message,
                },
            ),
            Self::SuiteFinished { suite, time } => {
                listener.suite_finished(&suite, &SuiteFinishedStats { time })
            }
            Self::RunFinished => return listener.run_finished(),
        }
        Ok(())
    }
}

/// Reads a JSON-lines event log. Blank lines are skipped.
///
/// `input` describes where the log came from, and is used in error messages.
pub fn read_event_log(
    reader: impl BufRead,
    input: &str,
) -> Result<Vec<LifecycleEvent>, EventLogError> {
    let mut events = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|error| EventLogError::Read {
            input: input.to_owned(),
            error,
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let event = serde_json::from_str(&line).map_err(|error| EventLogError::Parse {
            input: input.to_owned(),
            line_number: index + 1,
            error,
        })?;
        events.push(event);
    }

    tracing::debug!("read {} events from {input}", events.len());
    Ok(events)
}

/// Delivers each event to the listener in order.
///
/// If the events don't include [`LifecycleEvent::RunFinished`], `run_finished` is called once
/// at the end.
pub fn replay<L>(
    events: impl IntoIterator<Item = LifecycleEvent>,
    listener: &mut L,
) -> Result<(), WriteReportError>
where
    L: TestEventListener + ?Sized,
{
    tracing::debug!("replaying events into {}", listener.name());
    let mut run_finished = false;
    for event in events {
        run_finished |= event == LifecycleEvent::RunFinished;
        event.dispatch(listener)?;
    }

    if !run_finished {
        tracing::debug!("event log has no run-finished event, finishing the run");
        listener.run_finished()?;
    }
    Ok(())
}
