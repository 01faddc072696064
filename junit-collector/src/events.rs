// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lifecycle events emitted by a test runner.

use crate::errors::WriteReportError;
use std::time::Duration;

/// Statistics for a test that passed.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TestPassedStats {
    /// The time the test took to run.
    pub time: Duration,
}

/// Statistics for a test that failed.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TestFailedStats {
    /// The time the test took to run.
    pub time: Duration,

    /// The source file in which the failure was raised.
    pub file: String,

    /// The line within `file` at which the failure was raised.
    pub line: u32,

    /// The failure message, e.g. the assertion that didn't hold.
    pub message: String,
}

/// Statistics for a suite that finished running.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SuiteFinishedStats {
    /// The time the whole suite took to run.
    pub time: Duration,
}

/// Receives lifecycle events from a test runner.
///
/// The runner calls these methods sequentially, in the order events happen. Implementations
/// must tolerate events arriving out of order: a test event may be the first reference to a
/// suite, and a suite may finish more than once.
pub trait TestEventListener {
    /// Returns a human-readable name identifying this listener to the host.
    ///
    /// Defaults to the type name.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Called once before any tests run.
    fn run_starting(&mut self) {}

    /// Called when a suite starts running.
    fn suite_starting(&mut self, suite: &str);

    /// Called when a test starts running.
    fn test_starting(&mut self, _suite: &str, _test: &str) {}

    /// Called when a test passes.
    fn test_passed(&mut self, suite: &str, test: &str, stats: &TestPassedStats);

    /// Called when a test fails.
    fn test_failed(&mut self, suite: &str, test: &str, stats: &TestFailedStats);

    /// Called when a suite finishes running.
    fn suite_finished(&mut self, suite: &str, stats: &SuiteFinishedStats);

    /// Called once after all tests have run.
    ///
    /// Errors returned from here are reported by the host. Use [`WriteReportError::is_fatal`] to
    /// decide whether the process should exit with a failure.
    fn run_finished(&mut self) -> Result<(), WriteReportError>;
}
