// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Documented exit codes for `junit-collector` failures.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum CollectorExitCode {}

impl CollectorExitCode {
    /// No errors occurred and the collector exited normally.
    ///
    /// This is also the exit code if the report couldn't be rendered or written after the
    /// report file was opened.
    pub const OK: i32 = 0;

    /// The JUnit report file couldn't be created or truncated.
    pub const REPORT_OPEN_FAILED: i32 = 1;

    /// The lifecycle event log couldn't be read.
    pub const EVENT_LOG_READ_FAILED: i32 = 96;

    /// A line in the lifecycle event log wasn't a valid event.
    pub const EVENT_LOG_PARSE_FAILED: i32 = 97;
}
