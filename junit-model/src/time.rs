// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use chrono::NaiveDateTime;
use std::time::Duration;

/// The layout used for suite timestamps: local time, second precision, no zone suffix.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// Durations are kept to 4 decimal places of a second, i.e. units of 100µs.
const NANOS_PER_TICK: u128 = 100_000;
const TICKS_PER_SEC: f64 = 10_000.0;

/// Converts a duration to seconds, truncated (never rounded up) to 4 decimal places.
///
/// `1.23456789s` becomes `1.2345` and `0s` becomes `0`. The floor is taken on the integer
/// nanosecond count, so the result doesn't depend on floating-point error in the conversion.
pub fn round_time(duration: Duration) -> f64 {
    let ticks = duration.as_nanos() / NANOS_PER_TICK;
    ticks as f64 / TICKS_PER_SEC
}

/// Formats a suite timestamp as `YYYY-MM-DDTHH:MM:SS`.
pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}
