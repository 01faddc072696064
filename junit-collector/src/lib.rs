// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collects test lifecycle events from a test runner and writes them out as a JUnit XML report.
//!
//! A runner drives a [`JunitCollector`] through the [`TestEventListener`] trait. Suites are
//! created the first time any event mentions them, test cases are appended in the order they
//! finish, and once [`TestEventListener::run_finished`] is called the report is written to the
//! path in the [`JunitConfig`], if there is one.
//!
//! The `junit-collector` binary replays a recorded JSON-lines event log (see [`replay`]) through
//! the same collector.

pub mod collector;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod events;
pub mod exit_codes;
pub mod host;
pub mod output;
pub mod replay;

pub use collector::{CollectorState, JunitCollector, LISTENER_NAME, RUNTIME_VERSION_PROPERTY};
pub use config::JunitConfig;
pub use events::{SuiteFinishedStats, TestEventListener, TestFailedStats, TestPassedStats};
pub use host::{HostEnvironment, SystemHost};
