// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Folds test lifecycle events into a JUnit report.

use crate::{
    config::JunitConfig,
    errors::WriteReportError,
    events::{SuiteFinishedStats, TestEventListener, TestFailedStats, TestPassedStats},
    host::{HostEnvironment, SystemHost},
};
use camino::Utf8Path;
use junit_model::{Property, Report, SerializeError, SuiteOrigin, TestCase, TestSuite};
use std::{
    fs::{File, OpenOptions},
    io::{self, Write},
};
use tracing::{debug, info};

/// The name a [`JunitCollector`] reports through [`TestEventListener::name`].
pub const LISTENER_NAME: &str = "JUnit Output";

/// The name of the property recorded on every suite that receives a `suite_starting` event.
pub const RUNTIME_VERSION_PROPERTY: &str = "runtime.version";

/// Where a [`JunitCollector`] is in the lifecycle of a run.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CollectorState {
    /// No events have been received yet.
    Idle,

    /// Events are being received.
    Running,

    /// `run_finished` has been called. Later calls to `run_finished` do nothing.
    Finished,
}

/// Collects test lifecycle events and writes them out as a JUnit report once the run finishes.
#[derive(Debug)]
pub struct JunitCollector<H = SystemHost> {
    config: JunitConfig,
    host: H,
    report: Report,
    state: CollectorState,
}

impl<H: HostEnvironment> JunitCollector<H> {
    /// Creates a new collector.
    pub fn new(config: JunitConfig, host: H) -> Self {
        Self {
            config,
            host,
            report: Report::new(),
            state: CollectorState::Idle,
        }
    }

    /// Returns the report collected so far.
    pub fn report(&self) -> &Report {
        &self.report
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> CollectorState {
        self.state
    }

    /// Renders the report collected so far to JUnit XML.
    ///
    /// The output starts with an XML declaration and ends with a single newline.
    pub fn render(&self) -> Result<Vec<u8>, SerializeError> {
        let mut buf = Vec::new();
        self.report.serialize(&mut buf)?;
        Ok(buf)
    }

    /// Consumes the collector, returning the report.
    pub fn into_report(self) -> Report {
        self.report
    }

    fn mark_running(&mut self) {
        if self.state == CollectorState::Idle {
            self.state = CollectorState::Running;
        }
    }

    fn suite_mut(&mut self, name: &str) -> &mut TestSuite {
        self.mark_running();
        let host = &self.host;
        self.report.get_or_create_suite(name, || {
            let origin = SuiteOrigin::new(host.now(), host.hostname());
            debug!("created test suite {name} on host {}", origin.hostname);
            origin
        })
    }

    fn write_report(&self, path: &Utf8Path) -> Result<(), WriteReportError> {
        // The file is closed when it goes out of scope, on every return path.
        let mut file = open_report_file(path).map_err(|error| WriteReportError::Open {
            file: path.to_owned(),
            error,
        })?;

        let rendered = self.render().map_err(|error| WriteReportError::Serialize {
            file: path.to_owned(),
            error,
        })?;

        file.write_all(&rendered)
            .map_err(|error| WriteReportError::Write {
                file: path.to_owned(),
                error,
            })?;

        info!(
            "wrote JUnit report with {} test suites to {path}",
            self.report.len()
        );
        Ok(())
    }
}

impl<H: HostEnvironment> TestEventListener for JunitCollector<H> {
    fn name(&self) -> &str {
        LISTENER_NAME
    }

    fn run_starting(&mut self) {
        self.mark_running();
    }

    fn suite_starting(&mut self, suite: &str) {
        let runtime_version = self.host.runtime_version();
        self.suite_mut(suite)
            .add_property(Property::new(RUNTIME_VERSION_PROPERTY, runtime_version));
    }

    fn test_starting(&mut self, _suite: &str, _test: &str) {
        self.mark_running();
    }

    fn test_passed(&mut self, suite: &str, test: &str, stats: &TestPassedStats) {
        let test_case = TestCase::new(suite, test, stats.time);
        self.suite_mut(suite).add_test_case(test_case);
    }

    fn test_failed(&mut self, suite: &str, test: &str, stats: &TestFailedStats) {
        let mut test_case = TestCase::new(suite, test, stats.time);
        test_case.set_failure(&stats.file, stats.line, stats.message.as_str());
        self.suite_mut(suite).add_test_case(test_case);
    }

    fn suite_finished(&mut self, suite: &str, stats: &SuiteFinishedStats) {
        self.suite_mut(suite).set_time(stats.time);
    }

    fn run_finished(&mut self) -> Result<(), WriteReportError> {
        if self.state == CollectorState::Finished {
            debug!("run already finished, not writing JUnit report again");
            return Ok(());
        }
        self.state = CollectorState::Finished;

        match self.config.output() {
            Some(path) => self.write_report(path),
            None => {
                debug!("no JUnit output path configured, skipping report");
                Ok(())
            }
        }
    }
}

fn open_report_file(path: &Utf8Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }
    options.open(path)
}
