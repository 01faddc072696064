// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line entry point for the `junit-collector` binary.

use crate::{
    collector::JunitCollector,
    config::JunitConfig,
    errors::{EventLogError, ExpectedError},
    host::SystemHost,
    output::{OutputOpts, clap_styles},
    replay::{LifecycleEvent, read_event_log, replay},
};
use camino::Utf8PathBuf;
use clap::{Args, Parser};
use std::{
    fs::File,
    io::{self, BufReader},
};

static STDIN_ARG: &str = "-";

/// Replays a log of test lifecycle events and writes a JUnit XML report.
///
/// The event log is JSON lines, one event per line. See the crate documentation for the format.
#[derive(Debug, Parser)]
#[command(version, styles = clap_styles::style())]
pub struct CollectorApp {
    /// Path to the event log, or `-` to read from standard input
    #[arg(value_name = "EVENT_LOG", default_value = "-")]
    event_log: Utf8PathBuf,

    #[command(flatten)]
    junit: JunitOpts,

    #[command(flatten)]
    output: OutputOpts,
}

impl CollectorApp {
    /// Installs the global logger.
    pub fn init_output(&self) {
        self.output.init();
    }

    /// Executes the app.
    pub fn exec(self) -> Result<(), ExpectedError> {
        let events = self.read_events()?;
        let mut collector = JunitCollector::new(self.junit.config(), self.junit.host());
        replay(events, &mut collector)?;
        Ok(())
    }

    fn read_events(&self) -> Result<Vec<LifecycleEvent>, EventLogError> {
        if self.event_log.as_str() == STDIN_ARG {
            let stdin = io::stdin();
            return read_event_log(stdin.lock(), "<stdin>");
        }

        let file = File::open(&self.event_log).map_err(|error| EventLogError::Read {
            input: self.event_log.to_string(),
            error,
        })?;
        read_event_log(BufReader::new(file), self.event_log.as_str())
    }
}

/// Options controlling JUnit output.
#[derive(Debug, Default, Args)]
#[command(next_help_heading = "JUnit options")]
pub struct JunitOpts {
    /// Path to write a JUnit XML file to after tests complete
    #[arg(long, value_name = "PATH", env = "JUNIT_OUTPUT")]
    junit_output: Option<Utf8PathBuf>,

    /// Runtime version recorded on each started suite [default: <os>-<arch>]
    #[arg(long, value_name = "VERSION", env = "JUNIT_RUNTIME_VERSION")]
    runtime_version: Option<String>,
}

impl JunitOpts {
    /// Returns the JUnit configuration for these options.
    pub fn config(&self) -> JunitConfig {
        JunitConfig::new(self.junit_output.clone())
    }

    /// Returns the host environment for these options.
    pub fn host(&self) -> SystemHost {
        match &self.runtime_version {
            Some(runtime_version) => SystemHost::new().with_runtime_version(runtime_version),
            None => SystemHost::new(),
        }
    }
}
