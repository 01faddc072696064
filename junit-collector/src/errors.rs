// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by the JUnit collector.

use crate::exit_codes::CollectorExitCode;
use camino::{Utf8Path, Utf8PathBuf};
use junit_model::SerializeError;
use owo_colors::{OwoColorize, Stream};
use std::{error::Error, fmt, io};
use thiserror::Error;

/// An error that occurred while writing out a JUnit report.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteReportError {
    /// The report file couldn't be created or truncated.
    #[error("error opening JUnit report at `{file}`")]
    Open {
        /// The report file.
        file: Utf8PathBuf,

        /// The underlying IO error.
        #[source]
        error: io::Error,
    },

    /// The report couldn't be rendered to XML.
    #[error("error serializing JUnit report for `{file}`")]
    Serialize {
        /// The report file.
        file: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: SerializeError,
    },

    /// The rendered report couldn't be written to the file.
    #[error("error writing JUnit report to `{file}`")]
    Write {
        /// The report file.
        file: Utf8PathBuf,

        /// The underlying IO error.
        #[source]
        error: io::Error,
    },
}

impl WriteReportError {
    /// Returns the path of the report file.
    pub fn file(&self) -> &Utf8Path {
        match self {
            Self::Open { file, .. } | Self::Serialize { file, .. } | Self::Write { file, .. } => {
                file
            }
        }
    }

    /// Returns true if the process should exit with a failure because of this error.
    ///
    /// Only a failure to open the report file is fatal. Once the file is open the tests have
    /// already completed, so a failure to render or write is reported and otherwise ignored.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Open { .. })
    }
}

/// An error that occurred while reading a lifecycle event log.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EventLogError {
    /// The event log couldn't be read.
    #[error("error reading event log from {input}")]
    Read {
        /// A description of the input, e.g. a file path or `<stdin>`.
        input: String,

        /// The underlying IO error.
        #[source]
        error: io::Error,
    },

    /// A line in the event log wasn't a valid event.
    #[error("error parsing event on line {line_number} of {input}")]
    Parse {
        /// A description of the input, e.g. a file path or `<stdin>`.
        input: String,

        /// The 1-based line number.
        line_number: usize,

        /// The underlying JSON error.
        #[source]
        error: serde_json::Error,
    },
}

/// Displays an error along with its chain of sources.
pub struct DisplayErrorChain<E> {
    error: E,
}

impl<E: Error> DisplayErrorChain<E> {
    /// Creates a new `DisplayErrorChain`.
    pub fn new(error: E) -> Self {
        Self { error }
    }
}

impl<E: Error> fmt::Display for DisplayErrorChain<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        let mut source = self.error.source();
        while let Some(error) = source {
            write!(f, "\n  caused by: {error}")?;
            source = error.source();
        }

        Ok(())
    }
}

// Note that the #[error()] strings are mostly placeholder messages -- the expected way to print out
// errors is with the display_to_stderr method, which colorizes errors.

/// An error that stops the `junit-collector` binary.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("event log error")]
    EventLog {
        #[from]
        err: EventLogError,
    },
    #[error("report write error")]
    WriteReport {
        #[from]
        err: WriteReportError,
    },
}

impl ExpectedError {
    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::EventLog {
                err: EventLogError::Read { .. },
            } => CollectorExitCode::EVENT_LOG_READ_FAILED,
            Self::EventLog {
                err: EventLogError::Parse { .. },
            } => CollectorExitCode::EVENT_LOG_PARSE_FAILED,
            Self::WriteReport { err } if err.is_fatal() => CollectorExitCode::REPORT_OPEN_FAILED,
            Self::WriteReport { .. } => CollectorExitCode::OK,
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self) {
        let mut next_error = match self {
            Self::EventLog { err } => match err {
                EventLogError::Read { input, error } => {
                    tracing::error!(
                        "failed to read event log from {}",
                        input.if_supports_color(Stream::Stderr, |x| x.bold())
                    );
                    Some(error as &dyn Error)
                }
                EventLogError::Parse {
                    input,
                    line_number,
                    error,
                } => {
                    tracing::error!(
                        "failed to parse event on line {} of {}",
                        line_number.if_supports_color(Stream::Stderr, |x| x.bold()),
                        input.if_supports_color(Stream::Stderr, |x| x.bold())
                    );
                    Some(error as &dyn Error)
                }
            },
            Self::WriteReport { err } => {
                let file = err.file();
                match err {
                    WriteReportError::Open { error, .. } => {
                        tracing::error!(
                            "unable to open file for JUnit output: {}",
                            file.if_supports_color(Stream::Stderr, |x| x.bold())
                        );
                        Some(error as &dyn Error)
                    }
                    WriteReportError::Serialize { error, .. } => {
                        tracing::warn!(
                            "error generating JUnit XML for {}",
                            file.if_supports_color(Stream::Stderr, |x| x.bold())
                        );
                        Some(error as &dyn Error)
                    }
                    WriteReportError::Write { error, .. } => {
                        tracing::warn!(
                            "error writing JUnit XML to {}",
                            file.if_supports_color(Stream::Stderr, |x| x.bold())
                        );
                        Some(error as &dyn Error)
                    }
                }
            }
        };

        while let Some(err) = next_error {
            tracing::error!(target: "junit_collector::no_heading", "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}
