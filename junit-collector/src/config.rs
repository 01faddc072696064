// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::{Utf8Path, Utf8PathBuf};

/// JUnit output configuration for a single run.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct JunitConfig {
    output: Option<Utf8PathBuf>,
}

impl JunitConfig {
    /// Creates a new `JunitConfig` writing to the given path.
    ///
    /// An empty path means no report is written.
    pub fn new(output: Option<Utf8PathBuf>) -> Self {
        Self {
            output: output.filter(|path| !path.as_str().is_empty()),
        }
    }

    /// Creates a `JunitConfig` that doesn't write a report.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Returns the path the report is written to, if reporting is enabled.
    pub fn output(&self) -> Option<&Utf8Path> {
        self.output.as_deref()
    }
}
