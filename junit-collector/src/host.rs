// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Queries against the environment the tests ran in.

use crate::errors::DisplayErrorChain;
use chrono::{Local, NaiveDateTime};
use std::env::consts;

/// The environment a report is being collected in.
pub trait HostEnvironment {
    /// Returns the name of this host, or `None` if it couldn't be determined.
    fn hostname(&self) -> Option<String>;

    /// Returns the runtime or platform version string recorded on every started suite.
    fn runtime_version(&self) -> String;

    /// Returns the current local time.
    fn now(&self) -> NaiveDateTime;
}

/// The [`HostEnvironment`] of the running process.
#[derive(Clone, Debug)]
pub struct SystemHost {
    runtime_version: String,
}

impl SystemHost {
    /// Creates a new `SystemHost` reporting the target OS and architecture as its runtime version.
    pub fn new() -> Self {
        Self {
            runtime_version: format!("{}-{}", consts::OS, consts::ARCH),
        }
    }

    /// Overrides the runtime version string.
    pub fn with_runtime_version(mut self, runtime_version: impl Into<String>) -> Self {
        self.runtime_version = runtime_version.into();
        self
    }
}

impl Default for SystemHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostEnvironment for SystemHost {
    fn hostname(&self) -> Option<String> {
        match whoami::hostname() {
            Ok(hostname) if !hostname.is_empty() => Some(hostname),
            Ok(_) => None,
            Err(error) => {
                tracing::debug!(
                    "unable to determine hostname: {}",
                    DisplayErrorChain::new(&error)
                );
                None
            }
        }
    }

    fn runtime_version(&self) -> String {
        self.runtime_version.clone()
    }

    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn runtime_version_override() {
        let host = SystemHost::new();
        assert_eq!(
            host.runtime_version(),
            format!("{}-{}", consts::OS, consts::ARCH)
        );

        let host = host.with_runtime_version("custom 1.0");
        assert_eq!(host.runtime_version(), "custom 1.0");
    }
}
