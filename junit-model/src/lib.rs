// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data model and serializer for JUnit XML reports.
//!
//! A [`Report`] is an ordered set of [`TestSuite`]s keyed by name. Suites are created on first
//! reference through [`Report::get_or_create_suite`] and accumulate [`TestCase`]s and
//! [`Property`]s in arrival order. [`Report::serialize`] writes the whole report out as JUnit XML.

mod errors;
mod report;
mod serialize;
mod time;

pub use errors::*;
pub use report::*;
pub use time::*;
