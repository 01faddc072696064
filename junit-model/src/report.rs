// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{errors::SerializeError, serialize::serialize_report, time::round_time};
use chrono::NaiveDateTime;
use indexmap::map::IndexMap;
use std::{io, time::Duration};

/// The hostname recorded on a suite if the real hostname couldn't be determined.
pub const FALLBACK_HOSTNAME: &str = "localhost";

/// The `type` attribute recorded on every failure.
pub const ASSERTION_FAILURE_TYPE: &str = "assertion";

/// The root element of a JUnit report.
///
/// Test suites are kept in the order in which they were first referenced.
#[derive(Clone, Debug, Default)]
pub struct Report {
    test_suites: IndexMap<String, TestSuite>,
}

impl Report {
    /// Creates a new, empty `Report`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the test suite with the given name, creating it if it doesn't exist yet.
    ///
    /// `origin` is only called if a new suite is created. A new suite gets the next sequential
    /// id, starting from 0. Looking up an existing suite never changes its id.
    pub fn get_or_create_suite(
        &mut self,
        name: &str,
        origin: impl FnOnce() -> SuiteOrigin,
    ) -> &mut TestSuite {
        let index = match self.test_suites.get_index_of(name) {
            Some(index) => index,
            None => {
                let id = self.test_suites.len();
                let test_suite = TestSuite::new(id, name, origin());
                self.test_suites.insert_full(name.to_owned(), test_suite).0
            }
        };
        &mut self.test_suites[index]
    }

    /// Returns the test suite with the given name, if it exists.
    pub fn suite(&self, name: &str) -> Option<&TestSuite> {
        self.test_suites.get(name)
    }

    /// Returns the test suites in this report, in the order they were created.
    pub fn test_suites(&self) -> impl ExactSizeIterator<Item = &TestSuite> + '_ {
        self.test_suites.values()
    }

    /// Returns the number of test suites in this report.
    pub fn len(&self) -> usize {
        self.test_suites.len()
    }

    /// Returns true if no test suites have been created.
    pub fn is_empty(&self) -> bool {
        self.test_suites.is_empty()
    }

    /// Serialize this report to the given writer.
    pub fn serialize(&self, writer: impl io::Write) -> Result<(), SerializeError> {
        Ok(serialize_report(self, writer)?)
    }

    /// Serialize this report to a string.
    pub fn to_string(&self) -> Result<String, SerializeError> {
        let mut buf: Vec<u8> = vec![];
        self.serialize(&mut buf)?;
        Ok(String::from_utf8(buf)?)
    }
}

/// Where and when a test suite was created.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SuiteOrigin {
    /// The local time at which the suite was created.
    pub timestamp: NaiveDateTime,

    /// The name of the host the suite ran on.
    pub hostname: String,
}

impl SuiteOrigin {
    /// Creates a new `SuiteOrigin`, using [`FALLBACK_HOSTNAME`] if `hostname` is `None`.
    pub fn new(timestamp: NaiveDateTime, hostname: Option<String>) -> Self {
        Self {
            timestamp,
            hostname: hostname.unwrap_or_else(|| FALLBACK_HOSTNAME.to_owned()),
        }
    }
}

/// Represents a single testsuite.
///
/// A `TestSuite` groups together several `TestCase` instances. The `tests` and `failures` counts
/// are computed from the test cases, so they can't drift out of sync with them.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct TestSuite {
    /// The name of this testsuite. Unique within a report.
    pub name: String,

    /// The position of this testsuite in the report at the time it was created.
    pub id: usize,

    /// The package this testsuite belongs to. Defaults to the name.
    pub package: String,

    /// The time at which the testsuite was created.
    pub timestamp: NaiveDateTime,

    /// The name of the host the testsuite ran on.
    pub hostname: String,

    /// The total number of tests in this suite that errored.
    ///
    /// Nothing currently records errors, so this is always 0.
    pub errors: usize,

    /// The overall time taken by the testsuite, in seconds truncated to 4 decimal places.
    pub time: f64,

    /// Custom properties set during test execution, e.g. environment metadata.
    pub properties: Vec<Property>,

    /// The testcases that form this testsuite, in the order they were added.
    pub test_cases: Vec<TestCase>,
}

impl TestSuite {
    fn new(id: usize, name: &str, origin: SuiteOrigin) -> Self {
        let SuiteOrigin {
            timestamp,
            hostname,
        } = origin;
        Self {
            name: name.to_owned(),
            id,
            package: name.to_owned(),
            timestamp,
            hostname,
            errors: 0,
            time: 0.0,
            properties: vec![],
            test_cases: vec![],
        }
    }

    /// Returns the number of tests in this suite.
    pub fn tests(&self) -> usize {
        self.test_cases.len()
    }

    /// Returns the number of tests in this suite that failed.
    pub fn failures(&self) -> usize {
        self.test_cases
            .iter()
            .filter(|test_case| test_case.failure.is_some())
            .count()
    }

    /// Sets the time taken for the testsuite, replacing any earlier value.
    pub fn set_time(&mut self, time: Duration) -> &mut Self {
        self.time = round_time(time);
        self
    }

    /// Adds a property to this testsuite.
    ///
    /// Properties with duplicate names are all kept.
    pub fn add_property(&mut self, property: impl Into<Property>) -> &mut Self {
        self.properties.push(property.into());
        self
    }

    /// Adds a testcase to this testsuite.
    pub fn add_test_case(&mut self, test_case: TestCase) -> &mut Self {
        self.test_cases.push(test_case);
        self
    }
}

/// Represents a single testcase.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct TestCase {
    /// The "classname" of the testcase: the name of the suite it was recorded against.
    pub classname: String,

    /// The name of the testcase.
    pub name: String,

    /// The time it took to execute this testcase, in seconds truncated to 4 decimal places.
    pub time: f64,

    /// Details about the failure, if this testcase failed.
    pub failure: Option<Failure>,
}

impl TestCase {
    /// Creates a new testcase with no failure.
    pub fn new(classname: impl Into<String>, name: impl Into<String>, time: Duration) -> Self {
        Self {
            classname: classname.into(),
            name: name.into(),
            time: round_time(time),
            failure: None,
        }
    }

    /// Marks this testcase as failed with an assertion failure at `file:line`.
    ///
    /// Replaces any failure set earlier.
    pub fn set_failure(
        &mut self,
        file: impl AsRef<str>,
        line: u32,
        message: impl Into<String>,
    ) -> &mut Self {
        self.failure = Some(Failure::assertion(file, line, message));
        self
    }
}

/// Structured detail attached to a failed testcase.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Failure {
    /// Where the failure happened, as `file:line`.
    pub message: String,

    /// The kind of failure.
    pub ty: String,

    /// Free-form failure detail, serialized as the text node of the element.
    pub text: String,
}

impl Failure {
    /// Creates a new assertion failure at `file:line`.
    pub fn assertion(file: impl AsRef<str>, line: u32, text: impl Into<String>) -> Self {
        Self {
            message: format!("{}:{line}", file.as_ref()),
            ty: ASSERTION_FAILURE_TYPE.to_owned(),
            text: text.into(),
        }
    }
}

/// Custom properties set during test execution, e.g. environment metadata.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Property {
    /// The name of the property.
    pub name: String,

    /// The value of the property.
    pub value: String,
}

impl Property {
    /// Creates a new `Property` instance.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl<T> From<(T, T)> for Property
where
    T: Into<String>,
{
    fn from((k, v): (T, T)) -> Self {
        Property::new(k, v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    fn origin() -> SuiteOrigin {
        let timestamp = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();
        SuiteOrigin::new(timestamp, Some("build-01".to_owned()))
    }

    #[test]
    fn get_or_create_is_idempotent() {
        let mut report = Report::new();
        report
            .get_or_create_suite("alpha", origin)
            .add_property(("k", "v"));
        report
            .get_or_create_suite("alpha", origin)
            .add_test_case(TestCase::new("alpha", "t", Duration::ZERO));

        assert_eq!(report.len(), 1);
        let suite = report.suite("alpha").unwrap();
        assert_eq!(suite.id, 0);
        assert_eq!(suite.properties.len(), 1);
        assert_eq!(suite.test_cases.len(), 1);
    }

    #[test]
    fn origin_only_evaluated_on_creation() {
        let calls = Cell::new(0);
        let mut report = Report::new();
        for _ in 0..3 {
            report.get_or_create_suite("alpha", || {
                calls.set(calls.get() + 1);
                origin()
            });
        }
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn ids_are_dense_in_creation_order() {
        let mut report = Report::new();
        for name in ["a", "b", "a", "c", "b"] {
            report.get_or_create_suite(name, origin);
        }

        let ids: Vec<_> = report
            .test_suites()
            .map(|suite| (suite.name.as_str(), suite.id))
            .collect();
        assert_eq!(ids, vec![("a", 0), ("b", 1), ("c", 2)]);
    }

    #[test]
    fn new_suite_defaults() {
        let mut report = Report::new();
        let suite = report.get_or_create_suite("pkg/sub", origin);

        assert_eq!(suite.package, "pkg/sub");
        assert_eq!(suite.hostname, "build-01");
        assert_eq!(suite.tests(), 0);
        assert_eq!(suite.failures(), 0);
        assert_eq!(suite.errors, 0);
        assert_eq!(suite.time, 0.0);
        assert!(suite.properties.is_empty());
    }

    #[test]
    fn hostname_falls_back() {
        let origin = SuiteOrigin::new(origin().timestamp, None);
        assert_eq!(origin.hostname, FALLBACK_HOSTNAME);
    }

    #[test]
    fn counts_follow_test_cases() {
        let mut report = Report::new();
        let suite = report.get_or_create_suite("pkg", origin);
        for i in 0..4 {
            let mut test_case = TestCase::new("pkg", format!("test{i}"), Duration::ZERO);
            if i % 2 == 1 {
                test_case.set_failure("lib.rs", i, "nope");
            }
            suite.add_test_case(test_case);
        }

        assert_eq!(suite.tests(), 4);
        assert_eq!(suite.failures(), 2);
    }

    #[test]
    fn duplicate_properties_are_kept() {
        let mut report = Report::new();
        let suite = report.get_or_create_suite("pkg", origin);
        suite
            .add_property(("runtime.version", "1"))
            .add_property(Property::new("runtime.version", "2"));

        assert_eq!(
            suite.properties,
            vec![
                Property::new("runtime.version", "1"),
                Property::new("runtime.version", "2"),
            ]
        );
    }

    #[test]
    fn failure_last_write_wins() {
        let mut test_case = TestCase::new("pkg", "t", Duration::from_millis(5));
        test_case
            .set_failure("a.rs", 1, "first")
            .set_failure("b.rs", 2, "second");

        assert_eq!(
            test_case.failure,
            Some(Failure {
                message: "b.rs:2".to_owned(),
                ty: "assertion".to_owned(),
                text: "second".to_owned(),
            })
        );
    }

    #[test]
    fn times_are_truncated() {
        let test_case = TestCase::new("pkg", "t", Duration::from_nanos(1_234_567_890));
        assert_eq!(test_case.time, 1.2345);

        let mut report = Report::new();
        let suite = report.get_or_create_suite("pkg", origin);
        suite.set_time(Duration::from_millis(100));
        suite.set_time(Duration::from_millis(350));
        assert_eq!(suite.time, 0.35);
    }
}
