// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: events in, report file out.

use camino::Utf8Path;
use camino_tempfile::Utf8TempDir;
use chrono::{NaiveDate, NaiveDateTime};
use indoc::indoc;
use junit_collector::{
    CollectorState, HostEnvironment, JunitCollector, JunitConfig, SuiteFinishedStats,
    TestEventListener, TestFailedStats, TestPassedStats,
    errors::WriteReportError,
    replay::{read_event_log, replay},
};
use pretty_assertions::assert_eq;
use std::{fs, time::Duration};

#[derive(Copy, Clone, Debug)]
struct FixedHost {
    hostname: Option<&'static str>,
}

impl HostEnvironment for FixedHost {
    fn hostname(&self) -> Option<String> {
        self.hostname.map(str::to_owned)
    }

    fn runtime_version(&self) -> String {
        "test-runtime 1.0".to_owned()
    }

    fn now(&self) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 11, 5)
            .expect("valid date")
            .and_hms_opt(23, 59, 58)
            .expect("valid time")
    }
}

const HOST: FixedHost = FixedHost {
    hostname: Some("ci-host"),
};

fn temp_dir() -> Utf8TempDir {
    camino_tempfile::tempdir().expect("created temp dir")
}

fn collector_writing_to(path: &Utf8Path, host: FixedHost) -> JunitCollector<FixedHost> {
    JunitCollector::new(JunitConfig::new(Some(path.to_owned())), host)
}

fn run_scenario(collector: &mut impl TestEventListener) -> Result<(), WriteReportError> {
    collector.run_starting();
    collector.suite_starting("pkg");
    collector.test_starting("pkg", "A");
    collector.test_passed(
        "pkg",
        "A",
        &TestPassedStats {
            time: Duration::from_millis(100),
        },
    );
    collector.test_starting("pkg", "B");
    collector.test_failed(
        "pkg",
        "B",
        &TestFailedStats {
            time: Duration::from_millis(200),
            file: "x.go".to_owned(),
            line: 10,
            message: "boom".to_owned(),
        },
    );
    collector.suite_finished(
        "pkg",
        &SuiteFinishedStats {
            time: Duration::from_millis(350),
        },
    );
    collector.run_finished()
}

static SCENARIO_REPORT: &str = indoc! {r#"
    <?xml version="1.0" encoding="UTF-8"?>
    <testsuites>
        <testsuite name="pkg" id="0" package="pkg" timestamp="2024-11-05T23:59:58" hostname="ci-host" tests="2" failures="1" errors="0" time="0.35">
            <properties>
                <property name="runtime.version" value="test-runtime 1.0"/>
            </properties>
            <testcase classname="pkg" name="A" time="0.1"/>
            <testcase classname="pkg" name="B" time="0.2">
                <failure message="x.go:10" type="assertion">boom</failure>
            </testcase>
        </testsuite>
    </testsuites>
"#};

#[test]
fn writes_report_on_run_finished() {
    let dir = temp_dir();
    let path = dir.path().join("junit.xml");

    let mut collector = collector_writing_to(&path, HOST);
    run_scenario(&mut collector).expect("report written");

    let contents = fs::read_to_string(&path).expect("report readable");
    assert_eq!(contents, SCENARIO_REPORT);
}

#[test]
fn truncates_existing_report() {
    let dir = temp_dir();
    let path = dir.path().join("junit.xml");
    fs::write(&path, "x".repeat(SCENARIO_REPORT.len() * 2)).expect("seeded existing file");

    let mut collector = collector_writing_to(&path, HOST);
    run_scenario(&mut collector).expect("report written");

    let contents = fs::read_to_string(&path).expect("report readable");
    assert_eq!(contents, SCENARIO_REPORT);
}

#[test]
fn no_output_path_writes_nothing() {
    let dir = temp_dir();

    let mut collector = JunitCollector::new(JunitConfig::disabled(), HOST);
    run_scenario(&mut collector).expect("disabled reporting never fails");

    let entries = fs::read_dir(dir.path()).expect("dir readable").count();
    assert_eq!(entries, 0);
    assert_eq!(collector.report().len(), 1);
}

#[test]
fn unopenable_report_is_fatal() {
    let dir = temp_dir();
    let path = dir.path().join("missing-dir").join("junit.xml");

    let mut collector = collector_writing_to(&path, HOST);
    let error = run_scenario(&mut collector).expect_err("parent directory doesn't exist");

    assert!(matches!(error, WriteReportError::Open { .. }), "{error:?}");
    assert!(error.is_fatal());
    assert_eq!(error.file(), path.as_path());
    assert!(!path.exists());
}

#[cfg(target_os = "linux")]
#[test]
fn write_failure_is_not_fatal() {
    // Opening /dev/full succeeds, but every write to it fails with ENOSPC.
    let path = Utf8Path::new("/dev/full");

    let mut collector = collector_writing_to(path, HOST);
    let error = run_scenario(&mut collector).expect_err("writes to /dev/full fail");

    assert!(matches!(error, WriteReportError::Write { .. }), "{error:?}");
    assert!(!error.is_fatal());
    assert_eq!(error.file(), path);
    assert_eq!(collector.state(), CollectorState::Finished);

    // The run is over, so the report isn't written again.
    collector.run_finished().expect("second run_finished is a no-op");
}

#[test]
fn report_written_once() {
    let dir = temp_dir();
    let path = dir.path().join("junit.xml");

    let mut collector = collector_writing_to(&path, HOST);
    run_scenario(&mut collector).expect("report written");
    fs::remove_file(&path).expect("report removed");

    collector.run_finished().expect("second run_finished is a no-op");
    assert!(!path.exists());
}

#[test]
fn unknown_hostname_falls_back_to_localhost() {
    let dir = temp_dir();
    let path = dir.path().join("junit.xml");

    let mut collector = collector_writing_to(&path, FixedHost { hostname: None });
    collector.test_passed("pkg", "A", &TestPassedStats::default());
    collector.run_finished().expect("report written");

    let contents = fs::read_to_string(&path).expect("report readable");
    assert!(contents.contains(r#"hostname="localhost""#), "{contents}");
    assert!(!contents.contains("<properties>"), "{contents}");
}

#[cfg(unix)]
#[test]
fn new_report_is_world_readable() {
    use std::os::unix::fs::PermissionsExt;

    let dir = temp_dir();
    let path = dir.path().join("junit.xml");

    let mut collector = collector_writing_to(&path, HOST);
    run_scenario(&mut collector).expect("report written");

    let mode = fs::metadata(&path).expect("metadata").permissions().mode();
    // The process umask can only remove bits.
    assert_eq!(mode & 0o7133, 0, "mode {mode:o}");
    assert_eq!(mode & 0o600, 0o600, "mode {mode:o}");
}

#[test]
fn replayed_log_matches_direct_events() {
    let log = indoc! {r#"
        {"event":"run-starting"}
        {"event":"suite-starting","suite":"pkg"}
        {"event":"test-starting","suite":"pkg","test":"A"}
        {"event":"test-passed","suite":"pkg","test":"A","time":"100ms"}
        {"event":"test-starting","suite":"pkg","test":"B"}
        {"event":"test-failed","suite":"pkg","test":"B","time":"200ms","file":"x.go","line":10,"message":"boom"}
        {"event":"suite-finished","suite":"pkg","time":"350ms"}
    "#};

    let dir = temp_dir();
    let path = dir.path().join("junit.xml");

    let events = read_event_log(log.as_bytes(), "<test>").expect("log parsed");
    let mut collector = collector_writing_to(&path, HOST);
    replay(events, &mut collector).expect("report written");

    let contents = fs::read_to_string(&path).expect("report readable");
    assert_eq!(contents, SCENARIO_REPORT);
}

#[test]
fn multiple_suites_in_first_touch_order() {
    let log = indoc! {r#"
        {"event":"test-passed","suite":"beta","test":"b1","time":"1ms"}
        {"event":"suite-starting","suite":"alpha"}
        {"event":"test-failed","suite":"alpha","test":"a1","time":"0s","file":"a.rs","line":3,"message":"left != right"}
        {"event":"test-passed","suite":"beta","test":"b2","time":"123456us"}
        {"event":"suite-finished","suite":"beta","time":"2s"}
        {"event":"run-finished"}
    "#};

    let dir = temp_dir();
    let path = dir.path().join("junit.xml");

    let events = read_event_log(log.as_bytes(), "<test>").expect("log parsed");
    let mut collector = collector_writing_to(&path, HOST);
    replay(events, &mut collector).expect("report written");

    let contents = fs::read_to_string(&path).expect("report readable");
    let expected = indoc! {r#"
        <?xml version="1.0" encoding="UTF-8"?>
        <testsuites>
            <testsuite name="beta" id="0" package="beta" timestamp="2024-11-05T23:59:58" hostname="ci-host" tests="2" failures="0" errors="0" time="2">
                <testcase classname="beta" name="b1" time="0.001"/>
                <testcase classname="beta" name="b2" time="0.1234"/>
            </testsuite>
            <testsuite name="alpha" id="1" package="alpha" timestamp="2024-11-05T23:59:58" hostname="ci-host" tests="1" failures="1" errors="0" time="0">
                <properties>
                    <property name="runtime.version" value="test-runtime 1.0"/>
                </properties>
                <testcase classname="alpha" name="a1" time="0">
                    <failure message="a.rs:3" type="assertion">left != right</failure>
                </testcase>
            </testsuite>
        </testsuites>
    "#};
    assert_eq!(contents, expected);
}
