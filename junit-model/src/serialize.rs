// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialize a `Report`.

use crate::{Failure, Property, Report, TestCase, TestSuite, time::format_timestamp};
use quick_xml::{
    Writer,
    escape::escape,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event, attributes::Attribute},
    name::QName,
};
use std::{borrow::Cow, io};

static TESTSUITES_TAG: &str = "testsuites";
static TESTSUITE_TAG: &str = "testsuite";
static TESTCASE_TAG: &str = "testcase";
static PROPERTIES_TAG: &str = "properties";
static PROPERTY_TAG: &str = "property";
static FAILURE_TAG: &str = "failure";

pub(crate) fn serialize_report(report: &Report, writer: impl io::Write) -> quick_xml::Result<()> {
    let mut writer = Writer::new_with_indent(writer, b' ', 4);

    let decl = BytesDecl::new("1.0", Some("UTF-8"), None);
    writer.write_event(Event::Decl(decl))?;

    serialize_report_impl(report, &mut writer)?;

    // Add a trailing newline.
    writer.write_indent()
}

fn serialize_report_impl(
    report: &Report,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    serialize_empty_start_tag(TESTSUITES_TAG, writer)?;

    for test_suite in report.test_suites() {
        serialize_test_suite(test_suite, writer)?;
    }

    serialize_end_tag(TESTSUITES_TAG, writer)?;
    writer.write_event(Event::Eof)?;

    Ok(())
}

fn serialize_test_suite(
    test_suite: &TestSuite,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    // Use the destructuring syntax to ensure that all fields are handled.
    let TestSuite {
        name,
        id,
        package,
        timestamp,
        hostname,
        errors,
        time,
        properties,
        test_cases,
    } = test_suite;

    let mut test_suite_tag = BytesStart::new(TESTSUITE_TAG);
    test_suite_tag.extend_attributes([
        attribute("name", name),
        attribute("id", &id.to_string()),
        attribute("package", package),
        attribute("timestamp", &format_timestamp(timestamp)),
        attribute("hostname", hostname),
        attribute("tests", &test_suite.tests().to_string()),
        attribute("failures", &test_suite.failures().to_string()),
        attribute("errors", &errors.to_string()),
        attribute("time", &time.to_string()),
    ]);
    writer.write_event(Event::Start(test_suite_tag))?;

    if !properties.is_empty() {
        serialize_empty_start_tag(PROPERTIES_TAG, writer)?;
        for property in properties {
            serialize_property(property, writer)?;
        }
        serialize_end_tag(PROPERTIES_TAG, writer)?;
    }

    for test_case in test_cases {
        serialize_test_case(test_case, writer)?;
    }

    serialize_end_tag(TESTSUITE_TAG, writer)
}

fn serialize_property(
    property: &Property,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    let mut property_tag = BytesStart::new(PROPERTY_TAG);
    property_tag.extend_attributes([
        attribute("name", &property.name),
        attribute("value", &property.value),
    ]);

    writer.write_event(Event::Empty(property_tag))
}

fn serialize_test_case(
    test_case: &TestCase,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    let TestCase {
        classname,
        name,
        time,
        failure,
    } = test_case;

    let mut test_case_tag = BytesStart::new(TESTCASE_TAG);
    test_case_tag.extend_attributes([
        attribute("classname", classname),
        attribute("name", name),
        attribute("time", &time.to_string()),
    ]);

    match failure {
        Some(failure) => {
            writer.write_event(Event::Start(test_case_tag))?;
            serialize_failure(failure, writer)?;
            serialize_end_tag(TESTCASE_TAG, writer)
        }
        None => writer.write_event(Event::Empty(test_case_tag)),
    }
}

fn serialize_failure(
    failure: &Failure,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    let Failure { message, ty, text } = failure;

    let mut failure_tag = BytesStart::new(FAILURE_TAG);
    failure_tag.extend_attributes([attribute("message", message), attribute("type", ty)]);

    // The text is always written, even if empty, so that the element keeps an explicit end tag.
    writer.write_event(Event::Start(failure_tag))?;
    writer.write_event(Event::Text(BytesText::new(&sanitize(text))))?;
    serialize_end_tag(FAILURE_TAG, writer)
}

fn serialize_empty_start_tag(
    tag_name: &'static str,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    let tag = BytesStart::new(tag_name);
    writer.write_event(Event::Start(tag))
}

fn serialize_end_tag(
    tag_name: &'static str,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    let end_tag = BytesEnd::new(tag_name);
    writer.write_event(Event::End(end_tag))
}

/// Builds an attribute whose value is escaped for XML.
///
/// Beyond the usual entities, tabs and line breaks are written as character references so that
/// attribute-value normalization in readers doesn't turn them into spaces.
fn attribute(key: &'static str, value: &str) -> Attribute<'static> {
    let escaped = escape(&sanitize(value)).into_owned();
    let escaped = if escaped.contains(['\n', '\r', '\t']) {
        escaped
            .replace('\n', "&#xA;")
            .replace('\r', "&#xD;")
            .replace('\t', "&#x9;")
    } else {
        escaped
    };

    Attribute {
        key: QName(key.as_bytes()),
        value: Cow::Owned(escaped.into_bytes()),
    }
}

/// Removes ANSI escape sequences, then replaces characters that can't appear in an XML 1.0
/// document with U+FFFD.
fn sanitize(text: &str) -> Cow<'_, str> {
    if text.contains('\x1b') {
        let stripped = strip_ansi_escapes::strip_str(text);
        Cow::Owned(replace_illegal_chars(&stripped).into_owned())
    } else {
        replace_illegal_chars(text)
    }
}

fn replace_illegal_chars(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        return Cow::Borrowed(text);
    }
    text.chars()
        .map(|c| {
            if is_xml_char(c) {
                c
            } else {
                char::REPLACEMENT_CHARACTER
            }
        })
        .collect()
}

/// The `Char` production of XML 1.0.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{9}'
            | '\u{A}'
            | '\u{D}'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}
