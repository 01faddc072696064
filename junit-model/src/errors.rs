// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::string::FromUtf8Error;
use thiserror::Error;

/// An error that occurs while serializing a [`Report`](crate::Report).
///
/// Returned by [`Report::serialize`](crate::Report::serialize) and
/// [`Report::to_string`](crate::Report::to_string).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SerializeError {
    /// The XML writer failed, typically because the underlying writer returned an I/O error.
    #[error("error serializing JUnit report")]
    Xml(#[from] quick_xml::Error),

    /// The serialized report could not be converted to a string.
    #[error("serialized JUnit report is not valid UTF-8")]
    Utf8(#[from] FromUtf8Error),
}
