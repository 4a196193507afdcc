//! A single part of a multipart message.

use crate::header::{Headers, CONTENT_TYPE};
use bytes::Bytes;

/// One sub-message of a multipart body: headers plus raw body bytes.
///
/// Parts are built up front and never mutated afterwards; decoded parts
/// carry lower-cased header names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Part {
    headers: Headers,
    body: Bytes,
}

impl Part {
    /// Creates a part from headers and a body.
    pub fn new(headers: Headers, body: impl Into<Bytes>) -> Self {
        Self {
            headers,
            body: body.into(),
        }
    }

    /// Returns the part with an additional header (last-wins on repeated names).
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Returns the part with its body replaced.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns the part's headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the part's body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the value of the part's Content-Type header, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE)
    }

    /// Consumes the part and returns its body.
    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Consumes the part and returns its headers and body.
    pub fn into_parts(self) -> (Headers, Bytes) {
        (self.headers, self.body)
    }
}
