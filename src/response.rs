//! Response envelopes around multipart bodies.
//!
//! [`MultipartResponse`] is the outgoing side: it is assembled from parts and
//! its body is always derived from them. [`IncomingMultipart`] is the
//! receiving side: it decodes a body once and hands the parts out in order.

use crate::boundary::Boundary;
use crate::error::{Error, Result};
use crate::header::{Headers, CONTENT_LENGTH, CONTENT_TYPE, TRANSFER_ENCODING};
use crate::media_type::boundary_param;
use crate::multipart::reader::{self, DecodeOptions};
use crate::multipart::writer::{self, Writer};
use crate::multipart::{MultipartMessage, Part};
use bytes::Bytes;
use http::StatusCode;
use std::collections::VecDeque;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, trace};

/// Strips the headers that describe a body's framing.
fn strip_framing_headers(headers: &mut Headers) {
    headers.remove(CONTENT_LENGTH);
    headers.remove(TRANSFER_ENCODING);
}

/// An outgoing response whose body is a multipart message.
#[derive(Debug, Clone)]
pub struct MultipartResponse {
    status: StatusCode,
    headers: Headers,
    message: MultipartMessage,
}

impl MultipartResponse {
    /// Creates a response from parts.
    ///
    /// A fresh boundary is generated; `subtype` defaults to `mixed`.
    ///
    /// # Examples
    ///
    /// ```
    /// use http::StatusCode;
    /// use multipart_response::{Headers, MultipartResponse, Part};
    ///
    /// let mut response = MultipartResponse::new(
    ///     [Part::default().with_header("Content-Type", "text/plain").with_body("hi")],
    ///     StatusCode::OK,
    ///     Headers::new(),
    ///     None,
    /// );
    /// response.prepare();
    /// assert_eq!(response.headers().get("transfer-encoding"), Some("chunked"));
    /// ```
    pub fn new(
        parts: impl IntoIterator<Item = Part>,
        status: StatusCode,
        headers: Headers,
        subtype: Option<&str>,
    ) -> Self {
        let mut message = MultipartMessage::from_parts(parts);
        if let Some(subtype) = subtype {
            message = message.with_subtype(subtype);
        }
        Self::from_message(message, status, headers)
    }

    /// Wraps an already assembled message.
    pub fn from_message(message: MultipartMessage, status: StatusCode, headers: Headers) -> Self {
        Self {
            status,
            headers,
            message,
        }
    }

    /// Returns the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the envelope headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the envelope headers for modification.
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    /// Returns the boundary separating the parts.
    pub fn boundary(&self) -> &Boundary {
        self.message.boundary()
    }

    /// Returns the multipart subtype, e.g. `mixed`.
    pub fn subtype(&self) -> &str {
        self.message.subtype()
    }

    /// Returns the underlying multipart message.
    pub fn message(&self) -> &MultipartMessage {
        &self.message
    }

    /// Returns the parts in order.
    pub fn parts(&self) -> &[Part] {
        self.message.parts()
    }

    /// Appends a part.
    pub fn set_part(&mut self, part: Part) -> &mut Self {
        self.message.push(part);
        self
    }

    /// Appends several parts, in order.
    pub fn set_parts(&mut self, parts: impl IntoIterator<Item = Part>) -> &mut Self {
        self.message.extend(parts);
        self
    }

    /// Sets the envelope headers describing the multipart body:
    /// `Content-Type` with the boundary and `Transfer-Encoding: chunked`.
    pub fn prepare(&mut self) -> &mut Self {
        self.headers
            .insert(CONTENT_TYPE, writer::content_type(&self.message));
        self.headers
            .insert(TRANSFER_ENCODING, writer::transfer_encoding());
        trace!(boundary = %self.message.boundary(), "prepared multipart envelope");
        self
    }

    /// Sets literal content on the response.
    ///
    /// The body of a multipart response is derived from its parts, so only
    /// clearing is accepted; it strips `Content-Length` and
    /// `Transfer-Encoding`, which no longer describe the body.
    pub fn set_content(&mut self, content: Option<Bytes>) -> Result<()> {
        if content.is_some() {
            return Err(Error::InvalidOperation(
                "content cannot be set on a multipart response".to_string(),
            ));
        }
        strip_framing_headers(&mut self.headers);
        Ok(())
    }

    /// Returns the serialized multipart body.
    pub fn body(&self) -> Bytes {
        writer::serialize(&self.message)
    }

    /// Streams the body to `w` in chunked transfer coding.
    pub async fn send<W: AsyncWrite + Unpin>(&self, w: W) -> Result<()> {
        Writer::chunked(w, self.message.boundary().clone())
            .write_message(&self.message)
            .await?;
        debug!(parts = self.message.len(), "sent multipart body");
        Ok(())
    }
}

/// A received response whose multipart body is consumed one part at a time.
#[derive(Debug, Clone)]
pub struct IncomingMultipart {
    status: StatusCode,
    headers: Headers,
    parts: VecDeque<Part>,
    options: DecodeOptions,
}

impl IncomingMultipart {
    /// Creates a response, decoding `body` when present.
    ///
    /// The boundary is taken from `options`, then from the `Content-Type`
    /// header, and is otherwise detected in the body.
    pub fn new(
        status: StatusCode,
        headers: Headers,
        body: Option<&[u8]>,
        options: DecodeOptions,
    ) -> Result<Self> {
        let mut response = Self {
            status,
            headers,
            parts: VecDeque::new(),
            options,
        };
        response.set_body(body)?;
        Ok(response)
    }

    /// Reads the whole body from `reader` and decodes it.
    pub async fn read_from<R: AsyncRead + Unpin>(
        status: StatusCode,
        headers: Headers,
        reader: R,
        options: DecodeOptions,
    ) -> Result<Self> {
        let mut response = Self {
            status,
            headers,
            parts: VecDeque::new(),
            options,
        };
        let options = response.decode_options()?;
        response.parts.extend(reader::read_from(reader, &options).await?);
        Ok(response)
    }

    /// Returns the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the envelope headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Replaces the body.
    ///
    /// `None` clears the queued parts and strips `Content-Length` and
    /// `Transfer-Encoding`. A body is decoded and its parts are queued after
    /// any still pending; on error the queue is left untouched.
    pub fn set_body(&mut self, body: Option<&[u8]>) -> Result<()> {
        let Some(raw) = body else {
            strip_framing_headers(&mut self.headers);
            self.parts.clear();
            return Ok(());
        };

        let options = self.decode_options()?;
        let parts = reader::decode_with(raw, &options)?;
        self.parts.extend(parts);
        Ok(())
    }

    /// Pops the body of the next part, or `None` once all parts are consumed.
    pub fn body(&mut self) -> Option<Bytes> {
        self.next_part().map(Part::into_body)
    }

    /// Pops the next part.
    pub fn next_part(&mut self) -> Option<Part> {
        let part = self.parts.pop_front();
        if part.is_some() {
            trace!(remaining = self.parts.len(), "consumed multipart part");
        }
        part
    }

    /// Iterates over the parts not consumed yet.
    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter()
    }

    /// Returns the number of parts not consumed yet.
    pub fn remaining(&self) -> usize {
        self.parts.len()
    }

    fn decode_options(&self) -> Result<DecodeOptions> {
        let mut options = self.options.clone();
        if options.boundary.is_none() {
            if let Some(content_type) = self.headers.get(CONTENT_TYPE) {
                if let Ok(Some(boundary)) = boundary_param(content_type) {
                    options.boundary = Some(Boundary::new(boundary)?);
                }
            }
        }
        Ok(options)
    }
}

impl Iterator for IncomingMultipart {
    type Item = Part;

    fn next(&mut self) -> Option<Part> {
        self.next_part()
    }
}
