//! Multipart writer.
//!
//! Serializes a [`MultipartMessage`] into its wire form, either in one go
//! with [`serialize`] or part by part through the async [`Writer`].

use crate::boundary::Boundary;
use crate::error::Result;
use crate::multipart::message::MultipartMessage;
use crate::multipart::part::Part;
use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::trace;

/// Transfer coding declared for multipart bodies.
pub const CHUNKED: &str = "chunked";

/// Returns the Content-Type value for the message:
/// `multipart/<subtype>; boundary="<boundary>"`.
pub fn content_type(message: &MultipartMessage) -> String {
    format!(
        "multipart/{}; boundary=\"{}\"",
        message.subtype(),
        message.boundary()
    )
}

/// Returns the Transfer-Encoding value for multipart bodies.
///
/// The assembled size is not known ahead of streaming, so the body is always
/// sent chunked and no Content-Length is computed.
pub fn transfer_encoding() -> &'static str {
    CHUNKED
}

/// Serializes the message body.
///
/// Bodies are written verbatim. Decoding trims each segment, so a part
/// survives a round trip only if it has at least one header and a non-empty
/// body without leading or trailing whitespace; a part with no headers or an
/// empty body is written but later rejected with `MalformedPart`.
///
/// # Examples
///
/// ```
/// use multipart_response::multipart::{serialize, MultipartMessage, Part};
/// use multipart_response::Boundary;
///
/// let message = MultipartMessage::from_parts([Part::default()
///     .with_header("content-type", "text/plain")
///     .with_body("A")])
///     .with_boundary(Boundary::new("X").unwrap());
///
/// assert_eq!(
///     serialize(&message).as_ref(),
///     b"--X\r\ncontent-type: text/plain\r\n\r\nA\r\n--X--"
/// );
/// ```
pub fn serialize(message: &MultipartMessage) -> Bytes {
    let mut dst = BytesMut::new();
    for part in message.parts() {
        encode_part(message.boundary(), part, &mut dst);
    }
    encode_close(message.boundary(), &mut dst);

    trace!(parts = message.len(), len = dst.len(), "serialized multipart body");
    dst.freeze()
}

/// Encodes one part: delimiter line, header lines, blank line, body, CRLF.
fn encode_part(boundary: &Boundary, part: &Part, dst: &mut BytesMut) {
    let headers = part.headers().to_string();
    dst.reserve(boundary.as_str().len() + headers.len() + part.body().len() + 8);

    dst.put_slice(b"--");
    dst.put_slice(boundary.as_str().as_bytes());
    dst.put_slice(b"\r\n");
    dst.put_slice(headers.as_bytes());
    dst.put_slice(b"\r\n");
    dst.put_slice(part.body());
    dst.put_slice(b"\r\n");
}

/// Encodes the closing delimiter, without a trailing CRLF.
fn encode_close(boundary: &Boundary, dst: &mut BytesMut) {
    dst.put_slice(boundary.close_delimiter().as_bytes());
}

/// A streaming multipart writer.
///
/// Produces exactly the bytes of [`serialize`], one part at a time. In chunked
/// mode every part is additionally framed as an HTTP/1.1 chunk and
/// [`Writer::close`] emits the terminating zero-length chunk.
pub struct Writer<W> {
    writer: W,
    boundary: Boundary,
    chunked: bool,
    parts_written: usize,
}

impl<W: AsyncWrite + Unpin> Writer<W> {
    /// Creates a writer emitting the raw multipart body.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use multipart_response::multipart::Writer;
    /// use multipart_response::Boundary;
    ///
    /// let mut output = Vec::new();
    /// let writer = Writer::new(&mut output, Boundary::generate());
    /// ```
    pub fn new(writer: W, boundary: Boundary) -> Self {
        Self {
            writer,
            boundary,
            chunked: false,
            parts_written: 0,
        }
    }

    /// Creates a writer emitting the body in chunked transfer coding.
    pub fn chunked(writer: W, boundary: Boundary) -> Self {
        Self {
            chunked: true,
            ..Self::new(writer, boundary)
        }
    }

    /// Returns the writer's boundary.
    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    /// Writes one part.
    pub async fn write_part(&mut self, part: &Part) -> Result<()> {
        let mut buf = BytesMut::new();
        encode_part(&self.boundary, part, &mut buf);
        self.emit(&buf).await?;
        self.parts_written += 1;
        Ok(())
    }

    /// Writes every part of the message, then closes the writer.
    pub async fn write_message(mut self, message: &MultipartMessage) -> Result<()> {
        for part in message.parts() {
            self.write_part(part).await?;
        }
        self.close().await
    }

    /// Closes the writer by writing the closing delimiter.
    pub async fn close(mut self) -> Result<()> {
        let mut buf = BytesMut::new();
        encode_close(&self.boundary, &mut buf);
        self.emit(&buf).await?;

        if self.chunked {
            self.writer.write_all(b"0\r\n\r\n").await?;
        }
        self.writer.flush().await?;

        trace!(
            parts = self.parts_written,
            chunked = self.chunked,
            "closed multipart writer"
        );
        Ok(())
    }

    async fn emit(&mut self, data: &[u8]) -> Result<()> {
        if !self.chunked {
            self.writer.write_all(data).await?;
            return Ok(());
        }
        // A zero-length chunk would end the transfer early.
        if data.is_empty() {
            return Ok(());
        }
        self.writer
            .write_all(format!("{:X}\r\n", data.len()).as_bytes())
            .await?;
        self.writer.write_all(data).await?;
        self.writer.write_all(b"\r\n").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::Headers;

    fn text_part(body: &'static str) -> Part {
        Part::new(
            [("content-type", "text/plain")].into_iter().collect::<Headers>(),
            body,
        )
    }

    fn message_x(parts: Vec<Part>) -> MultipartMessage {
        MultipartMessage::from_parts(parts).with_boundary(Boundary::new("X").unwrap())
    }

    #[test]
    fn test_serialize_two_parts() {
        let message = message_x(vec![text_part("A"), text_part("B")]);

        assert_eq!(
            serialize(&message).as_ref(),
            b"--X\r\ncontent-type: text/plain\r\n\r\nA\r\n--X\r\ncontent-type: text/plain\r\n\r\nB\r\n--X--"
        );
    }

    #[test]
    fn test_serialize_no_parts() {
        let message = message_x(Vec::new());
        assert_eq!(serialize(&message).as_ref(), b"--X--");
    }

    #[test]
    fn test_serialize_keeps_header_order() {
        let part = Part::default()
            .with_header("Z-Last", "1")
            .with_header("A-First", "2")
            .with_body("x");
        let message = message_x(vec![part]);

        assert_eq!(
            serialize(&message).as_ref(),
            b"--X\r\nZ-Last: 1\r\nA-First: 2\r\n\r\nx\r\n--X--"
        );
    }

    #[test]
    fn test_empty_body_part_does_not_round_trip() {
        let message = message_x(vec![Part::default().with_header("A", "1")]);
        let body = serialize(&message);

        assert_eq!(body.as_ref(), b"--X\r\nA: 1\r\n\r\n\r\n--X--");
        assert!(matches!(
            crate::multipart::decode(&body),
            Err(crate::error::Error::MalformedPart(_))
        ));
    }

    #[test]
    fn test_content_type() {
        let message = message_x(Vec::new());
        assert_eq!(content_type(&message), "multipart/mixed; boundary=\"X\"");

        let message = message.with_subtype("byteranges");
        assert_eq!(content_type(&message), "multipart/byteranges; boundary=\"X\"");

        assert_eq!(transfer_encoding(), "chunked");
    }

    #[tokio::test]
    async fn test_writer_matches_serialize() {
        let message = message_x(vec![text_part("A"), text_part("B")]);

        let mut output = Vec::new();
        Writer::new(&mut output, message.boundary().clone())
            .write_message(&message)
            .await
            .unwrap();

        assert_eq!(output, serialize(&message).to_vec());
    }

    #[tokio::test]
    async fn test_chunked_writer() {
        let part = text_part("A");
        let framed = b"--X\r\ncontent-type: text/plain\r\n\r\nA\r\n";

        let mut mock = tokio_test::io::Builder::new()
            .write(b"24\r\n")
            .write(framed)
            .write(b"\r\n")
            .write(b"5\r\n")
            .write(b"--X--")
            .write(b"\r\n")
            .write(b"0\r\n\r\n")
            .build();

        let mut writer = Writer::chunked(&mut mock, Boundary::new("X").unwrap());
        writer.write_part(&part).await.unwrap();
        writer.close().await.unwrap();
    }
}
