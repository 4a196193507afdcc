//! Multipart reader.
//!
//! Splits a fully materialized multipart body into its parts. Decoding is a
//! single forward pass and all-or-nothing: the first malformed segment fails
//! the whole body.

use crate::boundary::Boundary;
use crate::error::{Error, Result};
use crate::grammar::{find_bytes, trim_bytes};
use crate::header::Headers;
use crate::multipart::part::Part;
use bytes::Bytes;
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, trace};

const DEFAULT_MAX_BODY_SIZE: usize = 32 << 20; // 32 MB
const DEFAULT_MAX_PARTS: usize = 10000;

/// Segment produced by the closing delimiter `--<boundary>--`.
const CLOSE_MARKER: &[u8] = b"--";

/// Separator between a part's header block and its body.
const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// A line opening with `--` followed by a run of visible ASCII characters.
static BOUNDARY_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^--[!-~]+").expect("boundary pattern is valid")
});

/// Options controlling how a body is decoded.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Boundary to split on. Detected from the body when unset.
    pub boundary: Option<Boundary>,
    /// Largest body accepted by [`read_from`].
    pub max_body_size: usize,
    /// Largest number of parts accepted.
    pub max_parts: usize,
}

impl DecodeOptions {
    /// Creates options with default limits and boundary detection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits on `boundary` instead of detecting it.
    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = Some(boundary);
        self
    }

    /// Sets the largest body accepted by [`read_from`].
    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    /// Sets the largest number of parts accepted.
    pub fn with_max_parts(mut self, max_parts: usize) -> Self {
        self.max_parts = max_parts;
        self
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            boundary: None,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            max_parts: DEFAULT_MAX_PARTS,
        }
    }
}

/// Finds the delimiter of a multipart body.
///
/// Returns the first line-leading `--<token>` run, including the `--`. The
/// token extends to the first whitespace or non-ASCII byte.
///
/// # Examples
///
/// ```
/// use multipart_response::multipart::detect_boundary;
///
/// let body = b"--abc123\r\nA: 1\r\n\r\nhello\r\n--abc123--";
/// assert_eq!(detect_boundary(body).unwrap(), "--abc123");
/// ```
pub fn detect_boundary(raw: &[u8]) -> Result<String> {
    let found = BOUNDARY_LINE
        .find(raw)
        .ok_or_else(|| Error::MalformedBody("no boundary line found".to_string()))?;

    // The pattern only matches ASCII.
    let delimiter = String::from_utf8_lossy(found.as_bytes()).into_owned();
    trace!(delimiter = %delimiter, "detected multipart boundary");
    Ok(delimiter)
}

/// Splits a body on `delimiter` into trimmed, non-empty segments.
///
/// Splitting stops at the first segment equal to `--`, the remainder of the
/// closing delimiter; anything after it is ignored.
pub fn split<'a>(raw: &'a [u8], delimiter: &[u8]) -> Vec<&'a [u8]> {
    let mut segments = Vec::new();
    let mut rest = raw;

    loop {
        let (segment, next) = match find_bytes(rest, delimiter) {
            Some(pos) => (&rest[..pos], Some(&rest[pos + delimiter.len()..])),
            None => (rest, None),
        };

        let segment = trim_bytes(segment);
        if segment == CLOSE_MARKER {
            break;
        }
        if !segment.is_empty() {
            segments.push(segment);
        }

        match next {
            Some(next) => rest = next,
            None => break,
        }
    }

    segments
}

/// Parses one segment into a [`Part`].
///
/// The header block ends at the first blank line; everything after it is the
/// body, taken verbatim. Header names are lower-cased and a repeated name
/// overwrites the earlier value.
pub fn parse_part(segment: &[u8]) -> Result<Part> {
    let pos = find_bytes(segment, HEADER_TERMINATOR).ok_or_else(|| {
        Error::MalformedPart("no blank line between headers and body".to_string())
    })?;
    let header_block = &segment[..pos];
    let body = &segment[pos + HEADER_TERMINATOR.len()..];

    let header_block = std::str::from_utf8(header_block).map_err(|_| {
        Error::MalformedHeader(String::from_utf8_lossy(header_block).into_owned())
    })?;

    let mut headers = Headers::new();
    for line in header_block.split("\r\n") {
        let (key, value) = split_header_line(line)
            .ok_or_else(|| Error::MalformedHeader(line.to_string()))?;
        headers.insert(key.to_lowercase(), value);
    }

    Ok(Part::new(headers, Bytes::copy_from_slice(body)))
}

/// Splits a header line at the first `:` followed by whitespace.
fn split_header_line(line: &str) -> Option<(&str, &str)> {
    let bytes = line.as_bytes();
    let colon = (0..bytes.len())
        .find(|&i| bytes[i] == b':' && bytes.get(i + 1).map_or(false, u8::is_ascii_whitespace))?;
    let value = line[colon + 1..].trim_start_matches(|c: char| c.is_ascii_whitespace());
    Some((&line[..colon], value))
}

/// Decodes a body, detecting its boundary.
///
/// An empty result is valid and not an error.
pub fn decode(raw: &[u8]) -> Result<Vec<Part>> {
    decode_with(raw, &DecodeOptions::default())
}

/// Decodes a body using the given options.
pub fn decode_with(raw: &[u8], options: &DecodeOptions) -> Result<Vec<Part>> {
    let delimiter = match &options.boundary {
        Some(boundary) => boundary.delimiter(),
        None => detect_boundary(raw)?,
    };

    let segments = split(raw, delimiter.as_bytes());
    if segments.len() > options.max_parts {
        return Err(Error::MessageTooLarge);
    }

    let parts = segments
        .into_iter()
        .map(parse_part)
        .collect::<Result<Vec<_>>>()?;

    debug!(parts = parts.len(), len = raw.len(), "decoded multipart body");
    Ok(parts)
}

/// Reads a whole body from `reader` and decodes it.
///
/// Fails with [`Error::MessageTooLarge`] once more than
/// `options.max_body_size` bytes are available.
pub async fn read_from<R: AsyncRead + Unpin>(
    reader: R,
    options: &DecodeOptions,
) -> Result<Vec<Part>> {
    let limit = u64::try_from(options.max_body_size)
        .unwrap_or(u64::MAX)
        .saturating_add(1);

    let mut raw = Vec::new();
    reader.take(limit).read_to_end(&mut raw).await?;
    if raw.len() > options.max_body_size {
        return Err(Error::MessageTooLarge);
    }

    decode_with(&raw, options)
}
