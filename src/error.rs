//! Error types for the multipart-response crate.

use std::io;
use thiserror::Error;

/// The main error type for the multipart-response crate.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// No boundary line could be found in the body
    #[error("Malformed body: {0}")]
    MalformedBody(String),

    /// A segment has no blank line between headers and body
    #[error("Malformed part: {0}")]
    MalformedPart(String),

    /// A header line has no `key: value` separator
    #[error("Malformed header: {0:?}")]
    MalformedHeader(String),

    /// The operation is not allowed on this message
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Boundary error
    #[error("Invalid boundary: {0}")]
    InvalidBoundary(String),

    /// Media type error
    #[error("Media type error: {0}")]
    MediaType(String),

    /// Message too large
    #[error("Message too large")]
    MessageTooLarge,
}

/// Specialized Result type for multipart operations.
pub type Result<T> = std::result::Result<T, Error>;
