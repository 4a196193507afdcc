//! Multipart HTTP response encoding and decoding.
//!
//! This crate provides:
//! - Serialization of an ordered set of parts into one `multipart/*` body
//! - Parsing such a body back into parts, with the boundary supplied or detected
//! - Outgoing and incoming response envelopes around multipart bodies
//! - Async adapters for streaming bodies in chunked transfer coding
//!
//! Encoding and decoding work on in-memory buffers; only the adapters do I/O,
//! using tokio.

pub mod boundary;
pub mod error;
pub mod grammar;
pub mod header;
pub mod media_type;
pub mod multipart;
pub mod response;

// Re-export commonly used types
pub use boundary::Boundary;
pub use error::{Error, Result};
pub use header::Headers;
pub use media_type::parse_media_type;
pub use multipart::{DecodeOptions, MultipartMessage, Part};
pub use response::{IncomingMultipart, MultipartResponse};
