//! Multipart body encoding and decoding.

pub mod message;
pub mod part;
pub mod reader;
pub mod writer;

pub use message::{MultipartMessage, DEFAULT_SUBTYPE};
pub use part::Part;
pub use reader::{decode, decode_with, detect_boundary, parse_part, read_from, split, DecodeOptions};
pub use writer::{content_type, serialize, transfer_encoding, Writer};
