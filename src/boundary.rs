//! Multipart boundary tokens.

use crate::error::{Error, Result};
use crate::grammar::is_boundary_char;
use crate::media_type::boundary_param;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Maximum boundary length allowed by RFC 2046.
pub const MAX_BOUNDARY_LEN: usize = 70;

/// A validated multipart boundary.
///
/// The token never contains the leading `--`; use [`Boundary::delimiter`] for
/// the form that appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Boundary(String);

impl Boundary {
    /// Generates a fresh random boundary.
    ///
    /// The token is a v4 UUID in simple form (32 lowercase hex digits), which
    /// in practice never collides with part content.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Creates a boundary from a caller-supplied token.
    ///
    /// The boundary must be 1-70 characters, use only RFC 2046 boundary
    /// characters or spaces, and must not end with a space.
    pub fn new(boundary: impl Into<String>) -> Result<Self> {
        let boundary = boundary.into();

        if boundary.is_empty() || boundary.len() > MAX_BOUNDARY_LEN {
            return Err(Error::InvalidBoundary("invalid boundary length".to_string()));
        }

        if boundary.ends_with(' ') {
            return Err(Error::InvalidBoundary(
                "boundary must not end with a space".to_string(),
            ));
        }

        if let Some(ch) = boundary.chars().find(|&c| !(is_boundary_char(c) || c == ' ')) {
            return Err(Error::InvalidBoundary(format!(
                "invalid boundary character: {:?}",
                ch
            )));
        }

        Ok(Self(boundary))
    }

    /// Extracts the boundary parameter of a `multipart/*` Content-Type value.
    pub fn from_content_type(content_type: &str) -> Result<Self> {
        match boundary_param(content_type)? {
            Some(b) => Self::new(b),
            None => Err(Error::InvalidBoundary(format!(
                "no multipart boundary in {:?}",
                content_type
            ))),
        }
    }

    /// Returns the bare token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the delimiter that opens each part: `--<boundary>`.
    pub fn delimiter(&self) -> String {
        format!("--{}", self.0)
    }

    /// Returns the closing delimiter: `--<boundary>--`.
    pub fn close_delimiter(&self) -> String {
        format!("--{}--", self.0)
    }
}

impl Default for Boundary {
    fn default() -> Self {
        Self::generate()
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Boundary {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Boundary {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate() {
        let a = Boundary::generate();
        let b = Boundary::generate();

        assert_eq!(a.as_str().len(), 32);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
        assert!(Boundary::new(a.as_str()).is_ok());
    }

    #[test]
    fn test_boundary_validation() {
        assert!(Boundary::new("simple-boundary").is_ok());
        assert!(Boundary::new("with space inside").is_ok());
        assert!(Boundary::new("----WebKitFormBoundary7MA4YWxkTrZu0gW").is_ok());

        let long = "a".repeat(71);
        assert!(matches!(Boundary::new(long), Err(Error::InvalidBoundary(_))));
        assert!(Boundary::new("a".repeat(70)).is_ok());

        assert!(matches!(Boundary::new(""), Err(Error::InvalidBoundary(_))));
        assert!(matches!(Boundary::new("trailing "), Err(Error::InvalidBoundary(_))));
        assert!(matches!(Boundary::new("quo\"te"), Err(Error::InvalidBoundary(_))));
        assert!(matches!(Boundary::new("line\r\nbreak"), Err(Error::InvalidBoundary(_))));
    }

    #[test]
    fn test_delimiters() {
        let b: Boundary = "X".parse().unwrap();
        assert_eq!(b.delimiter(), "--X");
        assert_eq!(b.close_delimiter(), "--X--");
        assert_eq!(b.to_string(), "X");
    }

    #[test]
    fn test_from_content_type() {
        let b = Boundary::from_content_type("multipart/mixed; boundary=\"abc123\"").unwrap();
        assert_eq!(b.as_str(), "abc123");

        assert!(matches!(
            Boundary::from_content_type("multipart/mixed"),
            Err(Error::InvalidBoundary(_))
        ));
        assert!(matches!(
            Boundary::from_content_type("not a media type"),
            Err(Error::MediaType(_))
        ));
    }
}
