//! An ordered collection of parts sharing one boundary.

use crate::boundary::Boundary;
use crate::grammar::is_token;
use crate::multipart::part::Part;

/// Subtype used when none is given.
pub const DEFAULT_SUBTYPE: &str = "mixed";

/// A multipart message: a boundary, a `multipart/*` subtype and its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartMessage {
    boundary: Boundary,
    subtype: String,
    parts: Vec<Part>,
}

impl MultipartMessage {
    /// Creates an empty `multipart/mixed` message with a generated boundary.
    pub fn new() -> Self {
        Self {
            boundary: Boundary::generate(),
            subtype: DEFAULT_SUBTYPE.to_string(),
            parts: Vec::new(),
        }
    }

    /// Creates a message holding `parts`, in order.
    pub fn from_parts(parts: impl IntoIterator<Item = Part>) -> Self {
        let mut message = Self::new();
        message.extend(parts);
        message
    }

    /// Replaces the boundary.
    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    /// Replaces the subtype. A subtype that is not an RFC 2045 token
    /// (empty, or containing separators, spaces or control characters)
    /// falls back to `mixed`.
    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        let subtype = subtype.into();
        self.subtype = if is_token(&subtype) {
            subtype
        } else {
            DEFAULT_SUBTYPE.to_string()
        };
        self
    }

    /// Appends a part.
    pub fn push(&mut self, part: Part) -> &mut Self {
        self.parts.push(part);
        self
    }

    /// Returns the boundary.
    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    /// Returns the subtype, e.g. `mixed`.
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// Returns the parts in order.
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Returns the number of parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Reports whether the message has no parts.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Consumes the message and returns its parts.
    pub fn into_parts(self) -> Vec<Part> {
        self.parts
    }
}

impl Default for MultipartMessage {
    fn default() -> Self {
        Self::new()
    }
}

impl Extend<Part> for MultipartMessage {
    fn extend<I: IntoIterator<Item = Part>>(&mut self, iter: I) {
        self.parts.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let message = MultipartMessage::new();
        assert_eq!(message.subtype(), "mixed");
        assert!(message.is_empty());
        assert_eq!(message.boundary().as_str().len(), 32);
    }

    #[test]
    fn test_builder() {
        let boundary = Boundary::new("X").unwrap();
        let mut message = MultipartMessage::from_parts([Part::default().with_body("A")])
            .with_boundary(boundary.clone())
            .with_subtype("related");
        message.push(Part::default().with_body("B"));

        assert_eq!(message.boundary(), &boundary);
        assert_eq!(message.subtype(), "related");
        assert_eq!(message.len(), 2);
        assert_eq!(message.parts()[1].body().as_ref(), b"B");

        let message = message.with_subtype("");
        assert_eq!(message.subtype(), "mixed");
    }

    #[test]
    fn test_non_token_subtype_falls_back() {
        for subtype in ["x; charset=evil", "a\"b", "related\r\nX-Injected: 1", "two words"] {
            let message = MultipartMessage::new().with_subtype(subtype);
            assert_eq!(message.subtype(), "mixed", "{subtype:?}");
        }

        let message = MultipartMessage::new().with_subtype("form-data");
        assert_eq!(message.subtype(), "form-data");
    }
}
