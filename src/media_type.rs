//! Media type parsing.
//!
//! Implements the subset of RFC 2045 media type handling needed to read the
//! `boundary` parameter out of a multipart `Content-Type` value.

use crate::error::{Error, Result};
use crate::grammar::is_token;
use std::collections::HashMap;

/// Parses a media type value and any optional parameters, per RFC 1521.
///
/// Returns the media type converted to lowercase and a map of parameters
/// keyed by lowercase name. Quoted parameter values are unquoted.
///
/// # Examples
///
/// ```
/// use multipart_response::parse_media_type;
///
/// let (media_type, params) = parse_media_type("multipart/mixed; boundary=\"abc\"").unwrap();
/// assert_eq!(media_type, "multipart/mixed");
/// assert_eq!(params.get("boundary"), Some(&"abc".to_string()));
/// ```
pub fn parse_media_type(v: &str) -> Result<(String, HashMap<String, String>)> {
    let (base, rest) = v.split_once(';').unwrap_or((v, ""));
    let mediatype = base.trim().to_lowercase();

    match mediatype.split_once('/') {
        Some((major, sub)) if is_token(major) && is_token(sub) => {}
        Some(_) => return Err(Error::MediaType("invalid media type format".to_string())),
        None => return Err(Error::MediaType("no media type".to_string())),
    }

    let mut params = HashMap::new();

    for param in rest.split(';') {
        let param = param.trim();
        if param.is_empty() {
            continue;
        }

        let Some((key, value)) = param.split_once('=') else {
            return Err(Error::MediaType(format!("invalid parameter {:?}", param)));
        };
        let key = key.trim().to_lowercase();
        let value = value.trim();

        let value = if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
            &value[1..value.len() - 1]
        } else {
            value
        };

        params.insert(key, value.to_string());
    }

    Ok((mediatype, params))
}

/// Extracts the `boundary` parameter from a multipart `Content-Type` value.
///
/// Returns `Ok(None)` when the value parses but is not `multipart/*` or
/// carries no boundary.
pub fn boundary_param(content_type: &str) -> Result<Option<String>> {
    let (media_type, mut params) = parse_media_type(content_type)?;
    if !media_type.starts_with("multipart/") {
        return Ok(None);
    }
    Ok(params.remove("boundary"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_media_type_simple() {
        let (media_type, params) = parse_media_type("text/html").unwrap();
        assert_eq!(media_type, "text/html");
        assert!(params.is_empty());
    }

    #[test]
    fn test_parse_media_type_lowercases() {
        let (media_type, params) = parse_media_type("Multipart/Mixed; Boundary=abc").unwrap();
        assert_eq!(media_type, "multipart/mixed");
        assert_eq!(params.get("boundary"), Some(&"abc".to_string()));
    }

    #[test]
    fn test_parse_media_type_quoted_value() {
        let (_, params) = parse_media_type("multipart/mixed; boundary=\"a b:c\"").unwrap();
        assert_eq!(params.get("boundary"), Some(&"a b:c".to_string()));
    }

    #[test]
    fn test_parse_media_type_invalid() {
        assert!(matches!(parse_media_type(""), Err(Error::MediaType(_))));
        assert!(matches!(parse_media_type("multipart"), Err(Error::MediaType(_))));
        assert!(matches!(parse_media_type("multi part/mixed"), Err(Error::MediaType(_))));
        assert!(matches!(
            parse_media_type("multipart/mixed; boundary"),
            Err(Error::MediaType(_))
        ));
    }

    #[test]
    fn test_boundary_param() {
        assert_eq!(
            boundary_param("multipart/mixed; boundary=\"0f3c\"").unwrap(),
            Some("0f3c".to_string())
        );
        assert_eq!(
            boundary_param("multipart/related; type=text/html; boundary=xyz").unwrap(),
            Some("xyz".to_string())
        );
        assert_eq!(boundary_param("multipart/mixed").unwrap(), None);
        assert_eq!(boundary_param("text/plain; boundary=abc").unwrap(), None);
    }
}
