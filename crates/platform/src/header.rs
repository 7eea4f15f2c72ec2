//! Header utilities
//!
//! Validation and insertion helpers for request headers.

use http::{HeaderMap, HeaderName, HeaderValue};

/// Error when building or inserting a header
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
    #[error("Empty header name")]
    EmptyName,

    #[error("Invalid header name: {0}")]
    InvalidName(String),

    /// The value is not visible ASCII; the value itself is never echoed
    #[error("Invalid value for header {0}")]
    InvalidValue(String),
}

/// Parse a header name
///
/// Header names are case-insensitive; the returned name is lower-cased.
///
/// ## Returns
/// * `Ok(HeaderName)` - A valid name
/// * `Err(HeaderError)` - Empty or containing characters not allowed in a token
pub fn parse_header_name(name: &str) -> Result<HeaderName, HeaderError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(HeaderError::EmptyName);
    }
    HeaderName::from_bytes(trimmed.as_bytes())
        .map_err(|_| HeaderError::InvalidName(trimmed.to_string()))
}

/// Set `name: value`, replacing any existing value for that name
pub fn set_header(
    headers: &mut HeaderMap,
    name: &HeaderName,
    value: &str,
) -> Result<(), HeaderError> {
    let value = HeaderValue::from_str(value)
        .map_err(|_| HeaderError::InvalidValue(name.as_str().to_string()))?;
    headers.insert(name.clone(), value);
    Ok(())
}

/// Extract a header value as a string
///
/// Returns `None` if the header is missing or is not valid UTF-8.
pub fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_name_lowercases() {
        let name = parse_header_name("X-AUTH-TOKEN").unwrap();
        assert_eq!(name.as_str(), "x-auth-token");
    }

    #[test]
    fn test_parse_header_name_rejects_empty_and_invalid() {
        assert_eq!(parse_header_name("   "), Err(HeaderError::EmptyName));
        assert!(matches!(
            parse_header_name("bad header"),
            Err(HeaderError::InvalidName(_))
        ));
    }

    #[test]
    fn test_set_header_replaces_existing() {
        let mut headers = HeaderMap::new();
        let name = parse_header_name("x-auth-token").unwrap();

        set_header(&mut headers, &name, "first").unwrap();
        set_header(&mut headers, &name, "second").unwrap();

        assert_eq!(headers.get_all(&name).iter().count(), 1);
        assert_eq!(header_str(&headers, "x-auth-token"), Some("second"));
    }

    #[test]
    fn test_set_header_rejects_control_characters() {
        let mut headers = HeaderMap::new();
        let name = parse_header_name("x-auth-token").unwrap();

        let result = set_header(&mut headers, &name, "abc\ndef");
        assert_eq!(
            result,
            Err(HeaderError::InvalidValue("x-auth-token".to_string()))
        );
        assert!(headers.is_empty());
    }
}
