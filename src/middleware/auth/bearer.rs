/*
 * Responsibility
 * - `Authorization: Bearer <token>` ヘッダから credential を取り出す
 * - scheme の framing だけを検証し、token の中身は検証しない (provider の責務)
 */
use axum::http::{HeaderMap, HeaderValue, header};
use thiserror::Error;

use crate::services::identity::Credential;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("authorization header is missing")]
    MissingHeader,
    #[error("authorization header is not bearer-framed")]
    MalformedScheme,
}

/// Extract the bearer credential from a raw `Authorization` header value.
///
/// The prefix is case-sensitive with exactly one space; any other scheme is
/// rejected rather than tried as a fallback.
pub fn extract(value: Option<&HeaderValue>) -> Result<Credential, ExtractionError> {
    let value = match value {
        Some(v) if !v.is_empty() => v,
        _ => return Err(ExtractionError::MissingHeader),
    };

    // Non visible-ASCII bytes cannot carry a bearer scheme.
    let raw = value
        .to_str()
        .map_err(|_| ExtractionError::MalformedScheme)?;

    raw.strip_prefix(BEARER_PREFIX)
        .map(Credential::new)
        .ok_or(ExtractionError::MalformedScheme)
}

pub fn extract_from_headers(headers: &HeaderMap) -> Result<Credential, ExtractionError> {
    extract(headers.get(header::AUTHORIZATION))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(s: &'static str) -> HeaderValue {
        HeaderValue::from_static(s)
    }

    #[test]
    fn absent_header_is_missing() {
        assert_eq!(extract(None), Err(ExtractionError::MissingHeader));
    }

    #[test]
    fn empty_header_is_missing() {
        assert_eq!(
            extract(Some(&value(""))),
            Err(ExtractionError::MissingHeader)
        );
    }

    #[test]
    fn other_framings_are_malformed() {
        for raw in ["bearer token", "Bearer", "Basic dXNlcjpwYXNz", "Bearertoken", "BEARER x"] {
            assert_eq!(
                extract(Some(&value(raw))),
                Err(ExtractionError::MalformedScheme),
                "{raw}"
            );
        }
    }

    #[test]
    fn non_ascii_header_is_malformed() {
        let v = HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap();
        assert_eq!(extract(Some(&v)), Err(ExtractionError::MalformedScheme));
    }

    #[test]
    fn token_is_the_remainder_after_the_prefix() {
        let credential = extract(Some(&value("Bearer abc123"))).unwrap();
        assert_eq!(credential.as_str(), "abc123");
    }

    #[test]
    fn token_structure_is_not_validated() {
        assert_eq!(extract(Some(&value("Bearer "))).unwrap().as_str(), "");
        assert_eq!(
            extract(Some(&value("Bearer  two spaces"))).unwrap().as_str(),
            " two spaces"
        );
    }

    #[test]
    fn reads_the_authorization_header_from_a_map() {
        let mut headers = HeaderMap::new();
        assert_eq!(
            extract_from_headers(&headers),
            Err(ExtractionError::MissingHeader)
        );

        headers.insert(header::AUTHORIZATION, value("Bearer t"));
        assert_eq!(extract_from_headers(&headers).unwrap().as_str(), "t");
    }
}
