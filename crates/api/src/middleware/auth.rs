//! Bearer token extraction.
//!
//! The token is read from the configured metadata header first, then from
//! a standard `Authorization: Bearer` header. Verification is left to the
//! gate so that every rejection is reported in the RPC envelope.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};

use crate::AppState;
use crate::rpc::CallMetadata;

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Reads the caller's token from request headers.
pub fn token_from_headers(headers: &HeaderMap, token_header: &str) -> Option<String> {
    let header_value = |name: &str| headers.get(name).and_then(|h| h.to_str().ok());

    header_value(token_header)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .or_else(|| header_value(AUTHORIZATION.as_str()).and_then(extract_bearer_token))
        .map(ToString::to_string)
}

impl FromRequestParts<AppState> for CallMetadata {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self {
            token: token_from_headers(&parts.headers, &state.token_header),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_token_header_wins() {
        let mut headers = HeaderMap::new();
        headers.insert("token", HeaderValue::from_static("abc"));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));

        assert_eq!(token_from_headers(&headers, "token").as_deref(), Some("abc"));
    }

    #[test]
    fn test_bearer_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer xyz"));

        assert_eq!(token_from_headers(&headers, "token").as_deref(), Some("xyz"));
    }

    #[test]
    fn test_no_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));

        assert_eq!(token_from_headers(&headers, "token"), None);
        assert_eq!(token_from_headers(&HeaderMap::new(), "token"), None);
    }
}
