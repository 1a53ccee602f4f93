//! # Authenticator
//!
//! Validates an `Authorization: Bearer <key>` header against the key
//! registry and yields the table the key is bound to.

use axum::http::{header, HeaderMap};

use super::errors::{AuthError, AuthResult};
use super::registry::{KeyRegistry, TableName};

/// The table an authenticated request is allowed to touch.
///
/// Inserted as a request extension once authentication succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBinding(pub TableName);

/// Extract the bearer token from request headers.
///
/// The scheme is matched case-insensitively; surrounding whitespace is
/// ignored. An empty token counts as missing.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Authenticate a request and resolve its table binding in one step.
///
/// Keys are validated when the registry is built, so a token that passes
/// here always has a table.
pub fn authenticate(registry: &KeyRegistry, headers: &HeaderMap) -> AuthResult<TableBinding> {
    let token = extract_bearer_token(headers).ok_or(AuthError::MissingToken)?;

    registry
        .lookup(token)
        .cloned()
        .map(TableBinding)
        .ok_or(AuthError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ApiKeyEntry;
    use axum::http::HeaderValue;

    fn headers(auth: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(auth).unwrap());
        headers
    }

    fn registry() -> KeyRegistry {
        KeyRegistry::from_entries(vec![ApiKeyEntry::new("abc", "notes")]).unwrap()
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token(&headers("Bearer abc")), Some("abc"));
        assert_eq!(extract_bearer_token(&headers("bearer abc")), Some("abc"));
        assert_eq!(extract_bearer_token(&headers("Bearer   abc  ")), Some("abc"));
        assert_eq!(extract_bearer_token(&headers("Basic abc")), None);
        assert_eq!(extract_bearer_token(&headers("Bearer")), None);
        assert_eq!(extract_bearer_token(&headers("Bearer   ")), None);
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_authenticate_registered_key() {
        let binding = authenticate(&registry(), &headers("Bearer abc")).unwrap();
        assert_eq!(binding.0.as_str(), "notes");
    }

    #[test]
    fn test_authenticate_unknown_key() {
        assert_eq!(
            authenticate(&registry(), &headers("Bearer nope")),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn test_authenticate_missing_header() {
        assert_eq!(
            authenticate(&registry(), &HeaderMap::new()),
            Err(AuthError::MissingToken)
        );
    }
}
