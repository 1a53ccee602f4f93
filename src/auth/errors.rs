//! # Auth Errors
//!
//! Error types for bearer-token authentication.

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication errors.
///
/// Messages are deliberately generic: a rejected request learns nothing
/// about which keys or tables exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No `Authorization: Bearer ...` header
    #[error("Unauthorized")]
    MissingToken,

    /// Token not present in the key registry
    #[error("Unauthorized")]
    InvalidToken,
}

impl AuthError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::MissingToken | AuthError::InvalidToken => 401,
        }
    }

    /// Short reason for logs
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_bearer_token",
            AuthError::InvalidToken => "unknown_api_key",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AuthError::MissingToken.status_code(), 401);
        assert_eq!(AuthError::InvalidToken.status_code(), 401);
    }

    #[test]
    fn test_error_messages_do_not_leak_info() {
        assert_eq!(
            AuthError::MissingToken.to_string(),
            AuthError::InvalidToken.to_string()
        );
        assert!(!AuthError::InvalidToken.to_string().contains("table"));
    }
}
