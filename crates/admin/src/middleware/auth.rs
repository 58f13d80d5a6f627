//! Bearer-token guard for the `/api` routes.
//!
//! The back-office SPA sends `Authorization: Bearer <ADMIN_API_TOKEN>`. The
//! configured token is kept only as a SHA-256 digest; presented tokens are
//! hashed the same way and compared in constant time.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

use crate::error::AppError;
use crate::state::AppState;

/// Digest of the configured API token.
#[derive(Clone)]
pub struct ApiToken {
    digest: String,
}

impl ApiToken {
    #[must_use]
    pub fn new(token: &SecretString) -> Self {
        Self {
            digest: digest(token.expose_secret()),
        }
    }

    /// Whether `presented` is the configured token.
    #[must_use]
    pub fn verify(&self, presented: &str) -> bool {
        constant_time_compare(&self.digest, &digest(presented))
    }
}

impl std::fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiToken").finish_non_exhaustive()
    }
}

fn digest(value: &str) -> String {
    hex::encode(Sha256::digest(value.as_bytes()))
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}

/// Token from an `Authorization: Bearer ...` header value.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Reject requests without the configured bearer token.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` if the header is missing, malformed or
/// carries the wrong token.
pub async fn require_api_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;

    if !state.api_token().verify(token) {
        tracing::warn!(path = %request.uri().path(), "Rejected request with invalid API token");
        return Err(AppError::Unauthorized("invalid token".to_string()));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify() {
        let token = ApiToken::new(&SecretString::from("k3Y!x9Qp2@Lm7#Rt4$Vw8%Zb1^Nc6&Hd"));
        assert!(token.verify("k3Y!x9Qp2@Lm7#Rt4$Vw8%Zb1^Nc6&Hd"));
        assert!(!token.verify("k3Y!x9Qp2@Lm7#Rt4$Vw8%Zb1^Nc6&He"));
        assert!(!token.verify(""));
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer  abc "), Some("abc"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("abc"), None);
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "abcd"));
    }

    #[test]
    fn test_debug_hides_digest() {
        let token = ApiToken::new(&SecretString::from("anything"));
        assert_eq!(format!("{token:?}"), "ApiToken { .. }");
    }
}
