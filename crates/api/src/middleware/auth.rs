//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring bearer-token authentication in route
//! handlers. Tokens are opaque random strings stored server-side, so a lookup
//! against the token table is both validation and user resolution.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::db::tokens::TokenRepository;
use crate::models::User;
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireAuth(pub User);

/// Error returned when authentication fails.
pub enum AuthRejection {
    /// No `Authorization: Bearer <token>` header on the request.
    MissingToken,
    /// The token is unknown (never issued, or revoked by logout).
    InvalidToken,
    /// Token lookup failed.
    Database,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "Authentication credentials were not provided",
            ),
            Self::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
            Self::Database => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthRejection::MissingToken)?;

        let user = TokenRepository::new(state.pool())
            .find_user(token)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Token lookup failed");
                AuthRejection::Database
            })?
            .ok_or(AuthRejection::InvalidToken)?;

        Ok(Self(user))
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/cart");
        if let Some(value) = value {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token_parses_header() {
        let parts = parts_with_auth(Some("Bearer abc123"));
        assert_eq!(bearer_token(&parts), Some("abc123"));
    }

    #[test]
    fn test_bearer_token_missing_header() {
        let parts = parts_with_auth(None);
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn test_bearer_token_rejects_other_schemes() {
        let parts = parts_with_auth(Some("Basic dXNlcjpwYXNz"));
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn test_bearer_token_rejects_empty_token() {
        let parts = parts_with_auth(Some("Bearer   "));
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn test_rejection_status_codes() {
        assert_eq!(
            AuthRejection::MissingToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthRejection::InvalidToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthRejection::Database.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
