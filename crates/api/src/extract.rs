//! Request extractors.
//!
//! `Json` wraps axum's extractor so that body rejections follow the API's
//! error taxonomy: a missing, malformed, or unknown-field body is a
//! validation failure (400 with a `{"error": ...}` body), not axum's stock
//! 415/422 responses.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, OptionalFromRequest, Request};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// JSON request body / response wrapper.
///
/// Extraction works like `axum::Json` but rejects with
/// [`AppError::Validation`]. As a response it serializes identically.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = <axum::Json<T> as FromRequest<S>>::from_request(req, state)
            .await
            .map_err(rejection_to_validation)?;
        Ok(Self(value))
    }
}

impl<S, T> OptionalFromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Option<Self>, Self::Rejection> {
        match <axum::Json<T> as OptionalFromRequest<S>>::from_request(req, state).await {
            Ok(Some(axum::Json(value))) => Ok(Some(Self(value))),
            Ok(None) => Ok(None),
            Err(rejection) => Err(rejection_to_validation(rejection)),
        }
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

fn rejection_to_validation(rejection: JsonRejection) -> AppError {
    AppError::Validation(rejection.body_text())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{StatusCode, header::CONTENT_TYPE};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Credentials {
        username: String,
        password: String,
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/users/login")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body_parses() {
        let request = json_request(r#"{"username": "priya", "password": "hunter22"}"#);
        let Json(credentials) =
            <Json<Credentials> as FromRequest<()>>::from_request(request, &())
                .await
                .unwrap();
        assert_eq!(credentials.username, "priya");
        assert_eq!(credentials.password, "hunter22");
    }

    #[tokio::test]
    async fn test_missing_field_rejects_with_400() {
        let request = json_request(r#"{"username": "priya"}"#);
        let err = <Json<Credentials> as FromRequest<()>>::from_request(request, &())
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_field_rejects_with_400() {
        let request =
            json_request(r#"{"username": "priya", "password": "hunter22", "role": "seller"}"#);
        let err = <Json<Credentials> as FromRequest<()>>::from_request(request, &())
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_json_rejects_with_400() {
        let request = json_request("{not json");
        let err = <Json<Credentials> as FromRequest<()>>::from_request(request, &())
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_content_type_rejects_with_400() {
        let request = Request::builder()
            .method("POST")
            .uri("/users/login")
            .body(Body::from(r#"{"username": "priya", "password": "hunter22"}"#))
            .unwrap();
        let err = <Json<Credentials> as FromRequest<()>>::from_request(request, &())
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
