//! Account routes: register, login, logout, profile.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use bazaar_core::Email;

use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::extract::Json;
use crate::middleware::RequireAuth;
use crate::models::User;
use crate::services::AuthService;
use crate::state::AppState;

/// Router for account routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/profile", get(profile).put(update_profile))
}

/// Registration request body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub password: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Token plus the account it belongs to; returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Profile update request body. PUT replaces the whole mutable profile, so
/// an absent or empty email clears it.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub email: Option<String>,
}

/// POST /users/register - create a buyer account and issue a token.
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let auth = AuthService::new(state.pool());
    let (user, token) = auth
        .register(&request.username, request.email.as_deref(), &request.password)
        .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

/// POST /users/login - verify credentials and issue (or reuse) the token.
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let auth = AuthService::new(state.pool());
    let (user, token) = auth.login(&request.username, &request.password).await?;

    Ok(Json(AuthResponse { token, user }))
}

/// POST /users/logout - revoke the caller's token.
async fn logout(State(state): State<AppState>, RequireAuth(user): RequireAuth) -> Result<Json<Value>> {
    AuthService::new(state.pool()).logout(user.id).await?;

    Ok(Json(json!({ "detail": "Logged out" })))
}

/// GET /users/profile - the caller's account.
async fn profile(RequireAuth(user): RequireAuth) -> Json<User> {
    Json(user)
}

/// PUT /users/profile - replace the caller's contact email.
async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<User>> {
    let email = match request.email.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(Email::parse(raw).map_err(|e| AppError::Validation(e.to_string()))?),
    };

    let updated = UserRepository::new(state.pool())
        .update_email(user.id, email.as_ref())
        .await?;

    Ok(Json(updated))
}
