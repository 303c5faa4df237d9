use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{ApiResponse, ApiResult, AppJson};
use crate::database::models::{NewUser, User};
use crate::error::ApiError;
use crate::handlers::valid_email;
use crate::state::AppState;
use crate::types::Role;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Same message for an unknown email and a wrong password.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Identity plus a freshly issued token.
#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub user: User,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthPayload {
    pub(crate) fn issue(state: &AppState, user: User) -> Result<Self, ApiError> {
        let issued = state.tokens.issue(user.id, user.role)?;
        Ok(Self {
            user,
            token: issued.token,
            expires_at: issued.expires_at,
        })
    }
}

/// POST /api/auth/register - create a client account and sign it in
///
/// The role is always `client`; a `role` in the body is ignored.
pub async fn register(
    State(state): State<AppState>,
    AppJson(body): AppJson<RegisterRequest>,
) -> ApiResult<AuthPayload> {
    let email = valid_email(&body.email)?;
    if body.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    let name = body
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    if state.store.users.find_by_email(&email).await?.is_some() {
        return Err(ApiError::conflict("Email already registered"));
    }

    let password_hash = state.passwords.hash(&body.password).await?;
    let user = state
        .store
        .users
        .create(NewUser {
            email,
            password_hash,
            name,
            role: Role::Client,
        })
        .await?;

    tracing::info!("Registered user {}", user.id);
    Ok(ApiResponse::created(AuthPayload::issue(&state, user)?)
        .with_message("User registered successfully"))
}

/// POST /api/auth/login - exchange credentials for a token
pub async fn login(
    State(state): State<AppState>,
    AppJson(body): AppJson<LoginRequest>,
) -> ApiResult<AuthPayload> {
    let email = body.email.trim();
    if email.is_empty() || body.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let user = match state.store.users.find_by_email(email).await? {
        Some(user) => user,
        None => {
            state.passwords.verify_dummy(&body.password).await?;
            tracing::debug!("Login failed: unknown email");
            return Err(ApiError::unauthorized_with_code(INVALID_CREDENTIALS, "INVALID_CREDENTIALS"));
        }
    };

    if !state.passwords.verify(&body.password, &user.password_hash).await? {
        tracing::debug!("Login failed: wrong password for user {}", user.id);
        return Err(ApiError::unauthorized_with_code(INVALID_CREDENTIALS, "INVALID_CREDENTIALS"));
    }

    if user.is_banned() {
        tracing::warn!("Banned user {} attempted to log in", user.id);
        return Err(ApiError::forbidden_with_code(
            "Account has been banned",
            "ACCOUNT_BANNED",
        ));
    }

    Ok(ApiResponse::success(AuthPayload::issue(&state, user)?).with_message("Login successful"))
}
