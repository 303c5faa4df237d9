use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::Role;

/// Identity resolved by `require_auth`, read back by handlers as an extractor.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Owner-or-admin rule for owned records.
    pub fn can_access(&self, owner_id: i64) -> bool {
        self.id == owner_id || self.is_admin()
    }
}

/// Authenticate the bearer token and re-resolve the identity from the store.
///
/// The role attached to the request is the stored one, so role changes and
/// bans apply to tokens that were issued before them.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(request.headers())?.to_string();

    let verified = state.tokens.verify(&token).map_err(|e| {
        tracing::debug!("Rejected bearer token: {}", e);
        ApiError::from(e)
    })?;

    let user = state
        .store
        .users
        .find_by_id(verified.user_id)
        .await?
        .ok_or_else(|| {
            tracing::debug!("Token subject {} no longer exists", verified.user_id);
            ApiError::unauthorized_with_code("User no longer exists", "USER_NOT_FOUND")
        })?;

    if user.is_banned() {
        tracing::warn!("Banned user {} attempted {}", user.id, request.uri().path());
        return Err(ApiError::forbidden_with_code(
            "Account has been banned",
            "ACCOUNT_BANNED",
        ));
    }

    request.extensions_mut().insert(AuthUser {
        id: user.id,
        email: user.email,
        role: user.role,
    });

    Ok(next.run(request).await)
}

/// Must be layered inside `require_auth`.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized_with_code("Access token required", "MISSING_TOKEN"))?;

    if !user.is_admin() {
        tracing::warn!(
            "User {} ({}) denied admin route {}",
            user.id,
            user.role,
            request.uri().path()
        );
        return Err(ApiError::forbidden("Admin access required"));
    }

    Ok(next.run(request).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized_with_code("Access token required", "MISSING_TOKEN"))?;

    let value = header
        .to_str()
        .map_err(|_| ApiError::unauthorized_with_code("Invalid Authorization header", "INVALID_TOKEN"))?;

    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .ok_or_else(|| {
            ApiError::unauthorized_with_code(
                "Authorization header must use Bearer token format",
                "INVALID_TOKEN",
            )
        })?
        .trim();

    if token.is_empty() {
        return Err(ApiError::unauthorized_with_code("Access token required", "MISSING_TOKEN"));
    }
    Ok(token)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AuthUser>().cloned().ok_or_else(|| {
            tracing::error!("AuthUser extractor used on a route without require_auth");
            ApiError::unauthorized_with_code("Access token required", "MISSING_TOKEN")
        })
    }
}
