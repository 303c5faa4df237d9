// handlers/protected - bearer token required
//
// Owned records go through `owned` before any read or write: missing is 404,
// someone else's is 403 unless the caller is an admin.

pub mod auth;
pub mod dashboard;
pub mod favorites;
pub mod messages;
pub mod orders;
pub mod projects;

use crate::error::ApiError;
use crate::middleware::AuthUser;

pub(crate) fn owned<T>(
    user: &AuthUser,
    record: Option<T>,
    owner_of: impl Fn(&T) -> i64,
    entity: &str,
) -> Result<T, ApiError> {
    let record = record.ok_or_else(|| ApiError::not_found(format!("{} not found", entity)))?;
    let owner = owner_of(&record);
    if !user.can_access(owner) {
        tracing::warn!("User {} denied access to {} owned by {}", user.id, entity, owner);
        return Err(ApiError::forbidden("Access denied"));
    }
    Ok(record)
}
