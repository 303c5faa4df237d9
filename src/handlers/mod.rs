// handlers/mod.rs - route handlers grouped by access tier
//
// public    - no token (auth entry points, portfolio, blog, contact, health)
// protected - bearer token, owner-scoped resources
// admin     - bearer token with the admin role, under /admin

pub mod admin;
pub mod health;
pub mod protected;
pub mod public;

use serde::Deserialize;

use crate::error::ApiError;

/// `?limit=&offset=` for paged listings.
#[derive(Debug, Default, Deserialize)]
pub struct Page {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Page {
    pub const MAX_LIMIT: i64 = 100;

    pub fn limit_or(&self, default: i64) -> i64 {
        self.limit.unwrap_or(default).clamp(1, Self::MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// Trimmed value of a required text field, or 400 naming the field.
pub(crate) fn required(field: &str, value: &str) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::bad_request(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

/// Trimmed email, or 400. Case is kept: addresses are stored and matched as given.
pub(crate) fn valid_email(value: &str) -> Result<String, ApiError> {
    let email = value.trim();
    if !is_email(email) {
        return Err(ApiError::bad_request("A valid email address is required"));
    }
    Ok(email.to_string())
}

fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .map_or(false, |(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
        }
        None => false,
    }
}
