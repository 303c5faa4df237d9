//! Credential primitives: password hashing and signed session tokens.
//!
//! Neither type touches the store or the request; the access gate in
//! `middleware::auth` combines them with the user repository.

pub mod password;
pub mod token;

pub use password::{PasswordError, PasswordHasher};
pub use token::{Claims, IssuedToken, TokenError, TokenIssuer, VerifiedToken};
