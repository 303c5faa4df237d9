// handlers/public - no token required
//
// Token acquisition and everything the public site reads. Anything
// unpublished stays invisible here; admin writes live under handlers/admin.

pub mod auth;
pub mod blog;
pub mod contact;
pub mod portfolio;
