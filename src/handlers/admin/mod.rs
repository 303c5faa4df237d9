// handlers/admin - bearer token with the admin role
//
// Every route here sits behind require_auth and require_admin, so handlers
// only take `AuthUser` when they need to know which admin acted.

pub mod blog;
pub mod contacts;
pub mod dashboard;
pub mod messages;
pub mod orders;
pub mod portfolio;
pub mod projects;
pub mod settings;
pub mod users;
