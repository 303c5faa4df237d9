use serde_json::json;

use crate::auth::PasswordHasher;
use crate::cli::utils::{connect, output_error, output_success};
use crate::cli::OutputFormat;
use crate::database::models::{NewUser, User};
use crate::database::Store;
use crate::handlers::public::auth::MIN_PASSWORD_LEN;
use crate::types::Role;

#[derive(Debug, Clone)]
pub struct AdminRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub promote: bool,
}

#[derive(Debug)]
pub enum AdminOutcome {
    Created(User),
    Promoted(User),
    AlreadyExists(User),
}

pub async fn handle(request: AdminRequest, output_format: OutputFormat) -> anyhow::Result<()> {
    let (config, database) = connect().await?;
    let store = Store::postgres(database.pool().clone());
    let hasher = PasswordHasher::new(&config.security.password)?;

    let outcome = create_admin(&store, &hasher, request).await;
    database.close().await;

    match outcome? {
        AdminOutcome::Created(user) => output_success(
            &output_format,
            &format!("Admin user created: {}", user.email),
            Some(json!({ "id": user.id, "email": user.email, "role": user.role })),
        ),
        AdminOutcome::Promoted(user) => output_success(
            &output_format,
            &format!("Existing user {} promoted to admin", user.email),
            Some(json!({ "id": user.id, "email": user.email, "role": user.role })),
        ),
        AdminOutcome::AlreadyExists(user) if user.role == Role::Admin => output_success(
            &output_format,
            &format!("{} is already an admin", user.email),
            None,
        ),
        AdminOutcome::AlreadyExists(user) => {
            output_error(
                &output_format,
                &format!(
                    "{} is already registered as {}; pass --promote to make it an admin",
                    user.email, user.role
                ),
            )?;
            std::process::exit(1);
        }
    }
}

/// Create the admin account, or promote an existing one when asked to.
pub async fn create_admin(
    store: &Store,
    hasher: &PasswordHasher,
    request: AdminRequest,
) -> anyhow::Result<AdminOutcome> {
    let email = request.email.trim().to_string();
    if !email.contains('@') {
        anyhow::bail!("'{}' is not an email address", request.email);
    }

    if let Some(existing) = store.users.find_by_email(&email).await? {
        if existing.role == Role::Admin || !request.promote {
            return Ok(AdminOutcome::AlreadyExists(existing));
        }
        let user = store.users.update_role(existing.id, Role::Admin).await?;
        tracing::info!("Promoted user {} to admin", user.id);
        return Ok(AdminOutcome::Promoted(user));
    }

    if request.password.chars().count() < MIN_PASSWORD_LEN {
        anyhow::bail!("password must be at least {} characters", MIN_PASSWORD_LEN);
    }

    let password_hash = hasher.hash(&request.password).await?;
    let user = store
        .users
        .create(NewUser {
            email,
            password_hash,
            name: request.name,
            role: Role::Admin,
        })
        .await?;
    tracing::info!("Created admin user {}", user.id);
    Ok(AdminOutcome::Created(user))
}
