use std::sync::Arc;

use crate::auth::{PasswordHasher, TokenIssuer};
use crate::config::AppConfig;
use crate::database::Store;

/// Everything a handler needs, built once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Store,
    pub tokens: TokenIssuer,
    pub passwords: PasswordHasher,
}

impl AppState {
    pub fn new(config: AppConfig, store: Store) -> Result<Self, crate::auth::PasswordError> {
        let tokens = TokenIssuer::from_config(&config.security);
        let passwords = PasswordHasher::new(&config.security.password)?;
        Ok(Self {
            config: Arc::new(config),
            store,
            tokens,
            passwords,
        })
    }
}
