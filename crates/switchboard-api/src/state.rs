use std::sync::Arc;

use switchboard_auth::{PasswordHasher, TokenService};
use switchboard_persist::PersistClient;

use crate::config::Config;
use crate::notify::Notifier;

/// Shared application state passed to all handlers
///
/// All resources are wrapped in Arc for efficient sharing across async tasks.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub persist: Arc<PersistClient>,
    pub tokens: Arc<TokenService>,
    pub passwords: PasswordHasher,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(config: Config, persist: PersistClient, notifier: Arc<dyn Notifier>) -> Self {
        let tokens = TokenService::new(&config.jwt_secret, config.token_ttl());
        let passwords = PasswordHasher::new(config.auth.bcrypt_cost);

        Self {
            config: Arc::new(config),
            persist: Arc::new(persist),
            tokens: Arc::new(tokens),
            passwords,
            notifier,
        }
    }
}
