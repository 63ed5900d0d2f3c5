//! Application state for the HTTP server.

use std::sync::Arc;

use crate::auth::JwtKeys;
use crate::config::AppConfig;
use crate::db::repository::FullRepository;
use crate::services::{LocationService, PlayerService};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub locations: LocationService,
    pub players: PlayerService,
    /// Keys the auth middleware verifies bearer tokens with.
    pub keys: JwtKeys,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wire both services onto one repository.
    pub fn new(repository: Arc<dyn FullRepository>, config: AppConfig) -> Self {
        let keys = JwtKeys::new(config.token_secret.as_bytes(), config.token_ttl);
        Self {
            locations: LocationService::new(repository.clone(), config.db_timeout),
            players: PlayerService::new(repository, keys.clone(), config.db_timeout),
            keys,
            config: Arc::new(config),
        }
    }
}
