//! Player registration, login and profile updates.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::{with_deadline, ServiceError, ServiceResult};
use crate::auth::{password, JwtKeys};
use crate::db::repository::FullRepository;
use crate::models::{
    Location, LocationRecord, LoginPayload, PlayerId, PlayerRecord, RegisterPayload,
    UpdateNamePayload,
};

#[derive(Clone)]
pub struct PlayerService {
    repo: Arc<dyn FullRepository>,
    keys: JwtKeys,
    db_timeout: Duration,
}

impl PlayerService {
    pub fn new(repo: Arc<dyn FullRepository>, keys: JwtKeys, db_timeout: Duration) -> Self {
        Self {
            repo,
            keys,
            db_timeout,
        }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    /// Create a player with a fresh id and no location.
    ///
    /// Name, email and password must all be non-empty. A second registration
    /// with the same email is a [`ServiceError::Conflict`].
    pub async fn register(&self, payload: &RegisterPayload) -> ServiceResult<PlayerId> {
        if payload.name.is_empty() || payload.email.is_empty() || payload.password.is_empty() {
            return Err(ServiceError::Validation(
                "name, email and password are required".to_string(),
            ));
        }

        let password_hash = hash_password(payload.password.clone()).await?;
        let player = PlayerRecord {
            id: PlayerId::generate(),
            name: payload.name.clone(),
            email: payload.email.clone(),
            password_hash,
            location: None,
        };

        with_deadline(
            self.db_timeout,
            "create_player",
            self.repo.create_player(&player),
        )
        .await
        .map_err(|e| {
            if e.is_conflict() {
                warn!(email = %player.email, "email already registered");
            } else {
                error!(email = %player.email, error = %e, "failed to create player");
            }
            e
        })?;

        info!(player_id = %player.id, "player registered");
        Ok(player.id)
    }

    /// Check credentials and issue a session token.
    ///
    /// Every lookup or password failure is reported as
    /// [`ServiceError::InvalidCredentials`].
    pub async fn login(&self, payload: &LoginPayload) -> ServiceResult<String> {
        if payload.email.is_empty() || payload.password.is_empty() {
            return Err(ServiceError::Validation(
                "email and password are required".to_string(),
            ));
        }

        let player = match with_deadline(
            self.db_timeout,
            "get_player_by_email",
            self.repo.get_player_by_email(&payload.email),
        )
        .await
        {
            Ok(player) => player,
            Err(e) if e.is_not_found() => {
                debug!(email = %payload.email, "login for unknown email");
                return Err(ServiceError::InvalidCredentials);
            }
            Err(e) => {
                error!(email = %payload.email, error = %e, "player lookup failed during login");
                return Err(ServiceError::InvalidCredentials);
            }
        };

        if !verify_password(payload.password.clone(), player.password_hash.clone()).await {
            debug!(player_id = %player.id, "login with wrong password");
            return Err(ServiceError::InvalidCredentials);
        }

        let token = self.keys.issue(player.id).map_err(|e| {
            error!(player_id = %player.id, error = %e, "failed to sign token");
            ServiceError::Token(e)
        })?;
        debug!(player_id = %player.id, "player logged in");
        Ok(token)
    }

    pub async fn update_name(
        &self,
        id: PlayerId,
        payload: &UpdateNamePayload,
    ) -> ServiceResult<()> {
        if payload.name.is_empty() {
            return Err(ServiceError::Validation("name is required".to_string()));
        }
        with_deadline(
            self.db_timeout,
            "update_player_name",
            self.repo.update_player_name(id, &payload.name),
        )
        .await
        .map_err(|e| {
            error!(player_id = %id, error = %e, "failed to update player name");
            e
        })?;
        Ok(())
    }

    /// Associate a copy of `location` with the player.
    pub async fn update_location(&self, id: PlayerId, location: &Location) -> ServiceResult<()> {
        let record = LocationRecord::from(location);
        with_deadline(
            self.db_timeout,
            "update_player_location",
            self.repo.update_player_location(id, &record),
        )
        .await
        .map_err(|e| {
            error!(
                player_id = %id,
                location_id = %record.id,
                error = %e,
                "failed to update player location"
            );
            e
        })?;
        Ok(())
    }

    /// The player's current location, or an empty location at the zero point.
    pub async fn get_location(&self, id: PlayerId) -> ServiceResult<Location> {
        let player = with_deadline(
            self.db_timeout,
            "get_player_by_id",
            self.repo.get_player_by_id(id),
        )
        .await
        .map_err(|e| {
            error!(player_id = %id, error = %e, "failed to get player");
            e
        })?;
        Ok(player.location.map(Location::from).unwrap_or_default())
    }
}

async fn hash_password(plaintext: String) -> ServiceResult<String> {
    tokio::task::spawn_blocking(move || password::hash(&plaintext))
        .await
        .map_err(|e| ServiceError::PasswordHash(e.to_string()))?
        .map_err(|e| {
            error!(error = %e, "password hashing failed");
            ServiceError::PasswordHash(e.to_string())
        })
}

async fn verify_password(plaintext: String, hashword: String) -> bool {
    tokio::task::spawn_blocking(move || password::verify(&plaintext, &hashword))
        .await
        .unwrap_or(false)
}
