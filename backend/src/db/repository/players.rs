//! Repository trait for registered players.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{LocationRecord, PlayerId, PlayerRecord};

/// Persistence operations on players.
///
/// Emails are unique: [`PlayerRepository::create_player`] must report a
/// second registration of the same email as `RepositoryError::Conflict`.
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    /// Persist a freshly registered player.
    async fn create_player(&self, player: &PlayerRecord) -> RepositoryResult<()>;

    /// Change the display name.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the player does not exist
    async fn update_player_name(&self, id: PlayerId, name: &str) -> RepositoryResult<()>;

    /// Associate a copy of `location` with the player.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the player does not exist
    async fn update_player_location(
        &self,
        id: PlayerId,
        location: &LocationRecord,
    ) -> RepositoryResult<()>;

    /// Look up a player by email.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If no player registered this email
    async fn get_player_by_email(&self, email: &str) -> RepositoryResult<PlayerRecord>;

    /// Look up a player by id.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the player does not exist
    async fn get_player_by_id(&self, id: PlayerId) -> RepositoryResult<PlayerRecord>;
}
