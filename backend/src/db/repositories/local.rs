//! In-memory local repository implementation.
//!
//! Stores locations and players in `HashMap`s behind a single lock. Used by
//! the `dev` environment and by every test that does not need Postgres.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::repository::{
    ErrorContext, LocationRepository, PlayerRepository, RepositoryError, RepositoryResult,
};
use crate::models::{LocationRecord, PlayerId, PlayerRecord};

/// In-memory local repository.
///
/// # Example
/// ```
/// use geogame::db::repositories::LocalRepository;
///
/// let repo = LocalRepository::new();
/// assert_eq!(repo.location_count(), 0);
/// assert_eq!(repo.player_count(), 0);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    locations: HashMap<String, LocationRecord>,
    players: HashMap<PlayerId, PlayerRecord>,
    // email -> player id, the uniqueness index
    emails: HashMap<String, PlayerId>,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            locations: HashMap::new(),
            players: HashMap::new(),
            emails: HashMap::new(),
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    pub fn location_count(&self) -> usize {
        self.data.read().locations.len()
    }

    pub fn player_count(&self) -> usize {
        self.data.read().players.len()
    }

    pub fn has_location(&self, id: &str) -> bool {
        self.data.read().locations.contains_key(id)
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self, operation: &str) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection_with_context(
                "Database is not healthy",
                ErrorContext::new(operation),
            ));
        }
        Ok(())
    }

    fn player_not_found(operation: &str, id: impl ToString) -> RepositoryError {
        RepositoryError::not_found_with_context(
            "Player not found",
            ErrorContext::new(operation)
                .with_entity("player")
                .with_entity_id(id),
        )
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LocationRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn create_location(&self, location: &LocationRecord) -> RepositoryResult<()> {
        self.check_health("create_location")?;
        self.data
            .write()
            .locations
            .insert(location.id.clone(), location.clone());
        Ok(())
    }

    async fn update_location(&self, id: &str, location: &LocationRecord) -> RepositoryResult<()> {
        self.check_health("update_location")?;
        let record = LocationRecord {
            id: id.to_string(),
            ..location.clone()
        };
        self.data.write().locations.insert(id.to_string(), record);
        Ok(())
    }

    async fn get_location(&self, id: &str) -> RepositoryResult<LocationRecord> {
        self.check_health("get_location")?;
        self.data.read().locations.get(id).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                "Location not found",
                ErrorContext::new("get_location")
                    .with_entity("location")
                    .with_entity_id(id),
            )
        })
    }

    async fn delete_location(&self, id: &str) -> RepositoryResult<()> {
        self.check_health("delete_location")?;
        self.data.write().locations.remove(id);
        Ok(())
    }
}

#[async_trait]
impl PlayerRepository for LocalRepository {
    async fn create_player(&self, player: &PlayerRecord) -> RepositoryResult<()> {
        self.check_health("create_player")?;
        let mut data = self.data.write();
        if data.emails.contains_key(&player.email) {
            return Err(RepositoryError::conflict_with_context(
                "email already registered",
                ErrorContext::new("create_player")
                    .with_entity("player")
                    .with_details("unique=email"),
            ));
        }
        data.emails.insert(player.email.clone(), player.id);
        data.players.insert(player.id, player.clone());
        Ok(())
    }

    async fn update_player_name(&self, id: PlayerId, name: &str) -> RepositoryResult<()> {
        self.check_health("update_player_name")?;
        let mut data = self.data.write();
        let player = data
            .players
            .get_mut(&id)
            .ok_or_else(|| Self::player_not_found("update_player_name", id))?;
        player.name = name.to_string();
        Ok(())
    }

    async fn update_player_location(
        &self,
        id: PlayerId,
        location: &LocationRecord,
    ) -> RepositoryResult<()> {
        self.check_health("update_player_location")?;
        let mut data = self.data.write();
        let player = data
            .players
            .get_mut(&id)
            .ok_or_else(|| Self::player_not_found("update_player_location", id))?;
        player.location = Some(location.clone());
        Ok(())
    }

    async fn get_player_by_email(&self, email: &str) -> RepositoryResult<PlayerRecord> {
        self.check_health("get_player_by_email")?;
        let data = self.data.read();
        data.emails
            .get(email)
            .and_then(|id| data.players.get(id))
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    "Player not found",
                    ErrorContext::new("get_player_by_email").with_entity("player"),
                )
            })
    }

    async fn get_player_by_id(&self, id: PlayerId) -> RepositoryResult<PlayerRecord> {
        self.check_health("get_player_by_id")?;
        self.data
            .read()
            .players
            .get(&id)
            .cloned()
            .ok_or_else(|| Self::player_not_found("get_player_by_id", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Point;
    use crate::models::LocationType;

    fn station(id: &str) -> LocationRecord {
        LocationRecord {
            id: id.to_string(),
            point: Some(Point::new(2.3522, 48.8566)),
            name: "Gare du Nord".to_string(),
            kind: LocationType::Station,
        }
    }

    fn player(email: &str) -> PlayerRecord {
        PlayerRecord {
            id: PlayerId::generate(),
            name: "dummy".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            location: None,
        }
    }

    #[tokio::test]
    async fn test_location_crud() {
        let repo = LocalRepository::new();
        repo.create_location(&station("1")).await.unwrap();
        assert_eq!(repo.get_location("1").await.unwrap(), station("1"));

        let mut renamed = station("1");
        renamed.name = "Paris Nord".to_string();
        renamed.point = None;
        repo.update_location("1", &renamed).await.unwrap();
        let fetched = repo.get_location("1").await.unwrap();
        assert_eq!(fetched.name, "Paris Nord");
        assert_eq!(fetched.point, None);

        repo.delete_location("1").await.unwrap();
        assert!(repo.get_location("1").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_update_uses_path_id() {
        let repo = LocalRepository::new();
        repo.update_location("7", &station("ignored")).await.unwrap();
        assert_eq!(repo.get_location("7").await.unwrap().id, "7");
        assert!(!repo.has_location("ignored"));
    }

    #[tokio::test]
    async fn test_delete_missing_location_is_ok() {
        let repo = LocalRepository::new();
        assert!(repo.delete_location("nope").await.is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let repo = LocalRepository::new();
        repo.create_player(&player("a@mail.com")).await.unwrap();
        let err = repo.create_player(&player("a@mail.com")).await.unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(repo.player_count(), 1);
    }

    #[tokio::test]
    async fn test_player_updates() {
        let repo = LocalRepository::new();
        let p = player("b@mail.com");
        repo.create_player(&p).await.unwrap();

        repo.update_player_name(p.id, "renamed").await.unwrap();
        repo.update_player_location(p.id, &station("9")).await.unwrap();

        let fetched = repo.get_player_by_email("b@mail.com").await.unwrap();
        assert_eq!(fetched.name, "renamed");
        assert_eq!(fetched.location, Some(station("9")));
        assert_eq!(repo.get_player_by_id(p.id).await.unwrap(), fetched);
    }

    #[tokio::test]
    async fn test_unknown_player_is_not_found() {
        let repo = LocalRepository::new();
        let id = PlayerId::generate();
        assert!(repo.get_player_by_id(id).await.unwrap_err().is_not_found());
        assert!(repo
            .get_player_by_email("x@mail.com")
            .await
            .unwrap_err()
            .is_not_found());
        assert!(repo
            .update_player_name(id, "n")
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_unhealthy_repository_fails_calls() {
        let repo = LocalRepository::new();
        repo.set_healthy(false);
        assert!(!repo.health_check().await.unwrap());
        let err = repo.create_location(&station("1")).await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_clear_keeps_health_flag() {
        let repo = LocalRepository::new();
        repo.create_location(&station("1")).await.unwrap();
        repo.set_healthy(false);
        repo.clear();
        assert_eq!(repo.location_count(), 0);
        assert!(!repo.health_check().await.unwrap());
    }
}
