//! Repository trait for admin-managed locations.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::LocationRecord;

/// CRUD operations on stored locations, keyed by location id.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// Check if the backing store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if the store is healthy
    /// - `Ok(false)` if it is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if the check itself failed
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Insert a new location.
    ///
    /// # Returns
    /// * `Err(RepositoryError::Conflict)` - If the backend enforces unique ids
    ///   and the id is taken
    async fn create_location(&self, location: &LocationRecord) -> RepositoryResult<()>;

    /// Replace the point and metadata of the location stored under `id`.
    ///
    /// Updating an id that does not exist is not an error.
    async fn update_location(&self, id: &str, location: &LocationRecord) -> RepositoryResult<()>;

    /// Fetch a location by id.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If no location has this id
    async fn get_location(&self, id: &str) -> RepositoryResult<LocationRecord>;

    /// Delete a location. Deleting an unknown id succeeds.
    async fn delete_location(&self, id: &str) -> RepositoryResult<()>;
}
