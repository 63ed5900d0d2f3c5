//! Location CRUD.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error};

use super::{with_deadline, ServiceResult};
use crate::db::repository::FullRepository;
use crate::models::{Location, LocationRecord};

#[derive(Clone)]
pub struct LocationService {
    repo: Arc<dyn FullRepository>,
    db_timeout: Duration,
}

impl LocationService {
    pub fn new(repo: Arc<dyn FullRepository>, db_timeout: Duration) -> Self {
        Self { repo, db_timeout }
    }

    pub async fn create(&self, location: &Location) -> ServiceResult<()> {
        let record = LocationRecord::from(location);
        with_deadline(
            self.db_timeout,
            "create_location",
            self.repo.create_location(&record),
        )
        .await
        .map_err(|e| {
            error!(location_id = %record.id, error = %e, "failed to create location");
            e
        })?;
        debug!(location_id = %record.id, "location created");
        Ok(())
    }

    /// Replace the stored location whose id matches `location.id`.
    pub async fn update(&self, location: &Location) -> ServiceResult<()> {
        let record = LocationRecord::from(location);
        with_deadline(
            self.db_timeout,
            "update_location",
            self.repo.update_location(&record.id, &record),
        )
        .await
        .map_err(|e| {
            error!(location_id = %record.id, error = %e, "failed to update location");
            e
        })?;
        Ok(())
    }

    pub async fn get(&self, id: &str) -> ServiceResult<Location> {
        let record = with_deadline(self.db_timeout, "get_location", self.repo.get_location(id))
            .await
            .map_err(|e| {
                error!(location_id = %id, error = %e, "failed to get location");
                e
            })?;
        Ok(Location::from(record))
    }

    /// Deleting an id that does not exist succeeds.
    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        with_deadline(
            self.db_timeout,
            "delete_location",
            self.repo.delete_location(id),
        )
        .await
        .map_err(|e| {
            error!(location_id = %id, error = %e, "failed to delete location");
            e
        })?;
        Ok(())
    }

    pub async fn health_check(&self) -> ServiceResult<bool> {
        Ok(with_deadline(self.db_timeout, "health_check", self.repo.health_check()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::models::{GeoPoint, MetaData};
    use crate::services::ServiceError;

    fn service() -> LocationService {
        LocationService::new(Arc::new(LocalRepository::new()), Duration::from_secs(1))
    }

    fn airport() -> Location {
        Location {
            id: "cdg".to_string(),
            geo_point: GeoPoint {
                longitude: 2.55,
                latitude: 49.0097,
            },
            meta_data: MetaData {
                location_name: "Charles de Gaulle".to_string(),
                location_type: "Airport".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let svc = service();
        svc.create(&airport()).await.unwrap();
        assert_eq!(svc.get("cdg").await.unwrap(), airport());
    }

    #[tokio::test]
    async fn test_update_replaces_record() {
        let svc = service();
        svc.create(&airport()).await.unwrap();
        let mut moved = airport();
        moved.geo_point = GeoPoint::default();
        moved.meta_data.location_type = "hub".to_string();
        svc.update(&moved).await.unwrap();
        assert_eq!(svc.get("cdg").await.unwrap(), moved);
    }

    #[tokio::test]
    async fn test_get_missing_is_repository_not_found() {
        let err = service().get("nowhere").await.unwrap_err();
        assert!(matches!(err, ServiceError::Repository(ref e) if e.is_not_found()));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let svc = service();
        svc.create(&airport()).await.unwrap();
        svc.delete("cdg").await.unwrap();
        svc.delete("cdg").await.unwrap();
        assert!(svc.get("cdg").await.is_err());
    }
}
