//! Repository factory for dependency injection.
//!
//! Picks the storage backend at startup from runtime configuration.

use std::str::FromStr;
use std::sync::Arc;

use super::repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
use super::repositories::{PostgresConfig, PostgresRepository};
use super::repository::{FullRepository, RepositoryError, RepositoryResult};
use crate::config::Environment;

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// PostGIS + Diesel implementation
    Postgres,
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string (`postgres`, `pg`, `local`, `mem`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "pg" => Ok(Self::Postgres),
            "local" | "mem" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// The backend an environment runs on when nothing else is configured.
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Prod => Self::Postgres,
            Environment::Dev => Self::Local,
        }
    }

    /// Get repository type from environment variables.
    ///
    /// `REPOSITORY_TYPE` wins when set; otherwise `ENV=prod` selects Postgres
    /// and anything else selects the local store.
    pub fn from_env() -> Result<Self, String> {
        if let Ok(val) = std::env::var("REPOSITORY_TYPE") {
            return val.parse();
        }
        let environment = match std::env::var("ENV") {
            Ok(val) => val.parse()?,
            Err(_) => Environment::default(),
        };
        Ok(Self::for_environment(environment))
    }
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```
/// use geogame::db::{RepositoryFactory, RepositoryType};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let repo = RepositoryFactory::create(RepositoryType::Local).await.unwrap();
/// assert!(repo.health_check().await.unwrap());
/// # });
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// Postgres settings are read with `PostgresConfig::from_env`.
    pub async fn create(repo_type: RepositoryType) -> RepositoryResult<Arc<dyn FullRepository>> {
        match repo_type {
            RepositoryType::Postgres => {
                #[cfg(feature = "postgres-repo")]
                {
                    let config =
                        PostgresConfig::from_env().map_err(RepositoryError::configuration)?;
                    let pg = Self::create_postgres(&config).await?;
                    Ok(pg as Arc<dyn FullRepository>)
                }
                #[cfg(not(feature = "postgres-repo"))]
                {
                    Err(RepositoryError::configuration(
                        "Postgres repository feature not enabled",
                    ))
                }
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Create a Postgres repository, running pending migrations.
    #[cfg(feature = "postgres-repo")]
    pub async fn create_postgres(
        config: &PostgresConfig,
    ) -> RepositoryResult<Arc<PostgresRepository>> {
        let config = config.clone();
        let repo = tokio::task::spawn_blocking(move || PostgresRepository::new(config))
            .await
            .map_err(|e| RepositoryError::internal(format!("Task join error: {}", e)))??;
        Ok(Arc::new(repo))
    }

    /// Create an in-memory local repository.
    pub fn create_local() -> Arc<dyn FullRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create repository from environment configuration.
    ///
    /// See [`RepositoryType::from_env`] for how the backend is chosen.
    pub async fn from_env() -> RepositoryResult<Arc<dyn FullRepository>> {
        let repo_type = RepositoryType::from_env().map_err(RepositoryError::configuration)?;
        Self::create(repo_type).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_type_from_str() {
        assert_eq!(
            RepositoryType::from_str("local").unwrap(),
            RepositoryType::Local
        );
        assert_eq!(
            RepositoryType::from_str("mem").unwrap(),
            RepositoryType::Local
        );
        assert_eq!(
            RepositoryType::from_str("postgres").unwrap(),
            RepositoryType::Postgres
        );
        assert_eq!(
            RepositoryType::from_str("Pg").unwrap(),
            RepositoryType::Postgres
        );
        assert!(RepositoryType::from_str("mongo").is_err());
    }

    #[test]
    fn test_environment_picks_backend() {
        assert_eq!(
            RepositoryType::for_environment(Environment::Dev),
            RepositoryType::Local
        );
        assert_eq!(
            RepositoryType::for_environment(Environment::Prod),
            RepositoryType::Postgres
        );
    }

    #[tokio::test]
    async fn test_create_local_repository() {
        let repo = RepositoryFactory::create_local();
        assert!(repo.health_check().await.unwrap());
    }

    #[cfg(not(feature = "postgres-repo"))]
    #[tokio::test]
    async fn test_postgres_without_feature_is_configuration_error() {
        let err = RepositoryFactory::create(RepositoryType::Postgres)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
    }
}
