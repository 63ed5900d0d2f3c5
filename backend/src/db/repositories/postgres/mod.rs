//! Postgres/PostGIS repository implementation using Diesel.
//!
//! Geometry columns are not modelled by Diesel, so every statement is a raw
//! `sql_query` that writes points with `ST_GeomFromWKB($n, 4326)` and reads
//! them back with `ST_AsBinary(point)`.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Automatic migration execution
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string. When neither is
//!   set the URL is assembled from `PG_HOST`, `PG_PORT`, `PG_DB`, `PG_USER`
//!   and `PG_PASS`.
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel::sql_types::{Bytea, Nullable, Text, Uuid as SqlUuid};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::time::Duration;
use tokio::task;
use tracing::{error, warn};

use crate::db::repository::{
    ErrorContext, LocationRepository, PlayerRepository, RepositoryError, RepositoryResult,
};
use crate::models::{LocationRecord, PlayerId, PlayerRecord};

mod models;

use models::{encode_point, LocationRow, PlayerRow};

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

const LOCATION_COLUMNS: &str = "loc_id, ST_AsBinary(point) AS point, loc_name, loc_type";
const PLAYER_COLUMNS: &str =
    "id, name, email, password, loc_id, ST_AsBinary(point) AS point, loc_name, loc_type";

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    ///
    /// See the module documentation for the variables read.
    pub fn from_env() -> Result<Self, String> {
        let database_url = match std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
        {
            Ok(url) => url,
            Err(_) => Self::url_from_parts()?,
        };

        let max_pool_size = env_or("PG_POOL_MAX", 10);
        let min_pool_size = env_or("PG_POOL_MIN", 1);
        let connection_timeout_sec = env_or("PG_CONN_TIMEOUT_SEC", 30);
        let idle_timeout_sec = env_or("PG_IDLE_TIMEOUT_SEC", 600);
        let max_retries = env_or("PG_MAX_RETRIES", 3);
        let retry_delay_ms = env_or("PG_RETRY_DELAY_MS", 100);

        Ok(Self {
            database_url,
            max_pool_size,
            min_pool_size,
            connection_timeout_sec,
            idle_timeout_sec,
            max_retries,
            retry_delay_ms,
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }

    fn url_from_parts() -> Result<String, String> {
        let host = std::env::var("PG_HOST").unwrap_or_else(|_| "pg_geogame".to_string());
        let port: u16 = std::env::var("PG_PORT")
            .unwrap_or_else(|_| "5432".to_string())
            .parse()
            .map_err(|_| "PG_PORT must be a valid port number".to_string())?;
        let name = std::env::var("PG_DB").unwrap_or_else(|_| "geo_game_db".to_string());
        let user = std::env::var("PG_USER").unwrap_or_else(|_| "geogameuser".to_string());
        let pass = std::env::var("PG_PASS").unwrap_or_else(|_| "password".to_string());
        Ok(format!(
            "postgres://{}:{}@{}:{}/{}",
            user, pass, host, port, name
        ))
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Diesel-backed repository for Postgres with the PostGIS extension.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
}

impl std::fmt::Debug for PostgresRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresRepository")
            .field("max_pool_size", &self.config.max_pool_size)
            .field("max_retries", &self.config.max_retries)
            .finish()
    }
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self { pool, config })
    }

    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;
        Ok(())
    }

    /// Execute a database operation on the blocking pool, retrying
    /// retryable failures with exponential backoff.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    warn!(
                        attempt,
                        delay_ms = retry_delay.as_millis() as u64,
                        "retrying database operation"
                    );
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2;
                }

                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new("get_connection")
                                .with_details(format!("attempt={}", attempt + 1)),
                        );
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        return Err(err);
                    }
                };

                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => return Err(e),
                }
            }

            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }
}

fn location_not_found(operation: &str, id: &str) -> RepositoryError {
    RepositoryError::not_found_with_context(
        "Location not found",
        ErrorContext::new(operation)
            .with_entity("location")
            .with_entity_id(id),
    )
}

fn player_not_found(operation: &str, id: impl ToString) -> RepositoryError {
    RepositoryError::not_found_with_context(
        "Player not found",
        ErrorContext::new(operation)
            .with_entity("player")
            .with_entity_id(id),
    )
}

#[async_trait]
impl LocationRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(RepositoryError::from)
        })
        .await
    }

    async fn create_location(&self, location: &LocationRecord) -> RepositoryResult<()> {
        let location = location.clone();
        self.with_conn(move |conn| {
            let point = encode_point(location.point)?;
            sql_query(
                "INSERT INTO locations (loc_id, point, loc_name, loc_type) \
                 VALUES ($1, ST_GeomFromWKB($2, 4326), $3, $4)",
            )
            .bind::<Text, _>(&location.id)
            .bind::<Nullable<Bytea>, _>(point)
            .bind::<Text, _>(&location.name)
            .bind::<Text, _>(location.kind.as_str())
            .execute(conn)
            .map(|_| ())
            .map_err(|e| {
                error!(location_id = %location.id, error = %e, "failed to insert location");
                RepositoryError::from(e)
                    .with_operation("create_location")
                    .with_entity("location", &location.id)
            })
        })
        .await
    }

    async fn update_location(&self, id: &str, location: &LocationRecord) -> RepositoryResult<()> {
        let id = id.to_string();
        let location = location.clone();
        self.with_conn(move |conn| {
            let point = encode_point(location.point)?;
            sql_query(
                "UPDATE locations SET point = ST_GeomFromWKB($1, 4326), loc_name = $2, \
                 loc_type = $3 WHERE loc_id = $4",
            )
            .bind::<Nullable<Bytea>, _>(point)
            .bind::<Text, _>(&location.name)
            .bind::<Text, _>(location.kind.as_str())
            .bind::<Text, _>(&id)
            .execute(conn)
            .map(|_| ())
            .map_err(|e| {
                error!(location_id = %id, error = %e, "failed to update location");
                RepositoryError::from(e)
                    .with_operation("update_location")
                    .with_entity("location", &id)
            })
        })
        .await
    }

    async fn get_location(&self, id: &str) -> RepositoryResult<LocationRecord> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            let row = sql_query(format!(
                "SELECT {} FROM locations WHERE loc_id = $1",
                LOCATION_COLUMNS
            ))
            .bind::<Text, _>(&id)
            .get_result::<LocationRow>(conn)
            .optional()
            .map_err(|e| RepositoryError::from(e).with_operation("get_location"))?;

            row.ok_or_else(|| location_not_found("get_location", &id))?
                .into_record()
        })
        .await
    }

    async fn delete_location(&self, id: &str) -> RepositoryResult<()> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            sql_query("DELETE FROM locations WHERE loc_id = $1")
                .bind::<Text, _>(&id)
                .execute(conn)
                .map(|_| ())
                .map_err(|e| {
                    RepositoryError::from(e)
                        .with_operation("delete_location")
                        .with_entity("location", &id)
                })
        })
        .await
    }
}

#[async_trait]
impl PlayerRepository for PostgresRepository {
    async fn create_player(&self, player: &PlayerRecord) -> RepositoryResult<()> {
        let player = player.clone();
        self.with_conn(move |conn| {
            let location = player.location.clone().unwrap_or_default();
            let has_location = player.location.is_some();
            let point = encode_point(location.point)?;
            sql_query(
                "INSERT INTO clients (id, name, email, password, loc_id, point, loc_name, loc_type) \
                 VALUES ($1, $2, $3, $4, $5, ST_GeomFromWKB($6, 4326), $7, $8)",
            )
            .bind::<SqlUuid, _>(player.id.value())
            .bind::<Text, _>(&player.name)
            .bind::<Text, _>(&player.email)
            .bind::<Text, _>(&player.password_hash)
            .bind::<Nullable<Text>, _>(has_location.then(|| location.id.clone()))
            .bind::<Nullable<Bytea>, _>(point)
            .bind::<Nullable<Text>, _>(has_location.then(|| location.name.clone()))
            .bind::<Nullable<Text>, _>(has_location.then(|| location.kind.as_str().to_string()))
            .execute(conn)
            .map(|_| ())
            .map_err(|e| {
                let err = RepositoryError::from(e);
                if err.is_conflict() {
                    RepositoryError::conflict_with_context(
                        "email already registered",
                        ErrorContext::new("create_player")
                            .with_entity("player")
                            .with_details("unique=email"),
                    )
                } else {
                    error!(player_id = %player.id, error = %err, "failed to insert player");
                    err.with_operation("create_player")
                }
            })
        })
        .await
    }

    async fn update_player_name(&self, id: PlayerId, name: &str) -> RepositoryResult<()> {
        let name = name.to_string();
        self.with_conn(move |conn| {
            let affected = sql_query("UPDATE clients SET name = $1 WHERE id = $2")
                .bind::<Text, _>(&name)
                .bind::<SqlUuid, _>(id.value())
                .execute(conn)
                .map_err(|e| {
                    error!(player_id = %id, error = %e, "failed to update player name");
                    RepositoryError::from(e).with_operation("update_player_name")
                })?;
            if affected == 0 {
                return Err(player_not_found("update_player_name", id));
            }
            Ok(())
        })
        .await
    }

    async fn update_player_location(
        &self,
        id: PlayerId,
        location: &LocationRecord,
    ) -> RepositoryResult<()> {
        let location = location.clone();
        self.with_conn(move |conn| {
            let point = encode_point(location.point)?;
            let affected = sql_query(
                "UPDATE clients SET loc_id = $1, point = ST_GeomFromWKB($2, 4326), \
                 loc_name = $3, loc_type = $4 WHERE id = $5",
            )
            .bind::<Text, _>(&location.id)
            .bind::<Nullable<Bytea>, _>(point)
            .bind::<Text, _>(&location.name)
            .bind::<Text, _>(location.kind.as_str())
            .bind::<SqlUuid, _>(id.value())
            .execute(conn)
            .map_err(|e| {
                error!(player_id = %id, error = %e, "failed to update player location");
                RepositoryError::from(e).with_operation("update_player_location")
            })?;
            if affected == 0 {
                return Err(player_not_found("update_player_location", id));
            }
            Ok(())
        })
        .await
    }

    async fn get_player_by_email(&self, email: &str) -> RepositoryResult<PlayerRecord> {
        let email = email.to_string();
        self.with_conn(move |conn| {
            let row = sql_query(format!(
                "SELECT {} FROM clients WHERE email = $1",
                PLAYER_COLUMNS
            ))
            .bind::<Text, _>(&email)
            .get_result::<PlayerRow>(conn)
            .optional()
            .map_err(|e| RepositoryError::from(e).with_operation("get_player_by_email"))?;

            row.ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    "Player not found",
                    ErrorContext::new("get_player_by_email").with_entity("player"),
                )
            })?
            .into_record()
        })
        .await
    }

    async fn get_player_by_id(&self, id: PlayerId) -> RepositoryResult<PlayerRecord> {
        self.with_conn(move |conn| {
            let row = sql_query(format!("SELECT {} FROM clients WHERE id = $1", PLAYER_COLUMNS))
                .bind::<SqlUuid, _>(id.value())
                .get_result::<PlayerRow>(conn)
                .optional()
                .map_err(|e| RepositoryError::from(e).with_operation("get_player_by_id"))?;

            row.ok_or_else(|| player_not_found("get_player_by_id", id))?
                .into_record()
        })
        .await
    }
}
