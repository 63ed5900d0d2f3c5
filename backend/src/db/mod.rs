//! Storage for locations and players.
//!
//! ```text
//! services::{LocationService, PlayerService}
//!              │
//!              ▼
//!      FullRepository (trait)
//!        │            │
//!   LocalRepository  PostgresRepository
//!    (in-memory)      (PostGIS, diesel)
//! ```
//!
//! The backend is picked once at startup through [`RepositoryFactory`].

#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repositories;
pub mod repository;

#[cfg(feature = "postgres-repo")]
pub use repositories::postgres::PostgresConfig;

pub use factory::{RepositoryFactory, RepositoryType};
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{
    ErrorContext, FullRepository, LocationRepository, PlayerRepository, RepositoryError,
    RepositoryResult,
};
