//! Repository implementations module.
//!
//! - `local`: in-memory maps, used by the `dev` environment and tests
//! - `postgres`: PostGIS tables through Diesel
pub mod local;
#[cfg(feature = "postgres-repo")]
pub mod postgres;

pub use local::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use postgres::{PostgresConfig, PostgresRepository};
