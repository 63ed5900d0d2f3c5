//! Service layer between the HTTP handlers and the repositories.
//!
//! Services translate API objects into storage records, enforce input
//! validation, and bound every storage call with a deadline.

pub mod error;
pub mod locations;
pub mod players;

pub use error::{ServiceError, ServiceResult};
pub use locations::LocationService;
pub use players::PlayerService;

use std::future::Future;
use std::time::Duration;

use crate::db::repository::{ErrorContext, RepositoryError, RepositoryResult};

/// Run a storage call under `deadline`, turning an elapsed deadline into a
/// timeout error.
pub(crate) async fn with_deadline<T, F>(
    deadline: Duration,
    operation: &str,
    call: F,
) -> RepositoryResult<T>
where
    F: Future<Output = RepositoryResult<T>>,
{
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => result,
        Err(_) => Err(RepositoryError::timeout_with_context(
            format!("storage call exceeded {:?}", deadline),
            ErrorContext::new(operation),
        )),
    }
}
