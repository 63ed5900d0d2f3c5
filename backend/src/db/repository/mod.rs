//! Repository trait definitions for storage operations.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`locations`]: CRUD operations on admin-managed locations
//! - [`players`]: Player registration records and their mutable fields
//!
//! # Convenience Trait Bound
//!
//! Services and the HTTP state hold a single `Arc<dyn FullRepository>`:
//!
//! ```ignore
//! async fn example<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<()> {
//!     repo.create_location(&record).await?;
//!     repo.get_player_by_email("someone@example.com").await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod locations;
pub mod players;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

pub use locations::LocationRepository;
pub use players::PlayerRepository;

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type that implements both
/// [`LocationRepository`] and [`PlayerRepository`].
pub trait FullRepository: LocationRepository + PlayerRepository {}

impl<T> FullRepository for T where T: LocationRepository + PlayerRepository {}
