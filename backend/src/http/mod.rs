//! HTTP server module.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - JSON bodies, bearer-token auth, error mapping          │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (services/)                                │
//! │  - LocationService / PlayerService                        │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Repository Layer (db/)                                   │
//! │  - LocalRepository / PostgresRepository                   │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use auth::{Identity, JsonBody};
pub use error::AppError;
pub use router::create_router;
pub use state::AppState;
