//! # Geo Game Backend
//!
//! HTTP backend for a location-sharing game: players register, log in with a
//! session token and report where they are, while an admin surface manages
//! the catalogue of locations.
//!
//! ## Architecture
//!
//! - [`geo`]: 2-D points and their WKB/WKT encodings
//! - [`models`]: locations, players and request payloads
//! - [`db`]: repository traits with in-memory and PostGIS backends
//! - [`auth`]: session tokens and password hashing
//! - [`services`]: location and player business logic
//! - [`http`]: axum router, handlers and error mapping
//! - [`config`]: environment-driven process configuration

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod auth;
pub mod config;
pub mod db;
pub mod geo;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
