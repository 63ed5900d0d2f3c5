//! Data Transfer Objects for the HTTP API.
//!
//! Request and response payloads that already live in `models` are
//! re-exported so handlers import everything from one place.

use serde::{Deserialize, Serialize};

pub use crate::models::{
    GeoPoint, Location, LoginPayload, MetaData, RegisterPayload, TokenResponse, UpdateNamePayload,
};

/// Acknowledgement body for writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}
