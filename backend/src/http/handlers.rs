//! HTTP handlers for the REST API.
//!
//! Each handler decodes its input, delegates to a service and wraps the
//! result in JSON.

use axum::{
    extract::{Path, State},
    Json,
};

use super::auth::{Identity, JsonBody};
use super::dto::{
    HealthResponse, Location, LoginPayload, MessageResponse, RegisterPayload, TokenResponse,
    UpdateNamePayload,
};
use super::error::AppError;
use super::state::AppState;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.locations.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Admin: locations
// =============================================================================

/// POST /admin/loc/create
pub async fn create_location(
    State(state): State<AppState>,
    JsonBody(location): JsonBody<Location>,
) -> HandlerResult<MessageResponse> {
    state.locations.create(&location).await?;
    Ok(Json(MessageResponse::new("location created")))
}

/// GET /admin/loc/{id}
pub async fn get_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<Location> {
    Ok(Json(state.locations.get(&id).await?))
}

/// PUT /admin/loc/update
///
/// The location to replace is named by the `id` field of the body.
pub async fn update_location(
    State(state): State<AppState>,
    JsonBody(location): JsonBody<Location>,
) -> HandlerResult<MessageResponse> {
    state.locations.update(&location).await?;
    Ok(Json(MessageResponse::new("location updated")))
}

/// DELETE /admin/loc/{id}/delete
pub async fn delete_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<MessageResponse> {
    state.locations.delete(&id).await?;
    Ok(Json(MessageResponse::new("location deleted")))
}

// =============================================================================
// Client: players
// =============================================================================

/// POST /client/register
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterPayload>,
) -> HandlerResult<MessageResponse> {
    state.players.register(&payload).await?;
    Ok(Json(MessageResponse::new("player registered")))
}

/// POST /client/login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginPayload>,
) -> HandlerResult<TokenResponse> {
    let token = state.players.login(&payload).await?;
    Ok(Json(TokenResponse { token }))
}

/// POST /client/loc/send
pub async fn send_location(
    State(state): State<AppState>,
    identity: Identity,
    JsonBody(location): JsonBody<Location>,
) -> HandlerResult<MessageResponse> {
    state
        .players
        .update_location(identity.player_id, &location)
        .await?;
    Ok(Json(MessageResponse::new("location updated")))
}

/// PUT /client/update-name
pub async fn update_name(
    State(state): State<AppState>,
    identity: Identity,
    JsonBody(payload): JsonBody<UpdateNamePayload>,
) -> HandlerResult<MessageResponse> {
    state
        .players
        .update_name(identity.player_id, &payload)
        .await?;
    Ok(Json(MessageResponse::new("name updated")))
}

/// GET /client/loc/get
pub async fn get_player_location(
    State(state): State<AppState>,
    identity: Identity,
) -> HandlerResult<Location> {
    Ok(Json(state.players.get_location(identity.player_id).await?))
}
