//! Router configuration for the HTTP API.
//!
//! Sets up all routes and middleware (CORS, tracing, request timeout, auth)
//! and creates the axum router ready for serving.

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::auth::require_auth;
use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let admin = Router::new()
        .route("/admin/loc/create", post(handlers::create_location))
        .route("/admin/loc/update", put(handlers::update_location))
        .route("/admin/loc/{id}", get(handlers::get_location))
        .route("/admin/loc/{id}/delete", delete(handlers::delete_location));

    let client = Router::new()
        .route("/client/register", post(handlers::register))
        .route("/client/login", post(handlers::login));

    // Only routes added before route_layer pass through the token check.
    let client_authed = Router::new()
        .route("/client/loc/send", post(handlers::send_location))
        .route("/client/update-name", put(handlers::update_name))
        .route("/client/loc/get", get(handlers::get_player_location))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(admin)
        .merge(client)
        .merge(client_authed)
        .layer(TimeoutLayer::new(state.config.http_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::db::repositories::LocalRepository;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let state = AppState::new(Arc::new(LocalRepository::new()), AppConfig::default());
        let _router = create_router(state);
    }
}
