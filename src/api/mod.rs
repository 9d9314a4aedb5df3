//! API layer - HTTP handlers and routing
//!
//! - Health probe
//! - Signup/login token endpoints
//! - Profile of the current user
//! - Chat query placeholder

pub mod auth;
pub mod chat;
pub mod health;
pub mod middleware;
pub mod users;

#[cfg(test)]
mod tests;

use anyhow::Context;
use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use middleware::{ApiError, AppState, AuthenticatedUser};

/// Build the API routes
pub fn build_api_router(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .nest("/users", users::router())
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::require_auth,
        ));

    Router::new()
        .route("/health", get(health::health))
        .nest("/auth", auth::router())
        .nest("/chat", chat::router())
        .merge(protected_routes)
}

/// CORS for the configured origin. `*` allows any origin without credentials.
pub fn cors_layer(cors_origin: &str) -> anyhow::Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if cors_origin.trim() == "*" {
        return Ok(cors.allow_origin(Any));
    }

    let origin = cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin: {}", cors_origin))?;
    Ok(cors.allow_origin(origin).allow_credentials(true))
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> anyhow::Result<Router> {
    let layers = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origin)?);

    Ok(Router::new()
        .merge(build_api_router(state.clone()))
        .layer(layers)
        .with_state(state))
}
