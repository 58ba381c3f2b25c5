//! HTTP routes for the proxy
//!
//! The OpenAI-compatible routes are built from a static table and sit behind
//! the authentication middleware. Health and config routes are public.

pub mod config;
pub mod forward;
pub mod health;

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{middleware::auth::auth_middleware, AppState};

pub use forward::{ForwardedRoute, FORWARDED_ROUTES};

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected_routes = FORWARDED_ROUTES
        .iter()
        .fold(Router::new(), |router, route| {
            router.route(route.path, route.method_router())
        })
        // Route layer: a wrong method gets 405 before any token check
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Public routes - no auth required
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/deep", get(health::deep_health_check))
        .route("/config", get(config::config_info));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
