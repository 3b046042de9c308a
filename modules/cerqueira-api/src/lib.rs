//! HTTP backend for the Cerqueira Psicologia site.
//!
//! Public routes mirror the clinic's Instagram feed and accept contact-form
//! messages. Site configuration and Instagram mutations require an admin JWT.

pub mod auth;
pub mod error;
pub mod feed;
pub mod jwt;
pub mod rest;
pub mod store;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use feed::FeedService;
use jwt::JwtService;
use store::SiteStore;

pub struct AppState {
    pub feed: FeedService,
    pub jwt: JwtService,
    pub store: Arc<dyn SiteStore>,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let admin = Router::new()
        .route(
            "/api/config",
            get(rest::config::api_config).put(rest::config::api_config_update),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        // Health check
        .route("/health", get(|| async { "ok" }))
        // Instagram: reads are public, mutations check the JWT via AuthUser
        .route(
            "/api/instagram",
            get(rest::instagram::api_instagram_feed)
                .post(rest::instagram::api_instagram_publish)
                .put(rest::instagram::api_instagram_update_caption),
        )
        .route("/api/contato", post(rest::contact::api_contact))
        .merge(admin)
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        // Method + path only; query strings may carry tokens
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
}
