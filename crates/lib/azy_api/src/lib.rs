//! # azy_api
//!
//! HTTP API library for Azy IA.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use azy_core::Pipeline;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{chat, health};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Request pipeline, built once at startup.
    pub pipeline: Arc<Pipeline>,
    /// API configuration.
    pub config: ApiConfig,
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            routes::POST_API_CHAT,
            post(chat::chat_handler).fallback(chat::method_not_allowed),
        )
        .route(
            routes::POST_CHAT,
            post(chat::chat_handler).fallback(chat::method_not_allowed),
        )
        .route(routes::GET_API_HEALTH, get(health::health_handler))
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
