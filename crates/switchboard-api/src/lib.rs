//! HTTP surface of Switchboard.
//!
//! `build_router` wires every route, the access guard and the shared
//! middleware stack; the binary in `main.rs` only loads configuration and
//! chooses a storage backend.

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod notify;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{auth, logging};
use crate::routes::{agents, companies, health, messages, threads};
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let public = Router::new()
        .route("/health", get(health::health_check))
        .route("/api/openapi.json", get(openapi::openapi_json))
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login));

    let session = Router::new()
        .route("/auth/session", get(routes::auth::session))
        .route_layer(from_fn_with_state(state.clone(), auth::optional_auth));

    let protected = Router::new()
        .route("/auth/me", get(routes::auth::me))
        // Companies
        .route(
            "/companies",
            post(companies::create_company).get(companies::list_companies),
        )
        .route(
            "/companies/:id",
            get(companies::get_company)
                .put(companies::update_company)
                .delete(companies::delete_company),
        )
        // Agents
        .route("/agents", post(agents::create_agent).get(agents::list_agents))
        .route(
            "/agents/:id",
            get(agents::get_agent)
                .put(agents::update_agent)
                .delete(agents::delete_agent),
        )
        .route("/agents/:id/threads", get(agents::list_agent_threads))
        // Threads
        .route("/threads/:id", get(threads::get_thread))
        .route("/threads/:id/messages", get(threads::list_messages))
        // Messages
        .route("/messages/send-to-agent", post(messages::send_to_agent))
        .route_layer(from_fn_with_state(state.clone(), auth::require_auth));

    Router::new()
        .merge(public)
        .merge(session)
        .merge(protected)
        .fallback(routes::not_found)
        .layer(from_fn(logging::log_request))
        .layer(TimeoutLayer::new(Duration::from_secs(
            state.config.server.request_timeout_secs,
        )))
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if !config.cors.enabled {
        return CorsLayer::new();
    }

    let cors = CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers(Any);

    if config.cors.origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<axum::http::HeaderValue> = config
            .cors
            .origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}
