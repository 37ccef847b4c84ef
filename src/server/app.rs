use std::sync::Arc;

use anyhow::{anyhow, Result};
use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};

use super::handlers;
use super::openapi;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Bearer token the scraping workflow must present on /webhook routes
    pub webhook_token: String,
    /// Optional second factor checked against the x-webhook-secret header
    pub webhook_secret: Option<String>,
    pub cors_origin: Option<String>,
}

impl ServerConfig {
    pub fn from_env(cors_origin: Option<String>) -> Self {
        Self {
            webhook_token: std::env::var("PRICEWATCH_WEBHOOK_TOKEN")
                .unwrap_or_else(|_| "pricewatch_api_secret".to_string()),
            webhook_secret: std::env::var("PRICEWATCH_WEBHOOK_SECRET").ok(),
            cors_origin,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<ServerConfig>,
}

pub fn create_app(db: DatabaseConnection, config: ServerConfig) -> Result<Router> {
    let cors = match &config.cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<axum::http::HeaderValue>()
                    .map_err(|e| anyhow!("Invalid CORS origin: {}", e))?,
            )
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PATCH,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PATCH,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any),
    };

    let state = AppState {
        db,
        config: Arc::new(config),
    };

    let app = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/api-docs/openapi.json", get(openapi::openapi_json))
        // Dashboard API (principal resolved by the upstream auth gateway)
        .route("/api/v1/auth/signup", post(handlers::users::signup))
        .route("/api/v1/users", get(handlers::users::list_users))
        .route("/api/v1/users/:id/role", patch(handlers::users::set_user_role))
        .route(
            "/api/v1/properties",
            get(handlers::properties::list_properties).post(handlers::properties::create_property),
        )
        .route(
            "/api/v1/properties/:id",
            get(handlers::properties::get_property)
                .patch(handlers::properties::update_property)
                .delete(handlers::properties::delete_property),
        )
        .route(
            "/api/v1/properties/:id/owner",
            put(handlers::properties::transfer_ownership),
        )
        .route(
            "/api/v1/properties/:id/access",
            put(handlers::properties::grant_access),
        )
        .route(
            "/api/v1/properties/:id/access/:user_id",
            delete(handlers::properties::revoke_access),
        )
        .route(
            "/api/v1/properties/:id/room-types",
            get(handlers::room_types::list_room_types)
                .post(handlers::room_types::create_room_type),
        )
        .route(
            "/api/v1/room-types/:id",
            delete(handlers::room_types::delete_room_type),
        )
        .route(
            "/api/v1/properties/:id/competitors",
            get(handlers::competitors::list_competitors)
                .post(handlers::competitors::create_competitor),
        )
        .route(
            "/api/v1/competitors/:id",
            delete(handlers::competitors::delete_competitor),
        )
        .route(
            "/api/v1/competitors/:id/configs",
            put(handlers::competitors::upsert_config),
        )
        .route(
            "/api/v1/properties/:id/prices",
            get(handlers::prices::get_price_comparison)
                .delete(handlers::prices::prune_price_history),
        )
        .route(
            "/api/v1/properties/:id/scrape-events",
            get(handlers::prices::list_scrape_events),
        )
        // Workflow-engine API (bearer API key)
        .route("/webhook/price-ingest", post(handlers::webhook::ingest_prices))
        .route("/webhook/scrape-log", post(handlers::webhook::log_scrape_run))
        .route(
            "/webhook/active-properties",
            get(handlers::webhook::active_properties),
        )
        .fallback(|uri: axum::http::Uri| async move {
            eprintln!("DBG fallback unmatched: {}", uri);
            axum::http::StatusCode::NOT_FOUND
        })
        .layer(cors)
        .with_state(state);

    Ok(app)
}
