//! Street food stall API server
//!
//! REST endpoints for stall discovery, reviews and owner status updates.
//! Hygiene scores are recomputed from the stored reviews on every request.

use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value as JsonValue};
use sqlx::{Pool, Postgres};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod routes;

use config::Config;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: Pool<Postgres>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting stall API server...");

    let config = Config::from_env()?;

    // Initialize database connection
    let db_pool = stall_db::initialize_database().await?;
    tracing::info!("Connected to database");

    let state = Arc::new(AppState { db_pool });
    let app = app(state);

    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the router with all routes and middleware
fn app(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Root endpoint with API info
        .route("/", get(root))
        // Health check
        .route("/health", get(health_check))
        // API routes
        .nest("/api", routes::api_routes())
        // State and middleware
        .with_state(state)
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

fn catalog(tags: &[(&str, i32)]) -> Vec<JsonValue> {
    tags.iter()
        .map(|(tag, points)| json!({ "tag": tag, "points": points }))
        .collect()
}

/// Root endpoint - API information and the hygiene tag catalogs
async fn root() -> Json<JsonValue> {
    let positive = catalog(hygiene_score::POSITIVE_TAGS);
    let negative = catalog(hygiene_score::NEGATIVE_TAGS);

    Json(json!({
        "name": "stall-api",
        "endpoints": [
            "GET /health",
            "GET /api/stalls/nearby?lat=&lng=&radius_km=&limit=",
            "GET /api/stalls/:id",
            "GET /api/stalls/:id/hygiene",
            "PATCH /api/stalls/:id/status",
            "GET /api/stalls/:id/reviews",
            "POST /api/stalls/:id/reviews"
        ],
        "hygieneTags": {
            "positive": positive,
            "negative": negative
        }
    }))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
