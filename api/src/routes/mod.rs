//! API route definitions

pub mod reviews;
pub mod stalls;

use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::AppState;

/// Create all API routes
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Stall routes
        .route("/stalls/nearby", get(stalls::get_nearby_stalls))
        .route("/stalls/:id", get(stalls::get_stall))
        .route("/stalls/:id/hygiene", get(stalls::get_stall_hygiene))
        .route("/stalls/:id/status", patch(stalls::update_stall_status))
        // Review routes
        .route(
            "/stalls/:id/reviews",
            get(reviews::get_stall_reviews).post(reviews::create_review),
        )
}
