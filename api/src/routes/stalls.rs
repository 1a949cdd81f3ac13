//! Stall API routes

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use hygiene_score::{calculate_aggregated_score, HygieneScore};
use serde::{Deserialize, Serialize};

use stall_db::entity::{review::Review, stall::Stall};

use crate::{error::ApiError, routes::reviews::ReviewItem, AppState};

mod defaults {
    pub const RADIUS_KM: f64 = 5.0;
    pub const MAX_RADIUS_KM: f64 = 50.0;
    pub const NEARBY_LIMIT: i32 = 50;
    pub const MAX_NEARBY_LIMIT: i32 = 100;
    pub const RECENT_REVIEWS: i32 = 10;
}

/// Stall list response item
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StallItem {
    pub id: i32,
    pub name: String,
    pub category: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub is_open: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    pub hygiene: HygieneScore,
}

impl StallItem {
    fn new(stall: Stall, distance_km: Option<f64>, hygiene: HygieneScore) -> Self {
        Self {
            id: stall.id,
            name: stall.name,
            category: stall.category,
            latitude: stall.latitude,
            longitude: stall.longitude,
            is_open: stall.is_open.unwrap_or(false),
            distance_km,
            hygiene,
        }
    }
}

/// Stall detail response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StallDetail {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub is_open: bool,
    pub owner_id: Option<i32>,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub hygiene: HygieneScore,
    pub recent_reviews: Vec<ReviewItem>,
}

/// Query params for nearby search
#[derive(Debug, Deserialize)]
pub struct NearbyParams {
    pub lat: f64,
    pub lng: f64,
    pub radius_km: Option<f64>,
    pub limit: Option<i32>,
}

/// Validated nearby search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbySearch {
    pub lat: f64,
    pub lng: f64,
    pub radius_km: f64,
    pub limit: i32,
}

impl NearbyParams {
    pub fn validate(&self) -> Result<NearbySearch, ApiError> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(ApiError::BadRequest(
                "lat must be between -90 and 90".to_string(),
            ));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(ApiError::BadRequest(
                "lng must be between -180 and 180".to_string(),
            ));
        }

        let radius_km = match self.radius_km {
            Some(r) if r.is_finite() && r > 0.0 => r.min(defaults::MAX_RADIUS_KM),
            Some(_) => {
                return Err(ApiError::BadRequest(
                    "radius_km must be a positive number".to_string(),
                ))
            }
            None => defaults::RADIUS_KM,
        };

        let limit = self
            .limit
            .unwrap_or(defaults::NEARBY_LIMIT)
            .clamp(1, defaults::MAX_NEARBY_LIMIT);

        Ok(NearbySearch {
            lat: self.lat,
            lng: self.lng,
            radius_km,
            limit,
        })
    }
}

/// Body for owner status updates
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub is_open: bool,
}

/// Group review rows by stall id
fn group_by_stall(reviews: Vec<Review>) -> HashMap<i32, Vec<Review>> {
    let mut grouped: HashMap<i32, Vec<Review>> = HashMap::new();
    for review in reviews {
        grouped.entry(review.stall_id).or_default().push(review);
    }
    grouped
}

/// GET /api/stalls/nearby
/// Returns stalls near a point, nearest first, each with its hygiene score
pub async fn get_nearby_stalls(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NearbyParams>,
) -> Result<Json<Vec<StallItem>>, ApiError> {
    let search = params.validate()?;

    let stalls = Stall::find_nearby(
        search.lat,
        search.lng,
        search.radius_km,
        search.limit,
        &state.db_pool,
    )
    .await?;

    let ids: Vec<i32> = stalls.iter().map(|n| n.stall.id).collect();
    let mut reviews = group_by_stall(Review::find_by_stalls(&ids, &state.db_pool).await?);

    tracing::debug!(
        "Nearby search ({}, {}) within {} km matched {} stalls",
        search.lat,
        search.lng,
        search.radius_km,
        stalls.len()
    );

    let items = stalls
        .into_iter()
        .map(|nearby| {
            let stall_reviews = reviews.remove(&nearby.stall.id).unwrap_or_default();
            let hygiene = calculate_aggregated_score(&stall_reviews);
            StallItem::new(nearby.stall, Some(nearby.distance_km), hygiene)
        })
        .collect();

    Ok(Json(items))
}

/// GET /api/stalls/:id
/// Returns stall details with its hygiene score and latest reviews
pub async fn get_stall(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<StallDetail>, ApiError> {
    let stall = Stall::find_by_id(id, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound("Stall"))?;

    let reviews = Review::find_all_by_stall(id, &state.db_pool).await?;
    let hygiene = calculate_aggregated_score(&reviews);
    let recent = Review::find_by_stall(id, defaults::RECENT_REVIEWS, &state.db_pool).await?;

    Ok(Json(StallDetail {
        id: stall.id,
        name: stall.name,
        description: stall.description,
        category: stall.category,
        latitude: stall.latitude,
        longitude: stall.longitude,
        is_open: stall.is_open.unwrap_or(false),
        owner_id: stall.owner_id,
        created_at: stall
            .created_at
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_else(|| Utc::now().to_rfc3339()),
        updated_at: stall.updated_at.map(|dt| dt.to_rfc3339()),
        hygiene,
        recent_reviews: recent.into_iter().map(Into::into).collect(),
    }))
}

/// GET /api/stalls/:id/hygiene
/// Returns only the hygiene score and its breakdown
pub async fn get_stall_hygiene(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<HygieneScore>, ApiError> {
    stall_hygiene(&state, id).await.map(Json)
}

/// Recompute the hygiene score of an existing stall
pub(crate) async fn stall_hygiene(state: &AppState, id: i32) -> Result<HygieneScore, ApiError> {
    if Stall::find_by_id(id, &state.db_pool).await?.is_none() {
        return Err(ApiError::NotFound("Stall"));
    }

    let reviews = Review::find_all_by_stall(id, &state.db_pool).await?;
    Ok(calculate_aggregated_score(&reviews))
}

/// PATCH /api/stalls/:id/status
/// Owner marks the stall open or closed
pub async fn update_stall_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<StallItem>, ApiError> {
    let stall = Stall::update_status(id, update.is_open, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound("Stall"))?;

    tracing::info!("Stall {} is now {}", id, if update.is_open { "open" } else { "closed" });

    let reviews = Review::find_all_by_stall(id, &state.db_pool).await?;
    let hygiene = calculate_aggregated_score(&reviews);

    Ok(Json(StallItem::new(stall, None, hygiene)))
}
