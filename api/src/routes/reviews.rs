//! Review API routes

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use hygiene_score::{responses_to_tags, ChecklistResponses, HygieneScore};
use serde::{Deserialize, Serialize};

use stall_db::entity::{
    review::{NewReview, Review},
    stall::Stall,
};

use crate::{error::ApiError, routes::stalls::stall_hygiene, AppState};

/// Review response item
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    pub id: i32,
    pub stall_id: i32,
    pub reviewer_name: Option<String>,
    pub comment: Option<String>,
    pub hygiene_score: Option<i32>,
    pub hygiene_tags: Vec<String>,
    pub created_at: Option<String>,
}

impl From<Review> for ReviewItem {
    fn from(r: Review) -> Self {
        Self {
            id: r.id,
            stall_id: r.stall_id,
            reviewer_name: r.reviewer_name,
            comment: r.comment,
            hygiene_score: r.hygiene_score,
            hygiene_tags: r.hygiene_tags.unwrap_or_default(),
            created_at: r.created_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

/// Response for a submitted review
#[derive(Debug, Serialize)]
pub struct CreatedReview {
    pub review: ReviewItem,
    pub hygiene: HygieneScore,
}

/// Query params for review list
#[derive(Debug, Deserialize)]
pub struct ReviewListParams {
    pub limit: Option<i32>,
}

/// Body of a review submission
///
/// `hygiene_score` is kept loose so that a non-integer value is reported
/// as a validation error rather than a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub hygiene_score: Option<serde_json::Value>,
    pub reviewer_name: Option<String>,
    pub comment: Option<String>,
    #[serde(default)]
    pub hygiene_tags: Vec<String>,
    #[serde(default)]
    pub checklist: Option<ChecklistResponses>,
}

impl CreateReviewRequest {
    /// Validate the submission and build the row to insert
    ///
    /// Stored tags are the checklist tags followed by the directly supplied
    /// ones, without duplicates.
    pub fn into_new_review(self, stall_id: i32) -> Result<NewReview, ApiError> {
        let hygiene_score = self
            .hygiene_score
            .as_ref()
            .and_then(|v| v.as_i64())
            .filter(|s| (1..=5).contains(s))
            .ok_or_else(|| {
                ApiError::BadRequest("hygiene_score must be an integer from 1 to 5".to_string())
            })? as i32;

        let derived = self
            .checklist
            .as_ref()
            .map(responses_to_tags)
            .unwrap_or_default();

        let mut hygiene_tags: Vec<String> = Vec::new();
        let candidates = derived
            .into_iter()
            .map(str::to_string)
            .chain(self.hygiene_tags.iter().map(|t| t.trim().to_string()));
        for tag in candidates {
            if !tag.is_empty() && !hygiene_tags.contains(&tag) {
                hygiene_tags.push(tag);
            }
        }

        Ok(NewReview {
            stall_id,
            reviewer_name: non_blank(self.reviewer_name),
            comment: non_blank(self.comment),
            hygiene_score,
            hygiene_tags,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// GET /api/stalls/:id/reviews
/// Returns reviews for a stall, newest first
pub async fn get_stall_reviews(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Query(params): Query<ReviewListParams>,
) -> Result<Json<Vec<ReviewItem>>, ApiError> {
    let limit = params.limit.unwrap_or(50).clamp(1, 200);

    let reviews = Review::find_by_stall(id, limit, &state.db_pool).await?;
    Ok(Json(reviews.into_iter().map(Into::into).collect()))
}

/// POST /api/stalls/:id/reviews
/// Stores a review and returns the stall's recomputed hygiene score
pub async fn create_review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(request): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<CreatedReview>), ApiError> {
    let new_review = request.into_new_review(id)?;

    if Stall::find_by_id(id, &state.db_pool).await?.is_none() {
        return Err(ApiError::NotFound("Stall"));
    }

    let review = Review::create(&new_review, &state.db_pool).await?;
    tracing::info!(
        "Review {} added to stall {} (hygiene {}, {} tags)",
        review.id,
        id,
        new_review.hygiene_score,
        new_review.hygiene_tags.len()
    );

    let hygiene = stall_hygiene(&state, id).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedReview {
            review: review.into(),
            hygiene,
        }),
    ))
}
