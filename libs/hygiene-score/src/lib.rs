//! Hygiene score engine
//!
//! Turns the reviews of a street food stall into a single 0-5 hygiene score:
//! - User ratings (70%): the average of the reviewers' 1-5 hygiene ratings
//! - Tag signal (30%): the average per-review tag score (0-100) rescaled to 0-5
//!
//! Everything here is pure and safe to call from any number of requests at
//! once. The tag catalogs are compile-time constants.

pub mod aggregate;
pub mod checklist;
pub mod tags;

pub use aggregate::{
    calculate_aggregated_score, BreakdownStats, HygieneScore, ReviewSignal, ScoreBreakdown,
    ScoredReview, TAG_SCORE_WEIGHT, USER_SCORE_WEIGHT,
};
pub use checklist::{responses_to_tags, ChecklistResponses};
pub use tags::{
    calculate_tag_score, negative_value, positive_value, tag_value, NEGATIVE_TAGS, POSITIVE_TAGS,
};
