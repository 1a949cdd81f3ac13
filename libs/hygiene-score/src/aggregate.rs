//! Per-stall hygiene score aggregation
//!
//! Blends the reviewers' own 1-5 hygiene ratings with the signal from their
//! hygiene tags:
//!
//! `score = avg_user_score * 0.7 + (avg_tag_score / 100 * 5) * 0.3`

use serde::Serialize;

use crate::tags::{calculate_tag_score, negative_value, positive_value, MAX_TAG_SCORE};

/// Weight of the averaged user ratings
pub const USER_SCORE_WEIGHT: f64 = 0.7;

/// Weight of the averaged tag score after rescaling to 0-5
pub const TAG_SCORE_WEIGHT: f64 = 0.3;

/// Top of the user rating scale
pub const MAX_USER_SCORE: f64 = 5.0;

/// Hygiene fields the aggregator reads from a review
pub trait ScoredReview {
    /// Overall 1-5 hygiene rating, if the reviewer gave one
    fn hygiene_score(&self) -> Option<i32>;

    /// Hygiene tags attached to the review
    fn hygiene_tags(&self) -> Option<&[String]>;
}

/// Owned review signal for callers that have no row type of their own
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewSignal {
    pub hygiene_score: Option<i32>,
    pub hygiene_tags: Option<Vec<String>>,
}

impl ReviewSignal {
    pub fn new<I, S>(hygiene_score: i32, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hygiene_score: Some(hygiene_score),
            hygiene_tags: Some(tags.into_iter().map(Into::into).collect()),
        }
    }
}

impl ScoredReview for ReviewSignal {
    fn hygiene_score(&self) -> Option<i32> {
        self.hygiene_score
    }

    fn hygiene_tags(&self) -> Option<&[String]> {
        self.hygiene_tags.as_deref()
    }
}

/// Aggregated hygiene score of a stall
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HygieneScore {
    /// 0.0 without reviews, otherwise 0-5 rounded to one decimal
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

/// Figures the score was derived from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub total_reviews: usize,
    /// Absent when there are no reviews
    #[serde(flatten)]
    pub stats: Option<BreakdownStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownStats {
    /// Average user rating, one decimal
    pub avg_user_score: f64,
    /// Average tag score (0-100), whole number
    pub avg_tag_score: u32,
    pub positive_tag_count: u32,
    pub negative_tag_count: u32,
}

impl HygieneScore {
    /// Result for a stall nobody has reviewed yet
    pub fn unrated() -> Self {
        Self {
            score: 0.0,
            breakdown: ScoreBreakdown {
                total_reviews: 0,
                stats: None,
            },
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Calculate the aggregated hygiene score for all reviews of one stall
///
/// Missing ratings count as 0 and missing tag lists add nothing to the tag
/// total, but both reviews still count towards the averages.
pub fn calculate_aggregated_score<R: ScoredReview>(reviews: &[R]) -> HygieneScore {
    if reviews.is_empty() {
        return HygieneScore::unrated();
    }

    let mut total_score: i64 = 0;
    let mut total_tag_score = 0.0;
    let mut positive_tag_count: u32 = 0;
    let mut negative_tag_count: u32 = 0;

    for review in reviews {
        total_score += i64::from(review.hygiene_score().unwrap_or(0));

        if let Some(tags) = review.hygiene_tags() {
            total_tag_score += calculate_tag_score(Some(tags));

            for tag in tags {
                if positive_value(tag).is_some() {
                    positive_tag_count += 1;
                }
                if negative_value(tag).is_some() {
                    negative_tag_count += 1;
                }
            }
        }
    }

    let review_count = reviews.len() as f64;
    let avg_score = total_score as f64 / review_count;
    let avg_tag_score = total_tag_score / review_count;
    let tag_score_normalized = (avg_tag_score / MAX_TAG_SCORE) * MAX_USER_SCORE;
    let final_score = avg_score * USER_SCORE_WEIGHT + tag_score_normalized * TAG_SCORE_WEIGHT;

    HygieneScore {
        score: round_to(final_score, 1),
        breakdown: ScoreBreakdown {
            total_reviews: reviews.len(),
            stats: Some(BreakdownStats {
                avg_user_score: round_to(avg_score, 1),
                avg_tag_score: avg_tag_score.round() as u32,
                positive_tag_count,
                negative_tag_count,
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::tags::{NEGATIVE_TAGS, POSITIVE_TAGS};

    fn stats(result: &HygieneScore) -> &BreakdownStats {
        result.breakdown.stats.as_ref().expect("stats for rated stall")
    }

    #[test]
    fn test_no_reviews() {
        let reviews: Vec<ReviewSignal> = vec![];
        let result = calculate_aggregated_score(&reviews);

        assert_eq!(result.score, 0.0);
        assert_eq!(result.breakdown.total_reviews, 0);
        assert!(result.breakdown.stats.is_none());
    }

    #[test]
    fn test_two_good_reviews() {
        let reviews = vec![
            ReviewSignal::new(5, ["gloves_used", "clean_water", "fssai_visible"]),
            ReviewSignal::new(4, ["gloves_used", "clean_utensils"]),
        ];

        let result = calculate_aggregated_score(&reviews);

        assert!(result.score > 4.0);
        assert_eq!(result.breakdown.total_reviews, 2);
        assert_eq!(stats(&result).positive_tag_count, 5);
        assert_eq!(stats(&result).negative_tag_count, 0);
        assert_eq!(stats(&result).avg_user_score, 4.5);
        // (90 + 70) / 2
        assert_eq!(stats(&result).avg_tag_score, 80);
    }

    #[test]
    fn test_weighting() {
        // tag score 60 -> 3.0 normalized -> 3 * 0.7 + 3.0 * 0.3
        let reviews = vec![ReviewSignal::new(3, ["gloves_used", "unknown_tag"])];
        let result = calculate_aggregated_score(&reviews);

        assert!((result.score - 3.0).abs() < 1e-9);
        assert_eq!(stats(&result).avg_tag_score, 60);
        assert_eq!(stats(&result).positive_tag_count, 1);
    }

    #[test]
    fn test_negative_tags_counted() {
        let reviews = vec![ReviewSignal::new(
            2,
            ["no_gloves", "flies_present", "gloves_used", "mystery"],
        )];
        let result = calculate_aggregated_score(&reviews);

        assert_eq!(stats(&result).positive_tag_count, 1);
        assert_eq!(stats(&result).negative_tag_count, 2);
        // 50 - 10 - 10 + 10
        assert_eq!(stats(&result).avg_tag_score, 40);
        // 2 * 0.7 + 2.0 * 0.3
        assert!((result.score - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_fields_contribute_zero() {
        let reviews = vec![
            ReviewSignal {
                hygiene_score: None,
                hygiene_tags: None,
            },
            ReviewSignal {
                hygiene_score: Some(4),
                hygiene_tags: Some(vec![]),
            },
        ];
        let result = calculate_aggregated_score(&reviews);

        assert_eq!(result.breakdown.total_reviews, 2);
        assert_eq!(stats(&result).avg_user_score, 2.0);
        assert_eq!(stats(&result).avg_tag_score, 0);
        // 2 * 0.7
        assert!((result.score - 1.4).abs() < 1e-9);
    }

    #[test]
    fn test_json_shape() {
        let reviews: Vec<ReviewSignal> = vec![];
        assert_eq!(
            serde_json::to_value(calculate_aggregated_score(&reviews)).unwrap(),
            json!({ "score": 0.0, "breakdown": { "totalReviews": 0 } })
        );

        let reviews = vec![ReviewSignal::new(4, ["gloves_used"])];
        assert_eq!(
            serde_json::to_value(calculate_aggregated_score(&reviews)).unwrap(),
            json!({
                "score": 3.7,
                "breakdown": {
                    "totalReviews": 1,
                    "avgUserScore": 4.0,
                    "avgTagScore": 60,
                    "positiveTagCount": 1,
                    "negativeTagCount": 0
                }
            })
        );
    }

    #[test]
    fn test_inputs_untouched() {
        let reviews = vec![ReviewSignal::new(3, ["no_gloves", "clean_water"])];
        let before = reviews.clone();
        calculate_aggregated_score(&reviews);
        assert_eq!(reviews, before);
    }

    fn any_tag() -> impl Strategy<Value = String> {
        let known: Vec<String> = POSITIVE_TAGS
            .iter()
            .chain(NEGATIVE_TAGS.iter())
            .map(|(t, _)| t.to_string())
            .collect();
        prop_oneof![
            4 => proptest::sample::select(known),
            1 => "[a-z_]{1,12}",
        ]
    }

    fn any_review() -> impl Strategy<Value = ReviewSignal> {
        (
            proptest::option::weighted(0.9, 1..=5i32),
            proptest::option::weighted(0.9, proptest::collection::vec(any_tag(), 0..12)),
        )
            .prop_map(|(hygiene_score, hygiene_tags)| ReviewSignal {
                hygiene_score,
                hygiene_tags,
            })
    }

    fn any_positive_tags() -> impl Strategy<Value = Vec<String>> {
        let positive: Vec<String> = POSITIVE_TAGS.iter().map(|(t, _)| t.to_string()).collect();
        proptest::collection::vec(proptest::sample::select(positive), 1..6)
    }

    proptest! {
        #[test]
        fn tag_score_is_bounded(tags in proptest::collection::vec(any_tag(), 0..30)) {
            let score = calculate_tag_score(Some(&tags[..]));
            prop_assert!((0.0..=100.0).contains(&score));
        }

        #[test]
        fn aggregated_score_is_bounded(reviews in proptest::collection::vec(any_review(), 0..20)) {
            let result = calculate_aggregated_score(&reviews);
            prop_assert!((0.0..=5.0).contains(&result.score));
            prop_assert_eq!(result.breakdown.total_reviews, reviews.len());
        }

        #[test]
        fn aggregation_is_repeatable(reviews in proptest::collection::vec(any_review(), 0..20)) {
            let first = calculate_aggregated_score(&reviews);
            let second = calculate_aggregated_score(&reviews);
            prop_assert_eq!(first.score.to_bits(), second.score.to_bits());
            prop_assert_eq!(first, second);
        }

        #[test]
        fn perfect_review_never_lowers_user_average(
            reviews in proptest::collection::vec(any_review(), 1..20),
            tags in any_positive_tags(),
        ) {
            let before = calculate_aggregated_score(&reviews);

            let mut extended = reviews.clone();
            extended.push(ReviewSignal {
                hygiene_score: Some(5),
                hygiene_tags: Some(tags),
            });
            let after = calculate_aggregated_score(&extended);

            let before_avg = before.breakdown.stats.as_ref().map(|s| s.avg_user_score).unwrap_or(0.0);
            let after_avg = after.breakdown.stats.as_ref().map(|s| s.avg_user_score).unwrap_or(0.0);
            prop_assert!(after_avg >= before_avg);
        }
    }
}
