//! Hygiene tag catalogs and the per-review tag score
//!
//! A review carries a list of short tags describing what the reviewer saw at
//! the stall. Each known tag is worth a fixed number of points, either
//! positive or negative. Unknown tags are ignored.

/// Tags for good hygiene practices and their point values (5-15)
pub const POSITIVE_TAGS: &[(&str, i32)] = &[
    ("gloves_used", 10),
    ("clean_water", 15),
    ("fssai_visible", 15),
    ("clean_utensils", 10),
    ("covered_food", 10),
    ("head_covered", 5),
    ("hand_wash_station", 10),
    ("fresh_ingredients", 10),
    ("clean_surroundings", 10),
    ("waste_bin_present", 5),
];

/// Tags for poor hygiene practices and their point values (-10 to -5)
pub const NEGATIVE_TAGS: &[(&str, i32)] = &[
    ("no_gloves", -10),
    ("no_water_filter", -10),
    ("dirty_utensils", -8),
    ("uncovered_food", -8),
    ("flies_present", -10),
    ("dirty_surroundings", -5),
];

/// Score every non-empty tag list starts from
pub const BASE_TAG_SCORE: f64 = 50.0;

/// Upper bound of a single review's tag score
pub const MAX_TAG_SCORE: f64 = 100.0;

fn lookup(catalog: &[(&str, i32)], tag: &str) -> Option<i32> {
    catalog
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, value)| *value)
}

/// Point value of `tag` if it is a positive tag
pub fn positive_value(tag: &str) -> Option<i32> {
    lookup(POSITIVE_TAGS, tag)
}

/// Point value of `tag` if it is a negative tag
pub fn negative_value(tag: &str) -> Option<i32> {
    lookup(NEGATIVE_TAGS, tag)
}

/// Point value of `tag`, checking the positive catalog first
pub fn tag_value(tag: &str) -> Option<i32> {
    positive_value(tag).or_else(|| negative_value(tag))
}

/// Calculate the tag score (0-100) of a single review
///
/// Missing or empty tag lists score 0. Otherwise the score starts at
/// [`BASE_TAG_SCORE`], every known tag adds its catalog value and the sum is
/// clamped to `0..=100`. The clamp keeps the aggregated score inside 0-5, so
/// it has to stay even if catalog values change.
pub fn calculate_tag_score<S: AsRef<str>>(tags: Option<&[S]>) -> f64 {
    let tags = match tags {
        Some(tags) if !tags.is_empty() => tags,
        _ => return 0.0,
    };

    let points: i32 = tags
        .iter()
        .map(|tag| tag_value(tag.as_ref()).unwrap_or(0))
        .sum();

    (BASE_TAG_SCORE + points as f64).clamp(0.0, MAX_TAG_SCORE)
}
