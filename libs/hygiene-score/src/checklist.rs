//! Yes/no hygiene checklist answered while submitting a review

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

/// Answers to the four checklist questions
///
/// `None` means the question was skipped. When deserializing, `null`, a
/// missing key or any non-boolean value all become `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistResponses {
    #[serde(default, deserialize_with = "lenient_bool")]
    pub vendor_wears_gloves: Option<bool>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub filtered_water_visible: Option<bool>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub clean_utensils: Option<bool>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub covered_food_storage: Option<bool>,
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(JsonValue::deserialize(deserializer)?.as_bool())
}

/// (answer, tag when true, tag when false) in question order
fn questions(responses: &ChecklistResponses) -> [(Option<bool>, &'static str, &'static str); 4] {
    [
        (responses.vendor_wears_gloves, "gloves_used", "no_gloves"),
        (responses.filtered_water_visible, "clean_water", "no_water_filter"),
        (responses.clean_utensils, "clean_utensils", "dirty_utensils"),
        (responses.covered_food_storage, "covered_food", "uncovered_food"),
    ]
}

/// Convert checklist answers into hygiene tags
///
/// Tags follow the fixed question order: gloves, water, utensils, food
/// covering. Unanswered questions produce no tag.
pub fn responses_to_tags(responses: &ChecklistResponses) -> Vec<&'static str> {
    questions(responses)
        .into_iter()
        .filter_map(|(answer, yes, no)| answer.map(|a| if a { yes } else { no }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::{negative_value, positive_value};

    #[test]
    fn test_mixed_answers_keep_order() {
        let responses = ChecklistResponses {
            vendor_wears_gloves: Some(true),
            filtered_water_visible: Some(false),
            clean_utensils: None,
            covered_food_storage: Some(true),
        };

        assert_eq!(
            responses_to_tags(&responses),
            vec!["gloves_used", "no_water_filter", "covered_food"]
        );
    }

    #[test]
    fn test_unanswered_checklist_is_empty() {
        assert!(responses_to_tags(&ChecklistResponses::default()).is_empty());
    }

    #[test]
    fn test_derived_tags_are_in_catalogs() {
        let yes = ChecklistResponses {
            vendor_wears_gloves: Some(true),
            filtered_water_visible: Some(true),
            clean_utensils: Some(true),
            covered_food_storage: Some(true),
        };
        let no = ChecklistResponses {
            vendor_wears_gloves: Some(false),
            filtered_water_visible: Some(false),
            clean_utensils: Some(false),
            covered_food_storage: Some(false),
        };

        let yes_tags = responses_to_tags(&yes);
        let no_tags = responses_to_tags(&no);
        assert_eq!(yes_tags.len(), 4);
        assert_eq!(no_tags.len(), 4);
        assert!(yes_tags.iter().all(|t| positive_value(t).is_some()));
        assert!(no_tags.iter().all(|t| negative_value(t).is_some()));
    }

    #[test]
    fn test_lenient_deserialization() {
        let responses: ChecklistResponses = serde_json::from_str(
            r#"{
                "vendor_wears_gloves": true,
                "filtered_water_visible": null,
                "clean_utensils": "yes",
                "unrelated": 3
            }"#,
        )
        .unwrap();

        assert_eq!(responses.vendor_wears_gloves, Some(true));
        assert_eq!(responses.filtered_water_visible, None);
        assert_eq!(responses.clean_utensils, None);
        assert_eq!(responses.covered_food_storage, None);
        assert_eq!(responses_to_tags(&responses), vec!["gloves_used"]);
    }
}
