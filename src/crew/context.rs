//! ContextBuilder — packages profile fields as task context entries.

use serde::{Deserialize, Serialize};

use crate::profile::{FieldValue, ProfileField, UserProfile};

/// Key under which the intake output is handed to the advisor.
pub const PRIOR_OUTPUT_KEY: &str = "context";

/// One piece of task context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub key: String,
    pub value: FieldValue,
    pub description: String,
    pub expected_output: String,
}

impl ContextEntry {
    /// Entry for a profile field, with the fixed description and hint.
    pub fn for_field(field: ProfileField, value: FieldValue) -> Self {
        Self {
            key: field.as_str().to_string(),
            value,
            description: format!("This is the user's {}", field.label()),
            expected_output: format!("Processed {} information", field.label()),
        }
    }

    /// Entry carrying a previous task's output.
    pub fn prior_output(output: impl Into<String>) -> Self {
        Self {
            key: PRIOR_OUTPUT_KEY.to_string(),
            value: FieldValue::Text(output.into()),
            description: "Output of the previous task".to_string(),
            expected_output: "Processed profile summary".to_string(),
        }
    }
}

/// Converts a profile into the ordered context sequence for the intake task.
pub struct ContextBuilder;

impl ContextBuilder {
    /// One entry per required field in collection order, then a `cv_content`
    /// entry only when a CV is present. Empty values are kept as-is.
    pub fn build(profile: &UserProfile) -> Vec<ContextEntry> {
        let mut entries: Vec<ContextEntry> = ProfileField::REQUIRED
            .into_iter()
            .map(|field| ContextEntry::for_field(field, profile.get(field)))
            .collect();

        if let Some(cv) = profile.cv() {
            entries.push(ContextEntry::for_field(
                ProfileField::CvContent,
                FieldValue::Text(cv.to_string()),
            ));
        }

        entries
    }
}
