//! User profile data model.

use serde::{Deserialize, Serialize};

use crate::error::ProfileError;

/// A field of the user profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    Degree,
    Experience,
    Skills,
    Interests,
    WorkPreference,
    LongTermGoals,
    CvContent,
}

impl ProfileField {
    /// Fields that must be non-empty for the profile to be complete, in
    /// collection order.
    pub const REQUIRED: [ProfileField; 6] = [
        Self::Degree,
        Self::Experience,
        Self::Skills,
        Self::Interests,
        Self::WorkPreference,
        Self::LongTermGoals,
    ];

    /// Every field, required ones first.
    pub const ALL: [ProfileField; 7] = [
        Self::Degree,
        Self::Experience,
        Self::Skills,
        Self::Interests,
        Self::WorkPreference,
        Self::LongTermGoals,
        Self::CvContent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Degree => "degree",
            Self::Experience => "experience",
            Self::Skills => "skills",
            Self::Interests => "interests",
            Self::WorkPreference => "work_preference",
            Self::LongTermGoals => "long_term_goals",
            Self::CvContent => "cv_content",
        }
    }

    /// Human-readable label, e.g. "work preference".
    pub fn label(&self) -> &'static str {
        match self {
            Self::Degree => "degree",
            Self::Experience => "experience",
            Self::Skills => "skills",
            Self::Interests => "interests",
            Self::WorkPreference => "work preference",
            Self::LongTermGoals => "long-term goals",
            Self::CvContent => "CV content",
        }
    }

    /// Whether values of this field are a list of strings.
    pub fn is_list(&self) -> bool {
        matches!(self, Self::Skills)
    }
}

impl std::fmt::Display for ProfileField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProfileField {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| ProfileError::InvalidField {
                field: s.to_string(),
                reason: "unknown profile field".to_string(),
            })
    }
}

/// Value stored in a profile field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::List(items) => items.is_empty(),
        }
    }

    pub fn shape(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::List(_) => "list",
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::List(items) => write!(f, "{}", items.join(", ")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

/// The profile collected during the wizard.
///
/// Lives only for the session; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub degree: String,
    pub experience: String,
    /// Deduplicated, first-seen order.
    pub skills: Vec<String>,
    pub interests: String,
    pub work_preference: String,
    pub long_term_goals: String,
    /// Present only when a CV document was supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cv_content: Option<String>,
}

impl UserProfile {
    /// Read a field as a `FieldValue`. A missing CV reads as empty text.
    pub fn get(&self, field: ProfileField) -> FieldValue {
        match field {
            ProfileField::Degree => FieldValue::Text(self.degree.clone()),
            ProfileField::Experience => FieldValue::Text(self.experience.clone()),
            ProfileField::Skills => FieldValue::List(self.skills.clone()),
            ProfileField::Interests => FieldValue::Text(self.interests.clone()),
            ProfileField::WorkPreference => FieldValue::Text(self.work_preference.clone()),
            ProfileField::LongTermGoals => FieldValue::Text(self.long_term_goals.clone()),
            ProfileField::CvContent => FieldValue::Text(self.cv_content.clone().unwrap_or_default()),
        }
    }

    /// Required fields that are still empty.
    pub fn missing_fields(&self) -> Vec<ProfileField> {
        ProfileField::REQUIRED
            .into_iter()
            .filter(|field| self.get(*field).is_empty())
            .collect()
    }

    /// CV text, if one was supplied and is non-blank.
    pub fn cv(&self) -> Option<&str> {
        self.cv_content
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }

    /// Render the profile for the review step: one `Field: value` line per
    /// field, `NA` for empty values.
    pub fn to_review_lines(&self) -> Vec<String> {
        ProfileField::ALL
            .into_iter()
            .map(|field| {
                let value = self.get(field);
                let shown = if value.is_empty() {
                    "NA".to_string()
                } else {
                    value.to_string()
                };
                format!("{}: {}", capitalize(field.label()), shown)
            })
            .collect()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
