//! ProfileStore — the in-progress profile with shape-checked mutation.

use tracing::debug;

use crate::error::ProfileError;

use super::model::{FieldValue, ProfileField, UserProfile};

/// Mutable holder of the session's profile.
///
/// Only checks value shape (text vs list). Free text is accepted as-is.
#[derive(Debug, Clone, Default)]
pub struct ProfileStore {
    profile: UserProfile,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only view of the current profile.
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn get(&self, field: ProfileField) -> FieldValue {
        self.profile.get(field)
    }

    /// Replace a field's value.
    ///
    /// `skills` takes a list (deduplicated on the way in); every other field
    /// takes text. Setting `cv_content` to blank text removes the CV.
    pub fn set(&mut self, field: ProfileField, value: FieldValue) -> Result<(), ProfileError> {
        match (field, value) {
            (ProfileField::Skills, FieldValue::List(items)) => {
                self.profile.skills.clear();
                merge_skills(&mut self.profile.skills, items);
            }
            (ProfileField::CvContent, FieldValue::Text(text)) => {
                self.profile.cv_content = if text.trim().is_empty() {
                    None
                } else {
                    Some(text)
                };
            }
            (ProfileField::Degree, FieldValue::Text(text)) => self.profile.degree = text,
            (ProfileField::Experience, FieldValue::Text(text)) => self.profile.experience = text,
            (ProfileField::Interests, FieldValue::Text(text)) => self.profile.interests = text,
            (ProfileField::WorkPreference, FieldValue::Text(text)) => {
                self.profile.work_preference = text
            }
            (ProfileField::LongTermGoals, FieldValue::Text(text)) => {
                self.profile.long_term_goals = text
            }
            (field, value) => {
                let expected = if field.is_list() { "list" } else { "text" };
                return Err(ProfileError::InvalidField {
                    field: field.to_string(),
                    reason: format!("expected {expected}, got {}", value.shape()),
                });
            }
        }
        debug!(field = %field, "Profile field updated");
        Ok(())
    }

    /// Like [`set`](Self::set) but addressed by field name.
    pub fn set_named(&mut self, field: &str, value: FieldValue) -> Result<(), ProfileError> {
        let field: ProfileField = field.parse()?;
        self.set(field, value)
    }

    /// Merge skills into the existing set, keeping first-seen order.
    pub fn append_skills<I, S>(&mut self, skills: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        merge_skills(&mut self.profile.skills, skills);
    }

    /// True iff every required field is non-empty. The CV is never required.
    pub fn is_complete(&self) -> bool {
        self.profile.missing_fields().is_empty()
    }

    /// Clear every field back to its default.
    pub fn reset(&mut self) {
        self.profile = UserProfile::default();
        debug!("Profile reset");
    }
}

fn merge_skills<I, S>(existing: &mut Vec<String>, incoming: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    for skill in incoming {
        let skill: String = skill.into();
        let skill = skill.trim();
        if skill.is_empty() || existing.iter().any(|s| s == skill) {
            continue;
        }
        existing.push(skill.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_store() -> ProfileStore {
        let mut store = ProfileStore::new();
        store.set(ProfileField::Degree, "BSc CS".into()).unwrap();
        store.set(ProfileField::Experience, "1 internship".into()).unwrap();
        store.append_skills(["Python"]);
        store.set(ProfileField::Interests, "ML".into()).unwrap();
        store.set(ProfileField::WorkPreference, "team".into()).unwrap();
        store.set(ProfileField::LongTermGoals, "SWE role".into()).unwrap();
        store
    }

    #[test]
    fn append_skills_dedups_and_keeps_order() {
        let mut store = ProfileStore::new();
        store.append_skills(["Python", "Python", "Go"]);
        assert_eq!(store.profile().skills, vec!["Python", "Go"]);

        store.append_skills(["Go", "Rust"]);
        assert_eq!(store.profile().skills, vec!["Python", "Go", "Rust"]);
    }

    #[test]
    fn append_skills_ignores_blank_entries() {
        let mut store = ProfileStore::new();
        store.append_skills([" Java ", "", "  "]);
        assert_eq!(store.profile().skills, vec!["Java"]);
    }

    #[test]
    fn set_skills_replaces_and_dedups() {
        let mut store = ProfileStore::new();
        store.append_skills(["C++"]);
        store
            .set(
                ProfileField::Skills,
                FieldValue::List(vec!["Go".into(), "Go".into(), "Rust".into()]),
            )
            .unwrap();
        assert_eq!(store.profile().skills, vec!["Go", "Rust"]);
    }

    #[test]
    fn shape_mismatch_is_invalid_field() {
        let mut store = ProfileStore::new();
        let err = store
            .set(ProfileField::Skills, "Python, Go".into())
            .unwrap_err();
        assert!(matches!(err, ProfileError::InvalidField { ref field, .. } if field == "skills"));

        let err = store
            .set(ProfileField::Degree, FieldValue::List(vec!["BSc".into()]))
            .unwrap_err();
        assert!(err.to_string().contains("expected text, got list"));
        assert!(store.profile().degree.is_empty());
    }

    #[test]
    fn unknown_field_name_is_invalid_field() {
        let mut store = ProfileStore::new();
        let err = store.set_named("salary", "lots".into()).unwrap_err();
        assert!(matches!(err, ProfileError::InvalidField { ref field, .. } if field == "salary"));

        store.set_named("interests", "robotics".into()).unwrap();
        assert_eq!(store.get(ProfileField::Interests), FieldValue::from("robotics"));
    }

    #[test]
    fn completeness_ignores_cv() {
        let store = complete_store();
        assert!(store.is_complete());
        assert!(store.profile().cv_content.is_none());
    }

    #[test]
    fn blank_required_field_is_incomplete() {
        let mut store = complete_store();
        store.set(ProfileField::Interests, "   ".into()).unwrap();
        assert!(!store.is_complete());
        assert_eq!(store.profile().missing_fields(), vec![ProfileField::Interests]);
    }

    #[test]
    fn cv_is_present_only_when_supplied() {
        let mut store = ProfileStore::new();
        store.set(ProfileField::CvContent, "Jane Doe\nRust dev".into()).unwrap();
        assert_eq!(store.profile().cv(), Some("Jane Doe\nRust dev"));

        store.set(ProfileField::CvContent, "".into()).unwrap();
        assert!(store.profile().cv_content.is_none());
        assert_eq!(store.get(ProfileField::CvContent), FieldValue::from(""));
    }

    #[test]
    fn reset_restores_defaults() {
        let mut store = complete_store();
        store.set(ProfileField::CvContent, "cv".into()).unwrap();
        store.reset();
        assert!(!store.is_complete());
        assert_eq!(store.profile(), &UserProfile::default());
        for field in ProfileField::ALL {
            assert!(store.get(field).is_empty(), "{field} should be empty");
        }
    }
}
