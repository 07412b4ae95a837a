//! CareerSession — the per-user owner of profile, wizard and pipeline.
//!
//! Nothing here is shared between sessions. Interaction surfaces hold a
//! `&mut CareerSession` and drive it.

use std::path::Path;

use tracing::{info, warn};
use uuid::Uuid;

use crate::crew::{AgentPipeline, Recommendation, RetryPolicy, run_with_retry};
use crate::error::{Error, SessionError};
use crate::ingest;
use crate::profile::{FieldValue, ProfileField, ProfileStore};
use crate::wizard::StepWizard;

pub struct CareerSession {
    id: Uuid,
    profile: ProfileStore,
    wizard: StepWizard,
    pipeline: AgentPipeline,
    allow_incomplete: bool,
    retry: Option<RetryPolicy>,
}

impl CareerSession {
    pub fn new(pipeline: AgentPipeline) -> Self {
        Self {
            id: Uuid::new_v4(),
            profile: ProfileStore::new(),
            wizard: StepWizard::new(),
            pipeline,
            allow_incomplete: false,
            retry: None,
        }
    }

    /// Let `submit` run with empty required fields ("not provided").
    pub fn allow_incomplete(mut self, allow: bool) -> Self {
        self.allow_incomplete = allow;
        self
    }

    /// Retry whole pipeline runs on provider failures.
    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn profile(&self) -> &ProfileStore {
        &self.profile
    }

    pub fn profile_mut(&mut self) -> &mut ProfileStore {
        &mut self.profile
    }

    pub fn wizard(&self) -> &StepWizard {
        &self.wizard
    }

    pub fn wizard_mut(&mut self) -> &mut StepWizard {
        &mut self.wizard
    }

    pub fn pipeline(&self) -> &AgentPipeline {
        &self.pipeline
    }

    pub fn allows_incomplete(&self) -> bool {
        self.allow_incomplete
    }

    /// Clear the form: empty profile, back to the first step.
    pub fn reset(&mut self) {
        self.profile.reset();
        self.wizard.reset();
        info!(session = %self.id, "Session form reset");
    }

    /// Ingest a CV document and store its text on the profile.
    pub async fn attach_cv(&mut self, path: &Path, mime: Option<&str>) -> Result<usize, Error> {
        let text = ingest::ingest_document(path, mime).await?;
        let chars = text.chars().count();
        self.profile
            .set(ProfileField::CvContent, FieldValue::Text(text))?;
        Ok(chars)
    }

    /// Required fields that are still empty, by name.
    pub fn missing_fields(&self) -> Vec<String> {
        self.profile
            .profile()
            .missing_fields()
            .into_iter()
            .map(|field| field.to_string())
            .collect()
    }

    /// Run the pipeline over the current profile.
    ///
    /// Refuses an incomplete profile unless incomplete submissions are
    /// allowed.
    pub async fn submit(&mut self) -> Result<Recommendation, SessionError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            if !self.allow_incomplete {
                return Err(SessionError::IncompleteProfile { missing });
            }
            warn!(session = %self.id, missing = ?missing, "Submitting incomplete profile");
        }

        info!(session = %self.id, "Submitting profile");
        let profile = self.profile.profile().clone();
        let recommendation = match &self.retry {
            Some(policy) => run_with_retry(&mut self.pipeline, &profile, policy).await?,
            None => self.pipeline.run(&profile).await?,
        };
        Ok(recommendation)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use super::*;
    use crate::crew::pipeline::tests::{ScriptedProvider, complete_profile};
    use crate::crew::PipelineState;
    use crate::error::{CompletionError, IngestError, PipelineError};
    use crate::wizard::StepId;

    fn session(provider: std::sync::Arc<ScriptedProvider>) -> CareerSession {
        CareerSession::new(AgentPipeline::new(provider, true, true))
    }

    fn fill(session: &mut CareerSession) {
        let p = complete_profile();
        let store = session.profile_mut();
        store.set(ProfileField::Degree, p.degree.into()).unwrap();
        store.set(ProfileField::Experience, p.experience.into()).unwrap();
        store.append_skills(p.skills);
        store.set(ProfileField::Interests, p.interests.into()).unwrap();
        store
            .set(ProfileField::WorkPreference, p.work_preference.into())
            .unwrap();
        store
            .set(ProfileField::LongTermGoals, p.long_term_goals.into())
            .unwrap();
    }

    #[tokio::test]
    async fn incomplete_profile_is_refused_without_calling_provider() {
        let provider = ScriptedProvider::new(vec![]);
        let mut session = session(provider.clone());
        session
            .profile_mut()
            .set(ProfileField::Degree, "BSc".into())
            .unwrap();

        let err = session.submit().await.unwrap_err();
        match err {
            SessionError::IncompleteProfile { missing } => {
                assert_eq!(missing.len(), 5);
                assert!(!missing.contains(&"degree".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn override_runs_incomplete_profile() {
        let provider = ScriptedProvider::new(vec![Ok("s".into()), Ok("r".into())]);
        let mut session = session(provider.clone()).allow_incomplete(true);

        let rec = session.submit().await.unwrap();
        assert_eq!(rec.content, "r");
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn complete_profile_submits() {
        let provider = ScriptedProvider::new(vec![Ok("s".into()), Ok("r".into())]);
        let mut session = session(provider);
        fill(&mut session);

        session.submit().await.unwrap();
        assert_eq!(
            session.pipeline().state(),
            PipelineState::RecommendationDone
        );
    }

    #[tokio::test]
    async fn retry_policy_is_applied() {
        let provider = ScriptedProvider::new(vec![
            Err(CompletionError::Timeout(Duration::from_secs(1))),
            Ok("s".into()),
            Ok("r".into()),
        ]);
        let policy = RetryPolicy {
            max_retries: 1,
            initial_delay: Duration::ZERO,
            jitter: false,
            ..Default::default()
        };
        let mut session = session(provider.clone()).with_retry(policy);
        fill(&mut session);

        session.submit().await.unwrap();
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn pipeline_errors_pass_through() {
        let provider = ScriptedProvider::new(vec![Err(CompletionError::Unavailable(
            "down".into(),
        ))]);
        let mut session = session(provider);
        fill(&mut session);

        let err = session.submit().await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Pipeline(PipelineError::Provider(_))
        ));
    }

    #[tokio::test]
    async fn reset_clears_profile_and_wizard() {
        let mut session = session(ScriptedProvider::new(vec![]));
        fill(&mut session);
        session.wizard_mut().jump_to("review").unwrap();

        session.reset();
        assert!(!session.profile().is_complete());
        assert_eq!(session.profile().profile(), &Default::default());
        assert_eq!(session.wizard().current_step(), StepId::Introduction);
    }

    #[tokio::test]
    async fn submission_after_reset_carries_no_agent_memory() {
        let provider = ScriptedProvider::new(vec![
            Ok("summary of the first applicant".into()),
            Ok("advice for the first applicant".into()),
            Ok("summary of the second applicant".into()),
            Ok("advice for the second applicant".into()),
        ]);
        let mut session = session(provider.clone());
        fill(&mut session);
        session.submit().await.unwrap();

        session.reset();
        fill(&mut session);
        session.submit().await.unwrap();

        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls.len(), 4);
        assert!(calls[2].history.is_empty());
        assert!(calls[3].history.is_empty());
        assert!(!calls[3].prompt().contains("first applicant"));
    }

    #[tokio::test]
    async fn attach_cv_stores_document_text() {
        let mut session = session(ScriptedProvider::new(vec![]));
        let mut file = tempfile::Builder::new().suffix(".md").tempfile().unwrap();
        write!(file, "# Jane Doe\nRust, Go").unwrap();

        let chars = session.attach_cv(file.path(), None).await.unwrap();
        assert_eq!(chars, 19);
        assert_eq!(
            session.profile().profile().cv(),
            Some("# Jane Doe\nRust, Go")
        );
    }

    #[tokio::test]
    async fn attach_cv_rejects_pdf() {
        let mut session = session(ScriptedProvider::new(vec![]));
        let file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();

        let err = session.attach_cv(file.path(), None).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Ingest(IngestError::UnsupportedFormat(_))
        ));
        assert!(session.profile().profile().cv().is_none());
    }
}
