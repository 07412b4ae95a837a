//! AgentPipeline — runs the intake task, then the recommendation task.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{Instrument, debug, error, info, info_span};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::PipelineError;
use crate::profile::UserProfile;

use super::agent::Agent;
use super::completion::{CompletionCall, CompletionProvider};
use super::context::ContextBuilder;
use super::task::AgentTask;

/// Per-run pipeline state.
///
/// Progresses linearly: Idle → ContextBuilt → IntakeDone →
/// RecommendationDone. Any non-terminal state may fall to Failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    #[default]
    Idle,
    ContextBuilt,
    IntakeDone,
    RecommendationDone,
    Failed,
}

impl PipelineState {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: PipelineState) -> bool {
        use PipelineState::*;
        matches!(
            (self, target),
            (Idle, ContextBuilt)
                | (ContextBuilt, IntakeDone)
                | (IntakeDone, RecommendationDone)
                | (Idle | ContextBuilt | IntakeDone, Failed)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::RecommendationDone | Self::Failed)
    }
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::ContextBuilt => "context_built",
            Self::IntakeDone => "intake_done",
            Self::RecommendationDone => "recommendation_done",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// The advisor's answer for one successful run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub run_id: Uuid,
    pub content: String,
    pub generated_at: DateTime<Utc>,
}

/// Two-agent crew: the intake agent summarizes the profile, the advisor
/// turns that summary into ranked career recommendations.
///
/// Both agents are built fresh at the start of every run, so no run sees
/// another run's exchanges.
pub struct AgentPipeline {
    provider: Arc<dyn CompletionProvider>,
    intake_memory: bool,
    advisor_memory: bool,
    state: PipelineState,
    transitions: Vec<PipelineState>,
}

impl AgentPipeline {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        intake_memory: bool,
        advisor_memory: bool,
    ) -> Self {
        Self {
            provider,
            intake_memory,
            advisor_memory,
            state: PipelineState::Idle,
            transitions: vec![PipelineState::Idle],
        }
    }

    /// Pipeline with the configured memory flags.
    pub fn from_config(provider: Arc<dyn CompletionProvider>, config: &AppConfig) -> Self {
        Self::new(provider, config.intake_memory, config.advisor_memory)
    }

    /// State reached by the most recent run.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// States visited by the most recent run, starting at Idle.
    pub fn transitions(&self) -> &[PipelineState] {
        &self.transitions
    }

    /// Run both tasks in order. Never retries.
    ///
    /// A failed recommendation discards the intake output.
    pub async fn run(&mut self, profile: &UserProfile) -> Result<Recommendation, PipelineError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("pipeline_run", run_id = %run_id);
        self.state = PipelineState::Idle;
        self.transitions = vec![PipelineState::Idle];

        let result = self.run_inner(run_id, profile).instrument(span.clone()).await;
        if let Err(e) = &result {
            span.in_scope(|| error!(state = %self.state, error = %e, "Pipeline run failed"));
            self.transition(PipelineState::Failed);
        }
        result
    }

    async fn run_inner(
        &mut self,
        run_id: Uuid,
        profile: &UserProfile,
    ) -> Result<Recommendation, PipelineError> {
        let context = ContextBuilder::build(profile);
        info!(entries = context.len(), has_cv = profile.cv().is_some(), "Context built");
        let mut intake = Agent::intake(self.intake_memory);
        let advisor = Agent::advisor(self.advisor_memory);
        let intake_task = AgentTask::intake(context)?;
        self.transition(PipelineState::ContextBuilt);

        let intake_call = CompletionCall::new(&intake, &intake_task)?;
        let intake_prompt = intake_call.prompt();
        let intake_output = self.provider.complete(intake_call).await?;
        debug!(output = %intake_output, "Intake task output");
        intake.remember(&intake_prompt, &intake_output);
        self.transition(PipelineState::IntakeDone);

        let recommendation_task = AgentTask::recommendation(&intake_output)?;
        let advisor_call = CompletionCall::new(&advisor, &recommendation_task)?;
        let content = self.provider.complete(advisor_call).await?;
        self.transition(PipelineState::RecommendationDone);

        info!(chars = content.len(), "Recommendation generated");
        Ok(Recommendation {
            run_id,
            content,
            generated_at: Utc::now(),
        })
    }

    fn transition(&mut self, target: PipelineState) {
        debug_assert!(
            self.state.can_transition_to(target),
            "invalid pipeline transition {} -> {}",
            self.state,
            target
        );
        debug!(from = %self.state, to = %target, "Pipeline transition");
        self.state = target;
        self.transitions.push(target);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::crew::agent::AgentRole;
    use crate::crew::context::PRIOR_OUTPUT_KEY;
    use crate::crew::task::TaskKind;
    use crate::error::CompletionError;
    use crate::profile::FieldValue;

    /// Provider that replays scripted results and records every call.
    pub(crate) struct ScriptedProvider {
        replies: Mutex<VecDeque<Result<String, CompletionError>>>,
        pub(crate) calls: Mutex<Vec<CompletionCall>>,
    }

    impl ScriptedProvider {
        pub(crate) fn new(replies: Vec<Result<String, CompletionError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedProvider {
        async fn complete(&self, call: CompletionCall) -> Result<String, CompletionError> {
            self.calls.lock().unwrap().push(call);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(CompletionError::Unavailable("script exhausted".into())))
        }
    }

    pub(crate) fn complete_profile() -> UserProfile {
        UserProfile {
            degree: "BSc Computer Science".to_string(),
            experience: "Summer internship at a fintech".to_string(),
            skills: vec!["Python".to_string(), "SQL".to_string()],
            interests: "Data pipelines".to_string(),
            work_preference: "Small team, remote".to_string(),
            long_term_goals: "Lead a data platform team".to_string(),
            cv_content: None,
        }
    }

    fn pipeline(provider: Arc<ScriptedProvider>) -> AgentPipeline {
        AgentPipeline::new(provider, true, true)
    }

    #[tokio::test]
    async fn complete_profile_runs_both_tasks_in_order() {
        let provider = ScriptedProvider::new(vec![
            Ok("Summary: data-minded graduate".to_string()),
            Ok("1. Data Science/Analytics".to_string()),
        ]);
        let mut pipeline = pipeline(provider.clone());

        let rec = pipeline.run(&complete_profile()).await.unwrap();
        assert_eq!(rec.content, "1. Data Science/Analytics");
        assert_eq!(provider.call_count(), 2);

        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls[0].task.kind(), TaskKind::Intake);
        assert_eq!(calls[0].context().len(), 6);
        assert_eq!(calls[1].role, "Career Exploration Expert");
        let second = calls[1].context();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].key, PRIOR_OUTPUT_KEY);
        assert_eq!(
            second[0].value,
            FieldValue::from("Summary: data-minded graduate")
        );

        assert_eq!(
            pipeline.transitions(),
            &[
                PipelineState::Idle,
                PipelineState::ContextBuilt,
                PipelineState::IntakeDone,
                PipelineState::RecommendationDone,
            ]
        );
    }

    #[tokio::test]
    async fn first_call_failure_stops_the_run() {
        let provider = ScriptedProvider::new(vec![Err(CompletionError::Unavailable(
            "connection refused".into(),
        ))]);
        let mut pipeline = pipeline(provider.clone());

        let err = pipeline.run(&complete_profile()).await.unwrap_err();
        assert!(matches!(err, PipelineError::Provider(_)));
        assert_eq!(provider.call_count(), 1);
        assert_eq!(
            pipeline.transitions(),
            &[
                PipelineState::Idle,
                PipelineState::ContextBuilt,
                PipelineState::Failed,
            ]
        );
    }

    #[tokio::test]
    async fn second_call_failure_discards_intake_output() {
        let provider = ScriptedProvider::new(vec![
            Ok("Summary".to_string()),
            Err(CompletionError::Timeout(std::time::Duration::from_secs(1))),
            Ok("Fresh summary".to_string()),
            Ok("Recommendations".to_string()),
        ]);
        let mut pipeline = pipeline(provider.clone());

        let err = pipeline.run(&complete_profile()).await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(pipeline.state(), PipelineState::Failed);
        assert_eq!(pipeline.transitions()[2], PipelineState::IntakeDone);

        pipeline.run(&complete_profile()).await.unwrap();
        let calls = provider.calls.lock().unwrap();
        assert!(calls[2].history.is_empty());
        assert_eq!(
            calls[3].context()[0].value,
            FieldValue::from("Fresh summary")
        );
    }

    #[tokio::test]
    async fn empty_profile_still_runs() {
        let provider = ScriptedProvider::new(vec![
            Ok("Nothing provided".to_string()),
            Ok("Explore broadly".to_string()),
        ]);
        let mut pipeline = pipeline(provider.clone());

        pipeline.run(&UserProfile::default()).await.unwrap();
        let calls = provider.calls.lock().unwrap();
        let context = calls[0].context();
        assert_eq!(context.len(), 6);
        assert!(context.iter().all(|e| e.value.is_empty()));
        assert!(context.iter().all(|e| e.key != "cv_content"));
    }

    #[tokio::test]
    async fn cv_is_passed_to_intake() {
        let provider = ScriptedProvider::new(vec![Ok("s".into()), Ok("r".into())]);
        let mut pipeline = pipeline(provider.clone());
        let profile = UserProfile {
            cv_content: Some("Jane Doe, Rust developer".to_string()),
            ..complete_profile()
        };

        pipeline.run(&profile).await.unwrap();
        let calls = provider.calls.lock().unwrap();
        let last = calls[0].context().last().unwrap();
        assert_eq!(last.key, "cv_content");
    }

    #[tokio::test]
    async fn provider_validation_error_is_not_retryable() {
        let provider = ScriptedProvider::new(vec![Err(CompletionError::InvalidInput(
            "context value too large".into(),
        ))]);
        let mut pipeline = pipeline(provider);

        let err = pipeline.run(&complete_profile()).await.unwrap_err();
        assert_eq!(
            err,
            PipelineError::Validation("context value too large".to_string())
        );
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn each_run_starts_with_fresh_agents() {
        let provider = ScriptedProvider::new(vec![
            Ok("first summary".into()),
            Ok("first advice".into()),
            Ok("second summary".into()),
            Ok("second advice".into()),
        ]);
        let mut pipeline = pipeline(provider.clone());

        pipeline.run(&complete_profile()).await.unwrap();
        pipeline.run(&complete_profile()).await.unwrap();

        let calls = provider.calls.lock().unwrap();
        assert!(calls.iter().all(|call| call.history.is_empty()));
        assert_eq!(calls[2].agent, AgentRole::Intake);
        assert_eq!(calls[3].agent, AgentRole::Advisor);
        assert!(calls[3].prompt().contains("second summary"));
        assert!(!calls[3].prompt().contains("first"));
    }

    #[test]
    fn state_machine_has_no_loops() {
        use PipelineState::*;
        assert!(Idle.can_transition_to(ContextBuilt));
        assert!(IntakeDone.can_transition_to(Failed));
        assert!(!RecommendationDone.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(Idle));
        assert!(!IntakeDone.can_transition_to(ContextBuilt));
        assert!(Failed.is_terminal());
    }
}
