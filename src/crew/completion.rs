//! The completion-provider capability and its LLM-backed implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{CompletionError, PipelineError};
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};

use super::agent::{Agent, AgentRole};
use super::context::ContextEntry;
use super::prompts::{system_prompt, task_prompt};
use super::task::AgentTask;

/// Everything a provider needs to run one task for one agent.
#[derive(Debug, Clone)]
pub struct CompletionCall {
    pub agent: AgentRole,
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub task: AgentTask,
    /// The agent's past exchanges; empty when its memory is off.
    pub history: Vec<ChatMessage>,
}

impl CompletionCall {
    /// Pair a task with the agent running it. Fails when the task is
    /// assigned to a different role.
    pub fn new(agent: &Agent, task: &AgentTask) -> Result<Self, PipelineError> {
        if agent.role() != task.role() {
            return Err(PipelineError::Validation(format!(
                "{} task is assigned to the {} agent, not the {} agent",
                task.kind(),
                task.role(),
                agent.role()
            )));
        }
        let persona = agent.persona();
        Ok(Self {
            agent: agent.role(),
            role: persona.role.to_string(),
            goal: persona.goal.to_string(),
            backstory: persona.backstory.to_string(),
            task: task.clone(),
            history: agent.history().to_vec(),
        })
    }

    pub fn task_description(&self) -> &str {
        self.task.description()
    }

    pub fn context(&self) -> &[ContextEntry] {
        self.task.context()
    }

    pub fn expected_output(&self) -> &str {
        self.task.expected_output()
    }

    /// The rendered user prompt, as recorded in agent memory.
    pub fn prompt(&self) -> String {
        task_prompt(&self.task)
    }
}

/// Turns role + task + context into generated text.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, call: CompletionCall) -> Result<String, CompletionError>;
}

/// [`CompletionProvider`] over a chat-completion [`LlmProvider`].
pub struct LlmCompletionProvider {
    llm: Arc<dyn LlmProvider>,
    timeout: Duration,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl LlmCompletionProvider {
    pub fn new(llm: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        Self {
            llm,
            timeout,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    fn build_request(&self, call: &CompletionCall) -> CompletionRequest {
        let mut messages = Vec::with_capacity(call.history.len() + 2);
        messages.push(ChatMessage::system(system_prompt(
            &call.role,
            &call.goal,
            &call.backstory,
        )));
        messages.extend(call.history.iter().cloned());
        messages.push(ChatMessage::user(call.prompt()));

        let mut request = CompletionRequest::new(messages);
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        request
    }
}

#[async_trait]
impl CompletionProvider for LlmCompletionProvider {
    async fn complete(&self, call: CompletionCall) -> Result<String, CompletionError> {
        if call.role.trim().is_empty() {
            return Err(CompletionError::InvalidInput(
                "agent role is empty".to_string(),
            ));
        }

        let request = self.build_request(&call);
        debug!(
            agent = %call.agent,
            model = self.llm.model_name(),
            history = call.history.len(),
            prompt = %request.messages.last().map(|m| m.content.as_str()).unwrap_or_default(),
            "Invoking completion provider"
        );

        let response = tokio::time::timeout(self.timeout, self.llm.complete(request))
            .await
            .map_err(|_| {
                warn!(agent = %call.agent, timeout = ?self.timeout, "Completion timed out");
                CompletionError::Timeout(self.timeout)
            })??;

        let content = response.content.trim().to_string();
        if content.is_empty() {
            return Err(CompletionError::MalformedResponse(
                "model returned no content".to_string(),
            ));
        }

        debug!(
            agent = %call.agent,
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            "Completion received"
        );
        Ok(content)
    }
}
