//! Bridges rig's `CompletionModel` to our `LlmProvider` trait.
//!
//! rig takes a preamble, a chat history and a final prompt; our requests are
//! a flat message list. System messages become the preamble, the last user
//! message becomes the prompt, everything in between is history.

use async_trait::async_trait;
use rig::completion::{CompletionError as RigError, CompletionModel, Message};
use rig::message::AssistantContent;

use crate::error::LlmError;

use super::provider::{ChatMessage, CompletionRequest, CompletionResponse, LlmProvider, Role};

const PROVIDER: &str = "openai";

/// Adapter from a rig completion model to `LlmProvider`.
pub struct RigAdapter<M> {
    model: M,
    model_name: String,
}

impl<M> RigAdapter<M>
where
    M: CompletionModel + 'static,
{
    pub fn new(model: M, model_name: &str) -> Self {
        Self {
            model,
            model_name: model_name.to_string(),
        }
    }
}

/// A flat message list split into rig's request shape.
#[derive(Debug)]
struct RigParts {
    preamble: Option<String>,
    history: Vec<Message>,
    prompt: Message,
}

fn split_messages(messages: &[ChatMessage]) -> Result<RigParts, LlmError> {
    let invalid = |reason: &str| LlmError::InvalidRequest {
        provider: PROVIDER.to_string(),
        reason: reason.to_string(),
    };

    let (last, earlier) = messages
        .split_last()
        .ok_or_else(|| invalid("messages must not be empty"))?;
    if last.role != Role::User {
        return Err(invalid("last message must come from the user"));
    }

    let system: Vec<&str> = earlier
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .collect();
    let preamble = (!system.is_empty()).then(|| system.join("\n\n"));

    let history = earlier
        .iter()
        .filter_map(|m| match m.role {
            Role::System => None,
            Role::User => Some(Message::user(m.content.clone())),
            Role::Assistant => Some(Message::assistant(m.content.clone())),
        })
        .collect();

    Ok(RigParts {
        preamble,
        history,
        prompt: Message::user(last.content.clone()),
    })
}

fn map_rig_error(err: RigError) -> LlmError {
    match err {
        RigError::JsonError(e) => LlmError::InvalidResponse {
            provider: PROVIDER.to_string(),
            reason: e.to_string(),
        },
        RigError::ResponseError(reason) => LlmError::InvalidResponse {
            provider: PROVIDER.to_string(),
            reason,
        },
        RigError::ProviderError(reason) => LlmError::RequestFailed {
            provider: PROVIDER.to_string(),
            reason,
        },
        other => LlmError::RequestFailed {
            provider: PROVIDER.to_string(),
            reason: other.to_string(),
        },
    }
}

#[async_trait]
impl<M> LlmProvider for RigAdapter<M>
where
    M: CompletionModel + Send + Sync + 'static,
{
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let parts = split_messages(&request.messages)?;

        let mut builder = self
            .model
            .completion_request(parts.prompt)
            .messages(parts.history);
        if let Some(preamble) = parts.preamble {
            builder = builder.preamble(preamble);
        }
        if let Some(temperature) = request.temperature {
            builder = builder.temperature(f64::from(temperature));
        }
        if let Some(max_tokens) = request.max_tokens {
            builder = builder.max_tokens(u64::from(max_tokens));
        }

        let response = builder.send().await.map_err(map_rig_error)?;

        let content = response
            .choice
            .iter()
            .filter_map(|item| match item {
                AssistantContent::Text(text) => Some(text.text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("");

        Ok(CompletionResponse {
            content,
            input_tokens: u32::try_from(response.usage.input_tokens).unwrap_or(u32::MAX),
            output_tokens: u32::try_from(response.usage.output_tokens).unwrap_or(u32::MAX),
        })
    }
}
