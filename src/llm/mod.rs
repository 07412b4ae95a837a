//! LLM integration for Career Explorer.
//!
//! Uses the rig-core crate for HTTP transport against any server that speaks
//! the OpenAI chat completions API, which covers both hosted OpenAI and local
//! Ollama servers (`/v1`). The `RigAdapter` bridges rig's `CompletionModel`
//! trait to our `LlmProvider` trait, the seam the agent crew builds on.

pub mod provider;
mod rig_adapter;

pub use provider::*;
pub use rig_adapter::RigAdapter;

use std::sync::Arc;

use rig::client::CompletionClient;
use secrecy::ExposeSecret;

use crate::config::AppConfig;
use crate::error::LlmError;

/// Create an LLM provider from configuration.
pub fn create_provider(config: &AppConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    use rig::providers::openai;

    let client: rig::client::Client<openai::client::OpenAIResponsesExt> =
        openai::Client::builder()
            .api_key(config.api_key.expose_secret())
            .base_url(&config.api_base)
            .build()
            .map_err(|e| LlmError::RequestFailed {
                provider: "openai".to_string(),
                reason: format!("Failed to create OpenAI client: {e}"),
            })?;

    // Ollama and most self-hosted servers only implement chat completions.
    let model = client.completions_api().completion_model(&config.model);
    tracing::info!(
        "Using OpenAI-compatible backend at {} (model: {})",
        config.api_base,
        config.model
    );
    Ok(Arc::new(RigAdapter::new(model, &config.model)))
}
