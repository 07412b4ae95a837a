//! Error types for Career Explorer.

use std::time::Duration;

/// Top-level error type for the application.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Ingest error: {0}")]
    Ingest(#[from] IngestError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}. {hint}")]
    MissingRequired { key: String, hint: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Navigation errors raised by the step wizard.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("Unknown step: {0}")]
    InvalidStep(String),
}

/// Shape errors raised by the profile store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("Invalid value for field {field}: {reason}")]
    InvalidField { field: String, reason: String },
}

/// LLM transport errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Invalid request to {provider}: {reason}")]
    InvalidRequest { provider: String, reason: String },
}

/// Errors from a single completion-provider invocation.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// The provider rejected the shape of its inputs.
    #[error("Invalid completion input: {0}")]
    InvalidInput(String),

    #[error("Completion timed out after {0:?}")]
    Timeout(Duration),

    #[error("Completion provider unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),
}

impl From<LlmError> for CompletionError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::InvalidRequest { reason, .. } => Self::InvalidInput(reason),
            LlmError::InvalidResponse { .. } => Self::MalformedResponse(err.to_string()),
            LlmError::RequestFailed { .. } => Self::Unavailable(err.to_string()),
        }
    }
}

/// Pipeline-level failures surfaced to the caller of `AgentPipeline::run`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    /// Malformed task or context, detected before or by the provider.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Transport or backend failure. The whole run must be retried.
    #[error("Provider failed: {0}")]
    Provider(String),
}

impl PipelineError {
    /// Message safe to show to the end user.
    ///
    /// Validation failures carry their diagnostic; provider failures never
    /// leak internal detail.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(details) => format!("Debug: ValidationError\n{details}"),
            Self::Provider(_) => "Oops, something went wrong. Please try again later.".to_string(),
        }
    }

    /// Whether re-running the pipeline from scratch can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Provider(_))
    }
}

impl From<CompletionError> for PipelineError {
    fn from(err: CompletionError) -> Self {
        match err {
            CompletionError::InvalidInput(details) => Self::Validation(details),
            other => Self::Provider(other.to_string()),
        }
    }
}

/// CV document ingestion errors.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Document is not valid UTF-8 text")]
    InvalidEncoding,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Session-level errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Profile is incomplete, missing: {}", .missing.join(", "))]
    IncompleteProfile { missing: Vec<String> },

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Result type alias for the application.
pub type Result<T> = std::result::Result<T, Error>;
