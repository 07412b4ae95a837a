//! The career crew — two agents run as a sequential pipeline.
//!
//! The intake agent turns the profile context into a summary; the advisor
//! agent turns that summary into ranked career recommendations.

pub mod agent;
pub mod completion;
pub mod context;
pub mod pipeline;
pub mod prompts;
pub mod retry;
pub mod task;

pub use agent::{Agent, AgentRole, ConversationMemory, Persona};
pub use completion::{CompletionCall, CompletionProvider, LlmCompletionProvider};
pub use context::{ContextBuilder, ContextEntry};
pub use pipeline::{AgentPipeline, PipelineState, Recommendation};
pub use retry::{RetryPolicy, run_with_retry};
pub use task::{AgentTask, TaskKind};
