//! Terminal interaction surfaces.
//!
//! Both surfaces talk to the user through the [`Terminal`] trait so they can
//! be driven by stdin/stdout or by a scripted transcript in tests.

pub mod cli;
pub mod commands;
pub mod dialogue;
pub mod form;

use std::collections::VecDeque;

use async_trait::async_trait;
use tracing::error;

use crate::error::SessionError;
use crate::session::CareerSession;
use crate::wizard::prompts::CALL_TO_ACTION;

pub use cli::StdioTerminal;
pub use commands::Command;
pub use dialogue::run_dialogue;
pub use form::run_form;

/// Line-oriented user I/O.
#[async_trait]
pub trait Terminal: Send {
    /// Next line of input, without the trailing newline. `None` on EOF.
    async fn read_line(&mut self) -> std::io::Result<Option<String>>;

    /// Show a block of text to the user.
    async fn print(&mut self, text: &str) -> std::io::Result<()>;
}

/// How an interactive session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Recommendations were shown.
    Recommended,
    /// The pipeline failed and the user was told so.
    Failed,
    /// The user quit or input ended before a recommendation.
    Abandoned,
}

/// Submit the session's profile and show the result.
///
/// Returns `None` when the profile was refused as incomplete, so the caller
/// can keep collecting answers.
pub(crate) async fn submit_and_show<T: Terminal + ?Sized>(
    session: &mut CareerSession,
    term: &mut T,
) -> std::io::Result<Option<Outcome>> {
    term.print("Generating career recommendations. This may take a while...")
        .await?;
    match session.submit().await {
        Ok(recommendation) => {
            term.print("\nCareer Recommendations:").await?;
            term.print(&recommendation.content).await?;
            term.print(&format!("\n{CALL_TO_ACTION}")).await?;
            Ok(Some(Outcome::Recommended))
        }
        Err(SessionError::IncompleteProfile { missing }) => {
            term.print(&format!(
                "Please fill in every question before submitting. Missing: {}",
                missing.join(", ")
            ))
            .await?;
            Ok(None)
        }
        Err(SessionError::Pipeline(e)) => {
            error!(session = %session.id(), error = %e, "Recommendation failed");
            term.print(&e.user_message()).await?;
            Ok(Some(Outcome::Failed))
        }
    }
}

/// Terminal fed from a fixed list of input lines, recording all output.
#[derive(Debug, Default)]
pub struct ScriptedTerminal {
    input: VecDeque<String>,
    output: Vec<String>,
}

impl ScriptedTerminal {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            output: Vec::new(),
        }
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Everything printed, one block per line.
    pub fn transcript(&self) -> String {
        self.output.join("\n")
    }

    /// Input lines not consumed yet.
    pub fn remaining_input(&self) -> usize {
        self.input.len()
    }
}

#[async_trait]
impl Terminal for ScriptedTerminal {
    async fn read_line(&mut self) -> std::io::Result<Option<String>> {
        Ok(self.input.pop_front())
    }

    async fn print(&mut self, text: &str) -> std::io::Result<()> {
        self.output.push(text.to_string());
        Ok(())
    }
}
