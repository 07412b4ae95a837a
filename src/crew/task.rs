//! Agent tasks with a validated context schema.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::PipelineError;
use crate::profile::{FieldValue, ProfileField};

use super::agent::AgentRole;
use super::context::{ContextEntry, PRIOR_OUTPUT_KEY};
use super::prompts::{
    INTAKE_DESCRIPTION, INTAKE_EXPECTED_OUTPUT, RECOMMENDATION_DESCRIPTION,
    RECOMMENDATION_EXPECTED_OUTPUT,
};

/// Which of the two pipeline tasks this is. Determines the accepted context
/// keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Context is profile fields.
    Intake,
    /// Context is exactly the intake output under `"context"`.
    Recommendation,
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Intake => write!(f, "intake"),
            Self::Recommendation => write!(f, "recommendation"),
        }
    }
}

/// A bounded unit of work, bound to the agent role that must run it.
///
/// Only constructible through [`AgentTask::new`] and friends, which reject
/// malformed context with `PipelineError::Validation`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentTask {
    kind: TaskKind,
    role: AgentRole,
    description: String,
    context: Vec<ContextEntry>,
    expected_output: String,
}

impl AgentTask {
    pub fn new(
        kind: TaskKind,
        role: AgentRole,
        description: impl Into<String>,
        context: Vec<ContextEntry>,
        expected_output: impl Into<String>,
    ) -> Result<Self, PipelineError> {
        let task = Self {
            kind,
            role,
            description: description.into(),
            context,
            expected_output: expected_output.into(),
        };
        task.validate()?;
        Ok(task)
    }

    /// The profile-gathering task over the built profile context.
    pub fn intake(context: Vec<ContextEntry>) -> Result<Self, PipelineError> {
        Self::new(
            TaskKind::Intake,
            AgentRole::Intake,
            INTAKE_DESCRIPTION,
            context,
            INTAKE_EXPECTED_OUTPUT,
        )
    }

    /// The recommendation task, seeded only with the intake output.
    pub fn recommendation(intake_output: &str) -> Result<Self, PipelineError> {
        Self::new(
            TaskKind::Recommendation,
            AgentRole::Advisor,
            RECOMMENDATION_DESCRIPTION,
            vec![ContextEntry::prior_output(intake_output)],
            RECOMMENDATION_EXPECTED_OUTPUT,
        )
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    /// The agent role assigned to run this task.
    pub fn role(&self) -> AgentRole {
        self.role
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn context(&self) -> &[ContextEntry] {
        &self.context
    }

    pub fn expected_output(&self) -> &str {
        &self.expected_output
    }

    fn validate(&self) -> Result<(), PipelineError> {
        if self.description.trim().is_empty() {
            return Err(invalid(self.kind, "task description is empty"));
        }
        if self.expected_output.trim().is_empty() {
            return Err(invalid(self.kind, "expected output is empty"));
        }

        let mut seen = HashSet::new();
        for entry in &self.context {
            if !seen.insert(entry.key.as_str()) {
                return Err(invalid(
                    self.kind,
                    &format!("duplicate context key: {}", entry.key),
                ));
            }
            if entry.description.trim().is_empty() {
                return Err(invalid(
                    self.kind,
                    &format!("context entry {} has no description", entry.key),
                ));
            }
            self.validate_entry(entry)?;
        }

        if self.kind == TaskKind::Recommendation {
            match self.context.as_slice() {
                [entry] if !entry.value.is_empty() => {}
                [_] => return Err(invalid(self.kind, "intake output is empty")),
                _ => {
                    return Err(invalid(
                        self.kind,
                        &format!("expected exactly one '{PRIOR_OUTPUT_KEY}' entry"),
                    ));
                }
            }
        }

        Ok(())
    }

    fn validate_entry(&self, entry: &ContextEntry) -> Result<(), PipelineError> {
        match self.kind {
            TaskKind::Intake => {
                let field: ProfileField = entry.key.parse().map_err(|_| {
                    invalid(self.kind, &format!("unknown context key: {}", entry.key))
                })?;
                let shape_ok = match &entry.value {
                    FieldValue::List(_) => field.is_list(),
                    FieldValue::Text(_) => !field.is_list(),
                };
                if !shape_ok {
                    return Err(invalid(
                        self.kind,
                        &format!(
                            "context key {} has {} value",
                            entry.key,
                            entry.value.shape()
                        ),
                    ));
                }
            }
            TaskKind::Recommendation => {
                if entry.key != PRIOR_OUTPUT_KEY {
                    return Err(invalid(
                        self.kind,
                        &format!("unknown context key: {}", entry.key),
                    ));
                }
                if !matches!(entry.value, FieldValue::Text(_)) {
                    return Err(invalid(self.kind, "intake output must be text"));
                }
            }
        }
        Ok(())
    }
}

fn invalid(kind: TaskKind, reason: &str) -> PipelineError {
    PipelineError::Validation(format!("{kind} task: {reason}"))
}
