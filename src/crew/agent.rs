//! Agents — a persona plus optional, agent-owned conversation memory.

use serde::Serialize;

use crate::llm::ChatMessage;

use super::prompts::{ADVISOR_PERSONA, INTAKE_PERSONA};

/// Which seat in the crew an agent occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Intake,
    Advisor,
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Intake => write!(f, "intake"),
            Self::Advisor => write!(f, "advisor"),
        }
    }
}

/// Fixed role/goal/backstory text describing an agent to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Persona {
    pub role: &'static str,
    pub goal: &'static str,
    pub backstory: &'static str,
}

/// Conversation history.
#[derive(Debug, Clone, Default)]
pub struct ConversationMemory {
    /// Messages in the conversation.
    messages: Vec<ChatMessage>,
    /// Maximum messages to keep.
    max_messages: usize,
}

impl ConversationMemory {
    /// Create a new conversation memory.
    pub fn new(max_messages: usize) -> Self {
        Self {
            messages: Vec::new(),
            max_messages,
        }
    }

    /// Add a message, evicting the oldest ones past the limit.
    pub fn add(&mut self, message: ChatMessage) {
        self.messages.push(message);
        if self.messages.len() > self.max_messages {
            let excess = self.messages.len() - self.max_messages;
            self.messages.drain(..excess);
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Messages kept per agent when memory is on: the last few exchanges.
pub const DEFAULT_MEMORY_MESSAGES: usize = 20;

/// A crew member.
///
/// Agents are built for a single pipeline run. With memory on, the agent
/// replays the exchanges it made earlier in that run into every completion
/// call. With memory off, every call starts fresh.
#[derive(Debug, Clone)]
pub struct Agent {
    role: AgentRole,
    persona: Persona,
    memory: Option<ConversationMemory>,
}

impl Agent {
    pub fn new(role: AgentRole, persona: Persona, memory: bool) -> Self {
        Self {
            role,
            persona,
            memory: memory.then(|| ConversationMemory::new(DEFAULT_MEMORY_MESSAGES)),
        }
    }

    /// The profile-gathering agent.
    pub fn intake(memory: bool) -> Self {
        Self::new(AgentRole::Intake, INTAKE_PERSONA, memory)
    }

    /// The career advisor agent.
    pub fn advisor(memory: bool) -> Self {
        Self::new(AgentRole::Advisor, ADVISOR_PERSONA, memory)
    }

    pub fn role(&self) -> AgentRole {
        self.role
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    pub fn has_memory(&self) -> bool {
        self.memory.is_some()
    }

    /// Past exchanges to replay. Empty when memory is off.
    pub fn history(&self) -> &[ChatMessage] {
        self.memory
            .as_ref()
            .map(ConversationMemory::messages)
            .unwrap_or(&[])
    }

    /// Record a completed exchange. No-op when memory is off.
    pub fn remember(&mut self, prompt: &str, output: &str) {
        if let Some(memory) = self.memory.as_mut() {
            memory.add(ChatMessage::user(prompt));
            memory.add(ChatMessage::assistant(output));
        }
    }
}
