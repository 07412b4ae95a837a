//! Step wizard state machine — tracks which step of the form is active.

use serde::{Deserialize, Serialize};

use crate::error::WizardError;

/// The steps of the profile wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    Introduction,
    Background,
    Skills,
    Preferences,
    Upload,
    Review,
}

impl StepId {
    /// The fixed step sequence.
    pub const ALL: [StepId; 6] = [
        Self::Introduction,
        Self::Background,
        Self::Skills,
        Self::Preferences,
        Self::Upload,
        Self::Review,
    ];

    /// Display title shown in navigation.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Introduction => "Introduction",
            Self::Background => "Background Information",
            Self::Skills => "Technical Skills",
            Self::Preferences => "Interests and Preferences",
            Self::Upload => "Upload CV (Optional)",
            Self::Review => "Review and Submit",
        }
    }

    /// Position in [`StepId::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Self::Introduction => 0,
            Self::Background => 1,
            Self::Skills => 2,
            Self::Preferences => 3,
            Self::Upload => 4,
            Self::Review => 5,
        }
    }

    /// Whether the user may skip this step without entering anything.
    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Introduction | Self::Upload | Self::Review)
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Introduction => "introduction",
            Self::Background => "background",
            Self::Skills => "skills",
            Self::Preferences => "preferences",
            Self::Upload => "upload",
            Self::Review => "review",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for StepId {
    type Err = WizardError;

    /// Accepts the identifier (`background`) or the title
    /// (`Background Information`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|step| {
                step.to_string().eq_ignore_ascii_case(wanted)
                    || step.title().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| WizardError::InvalidStep(s.to_string()))
    }
}

/// Navigation over [`StepId::ALL`].
///
/// The index never leaves `[0, len - 1]`. `advance` and `retreat` clamp at
/// the ends; only `jump_to` with an unknown identifier can fail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepWizard {
    index: usize,
}

impl StepWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_step(&self) -> StepId {
        StepId::ALL[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn steps(&self) -> &'static [StepId] {
        &StepId::ALL
    }

    /// Move forward one step. No-op at the last step.
    pub fn advance(&mut self) -> StepId {
        if self.index + 1 < StepId::ALL.len() {
            self.index += 1;
        }
        self.current_step()
    }

    /// Move back one step. No-op at the first step.
    pub fn retreat(&mut self) -> StepId {
        self.index = self.index.saturating_sub(1);
        self.current_step()
    }

    /// Jump to the step named `step` (identifier or title).
    pub fn jump_to(&mut self, step: &str) -> Result<StepId, WizardError> {
        let target: StepId = step.parse()?;
        self.index = target.index();
        Ok(target)
    }

    /// Whether the current step is the last one.
    pub fn is_terminal(&self) -> bool {
        self.index == StepId::ALL.len() - 1
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}
