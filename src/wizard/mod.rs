//! Profile wizard — the ordered steps of the guided form.
//!
//! The wizard only sequences steps. It never touches the profile; the
//! interaction surface runs the active step's questions and writes the
//! answers into the `ProfileStore` before navigating.

pub mod prompts;
pub mod state;

pub use prompts::{Question, dialogue_questions, parse_skill_tags, questions};
pub use state::{StepId, StepWizard};
