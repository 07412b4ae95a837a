//! Dialogue mode — a linear questionnaire, then recommendations.

use tracing::{info, warn};

use crate::error::Error;
use crate::profile::{FieldValue, ProfileField};
use crate::session::CareerSession;
use crate::wizard::prompts::{DIALOGUE_THANKS, DIALOGUE_WELCOME};
use crate::wizard::{Question, dialogue_questions, parse_skill_tags};

use super::{Outcome, Terminal, submit_and_show};

/// Ask every question once, in order, then submit.
///
/// Blank answers, and skills answers with no tags, are asked again unless
/// the session accepts incomplete profiles. If the submission is refused
/// as incomplete, only the unanswered questions are asked again. `/quit` or
/// end of input abandons the dialogue.
pub async fn run_dialogue<T: Terminal + ?Sized>(
    session: &mut CareerSession,
    term: &mut T,
) -> Result<Outcome, Error> {
    term.print(DIALOGUE_WELCOME).await?;

    let mut pending: Vec<&Question> = dialogue_questions().iter().collect();
    loop {
        for question in &pending {
            let Some(answer) = ask(session, term, question).await? else {
                return Ok(Outcome::Abandoned);
            };
            if question.field == ProfileField::Skills {
                session.profile_mut().append_skills(answer);
            } else {
                session
                    .profile_mut()
                    .set(question.field, FieldValue::Text(answer.concat()))?;
            }
        }

        info!(session = %session.id(), "Dialogue answers collected");
        term.print(DIALOGUE_THANKS).await?;

        if let Some(outcome) = submit_and_show(session, term).await? {
            return Ok(outcome);
        }

        let missing = session.profile().profile().missing_fields();
        pending = dialogue_questions()
            .iter()
            .filter(|question| missing.contains(&question.field))
            .collect();
        if pending.is_empty() {
            warn!(session = %session.id(), "Submission refused with no question left to ask");
            return Ok(Outcome::Abandoned);
        }
    }
}

/// Ask one question until it gets a usable answer.
///
/// Skills answers come back as their parsed tags, every other answer as a
/// single element. `None` means the user quit.
async fn ask<T: Terminal + ?Sized>(
    session: &CareerSession,
    term: &mut T,
    question: &Question,
) -> std::io::Result<Option<Vec<String>>> {
    loop {
        term.print(question.text).await?;
        let Some(line) = term.read_line().await? else {
            return Ok(None);
        };
        let line = line.trim();
        if line.eq_ignore_ascii_case("/quit") {
            return Ok(None);
        }

        let answer = if question.field == ProfileField::Skills {
            parse_skill_tags(line)
        } else if line.is_empty() {
            Vec::new()
        } else {
            vec![line.to_string()]
        };
        if !answer.is_empty() || session.allows_incomplete() {
            return Ok(Some(answer));
        }
        term.print("Please provide an answer to continue.").await?;
    }
}
