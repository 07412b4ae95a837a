//! Form mode — the step wizard driven from a terminal.

use std::path::Path;

use tracing::debug;

use crate::error::Error;
use crate::profile::{FieldValue, ProfileField};
use crate::session::CareerSession;
use crate::wizard::prompts::{INTRODUCTION, MAX_SKILL_TAGS, SKILL_SUGGESTIONS};
use crate::wizard::{StepId, parse_skill_tags, questions};

use super::commands::{Command, HELP};
use super::{Outcome, Terminal, submit_and_show};

/// Run the wizard until recommendations are shown or the user leaves.
///
/// A failed pipeline run leaves the user on the form so they can submit
/// again.
pub async fn run_form<T: Terminal + ?Sized>(
    session: &mut CareerSession,
    term: &mut T,
) -> Result<Outcome, Error> {
    let mut shown: Option<StepId> = None;
    let mut question = 0;

    loop {
        let step = session.wizard().current_step();
        if shown != Some(step) {
            render_step(session, term).await?;
            shown = Some(step);
            question = 0;
        }
        term.print(&prompt_for(session, step, question)).await?;

        let Some(line) = term.read_line().await? else {
            return Ok(Outcome::Abandoned);
        };

        match Command::parse(&line) {
            Command::Next => {
                session.wizard_mut().advance();
            }
            Command::Back => {
                session.wizard_mut().retreat();
            }
            Command::Goto(target) => {
                if let Err(e) = session.wizard_mut().jump_to(&target) {
                    term.print(&format!("{e}. Type /help for the list of steps."))
                        .await?;
                }
            }
            Command::Reset => {
                session.reset();
                term.print("The form has been reset.").await?;
                shown = None;
            }
            Command::Submit => {
                if let Some(Outcome::Recommended) = submit_and_show(session, term).await? {
                    return Ok(Outcome::Recommended);
                }
            }
            Command::Quit => return Ok(Outcome::Abandoned),
            Command::Help => {
                term.print(HELP).await?;
                term.print(&step_list()).await?;
            }
            Command::Unknown(cmd) => {
                term.print(&format!("Unknown command {cmd}. Type /help for commands."))
                    .await?;
            }
            Command::Answer(answer) => {
                question = answer_step(session, term, step, question, answer).await?;
            }
        }
    }
}

async fn render_step<T: Terminal + ?Sized>(
    session: &CareerSession,
    term: &mut T,
) -> Result<(), Error> {
    let wizard = session.wizard();
    let step = wizard.current_step();
    debug!(step = %step, "Rendering wizard step");
    term.print(&format!(
        "\n== Step {}/{}: {} ==",
        step.index() + 1,
        wizard.steps().len(),
        step.title()
    ))
    .await?;

    match step {
        StepId::Introduction => term.print(INTRODUCTION).await?,
        StepId::Skills => {
            term.print(&format!(
                "Suggestions: {}. Separate skills with commas (up to {MAX_SKILL_TAGS}).",
                SKILL_SUGGESTIONS.join(", ")
            ))
            .await?
        }
        StepId::Review => {
            term.print(&session.profile().profile().to_review_lines().join("\n"))
                .await?
        }
        StepId::Background | StepId::Preferences | StepId::Upload => {}
    }
    Ok(())
}

fn prompt_for(session: &CareerSession, step: StepId, question: usize) -> String {
    match step {
        StepId::Introduction => "Press Enter to begin, or type /help for commands.".to_string(),
        StepId::Upload => {
            "Enter the path of your CV (.txt or .md), or press Enter to skip.".to_string()
        }
        StepId::Review => {
            "Type /submit for recommendations, or /goto <step> to make changes.".to_string()
        }
        StepId::Background | StepId::Skills | StepId::Preferences => {
            match questions(step).get(question) {
                Some(q) => {
                    let current = session.profile().get(q.field);
                    if current.is_empty() {
                        q.text.to_string()
                    } else {
                        format!("{}\n(current: {current}; press Enter to keep)", q.text)
                    }
                }
                None => "Type /next to continue.".to_string(),
            }
        }
    }
}

/// Apply a free-text answer to the current step. Returns the next question
/// index within the step.
async fn answer_step<T: Terminal + ?Sized>(
    session: &mut CareerSession,
    term: &mut T,
    step: StepId,
    question: usize,
    answer: String,
) -> Result<usize, Error> {
    match step {
        StepId::Introduction => {
            session.wizard_mut().advance();
            Ok(0)
        }
        StepId::Upload => {
            if answer.is_empty() {
                session.wizard_mut().advance();
                return Ok(0);
            }
            match session.attach_cv(Path::new(&answer), None).await {
                Ok(chars) => {
                    term.print(&format!("CV uploaded ({chars} characters)."))
                        .await?;
                    session.wizard_mut().advance();
                }
                Err(Error::Ingest(e)) => {
                    term.print(&format!("Could not read the CV: {e}")).await?;
                }
                Err(e) => return Err(e),
            }
            Ok(0)
        }
        StepId::Review => Ok(0),
        StepId::Background | StepId::Skills | StepId::Preferences => {
            let step_questions = questions(step);
            let Some(q) = step_questions.get(question) else {
                return Ok(question);
            };
            let keep_current = answer.is_empty() && !session.profile().get(q.field).is_empty();
            if !keep_current {
                store_answer(session, term, q.field, &answer).await?;
            }

            let next = question + 1;
            if next >= step_questions.len() {
                session.wizard_mut().advance();
                return Ok(0);
            }
            Ok(next)
        }
    }
}

async fn store_answer<T: Terminal + ?Sized>(
    session: &mut CareerSession,
    term: &mut T,
    field: ProfileField,
    answer: &str,
) -> Result<(), Error> {
    let value = if field == ProfileField::Skills {
        let tags = parse_skill_tags(answer);
        if answer.split(',').filter(|t| !t.trim().is_empty()).count() > MAX_SKILL_TAGS {
            term.print(&format!("Only the first {MAX_SKILL_TAGS} skills were kept."))
                .await?;
        }
        FieldValue::List(tags)
    } else {
        FieldValue::Text(answer.to_string())
    };
    session.profile_mut().set(field, value)?;
    Ok(())
}

fn step_list() -> String {
    let lines: Vec<String> = StepId::ALL
        .iter()
        .map(|step| format!("  {:<12} {}", step.to_string(), step.title()))
        .collect();
    format!("Steps:\n{}", lines.join("\n"))
}
