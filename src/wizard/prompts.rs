//! Step copy: the introduction text and the questions each step asks.

use crate::profile::ProfileField;

use super::state::StepId;

pub const INTRODUCTION: &str = "\
Welcome to the Tech Career Exploration Tool!

We guide students and graduates towards the right career path in the tech
industry. Move through the steps to tell us about your background, skills
and goals, then submit your profile for personalized recommendations.";

pub const DIALOGUE_WELCOME: &str = "\
Welcome to the Tech Career Exploration tool! Please answer the following \
questions to help us provide you with personalized career recommendations.";

pub const DIALOGUE_THANKS: &str = "\
Thank you for providing your details. We will now analyze your profile to \
recommend suitable career paths.";

pub const CALL_TO_ACTION: &str = "\
To further discuss your career options and receive personalized guidance, \
please book a video consultation with us. We can also assist you with courses \
and certifications to enhance your profile in the tech market.";

/// Suggestions offered on the skills step.
pub const SKILL_SUGGESTIONS: [&str; 4] = ["Python", "Java", "C++", "JavaScript"];

/// Maximum number of skills accepted from a single entry.
pub const MAX_SKILL_TAGS: usize = 10;

/// A question that fills one profile field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub field: ProfileField,
    pub text: &'static str,
}

const BACKGROUND: &[Question] = &[
    Question {
        field: ProfileField::Degree,
        text: "1. What is your highest level of education and the field of study?",
    },
    Question {
        field: ProfileField::Experience,
        text: "2. Describe your relevant work experience, including internships and projects.",
    },
];

const SKILLS: &[Question] = &[Question {
    field: ProfileField::Skills,
    text: "3. What technical skills and programming languages are you proficient in?",
}];

const PREFERENCES: &[Question] = &[
    Question {
        field: ProfileField::Interests,
        text: "4. What areas of technology are you most passionate about or interested in exploring further?",
    },
    Question {
        field: ProfileField::WorkPreference,
        text: "5. Do you prefer working independently or as part of a team? Do you thrive in fast-paced environments?",
    },
    Question {
        field: ProfileField::LongTermGoals,
        text: "6. What are your long-term career goals in the tech industry?",
    },
];

const DIALOGUE: &[Question] = &[
    Question {
        field: ProfileField::Degree,
        text: "1. What is your highest level of education and the field of study? (e.g., Bachelor's in Computer Science)",
    },
    Question {
        field: ProfileField::Experience,
        text: "2. Could you please describe your relevant work experience, including internships and projects?",
    },
    Question {
        field: ProfileField::Skills,
        text: "3. What technical skills and programming languages are you proficient in? (comma-separated)",
    },
    Question {
        field: ProfileField::Interests,
        text: "4. What areas of technology are you most passionate about or interested in exploring further?",
    },
    Question {
        field: ProfileField::WorkPreference,
        text: "5. Do you prefer working independently or as part of a team? Do you thrive in fast-paced environments?",
    },
    Question {
        field: ProfileField::LongTermGoals,
        text: "6. What are your long-term career goals in the tech industry?",
    },
];

/// Questions asked on a wizard step. Steps without free-text questions
/// (introduction, upload, review) return an empty slice.
pub fn questions(step: StepId) -> &'static [Question] {
    match step {
        StepId::Background => BACKGROUND,
        StepId::Skills => SKILLS,
        StepId::Preferences => PREFERENCES,
        StepId::Introduction | StepId::Upload | StepId::Review => &[],
    }
}

/// The linear questionnaire used by the dialogue surface.
pub fn dialogue_questions() -> &'static [Question] {
    DIALOGUE
}

/// Split a comma-separated skills answer into tags, capped at
/// [`MAX_SKILL_TAGS`].
pub fn parse_skill_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .take(MAX_SKILL_TAGS)
        .map(str::to_string)
        .collect()
}
