//! Personas, task copy, and prompt rendering for the career crew.

use super::agent::Persona;
use super::context::ContextEntry;
use super::task::{AgentTask, TaskKind};

/// Candidate career paths handed to the advisor.
pub const CAREER_PATHS: [&str; 10] = [
    "Software Development/Engineering",
    "DevOps/SRE",
    "Cloud Computing",
    "Machine Learning/AI",
    "Data Science/Analytics",
    "Cybersecurity",
    "Networking",
    "UX/UI Design",
    "Project Management",
    "Database Management",
];

pub const INTAKE_PERSONA: Persona = Persona {
    role: "User",
    goal: "Explore potential tech career paths and receive personalized recommendations",
    backstory: "A recent graduate or student seeking guidance on the best tech career path \
                for their skills and interests",
};

pub const ADVISOR_PERSONA: Persona = Persona {
    role: "Career Exploration Expert",
    goal: "Provide personalized career recommendations based on user input",
    backstory: "An experienced career counselor with deep knowledge of the tech industry",
};

pub const INTAKE_DESCRIPTION: &str =
    "Gather user's background information, skills, and interests";
pub const INTAKE_EXPECTED_OUTPUT: &str =
    "Detailed user profile, including experience, skills, and interests";

pub const RECOMMENDATION_DESCRIPTION: &str =
    "Analyze user profile and provide personalized career recommendations";
pub const RECOMMENDATION_EXPECTED_OUTPUT: &str = "Ranked list of recommended career paths, \
    each with its rationale (strengths and weaknesses for this user) and concrete next steps";

/// System message establishing the agent's persona.
pub fn system_prompt(role: &str, goal: &str, backstory: &str) -> String {
    format!("You are {role}. {backstory}\n\nYour personal goal is: {goal}")
}

/// User message describing the task, its context, and the expected output.
pub fn task_prompt(task: &AgentTask) -> String {
    let mut parts = vec![format!("Current Task: {}", task.description())];

    if !task.context().is_empty() {
        let lines: Vec<String> = task.context().iter().map(render_entry).collect();
        parts.push(format!(
            "This is the context you're working with:\n{}",
            lines.join("\n")
        ));
    }

    if task.kind() == TaskKind::Recommendation {
        let paths: Vec<String> = CAREER_PATHS.iter().map(|p| format!("- {p}")).collect();
        parts.push(format!(
            "Consider these career paths:\n{}",
            paths.join("\n")
        ));
    }

    parts.push(format!(
        "This is the expected criteria for your final answer: {}\n\
         You MUST return the actual complete content as the final answer, not a summary.",
        task.expected_output()
    ));

    parts.join("\n\n")
}

fn render_entry(entry: &ContextEntry) -> String {
    let value = if entry.value.is_empty() {
        "(not provided)".to_string()
    } else {
        entry.value.to_string()
    };
    format!("- {} ({}): {}", entry.key, entry.description, value)
}
