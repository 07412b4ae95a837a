//! Navigation commands typed at the form prompt.

/// One line of form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Back,
    /// Jump to a step by identifier or title.
    Goto(String),
    Reset,
    Submit,
    Quit,
    Help,
    /// A slash command we don't know.
    Unknown(String),
    /// Anything else answers the current prompt.
    Answer(String),
}

pub const HELP: &str = "\
Commands:
  /next            go to the next step
  /back            go to the previous step
  /goto <step>     jump to a step (e.g. /goto skills, /goto Review and Submit)
  /reset           clear the form and start over
  /submit          get career recommendations
  /quit            leave
  /help            show this help
Anything else answers the current question.";

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Self::Answer(trimmed.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };
        match name.to_ascii_lowercase().as_str() {
            "next" | "n" => Self::Next,
            "back" | "previous" | "prev" | "b" => Self::Back,
            "goto" | "go" => Self::Goto(arg.to_string()),
            "reset" => Self::Reset,
            "submit" => Self::Submit,
            "quit" | "exit" | "q" => Self::Quit,
            "help" | "h" | "?" => Self::Help,
            _ => Self::Unknown(trimmed.to_string()),
        }
    }
}
