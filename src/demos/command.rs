//! Line commands read by the demo binary.

use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Click the `index`-th (0-based) button with this label.
    Click { label: String, index: usize },
    /// Replace the text of the first input field.
    Type(String),
    /// Print the current frame again.
    Show,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command '{0}' (try: click, type, show, quit)")]
    Unknown(String),

    #[error("'click' needs a button label")]
    MissingLabel,

    #[error("Invalid button position '{0}' (positions start at 1)")]
    BadIndex(String),
}

impl FromStr for Command {
    type Err = CommandError;

    /// `click <label> [@n]`, `type <text>`, `show`, `quit` / `exit`.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word {
            "" => Err(CommandError::Empty),
            "show" => Ok(Command::Show),
            "quit" | "exit" => Ok(Command::Quit),
            "type" => Ok(Command::Type(rest.to_string())),
            "click" => parse_click(rest),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn parse_click(rest: &str) -> Result<Command, CommandError> {
    let (label, index) = match rest.rsplit_once('@') {
        Some((label, position)) => {
            let position = position.trim();
            let index = position
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .ok_or_else(|| CommandError::BadIndex(position.to_string()))?;
            (label.trim(), index)
        }
        None => (rest, 0),
    };
    if label.is_empty() {
        return Err(CommandError::MissingLabel);
    }
    Ok(Command::Click {
        label: label.to_string(),
        index,
    })
}
