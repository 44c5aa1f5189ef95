//! Terminal view: turns input lines into intents and session events into
//! output lines.
//!
//! The view owns the input constraints of the chat UI (message and name
//! length caps, blank-name rejection). The session core never sees input
//! that violates them.

use crate::domain::{ConnectionStatus, SessionEvent};

/// Longest chat message the view lets through, in characters.
pub const MAX_MESSAGE_CHARS: usize = 100;

/// Longest display name the view lets through, in characters.
pub const MAX_NAME_CHARS: usize = 15;

/// Command list printed by `/help`.
pub const HELP_TEXT: &str = "\
commands:
  /name <new name>  change your display name
  /quit             leave the room
  /help             show this help
anything else is sent as a chat message";

/// What the user asked for with one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Send chat text.
    Send(String),
    /// Commit a new display name.
    Rename(String),
    /// Show the command list.
    Help,
    /// Leave the room.
    Quit,
    /// A slash command the view does not know.
    Unknown(String),
    /// Blank input.
    Ignore,
}

/// Parses one line of terminal input.
#[must_use]
pub fn parse_line(line: &str) -> Intent {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Intent::Ignore;
    }

    let Some(command) = line.strip_prefix('/') else {
        return Intent::Send(truncate_chars(line, MAX_MESSAGE_CHARS));
    };
    let (name, rest) = command
        .split_once(char::is_whitespace)
        .unwrap_or((command, ""));
    match name {
        "name" => {
            let new_name = rest.trim();
            if new_name.is_empty() {
                Intent::Help
            } else {
                Intent::Rename(truncate_chars(new_name, MAX_NAME_CHARS))
            }
        }
        "quit" | "exit" => Intent::Quit,
        "help" => Intent::Help,
        other => Intent::Unknown(other.to_string()),
    }
}

/// Formats a session event as one output line.
#[must_use]
pub fn render_event(event: &SessionEvent) -> String {
    match event {
        SessionEvent::StatusChanged { status } => match status {
            ConnectionStatus::Connecting => "* connecting".to_string(),
            ConnectionStatus::Open => "* connected".to_string(),
            ConnectionStatus::Closed => "* disconnected".to_string(),
        },
        SessionEvent::MessageAppended { message } => {
            format!("{}: {}", message.author_name, message.text)
        }
        SessionEvent::NameChanged { name } => format!("* you are now {name}"),
    }
}

/// Keeps at most `max` characters of `s`, never splitting a character.
#[must_use]
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
