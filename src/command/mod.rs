//! Operator command surface
//!
//! Parses `/autofish ...` lines into [`Command`]s. Executing them is the
//! orchestrator's job, between ticks.

use crate::stealth::Behavior;

/// Command prefix as typed in chat
pub const PREFIX: &str = "/autofish";

/// Help text, one line per command
pub const HELP: &[&str] = &[
    "/autofish on|off|toggle - enable or disable automation",
    "/autofish look|sneak|jump on|off - toggle a humanization feature",
    "/autofish set <key> <value> - change a setting, e.g. catch.min_delay_ms 120",
    "/autofish profile save|load|delete <name> - manage saved profiles",
    "/autofish profile list - show saved profiles",
    "/autofish cast - cast the line if it is not out",
    "/autofish status - show current state",
];

/// Profile subcommands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileAction {
    Save(String),
    Load(String),
    Delete(String),
    List,
}

/// A parsed operator command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Enable,
    Disable,
    Toggle,
    /// Turn one humanization behaviour on or off
    Feature(Behavior, bool),
    Set { key: String, value: String },
    Profile(ProfileAction),
    Cast,
    Status,
    Help,
}

/// Command parse errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Command {
    /// Parse a command line, with or without the `/autofish` prefix
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace().peekable();
        if words.peek().is_some_and(|w| w.eq_ignore_ascii_case(PREFIX)) {
            words.next();
        }

        let Some(head) = words.next() else {
            return Ok(Command::Help);
        };

        let command = match head.to_ascii_lowercase().as_str() {
            "on" | "enable" => Command::Enable,
            "off" | "disable" => Command::Disable,
            "toggle" => Command::Toggle,
            "look" | "sneak" | "shift" | "jump" => {
                let behavior = match head.to_ascii_lowercase().as_str() {
                    "look" => Behavior::Look,
                    "jump" => Behavior::Jump,
                    _ => Behavior::Sneak,
                };
                let state = words.next().ok_or(CommandError::MissingArgument("on|off"))?;
                Command::Feature(behavior, parse_switch(state)?)
            }
            "set" => {
                let key = words.next().ok_or(CommandError::MissingArgument("key"))?;
                let value = words.next().ok_or(CommandError::MissingArgument("value"))?;
                Command::Set {
                    key: key.to_string(),
                    value: value.to_string(),
                }
            }
            "profile" => {
                let action = words.next().ok_or(CommandError::MissingArgument("save|load|delete|list"))?;
                let action = action.to_ascii_lowercase();
                if action == "list" {
                    Command::Profile(ProfileAction::List)
                } else {
                    let name = words.next().ok_or(CommandError::MissingArgument("name"))?.to_string();
                    match action.as_str() {
                        "save" => Command::Profile(ProfileAction::Save(name)),
                        "load" => Command::Profile(ProfileAction::Load(name)),
                        "delete" => Command::Profile(ProfileAction::Delete(name)),
                        other => return Err(CommandError::InvalidArgument(other.to_string())),
                    }
                }
            }
            "cast" => Command::Cast,
            "status" => Command::Status,
            "help" => Command::Help,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        if let Some(extra) = words.next() {
            return Err(CommandError::InvalidArgument(extra.to_string()));
        }
        Ok(command)
    }
}

fn parse_switch(word: &str) -> Result<bool, CommandError> {
    match word.to_ascii_lowercase().as_str() {
        "on" | "true" | "enable" => Ok(true),
        "off" | "false" | "disable" => Ok(false),
        other => Err(CommandError::InvalidArgument(other.to_string())),
    }
}
