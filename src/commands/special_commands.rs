//! Special commands parser for the interactive chat session
//!
//! Special commands let users manage filters and attachments, regenerate
//! the last reply, and reset the conversation without leaving the loop.
//! Commands are prefixed with `/` and are case-insensitive.

use crate::session::FilterKey;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands available during an interactive chat session
///
/// These commands modify session state or display information rather than
/// being sent to the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Set one filter for the next turn (`/filter brand Nike`)
    SetFilter(FilterKey, String),

    /// Remove one filter chip (`/filter brand`)
    RemoveFilter(FilterKey),

    /// Show the active filters (`/filters`)
    ShowFilters,

    /// Remove all filters (`/filters clear`)
    ClearFilters,

    /// Attach an image file to the next turn (`/attach photo.png`)
    Attach(PathBuf),

    /// Remove the pending attachment (`/detach`)
    Detach,

    /// Regenerate the last assistant reply (`/regenerate`)
    Regenerate,

    /// Reset the conversation back to the greeting (`/clear`)
    Reset,

    /// Display help information (`/help`)
    Help,

    /// Exit the session (`/exit`, `/quit`)
    Exit,

    /// Not a special command; send the input to the agent
    None,
}

/// Parses a line of user input into a special command
///
/// Lines not starting with `/` are regular agent input and parse to
/// `SpecialCommand::None`.
///
/// # Examples
///
/// ```
/// use shopchat::commands::special_commands::{parse_special_command, SpecialCommand};
/// use shopchat::session::FilterKey;
///
/// let cmd = parse_special_command("/filter brand Nike").unwrap();
/// assert_eq!(cmd, SpecialCommand::SetFilter(FilterKey::Brand, "Nike".to_string()));
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return Ok(SpecialCommand::None);
    }

    let mut parts = trimmed.splitn(3, char::is_whitespace);
    let command = parts.next().unwrap_or_default().to_lowercase();
    let arg1 = parts.next();
    let arg2 = parts.next();

    match command.as_str() {
        "/filter" => {
            let Some(key_str) = arg1 else {
                return Err(CommandError::MissingArgument {
                    command: "/filter".to_string(),
                    usage: "/filter <key> [value]".to_string(),
                });
            };
            let key = FilterKey::parse_str(key_str).map_err(|_| {
                CommandError::UnsupportedArgument {
                    command: "/filter".to_string(),
                    arg: key_str.to_string(),
                }
            })?;
            match arg2 {
                Some(value) => Ok(SpecialCommand::SetFilter(key, value.trim().to_string())),
                None => Ok(SpecialCommand::RemoveFilter(key)),
            }
        }
        "/filters" => match arg1 {
            None => Ok(SpecialCommand::ShowFilters),
            Some("clear") => Ok(SpecialCommand::ClearFilters),
            Some(other) => Err(CommandError::UnsupportedArgument {
                command: "/filters".to_string(),
                arg: other.to_string(),
            }),
        },
        "/attach" => {
            // Paths may contain spaces; rejoin the remainder
            let path = match (arg1, arg2) {
                (Some(a), Some(b)) => format!("{} {}", a, b),
                (Some(a), None) => a.to_string(),
                (None, _) => {
                    return Err(CommandError::MissingArgument {
                        command: "/attach".to_string(),
                        usage: "/attach <path>".to_string(),
                    })
                }
            };
            Ok(SpecialCommand::Attach(PathBuf::from(path)))
        }
        "/detach" => Ok(SpecialCommand::Detach),
        "/regenerate" | "/regen" => Ok(SpecialCommand::Regenerate),
        "/clear" => Ok(SpecialCommand::Reset),
        "/help" => Ok(SpecialCommand::Help),
        "/exit" | "/quit" => Ok(SpecialCommand::Exit),
        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

/// Prints available special commands
pub fn print_help() {
    println!("Available commands:");
    println!("  /filter <key> <value>  Set a filter for the next turn");
    println!("                         keys: brand, category, price_min, price_max, tags");
    println!("  /filter <key>          Remove one filter");
    println!("  /filters               Show active filters");
    println!("  /filters clear         Remove all filters");
    println!("  /attach <path>         Attach an image to the next turn");
    println!("  /detach                Remove the pending attachment");
    println!("  /regenerate            Regenerate the last reply");
    println!("  /clear                 Reset the conversation");
    println!("  /help                  Show this help");
    println!("  /exit                  Leave the session");
}
