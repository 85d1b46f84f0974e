//! Command processing
//!
//! Command definitions shared by the REPL and batch (`--exec`) mode.

use crate::value::Format;

/// Session commands that can be executed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// List every variable: vars
    Vars,
    /// Print one variable: p <var>, p/x <var>
    Print { name: String, format: Option<Format> },
    /// Change a dump option: set <option> <value>
    Set { option: String, value: String },
    /// Show current dump options
    Show,
    /// Show help
    Help,
    /// Quit
    Quit,
    /// Unknown or malformed command
    Unknown(String),
}

/// Parse a command string into AppCommand
pub fn parse_command(input: &str) -> AppCommand {
    let input = input.trim();
    let parts: Vec<&str> = input.splitn(2, ' ').collect();
    let cmd = parts.first().copied().unwrap_or("");
    let arg = parts.get(1).map(|s| s.trim()).filter(|s| !s.is_empty());

    // p/x, print/d, ...
    let (cmd, format_code) = match cmd.split_once('/') {
        Some((cmd, code)) => (cmd, Some(code)),
        None => (cmd, None),
    };

    match cmd {
        "vars" | "v" | "frame" => AppCommand::Vars,
        "p" | "print" => {
            let format = match format_code.map(Format::from_code) {
                Some(None) => return AppCommand::Unknown(format!("unknown format in '{}'", input)),
                Some(format) => format,
                None => None,
            };
            match arg {
                Some(name) => AppCommand::Print {
                    name: name.to_string(),
                    format,
                },
                None => AppCommand::Unknown("print requires a variable name".into()),
            }
        }
        "set" => {
            let mut words = arg.unwrap_or("").split_whitespace();
            match (words.next(), words.next()) {
                (Some(option), Some(value)) => AppCommand::Set {
                    option: option.to_string(),
                    value: value.to_string(),
                },
                _ => AppCommand::Unknown("set requires an option and a value".into()),
            }
        }
        "show" => AppCommand::Show,
        "help" | "?" => AppCommand::Help,
        "quit" | "exit" | "q" => AppCommand::Quit,
        _ => AppCommand::Unknown(input.to_string()),
    }
}
