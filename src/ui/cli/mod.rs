//! CLI - reedline-based REPL interface
//!
//! Interactive front end over an `AppState`: list variables, print them with
//! the current dump options and tweak those options on the fly.

use anyhow::Result;
use colored::Colorize;
use reedline::{Prompt, PromptHistorySearch, PromptHistorySearchStatus, Reedline, Signal};
use std::borrow::Cow;

use crate::app::{parse_command, AppCommand, AppState, SETTINGS};

/// Prompt showing the active depth budgets
pub struct ValprintPrompt {
    max_depth: u32,
    ptr_depth: u32,
}

impl ValprintPrompt {
    pub fn new() -> Self {
        Self {
            max_depth: u32::MAX,
            ptr_depth: 0,
        }
    }

    pub fn update(&mut self, state: &AppState) {
        self.max_depth = state.options.max_depth;
        self.ptr_depth = state.options.max_ptr_depth.count;
    }
}

impl Default for ValprintPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for ValprintPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        let depth = if self.max_depth == u32::MAX {
            "*".to_string()
        } else {
            self.max_depth.to_string()
        };
        Cow::Owned(format!("[depth:{} ptr:{}]", depth, self.ptr_depth))
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _prompt_mode: reedline::PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed("> ")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("... ")
    }

    fn render_prompt_history_search_indicator(&self, history_search: PromptHistorySearch) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "(failed) ",
        };
        Cow::Owned(format!("(search: {}{}) ", prefix, history_search.term))
    }
}

/// Print the help message
fn print_help() {
    println!("{}", "valprint Commands".bold().cyan());
    println!("{}", "═".repeat(50).cyan());

    println!("\n{}", "Inspection:".bold().yellow());
    println!("  {}             Print every variable", "vars".green());
    println!("  {}          Print one variable", "p <var>".green());
    println!("  {}      Print with a format (x d b c y B)", "p/<f> <var>".green());

    println!("\n{}", "Options:".bold().yellow());
    println!("  {}  Change a dump option", "set <opt> <val>".green());
    println!("  {}             Show current options", "show".green());
    for (name, help) in SETTINGS {
        println!("    {:<14} {}", name.cyan(), help.dimmed());
    }

    println!("\n{}", "Other:".bold().yellow());
    println!("  {}                Show this help", "?".green());
    println!("  {}                Quit", "q".green());
}

fn print_settings(state: &AppState) {
    for (name, value) in state.settings() {
        println!("  {:<14} {}", name.cyan(), value);
    }
}

/// Execute a parsed command. Returns `false` when the session should end.
pub fn execute_command(state: &mut AppState, cmd: AppCommand) -> bool {
    match cmd {
        AppCommand::Vars => {
            print!("{}", state.print_all());
        }
        AppCommand::Print { name, format } => match state.print_variable(&name, format) {
            Ok(text) => print!("{}", text),
            Err(e) => println!("{} {}", "[!]".red(), e),
        },
        AppCommand::Set { option, value } => match state.apply_setting(&option, &value) {
            Ok(()) => println!("[*] {} = {}", option, value),
            Err(e) => println!("{} {}", "[!]".red(), e),
        },
        AppCommand::Show => print_settings(state),
        AppCommand::Help => print_help(),
        AppCommand::Quit => {
            println!("[*] Shutting down...");
            return false;
        }
        AppCommand::Unknown(input) => {
            println!("{} Unknown command: '{}'", "[!]".red(), input);
            println!("    Type '?' for help");
        }
    }
    true
}

/// Run the CLI REPL
pub fn run_cli(state: &mut AppState) -> Result<()> {
    let mut line_editor = Reedline::create();
    let mut prompt = ValprintPrompt::new();

    println!(
        "{}",
        "╔══════════════════════════════════════════════════════════════╗".cyan()
    );
    println!(
        "{}",
        "║  valprint - Type '?' for help, 'q' to quit                   ║".cyan()
    );
    println!(
        "{}",
        "╚══════════════════════════════════════════════════════════════╝".cyan()
    );
    println!("[*] Variables: {}", state.variable_names().join(", "));

    loop {
        prompt.update(state);
        let sig = line_editor.read_line(&prompt)?;
        match sig {
            Signal::Success(buffer) => {
                let input = buffer.trim();
                if input.is_empty() {
                    continue;
                }

                let cmd = parse_command(input);
                if !execute_command(state, cmd) {
                    break;
                }
            }
            Signal::CtrlD | Signal::CtrlC => {
                println!("\n[*] Interrupted");
                break;
            }
        }
    }

    Ok(())
}
