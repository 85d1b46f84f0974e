//! valprint - Debugger value-object printer
//!
//! Entry point that handles CLI argument parsing and runs either the
//! interactive REPL or a batch of commands against the demo target.

use clap::Parser;
use valprint::app::{parse_command, AppState};
use valprint::printer::{DumpOptions, PointerDepth, PointerDepthMode};
use valprint::target::demo::demo_target;
use valprint::ui::cli::{execute_command, run_cli};

/// valprint: inspect debuggee values the way a debugger prints them
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Aggregate nesting levels to expand (unlimited by default)
    #[arg(long)]
    max_depth: Option<u32>,

    /// Pointer hops to follow
    #[arg(long, default_value_t = 0)]
    ptr_depth: u32,

    /// Children printed before eliding the rest
    #[arg(long, default_value_t = DumpOptions::DEFAULT_MAX_CHILDREN)]
    max_children: usize,

    /// Show the type of every value, not just the root
    #[arg(long, default_value_t = false)]
    types: bool,

    /// Let one-line aggregates nest inside each other
    #[arg(long, default_value_t = false)]
    oneline: bool,

    /// Disable colored annotations
    #[arg(long, default_value_t = false)]
    no_color: bool,

    /// Run a command and exit (repeatable), e.g. -e "p list"
    #[arg(short, long = "exec")]
    exec: Vec<String>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn dump_options(&self) -> DumpOptions {
        DumpOptions::new()
            .with_max_depth(self.max_depth.unwrap_or(u32::MAX))
            .with_ptr_depth(PointerDepth::new(PointerDepthMode::Default, self.ptr_depth))
            .with_max_children(self.max_children)
            .with_show_types(self.types)
            .with_oneliner_nested(self.oneline)
            .with_validation(true)
            .with_color(!self.no_color)
    }
}

fn main() -> anyhow::Result<()> {
    // 1. Parse command line arguments
    let args = Args::parse();

    // 2. Initialize logger with verbosity level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }))
    .init();

    log::info!("valprint initialized");
    log::debug!("Args: {:?}", args);

    // 3. Build the demo session
    let target = demo_target()?;
    let mut state = AppState::new(target, args.dump_options());

    // 4. Batch mode runs the given commands, otherwise start the REPL
    if args.exec.is_empty() {
        println!("[*] valprint v{}", env!("CARGO_PKG_VERSION"));
        run_cli(&mut state)?;
    } else {
        for line in &args.exec {
            if !execute_command(&mut state, parse_command(line)) {
                break;
            }
        }
    }

    Ok(())
}
