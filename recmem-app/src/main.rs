//! recmem: a recognition-memory experiment and its scoring tools.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod console;
mod display;
mod keys;
mod prompt;

use console::{Style, styled};

#[derive(Parser)]
#[command(name = "recmem", version, about = "Recognition-memory experiment")]
struct Cli {
    /// Log at debug level unless RUST_LOG is set
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a study and test session in the experiment window
    Run(commands::run::RunArgs),

    /// Score a stored session
    Score {
        /// Test-phase table
        #[arg(long)]
        test: PathBuf,

        /// Study-phase table of the same trial
        #[arg(long)]
        study: PathBuf,

        /// Trial number; defaults to the name of the test table's directory
        #[arg(long)]
        trial: Option<u32>,

        /// Write the summary file beside the test table
        #[arg(long)]
        save: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Score {
            test,
            study,
            trial,
            save,
        } => commands::score::execute(test, study, trial, save),
    };

    if let Err(e) = result {
        eprintln!("{}", styled(&format!("Error: {e:#}"), Style::Error));
        process::exit(1);
    }
}
