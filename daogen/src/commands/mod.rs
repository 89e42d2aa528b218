mod completions;
mod export;
mod generate;
mod inspect;

use clap::{Parser, Subcommand};
use completions::CompletionsCommand;
use export::ExportCommand;
use eyre::Result;
use generate::GenerateCommand;
use inspect::InspectCommand;

/// Extension trait for exiting on library errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T, E> UnwrapOrExit<T> for Result<T, Box<E>>
where
    E: miette::Diagnostic + Send + Sync + 'static,
{
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "daogen")]
#[command(version)]
#[command(about = "Generate Kotlin Exposed DAO code from relational schemas")]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Generate(cmd) => cmd.run(),
            Commands::Export(cmd) => cmd.run(),
            Commands::Inspect(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate DAO code from a DDL file
    Generate(GenerateCommand),

    /// Generate DAO code from a saved model document
    Export(ExportCommand),

    /// Print a human-readable summary of a schema
    Inspect(InspectCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}
