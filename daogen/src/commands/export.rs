use std::path::PathBuf;

use clap::Args;
use daogen_schema::load;
use eyre::{Context, Result};

use super::UnwrapOrExit;
use super::generate::{load_options, print_summary, run_preview};

#[derive(Args)]
pub struct ExportCommand {
    /// Saved model document (JSON)
    pub model: PathBuf,

    /// Path to daogen.toml (defaults are used when the file does not exist)
    #[arg(short, long, default_value = "daogen.toml")]
    pub config: PathBuf,

    /// Output directory (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Preview generated code without writing to disk
    #[arg(long)]
    pub dry_run: bool,
}

impl ExportCommand {
    /// Run the export command
    pub fn run(&self) -> Result<()> {
        let options = load_options(&self.config);

        let json = std::fs::read_to_string(&self.model)
            .wrap_err_with(|| format!("Failed to read model {}", self.model.display()))?;
        let resolved = load(&json, &options.resolver_config()).unwrap_or_exit();

        let origin = self.model.display().to_string();
        let out = daogen_codegen_kotlin::render_export(&resolved, &options, &origin);
        for failure in &out.failures {
            eprintln!("{:?}", miette::Report::new(failure.clone()));
        }

        if self.dry_run {
            return run_preview(&out);
        }

        for file in &out.files {
            file.write(&self.output).wrap_err("Failed to write generated code")?;
        }

        print_summary(&resolved);
        println!();
        println!(
            "Exported {} file(s) under {}",
            out.files.len(),
            self.output.display()
        );

        Ok(())
    }
}
