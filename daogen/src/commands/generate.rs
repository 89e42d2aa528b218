use std::path::{Path, PathBuf};

use clap::Args;
use daogen_codegen::GenerationOptions;
use daogen_codegen_kotlin::Output;
use daogen_ddl::parse_file;
use daogen_schema::{ResolvedDatabase, resolve, to_json_pretty};
use eyre::{Context, Result};

use super::UnwrapOrExit;

#[derive(Args)]
pub struct GenerateCommand {
    /// DDL file containing the create table statements
    pub ddl: PathBuf,

    /// Path to daogen.toml (defaults are used when the file does not exist)
    #[arg(short, long, default_value = "daogen.toml")]
    pub config: PathBuf,

    /// Output directory (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Also save the parsed model as a JSON document
    #[arg(long, value_name = "PATH")]
    pub save_model: Option<PathBuf>,

    /// Preview generated code without writing to disk
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateCommand {
    /// Run the generate command
    pub fn run(&self) -> Result<()> {
        let options = load_options(&self.config);

        let outcome = parse_file(&self.ddl).unwrap_or_exit();
        for diagnostic in outcome.diagnostics {
            eprintln!("{:?}", miette::Report::new(diagnostic));
        }

        let resolved = resolve(outcome.database, &options.resolver_config()).unwrap_or_exit();

        if let Some(path) = &self.save_model {
            let json = to_json_pretty(resolved.database()).unwrap_or_exit();
            std::fs::write(path, json)
                .wrap_err_with(|| format!("Failed to save model to {}", path.display()))?;
            println!("Saved model: {}", path.display());
        }

        let out = daogen_codegen_kotlin::generate(&resolved, &options);
        for failure in &out.failures {
            eprintln!("{:?}", miette::Report::new(failure.clone()));
        }

        if self.dry_run {
            run_preview(&out)
        } else {
            self.run_generation(&resolved, &out)
        }
    }

    fn run_generation(&self, resolved: &ResolvedDatabase, out: &Output) -> Result<()> {
        for file in &out.files {
            file.write(&self.output).wrap_err("Failed to write generated code")?;
        }

        print_summary(resolved);
        println!();
        println!(
            "Generated {} file(s) under {}",
            out.files.len(),
            self.output.display()
        );

        Ok(())
    }
}

/// Read generation options, treating an absent config file as all-defaults.
pub(super) fn load_options(path: &Path) -> GenerationOptions {
    if path.exists() {
        GenerationOptions::from_file(path).unwrap_or_exit()
    } else {
        GenerationOptions::default()
    }
}

pub(super) fn run_preview(out: &Output) -> Result<()> {
    for file in &out.files {
        println!("── {} ──", file.path().display());
        println!("{}", file.content());
    }

    println!("── Summary ──");
    println!("{} files would be generated", out.files.len());

    Ok(())
}

pub(super) fn print_summary(resolved: &ResolvedDatabase) {
    let db = resolved.database();
    let tables: Vec<_> = db.tables().collect();
    println!(
        "Tables ({}), relationships ({}):",
        tables.len(),
        db.foreign_keys().len()
    );
    for table in tables {
        println!(
            "  {} ({} columns)",
            table.name,
            table.generated_columns().count()
        );
    }
}
