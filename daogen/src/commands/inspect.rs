use std::path::PathBuf;

use clap::Args;
use daogen_ddl::parse_file;
use daogen_schema::from_json;
use eyre::{Context, Result};

use super::UnwrapOrExit;

#[derive(Args)]
pub struct InspectCommand {
    /// Schema to inspect: a DDL file, or a saved model document (.json)
    pub input: PathBuf,
}

impl InspectCommand {
    /// Run the inspect command
    pub fn run(&self) -> Result<()> {
        let is_model = self
            .input
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let database = if is_model {
            let json = std::fs::read_to_string(&self.input)
                .wrap_err_with(|| format!("Failed to read model {}", self.input.display()))?;
            from_json(&json).unwrap_or_exit()
        } else {
            let outcome = parse_file(&self.input).unwrap_or_exit();
            for diagnostic in outcome.diagnostics {
                eprintln!("{:?}", miette::Report::new(diagnostic));
            }
            outcome.database
        };

        print!("{}", database);

        Ok(())
    }
}
