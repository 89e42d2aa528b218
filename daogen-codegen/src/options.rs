//! Generation options, loadable from a `daogen.toml`.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use daogen_schema::ResolverConfig;

use crate::error::{Error, Result};

/// Everything that shapes generated output.
///
/// Every field has a default, so an empty `daogen.toml` is valid and the
/// struct doubles as the in-memory knob set for library callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    /// Package line emitted at the top of generated files; empty for none.
    pub out_package: String,
    /// Emit entity-class blocks alongside the table definitions.
    pub do_dao: bool,
    /// Emit kotlinx.serialization companions on entity classes.
    pub serialization: bool,
    /// Serialize all columns instead of just the primary key.
    pub serialization_include_columns: bool,
    /// Emit the multiplatform layout: common declarations plus jvm/js actuals.
    pub multiplatform: bool,
    /// Treat non-key columns as nullable in the data/declaration flavors.
    pub nullable_by_default: bool,
    /// Emit the data-only flavor with remote-fetch endpoints.
    pub data_transfer: bool,
    /// Fully-qualified request client the data flavor fetches through.
    pub request_client: String,
    /// Suffix applied to colliding foreign-key identifiers.
    pub fk_suffix: String,
    /// Suffix applied to colliding referencing-key identifiers.
    pub rk_suffix: String,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            out_package: String::new(),
            do_dao: true,
            serialization: false,
            serialization_include_columns: false,
            multiplatform: false,
            nullable_by_default: false,
            data_transfer: false,
            request_client: "Client".to_string(),
            fk_suffix: "_fk".to_string(),
            rk_suffix: "_rk".to_string(),
        }
    }
}

impl FromStr for GenerationOptions {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_with_filename(s, "daogen.toml")
    }
}

impl GenerationOptions {
    /// Parse a daogen.toml file from the given path
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        Self::from_str_with_filename(&content, &path.display().to_string())
    }

    /// Parse a daogen.toml from a string with a custom filename for error
    /// reporting
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::parse(e, content, filename))
    }

    /// The bare class name of the configured request client.
    pub fn request_client_name(&self) -> &str {
        self.request_client
            .rsplit('.')
            .next()
            .unwrap_or(&self.request_client)
    }

    /// The resolver configuration these options imply.
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            fk_suffix: self.fk_suffix.clone(),
            rk_suffix: self.rk_suffix.clone(),
        }
    }
}
