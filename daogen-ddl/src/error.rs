//! Diagnostics for the DDL parser.

use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for DDL parsing (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Source context for error reporting.
///
/// Holds the (newline-normalized) batch text and a display name for it, so
/// diagnostics can point at the offending statement.
#[derive(Debug, Clone)]
pub struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    /// A statement (or clause) could not be parsed.
    pub fn statement_error(
        &self,
        message: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::Statement {
            src: self.named_source(),
            span,
            message: message.into(),
        })
    }

    pub fn composite_foreign_key(&self, span: Option<SourceSpan>) -> Box<Error> {
        Box::new(Error::CompositeForeignKey {
            src: self.named_source(),
            span,
        })
    }

    pub fn dangling_foreign_key(
        &self,
        key: impl Into<String>,
        missing: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::DanglingForeignKey {
            src: self.named_source(),
            span,
            key: key.into(),
            missing: missing.into(),
        })
    }

    pub fn unsupported_type(
        &self,
        type_name: impl Into<String>,
        reason: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::UnsupportedType {
            src: self.named_source(),
            span,
            type_name: type_name.into(),
            reason: reason.into(),
        })
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{message}")]
    #[diagnostic(code(daogen::ddl::parse_error))]
    Statement {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },

    #[error("composite foreign keys are not supported")]
    #[diagnostic(
        code(daogen::ddl::composite_foreign_key),
        help("declare one single-column foreign key per referencing column")
    )]
    CompositeForeignKey {
        #[source_code]
        src: NamedSource<String>,
        #[label("constraint here")]
        span: Option<SourceSpan>,
    },

    #[error("dropped foreign key: {key}")]
    #[diagnostic(
        code(daogen::ddl::dangling_foreign_key),
        help("{missing}; the key was dropped from the model")
    )]
    DanglingForeignKey {
        #[source_code]
        src: NamedSource<String>,
        #[label("declared here")]
        span: Option<SourceSpan>,
        key: String,
        missing: String,
    },

    #[error("unsupported type '{type_name}'")]
    #[diagnostic(
        code(daogen::ddl::unsupported_type),
        help("{reason}; the column falls back to the unknown-type placeholder")
    )]
    UnsupportedType {
        #[source_code]
        src: NamedSource<String>,
        #[label("used here")]
        span: Option<SourceSpan>,
        type_name: String,
        reason: String,
    },
}
