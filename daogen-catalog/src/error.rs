use miette::Diagnostic;
use thiserror::Error;

use crate::source::SourceError;

pub type Result<T> = std::result::Result<T, Box<Error>>;

/// A fatal acquisition failure. Only listing the tables themselves is
/// fatal; everything downstream degrades to a recorded [`Problem`].
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to list tables in the catalog")]
    #[diagnostic(code(daogen::catalog::list_tables))]
    ListTables {
        #[source]
        source: SourceError,
    },
}

/// A non-fatal acquisition problem, recorded per table or per key.
#[derive(Debug, Error, Diagnostic)]
pub enum Problem {
    #[error("skipped table '{table}': {message}")]
    #[diagnostic(code(daogen::catalog::table_skipped))]
    TableSkipped { table: String, message: String },

    #[error("skipped foreign keys of '{table}': {message}")]
    #[diagnostic(code(daogen::catalog::keys_skipped))]
    KeysSkipped { table: String, message: String },

    #[error("dropped foreign key: {key}")]
    #[diagnostic(
        code(daogen::catalog::dangling_key),
        help("{missing}; the referenced table was not acquired")
    )]
    DanglingKey { key: String, missing: String },

    #[error("column '{table}.{column}' has unsupported catalog type '{type_name}'")]
    #[diagnostic(
        code(daogen::catalog::unsupported_type),
        help("the column is kept with an unknown-type placeholder")
    )]
    UnsupportedType {
        table: String,
        column: String,
        type_name: String,
    },
}
