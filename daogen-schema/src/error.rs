//! Error types for the schema model.

use miette::Diagnostic;
use thiserror::Error;

/// Result type for schema operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    /// A type was instantiated with the wrong number of parameters.
    ///
    /// This is a programming or data error, not a schema edge case, and is
    /// surfaced immediately rather than recovered from.
    #[error("type '{type_name}' takes {expected} parameter(s), got {supplied}")]
    #[diagnostic(code(daogen::schema::parameter_count_mismatch))]
    ParameterCountMismatch {
        type_name: &'static str,
        expected: usize,
        supplied: usize,
    },

    /// A type template references a parameter index beyond what was supplied.
    #[error("template for '{type_name}' references parameter ${index} but only {supplied} supplied")]
    #[diagnostic(code(daogen::schema::missing_parameter))]
    MissingParameter {
        type_name: &'static str,
        index: usize,
        supplied: usize,
    },

    /// A foreign key names an endpoint that does not exist in the table set.
    ///
    /// During acquisition such edges are dropped and reported; when loading
    /// a persisted document this is fatal for the whole load.
    #[error("foreign key endpoint '{table}.{column}' does not exist")]
    #[diagnostic(code(daogen::schema::dangling_reference))]
    DanglingReference { table: String, column: String },

    /// Entity-class output cannot be generated for this table's key shape.
    ///
    /// The table-definition flavor is still emittable.
    #[error("table '{table}' has no entity-class-compatible primary key")]
    #[diagnostic(
        code(daogen::schema::unsupported_key_type),
        help("only single int/long keys and all-integer composite keys carry an entity class")
    )]
    UnsupportedKeyType { table: String },

    /// Two primary key parts of one table share an ordinal index.
    #[error("table '{table}' declares duplicate primary key ordinal {index}")]
    #[diagnostic(code(daogen::schema::duplicate_key_ordinal))]
    DuplicateKeyOrdinal { table: String, index: u32 },

    /// A persisted model document could not be decoded.
    #[error("malformed model document")]
    #[diagnostic(code(daogen::schema::document))]
    Document(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn dangling(table: impl Into<String>, column: impl Into<String>) -> Box<Self> {
        Box::new(Error::DanglingReference {
            table: table.into(),
            column: column.into(),
        })
    }
}
