//! In-memory model of a relational schema, plus the passes that turn it
//! into something a code generator can consume.
//!
//! # Architecture
//!
//! ```text
//! DDL text / catalog metadata → Database (raw) → resolve() → ResolvedDatabase → codegen
//!                                    ↕
//!                            document (JSON persistence)
//! ```
//!
//! The model is deliberately name-indexed: tables refer to each other by
//! table and column name, never by reference, so a `Database` can be
//! serialized, edited, and reconstructed without identity games. The
//! relationship resolver is a pure whole-database pass producing immutable
//! per-table edge sets; derived state is never stored on `Table` itself.

mod column;
mod database;
mod document;
mod error;
mod key;
mod resolve;
mod table;
mod types;

pub use column::Column;
pub use database::Database;
pub use document::{
    ColumnDocument, DatabaseDocument, ForeignKeyDocument, PrimaryKeyDocument, TableDocument,
    from_json, load, to_json, to_json_pretty,
};
pub use error::{Error, Result};
pub use key::ForeignKey;
pub use resolve::{Relation, ResolvedDatabase, ResolvedTable, ResolverConfig, resolve};
pub use table::{PkCategory, PrimaryKey, Table, TableElement};
pub use types::{DataType, Type, normalize_ddl};
