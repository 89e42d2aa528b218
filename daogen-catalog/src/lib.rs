//! Live-catalog schema acquisition.
//!
//! The actual database driver lives outside this crate: callers implement
//! [`CatalogSource`] over whatever connection they hold, and [`acquire`]
//! turns its metadata into a [`daogen_schema::Database`]. A metadata failure
//! on one table skips that table and is recorded; it never aborts the rest
//! of the acquisition.

mod acquire;
mod error;
mod source;

pub use acquire::{AcquireOptions, AcquireOutcome, acquire};
pub use error::{Error, Problem, Result};
pub use source::{CatalogSource, ColumnMeta, ImportedKeyMeta, PrimaryKeyMeta, SourceError};
