//! DDL front end: turns a batch of `;`-separated SQL statements into a
//! [`daogen_schema::Database`].
//!
//! The parser is heuristic and best-effort. Only `create table` statements
//! and `alter table ... foreign key` additions are considered; anything else
//! in the batch is discarded. A statement or clause that cannot be classified
//! is skipped with a recorded diagnostic, never aborting the rest of the
//! batch.

mod clause;
mod error;
mod parser;

pub use clause::{Clause, ClauseError};
pub use error::{Error, Result, SourceContext};
pub use parser::{ParseOutcome, parse_batch, parse_batch_named, parse_file};
