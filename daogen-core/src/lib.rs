//! Core utilities shared across the daogen workspace.
//!
//! This crate carries the naming helpers (pluralization, case folding,
//! key-suffix stripping) that both the schema model and the code
//! generators rely on, plus the output-file abstraction used when
//! generated source is written to disk.

mod file;
mod names;

pub use file::{OutputFile, WriteResult};
pub use names::{
    pluralize, singularize, strip_id_suffix, to_class_name, to_object_name, to_pascal_case,
    to_snake_case,
};
