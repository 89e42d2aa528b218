//! Shared back-end plumbing for code generation: the indentation-aware
//! builder, generation options (loadable from `daogen.toml`), the export
//! origin header, and output-file handling.

mod builder;
mod error;
mod header;
mod options;

pub use builder::{CodeBuilder, Indent};
pub use daogen_core::{OutputFile, WriteResult};
pub use error::{Error, Result};
pub use header::{EXPORT_PREFIX, export_header, exported_from};
pub use options::GenerationOptions;
