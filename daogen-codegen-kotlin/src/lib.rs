//! Kotlin code generation for the resolved schema model.
//!
//! Three coordinated flavors are produced per table:
//!
//! - a table-definition object (Exposed `IntIdTable` and friends),
//! - an entity class delegating its properties to the object,
//! - a disconnected data class whose relations fetch through a request
//!   client, plus the `expect` declaration both concrete flavors satisfy.
//!
//! The flavors always agree on display names, mutability, relation names,
//! and the name-column string conversion; any divergence for one table is
//! a generation defect, not a configuration choice.

mod class_block;
mod data_class;
mod declaration;
mod generator;
mod object_block;
mod support;

pub use class_block::entity_class;
pub use data_class::data_class;
pub use declaration::declaration;
pub use generator::{Failure, Output, endpoint_registrations, generate, render_export};
pub use object_block::object_block;
