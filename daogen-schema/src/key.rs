//! Foreign-key edges between tables.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A directed foreign-key edge `from_table.from_column -> to_table.to_column`.
///
/// Endpoints are identified by name; both must exist in the owning
/// [`crate::Database`]. An edge referencing a table outside the extraction
/// scope is dropped during acquisition, never modeled dangling.
///
/// The three identifier overrides replace the derived relation names when
/// set: `fk_class_name`/`fk_object_name` name the forward relation as seen
/// from the source table, `rk_class_name` names the inverse relation as
/// seen from the target table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub from_table: String,
    pub from_column: String,
    pub to_table: String,
    pub to_column: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fk_class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fk_object_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rk_class_name: Option<String>,
    /// Whether the generated forward relation property is read-write.
    #[serde(default)]
    pub mutable: bool,
}

impl ForeignKey {
    pub fn new(
        from_table: impl Into<String>,
        from_column: impl Into<String>,
        to_table: impl Into<String>,
        to_column: impl Into<String>,
    ) -> Self {
        Self {
            from_table: from_table.into(),
            from_column: from_column.into(),
            to_table: to_table.into(),
            to_column: to_column.into(),
            fk_class_name: None,
            fk_object_name: None,
            rk_class_name: None,
            mutable: false,
        }
    }
}

impl fmt::Display for ForeignKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} refers to {}.{}",
            self.from_table, self.from_column, self.to_table, self.to_column
        )
    }
}
