//! Columns: the leaf entities of the schema model.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{DataType, Type};

/// A single table column.
///
/// `name` is the immutable schema-derived identifier; the two display names
/// default to it but are independently editable by the surrounding tool.
/// `class_display_name` is used in the entity-class flavor,
/// `object_display_name` in the table-definition flavor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(flatten)]
    pub data_type: DataType,
    pub not_null: bool,
    pub auto_increment: bool,
    pub class_display_name: String,
    pub object_display_name: String,
    /// Whether the generated property is read-write.
    #[serde(default)]
    pub mutable: bool,
}

impl Column {
    pub fn new(
        name: impl Into<String>,
        data_type: DataType,
        not_null: bool,
        auto_increment: bool,
    ) -> Self {
        let name = name.into();
        Self {
            class_display_name: name.clone(),
            object_display_name: name.clone(),
            name,
            data_type,
            not_null,
            auto_increment,
            mutable: false,
        }
    }

    /// Heuristic: a text-typed column whose identifier contains "name".
    ///
    /// When a table has exactly one such column, the generated entity gets a
    /// string-conversion override returning it.
    pub fn is_name_column(&self) -> bool {
        self.name.to_lowercase().contains("name")
            && matches!(self.data_type.ty, Type::Varchar | Type::Text)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.data_type)?;
        if self.not_null {
            write!(f, " not null")?;
        }
        if self.auto_increment {
            write!(f, " auto increment")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn varchar(len: &str) -> DataType {
        Type::Varchar.resolve(vec![len.to_string()]).unwrap()
    }

    #[test]
    fn test_display_names_default_to_name() {
        let col = Column::new("email", varchar("255"), true, false);
        assert_eq!(col.class_display_name, "email");
        assert_eq!(col.object_display_name, "email");
        assert!(!col.mutable);
    }

    #[test]
    fn test_name_column_heuristic() {
        assert!(Column::new("name", varchar("50"), true, false).is_name_column());
        assert!(Column::new("last_name", Type::Text.resolve(vec![]).unwrap(), false, false).is_name_column());
        // integer columns never qualify, whatever they are called
        assert!(!Column::new("name", Type::Int.resolve(vec![]).unwrap(), true, false).is_name_column());
        assert!(!Column::new("email", varchar("50"), true, false).is_name_column());
    }

    #[test]
    fn test_display() {
        let col = Column::new("qty", Type::Int.resolve(vec![]).unwrap(), true, true);
        assert_eq!(col.to_string(), "qty int not null auto increment");
    }
}
