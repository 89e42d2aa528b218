//! Tables, primary keys, and the per-table generation blacklist.

use std::collections::BTreeSet;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use daogen_core::{to_class_name, to_object_name};

use crate::column::Column;
use crate::error::{Error, Result};
use crate::types::Type;

/// One constituent of a table's primary key.
///
/// `index` is the declared ordinal position; it defines the stable ordering
/// used both for composite-key bit-packing and for serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKey {
    pub index: u32,
    pub column: String,
}

impl PrimaryKey {
    pub fn new(index: u32, column: impl Into<String>) -> Self {
        Self {
            index,
            column: column.into(),
        }
    }
}

/// A table element the user has opted out of generating.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableElement {
    /// A column, identified by its schema name.
    Column(String),
    /// An outgoing foreign key, identified by its source column name.
    ForeignKey(String),
}

/// What kind of primary key a table has, which decides whether an
/// entity class can be generated for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PkCategory {
    /// Single integer key.
    Int,
    /// Single long key.
    Long,
    /// Multiple parts, all integer or long; packed into one synthetic id.
    Composite,
    /// Anything else: table-definition output only.
    Other,
}

impl PkCategory {
    /// Whether entity-class output can be generated for this category.
    pub fn supports_class(self) -> bool {
        !matches!(self, PkCategory::Other)
    }

    /// The Kotlin type of the (possibly synthetic) id.
    pub fn key_type(self) -> &'static str {
        match self {
            PkCategory::Long => "Long",
            _ => "Int",
        }
    }
}

/// A table of the schema model.
///
/// Holds only intrinsic state: columns, primary keys, display names, and the
/// blacklist. Foreign/referencing edges are derived data and live on
/// [`crate::ResolvedDatabase`], never here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub columns: IndexMap<String, Column>,
    /// Sorted by ordinal index; column names are distinct.
    pub primary_keys: Vec<PrimaryKey>,
    pub class_display_name: String,
    pub object_display_name: String,
    /// Whether to emit a `new(...)` constructor helper in the entity class.
    pub make_constructor: bool,
    pub blacklisted: BTreeSet<TableElement>,
}

impl Table {
    /// Build a table from its columns and primary-key parts.
    ///
    /// Display names default to the singularized/pluralized table name.
    /// Primary keys are sorted by ordinal; a duplicate ordinal or a part
    /// naming a nonexistent column is rejected.
    pub fn new(
        name: impl Into<String>,
        columns: impl IntoIterator<Item = Column>,
        primary_keys: Vec<PrimaryKey>,
    ) -> Result<Self> {
        let name = name.into();
        let columns: IndexMap<String, Column> = columns
            .into_iter()
            .map(|c| (c.name.clone(), c))
            .collect();

        let mut primary_keys = primary_keys;
        primary_keys.sort_by_key(|pk| pk.index);
        let mut seen_columns = BTreeSet::new();
        let mut seen_indices = BTreeSet::new();
        for pk in &primary_keys {
            if !seen_indices.insert(pk.index) {
                return Err(Box::new(Error::DuplicateKeyOrdinal {
                    table: name.clone(),
                    index: pk.index,
                }));
            }
            if !seen_columns.insert(pk.column.clone()) || !columns.contains_key(&pk.column) {
                return Err(Error::dangling(name.clone(), pk.column.clone()));
            }
        }

        Ok(Self {
            class_display_name: to_class_name(&name),
            object_display_name: to_object_name(&name),
            name,
            columns,
            primary_keys,
            make_constructor: false,
            blacklisted: BTreeSet::new(),
        })
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// The first primary-key part, if any.
    pub fn primary_key(&self) -> Option<&PrimaryKey> {
        self.primary_keys.first()
    }

    /// Classify this table's primary key for entity-class generation.
    pub fn pk_category(&self) -> PkCategory {
        let key_types: Vec<Type> = self
            .primary_keys
            .iter()
            .filter_map(|pk| self.columns.get(&pk.column))
            .map(|c| c.data_type.ty)
            .collect();

        match key_types.as_slice() {
            [] => PkCategory::Other,
            [Type::Int] => PkCategory::Int,
            [Type::Long] => PkCategory::Long,
            many if many.len() > 1
                && many.iter().all(|t| matches!(t, Type::Int | Type::Long)) =>
            {
                PkCategory::Composite
            }
            _ => PkCategory::Other,
        }
    }

    pub fn is_blacklisted(&self, element: &TableElement) -> bool {
        self.blacklisted.contains(element)
    }

    /// Columns that survive the blacklist, in declaration order.
    pub fn generated_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns
            .values()
            .filter(|c| !self.is_blacklisted(&TableElement::Column(c.name.clone())))
    }

    /// The single "name" column used for the string-conversion override,
    /// present only when the heuristic matches exactly one column.
    pub fn name_column(&self) -> Option<&Column> {
        let mut candidates = self.generated_columns().filter(|c| c.is_name_column());
        match (candidates.next(), candidates.next()) {
            (Some(col), None) => Some(col),
            _ => None,
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.name)?;
        let pk = match self.primary_keys.len() {
            0 => "None".to_string(),
            _ => self
                .primary_keys
                .iter()
                .map(|pk| pk.column.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        };
        writeln!(f, "\tPrimary Key: {}", pk)?;
        writeln!(f)?;
        for column in self.columns.values() {
            writeln!(f, "\t{}", column)?;
        }
        Ok(())
    }
}
