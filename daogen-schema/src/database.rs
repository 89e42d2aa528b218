//! The database: a name-indexed registry of tables plus the full edge set.

use std::fmt;

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::key::ForeignKey;
use crate::table::Table;

/// A whole extracted schema.
///
/// Owns every [`Table`] and every [`ForeignKey`] edge. Tables are appended
/// during construction and never removed except by rebuilding a new
/// `Database`. Edges are validated on insertion: both endpoints must already
/// exist in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Database {
    pub schema: Option<String>,
    tables: IndexMap<String, Table>,
    foreign_keys: Vec<ForeignKey>,
}

impl Database {
    pub fn new(schema: Option<String>) -> Self {
        Self {
            schema,
            tables: IndexMap::new(),
            foreign_keys: Vec::new(),
        }
    }

    /// Append a table. A table with the same name replaces the earlier one.
    pub fn push_table(&mut self, table: Table) {
        self.tables.insert(table.name.clone(), table);
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(name)
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn foreign_keys(&self) -> &[ForeignKey] {
        &self.foreign_keys
    }

    /// Add a foreign-key edge, verifying both endpoints exist.
    ///
    /// Fails with [`Error::DanglingReference`] naming the missing endpoint;
    /// acquisition callers drop the edge and record the failure, the codec
    /// propagates it.
    pub fn add_foreign_key(&mut self, key: ForeignKey) -> Result<()> {
        self.check_endpoint(&key.from_table, &key.from_column)?;
        self.check_endpoint(&key.to_table, &key.to_column)?;
        self.foreign_keys.push(key);
        Ok(())
    }

    fn check_endpoint(&self, table: &str, column: &str) -> Result<()> {
        match self.tables.get(table) {
            Some(t) if t.column(column).is_some() => Ok(()),
            _ => Err(Error::dangling(table, column)),
        }
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(schema) = &self.schema {
            writeln!(f, "schema {}", schema)?;
            writeln!(f)?;
        }
        for table in self.tables.values() {
            writeln!(f, "{}", table)?;
        }
        if !self.foreign_keys.is_empty() {
            writeln!(f, "Foreign Key(s):")?;
            for key in &self.foreign_keys {
                writeln!(f, "\t{}", key)?;
            }
        }
        Ok(())
    }
}
