//! Persistence codec: a JSON document that round-trips the model together
//! with every user customization.
//!
//! Identities survive through table and column *names*, never through
//! display names, so a renamed property still re-links to its column on
//! load. Each unique edge is recorded once, endpoints by name; loading a
//! document re-runs the relationship resolver so derived edge sets are
//! always consistent with the reconstructed edge list.

use serde::{Deserialize, Serialize};

use crate::column::Column;
use crate::database::Database;
use crate::error::Result;
use crate::key::ForeignKey;
use crate::resolve::{ResolvedDatabase, ResolverConfig, resolve};
use crate::table::{PrimaryKey, Table, TableElement};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub tables: Vec<TableDocument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub refs: Vec<ForeignKeyDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDocument {
    pub name: String,
    pub columns: Vec<ColumnDocument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub primary_keys: Vec<PrimaryKeyDocument>,
    pub class_name: String,
    pub object_name: String,
    #[serde(default)]
    pub make_constructor: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blacklisted: Vec<TableElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDocument {
    #[serde(flatten)]
    pub column: Column,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryKeyDocument {
    pub column: String,
    pub index: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKeyDocument {
    #[serde(flatten)]
    pub key: ForeignKey,
}

impl DatabaseDocument {
    pub fn from_database(db: &Database) -> Self {
        Self {
            schema: db.schema.clone(),
            tables: db.tables().map(TableDocument::from_table).collect(),
            refs: db
                .foreign_keys()
                .iter()
                .map(|key| ForeignKeyDocument { key: key.clone() })
                .collect(),
        }
    }

    /// Reconstruct the database: tables first, then edges re-linked by
    /// endpoint name. A ref naming a missing endpoint fails the whole load
    /// with [`crate::Error::DanglingReference`].
    pub fn into_database(self) -> Result<Database> {
        let mut db = Database::new(self.schema);
        for table in self.tables {
            db.push_table(table.into_table()?);
        }
        for fk in self.refs {
            db.add_foreign_key(fk.key)?;
        }
        Ok(db)
    }
}

impl TableDocument {
    fn from_table(table: &Table) -> Self {
        Self {
            name: table.name.clone(),
            columns: table
                .columns
                .values()
                .map(|c| ColumnDocument { column: c.clone() })
                .collect(),
            primary_keys: table
                .primary_keys
                .iter()
                .map(|pk| PrimaryKeyDocument {
                    column: pk.column.clone(),
                    index: pk.index,
                })
                .collect(),
            class_name: table.class_display_name.clone(),
            object_name: table.object_display_name.clone(),
            make_constructor: table.make_constructor,
            blacklisted: table.blacklisted.iter().cloned().collect(),
        }
    }

    fn into_table(self) -> Result<Table> {
        let mut table = Table::new(
            self.name,
            self.columns.into_iter().map(|c| c.column),
            self.primary_keys
                .into_iter()
                .map(|pk| PrimaryKey::new(pk.index, pk.column))
                .collect(),
        )?;
        table.class_display_name = self.class_name;
        table.object_display_name = self.object_name;
        table.make_constructor = self.make_constructor;
        table.blacklisted = self.blacklisted.into_iter().collect();
        Ok(table)
    }
}

/// Serialize a database to its persistent JSON form.
pub fn to_json(db: &Database) -> Result<String> {
    serde_json::to_string(&DatabaseDocument::from_database(db))
        .map_err(|e| Box::new(crate::Error::Document(e)))
}

/// Serialize a database to pretty-printed JSON.
pub fn to_json_pretty(db: &Database) -> Result<String> {
    serde_json::to_string_pretty(&DatabaseDocument::from_database(db))
        .map_err(|e| Box::new(crate::Error::Document(e)))
}

/// Decode a persisted document back into a raw database.
pub fn from_json(json: &str) -> Result<Database> {
    let document: DatabaseDocument =
        serde_json::from_str(json).map_err(|e| Box::new(crate::Error::Document(e)))?;
    document.into_database()
}

/// Decode a persisted document and re-run relationship resolution, yielding
/// a database ready for generation.
pub fn load(json: &str, config: &ResolverConfig) -> Result<ResolvedDatabase> {
    resolve(from_json(json)?, config)
}
