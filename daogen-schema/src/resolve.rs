//! Relationship resolution: a pure whole-database pass.
//!
//! Given the full edge set, computes for every table its outgoing
//! (foreign) and incoming (referencing) relations, with collision-free
//! default identifiers. Resolution is never incremental: the default name
//! of a referencing relation depends on how many other edges from the same
//! source table target the same destination, so any change to the edge set
//! invalidates every derived name.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use daogen_core::{strip_id_suffix, to_object_name};

use crate::database::Database;
use crate::error::{Error, Result};
use crate::key::ForeignKey;
use crate::table::{Table, TableElement};

/// Suffixes appended when a derived relation identifier collides with an
/// existing name. The exact strings are a style choice, not load-bearing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    pub fk_suffix: String,
    pub rk_suffix: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fk_suffix: "_fk".to_string(),
            rk_suffix: "_rk".to_string(),
        }
    }
}

/// A foreign-key edge with its resolved generation identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub key: ForeignKey,
    /// Forward relation name in the entity-class flavor.
    pub fk_class_name: String,
    /// Forward relation name in the table-definition flavor.
    pub fk_object_name: String,
    /// Inverse relation name, as seen from the target table.
    pub rk_class_name: String,
    /// Follows the source column: an optional column makes an optional edge.
    pub nullable: bool,
}

/// Immutable per-table edge sets produced by [`resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedTable {
    /// Edges where this table is the source.
    pub foreign_keys: Vec<Relation>,
    /// Edges where this table is the target.
    pub referencing_keys: Vec<Relation>,
}

/// A [`Database`] with relationship resolution applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDatabase {
    database: Database,
    relations: IndexMap<String, ResolvedTable>,
}

impl ResolvedDatabase {
    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn schema(&self) -> Option<&str> {
        self.database.schema.as_deref()
    }

    /// The resolved edge sets for a table.
    pub fn relations(&self, table: &str) -> &ResolvedTable {
        static EMPTY: ResolvedTable = ResolvedTable {
            foreign_keys: Vec::new(),
            referencing_keys: Vec::new(),
        };
        self.relations.get(table).unwrap_or(&EMPTY)
    }

    /// Tables paired with their resolved relations, in declaration order.
    pub fn tables(&self) -> impl Iterator<Item = (&Table, &ResolvedTable)> {
        self.database
            .tables()
            .map(|t| (t, self.relations(&t.name)))
    }

    /// Whether an edge was blacklisted on its owning (source) table.
    pub fn edge_blacklisted(&self, relation: &Relation) -> bool {
        self.database
            .table(&relation.key.from_table)
            .map(|t| t.is_blacklisted(&TableElement::ForeignKey(relation.key.from_column.clone())))
            .unwrap_or(false)
    }

    /// Discard the resolution and recover the raw database, e.g. to edit
    /// tables before resolving again.
    pub fn into_database(self) -> Database {
        self.database
    }
}

/// Resolve every relation in the database.
///
/// Consumes the database so resolved state can never drift from the edge
/// set it was computed from; re-resolve after any structural edit.
pub fn resolve(database: Database, config: &ResolverConfig) -> Result<ResolvedDatabase> {
    let mut relations: IndexMap<String, ResolvedTable> = database
        .tables()
        .map(|t| (t.name.clone(), ResolvedTable::default()))
        .collect();

    for key in database.foreign_keys() {
        let from = database
            .table(&key.from_table)
            .ok_or_else(|| Error::dangling(key.from_table.clone(), key.from_column.clone()))?;
        let to = database
            .table(&key.to_table)
            .ok_or_else(|| Error::dangling(key.to_table.clone(), key.to_column.clone()))?;
        let from_column = from
            .column(&key.from_column)
            .ok_or_else(|| Error::dangling(key.from_table.clone(), key.from_column.clone()))?;

        let fk_default = derive_fk_name(&database, from, key, config);
        let rk_default = derive_rk_name(&database, to, key, config);

        let relation = Relation {
            fk_class_name: key.fk_class_name.clone().unwrap_or_else(|| fk_default.clone()),
            fk_object_name: key.fk_object_name.clone().unwrap_or(fk_default),
            rk_class_name: key.rk_class_name.clone().unwrap_or(rk_default),
            nullable: !from_column.not_null,
            key: key.clone(),
        };

        if let Some(entry) = relations.get_mut(&key.from_table) {
            entry.foreign_keys.push(relation.clone());
        }
        if let Some(entry) = relations.get_mut(&key.to_table) {
            entry.referencing_keys.push(relation);
        }
    }

    Ok(ResolvedDatabase {
        database,
        relations,
    })
}

/// Names a derived forward-relation identifier must not collide with:
/// every table's class and object display names, plus the owning table's
/// non-blacklisted column display names on both sides.
fn bad_names(database: &Database, table: &Table) -> BTreeSet<String> {
    let mut names: BTreeSet<String> = database
        .tables()
        .flat_map(|t| {
            [
                t.class_display_name.clone(),
                t.object_display_name.clone(),
            ]
        })
        .collect();
    for column in table.generated_columns() {
        names.insert(column.class_display_name.clone());
        names.insert(column.object_display_name.clone());
    }
    names
}

/// Names a derived inverse-relation identifier must not collide with: the
/// destination table's own display names and column display names. The
/// source table's names are referenced in qualified positions only, so
/// they never count as collisions here.
fn destination_bad_names(table: &Table) -> BTreeSet<String> {
    let mut names = BTreeSet::from([
        table.class_display_name.clone(),
        table.object_display_name.clone(),
    ]);
    for column in table.generated_columns() {
        names.insert(column.class_display_name.clone());
        names.insert(column.object_display_name.clone());
    }
    names
}

/// Default forward-relation name: the source column with its trailing
/// `id` suffix stripped, collision-suffixed against the source table.
fn derive_fk_name(
    database: &Database,
    from: &Table,
    key: &ForeignKey,
    config: &ResolverConfig,
) -> String {
    let candidate = strip_id_suffix(&key.from_column);
    if bad_names(database, from).contains(&candidate) {
        format!("{}{}", candidate, config.fk_suffix)
    } else {
        candidate
    }
}

/// Default inverse-relation name.
///
/// When more than one edge from the same source table targets the same
/// destination ("one-to-many twice"), each inverse name is qualified by the
/// source column so they can never collapse to one identifier. Otherwise
/// the pluralized singular of the stripped source-table name is tried, with
/// the collision suffix as fallback.
fn derive_rk_name(
    database: &Database,
    to: &Table,
    key: &ForeignKey,
    config: &ResolverConfig,
) -> String {
    let siblings = database
        .foreign_keys()
        .iter()
        .filter(|other| other.from_table == key.from_table && other.to_table == key.to_table)
        .count();
    if siblings > 1 {
        return format!("{}_{}", key.from_table, key.from_column);
    }

    let candidate = to_object_name(&strip_id_suffix(&key.from_table));
    if destination_bad_names(to).contains(&candidate) {
        format!("{}{}", candidate, config.rk_suffix)
    } else {
        candidate
    }
}
