//! The acquisition pass: bounded metadata queries in, raw `Database` out.

use daogen_schema::{Column, DataType, Database, ForeignKey, PrimaryKey, Table, Type};

use crate::error::{Error, Problem, Result};
use crate::source::{CatalogSource, ColumnMeta};

/// What to acquire.
#[derive(Debug, Clone, Default)]
pub struct AcquireOptions {
    /// Schema to introspect; `None` means the source's default.
    pub schema: Option<String>,
    /// Case-insensitive table allow-list; `None` acquires every table.
    pub tables: Option<Vec<String>>,
}

impl AcquireOptions {
    fn allows(&self, table: &str) -> bool {
        match &self.tables {
            Some(list) => list.iter().any(|t| t.eq_ignore_ascii_case(table)),
            None => true,
        }
    }
}

/// The acquired database plus everything that had to be skipped or dropped
/// along the way.
#[derive(Debug)]
pub struct AcquireOutcome {
    pub database: Database,
    pub problems: Vec<Problem>,
}

impl AcquireOutcome {
    pub fn has_problems(&self) -> bool {
        !self.problems.is_empty()
    }
}

/// Acquire a schema from a live catalog.
///
/// Tables are listed once, then columns and primary keys are read per
/// table; foreign keys are read per table afterwards and cross-referenced
/// by name against the just-built table map. A metadata failure or invalid
/// definition skips only the affected table; an edge whose endpoint was not
/// acquired is dropped. Both are recorded as [`Problem`]s. Only the initial
/// table listing is fatal.
///
/// The caller runs the relationship resolver over the result.
pub fn acquire<S: CatalogSource>(source: &mut S, options: &AcquireOptions) -> Result<AcquireOutcome> {
    let schema = options.schema.as_deref();
    let names: Vec<String> = source
        .tables(schema)
        .map_err(|source| Box::new(Error::ListTables { source }))?
        .into_iter()
        .filter(|name| options.allows(name))
        .collect();

    let mut database = Database::new(options.schema.clone());
    let mut problems = Vec::new();

    for name in &names {
        match build_table(source, schema, name, &mut problems) {
            Ok(table) => database.push_table(table),
            Err(message) => problems.push(Problem::TableSkipped {
                table: name.clone(),
                message,
            }),
        }
    }

    for name in &names {
        // a skipped table cannot anchor edges
        if database.table(name).is_none() {
            continue;
        }
        let keys = match source.imported_keys(schema, name) {
            Ok(keys) => keys,
            Err(err) => {
                problems.push(Problem::KeysSkipped {
                    table: name.clone(),
                    message: err.to_string(),
                });
                continue;
            }
        };
        for meta in keys {
            let key = ForeignKey::new(name.clone(), meta.from_column, meta.to_table, meta.to_column);
            let display = key.to_string();
            if let Err(err) = database.add_foreign_key(key) {
                problems.push(Problem::DanglingKey {
                    key: display,
                    missing: err.to_string(),
                });
            }
        }
    }

    Ok(AcquireOutcome { database, problems })
}

fn build_table<S: CatalogSource>(
    source: &mut S,
    schema: Option<&str>,
    name: &str,
    problems: &mut Vec<Problem>,
) -> std::result::Result<Table, String> {
    let metas = source.columns(schema, name).map_err(|e| e.to_string())?;
    let keys = source.primary_keys(schema, name).map_err(|e| e.to_string())?;

    let columns: Vec<Column> = metas
        .into_iter()
        .map(|meta| {
            let data_type = match normalize_catalog(&meta) {
                Some(dt) => dt,
                None => {
                    problems.push(Problem::UnsupportedType {
                        table: name.to_string(),
                        column: meta.name.clone(),
                        type_name: meta.type_name.clone(),
                    });
                    DataType {
                        ty: Type::Unknown,
                        params: Vec::new(),
                    }
                }
            };
            Column::new(meta.name, data_type, !meta.nullable, meta.auto_increment)
        })
        .collect();

    let primary_keys = keys
        .into_iter()
        .map(|pk| PrimaryKey::new(pk.ordinal, pk.column))
        .collect();

    Table::new(name, columns, primary_keys).map_err(|e| e.to_string())
}

/// Map a catalog type name (and its size/scale) to a bound data type.
///
/// Unlike the DDL path, a live catalog reports `double` as a real double
/// type, and sizes arrive as metadata instead of parenthesized parameters.
fn normalize_catalog(meta: &ColumnMeta) -> Option<DataType> {
    let folded = meta.type_name.trim().to_lowercase();
    let ty = match folded.as_str() {
        "int" | "integer" | "int4" | "serial" => Type::Int,
        "bigint" | "int8" | "bigserial" => Type::Long,
        "float" | "real" | "float4" => Type::Float,
        "double" | "double precision" | "float8" => Type::Double,
        "numeric" | "decimal" => {
            let precision = meta.size.unwrap_or(200);
            let scale = meta.scale.unwrap_or(0);
            return Type::Decimal
                .resolve(vec![precision.to_string(), scale.to_string()])
                .ok();
        }
        "varchar" | "character varying" => {
            // a varchar with no declared length is unbounded text
            return match meta.size {
                Some(size) => Type::Varchar.resolve(vec![size.to_string()]).ok(),
                None => Type::Text.resolve(vec![]).ok(),
            };
        }
        "text" => Type::Text,
        "char" | "character" | "bpchar" => Type::Char,
        "bool" | "boolean" | "bit" => Type::Bool,
        _ => return None,
    };
    ty.resolve(vec![]).ok()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::source::{ImportedKeyMeta, PrimaryKeyMeta, SourceError};

    #[derive(Default)]
    struct MemorySource {
        tables: Vec<String>,
        columns: HashMap<String, Vec<ColumnMeta>>,
        primary_keys: HashMap<String, Vec<PrimaryKeyMeta>>,
        imported: HashMap<String, Vec<ImportedKeyMeta>>,
        fail_columns_for: Option<String>,
    }

    impl MemorySource {
        fn push_table(&mut self, name: &str, columns: Vec<ColumnMeta>, pks: &[&str]) {
            self.tables.push(name.to_string());
            self.columns.insert(name.to_string(), columns);
            self.primary_keys.insert(
                name.to_string(),
                pks.iter()
                    .enumerate()
                    .map(|(i, c)| PrimaryKeyMeta {
                        column: c.to_string(),
                        ordinal: i as u32,
                    })
                    .collect(),
            );
        }

        fn push_key(&mut self, from_table: &str, from_column: &str, to_table: &str, to_column: &str) {
            self.imported
                .entry(from_table.to_string())
                .or_default()
                .push(ImportedKeyMeta {
                    from_column: from_column.to_string(),
                    to_table: to_table.to_string(),
                    to_column: to_column.to_string(),
                });
        }
    }

    impl CatalogSource for MemorySource {
        fn tables(&mut self, _schema: Option<&str>) -> std::result::Result<Vec<String>, SourceError> {
            Ok(self.tables.clone())
        }

        fn columns(
            &mut self,
            _schema: Option<&str>,
            table: &str,
        ) -> std::result::Result<Vec<ColumnMeta>, SourceError> {
            if self.fail_columns_for.as_deref() == Some(table) {
                return Err("connection reset".into());
            }
            Ok(self.columns.get(table).cloned().unwrap_or_default())
        }

        fn primary_keys(
            &mut self,
            _schema: Option<&str>,
            table: &str,
        ) -> std::result::Result<Vec<PrimaryKeyMeta>, SourceError> {
            Ok(self.primary_keys.get(table).cloned().unwrap_or_default())
        }

        fn imported_keys(
            &mut self,
            _schema: Option<&str>,
            table: &str,
        ) -> std::result::Result<Vec<ImportedKeyMeta>, SourceError> {
            Ok(self.imported.get(table).cloned().unwrap_or_default())
        }
    }

    fn col(name: &str, type_name: &str, size: Option<u32>, scale: Option<u32>) -> ColumnMeta {
        ColumnMeta {
            name: name.to_string(),
            type_name: type_name.to_string(),
            size,
            scale,
            nullable: false,
            auto_increment: false,
        }
    }

    fn sample_source() -> MemorySource {
        let mut source = MemorySource::default();
        source.push_table(
            "customers",
            vec![
                ColumnMeta {
                    auto_increment: true,
                    ..col("id", "serial", None, None)
                },
                col("name", "varchar", Some(100), None),
            ],
            &["id"],
        );
        source.push_table(
            "orders",
            vec![
                col("id", "int4", None, None),
                col("customer_id", "int4", None, None),
                col("total", "numeric", Some(20), Some(10)),
                ColumnMeta {
                    nullable: true,
                    ..col("notes", "text", None, None)
                },
            ],
            &["id"],
        );
        source.push_key("orders", "customer_id", "customers", "id");
        source
    }

    #[test]
    fn test_basic_acquisition() {
        let mut source = sample_source();
        let outcome = acquire(&mut source, &AcquireOptions::default()).unwrap();
        assert!(!outcome.has_problems(), "{:?}", outcome.problems);

        let db = &outcome.database;
        assert_eq!(db.table_count(), 2);
        let customers = db.table("customers").unwrap();
        assert!(customers.column("id").unwrap().auto_increment);
        assert_eq!(customers.column("name").unwrap().data_type.ty, Type::Varchar);

        let orders = db.table("orders").unwrap();
        let total = orders.column("total").unwrap();
        assert_eq!(total.data_type.ty, Type::Decimal);
        assert_eq!(total.data_type.params, vec!["20", "10"]);
        assert!(!orders.column("notes").unwrap().not_null);

        assert_eq!(db.foreign_keys().len(), 1);
    }

    #[test]
    fn test_allow_list_is_case_insensitive() {
        let mut source = sample_source();
        let options = AcquireOptions {
            schema: None,
            tables: Some(vec!["Customers".into()]),
        };
        let outcome = acquire(&mut source, &options).unwrap();
        assert_eq!(outcome.database.table_count(), 1);
        assert!(outcome.database.table("customers").is_some());
    }

    #[test]
    fn test_failed_table_is_skipped_not_fatal() {
        let mut source = sample_source();
        source.fail_columns_for = Some("customers".into());
        let outcome = acquire(&mut source, &AcquireOptions::default()).unwrap();

        assert!(outcome.database.table("customers").is_none());
        assert!(outcome.database.table("orders").is_some());
        // the table skip, plus the edge into it that now dangles
        assert!(outcome
            .problems
            .iter()
            .any(|p| matches!(p, Problem::TableSkipped { table, .. } if table == "customers")));
        assert!(outcome
            .problems
            .iter()
            .any(|p| matches!(p, Problem::DanglingKey { .. })));
        assert_eq!(outcome.database.foreign_keys().len(), 0);
    }

    #[test]
    fn test_edge_to_unacquired_table_is_dropped() {
        let mut source = sample_source();
        source.push_key("orders", "id", "archive", "id");
        let outcome = acquire(&mut source, &AcquireOptions::default()).unwrap();
        assert_eq!(outcome.database.foreign_keys().len(), 1);
        assert!(outcome
            .problems
            .iter()
            .any(|p| matches!(p, Problem::DanglingKey { .. })));
    }

    #[test]
    fn test_unknown_type_keeps_column_with_placeholder() {
        let mut source = MemorySource::default();
        source.push_table(
            "t",
            vec![col("id", "int4", None, None), col("area", "geometry", None, None)],
            &["id"],
        );
        let outcome = acquire(&mut source, &AcquireOptions::default()).unwrap();
        let t = outcome.database.table("t").unwrap();
        assert_eq!(t.column("area").unwrap().data_type.ty, Type::Unknown);
        assert!(outcome
            .problems
            .iter()
            .any(|p| matches!(p, Problem::UnsupportedType { .. })));
    }

    #[test]
    fn test_double_maps_to_double_not_decimal() {
        let mut source = MemorySource::default();
        source.push_table(
            "t",
            vec![col("id", "int4", None, None), col("weight", "float8", None, None)],
            &["id"],
        );
        let outcome = acquire(&mut source, &AcquireOptions::default()).unwrap();
        let t = outcome.database.table("t").unwrap();
        assert_eq!(t.column("weight").unwrap().data_type.ty, Type::Double);
    }

    #[test]
    fn test_schema_is_carried_onto_the_database() {
        let mut source = sample_source();
        let options = AcquireOptions {
            schema: Some("public".into()),
            tables: None,
        };
        let outcome = acquire(&mut source, &options).unwrap();
        assert_eq!(outcome.database.schema.as_deref(), Some("public"));
    }
}
