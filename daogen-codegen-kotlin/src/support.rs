//! Shared per-table helpers the flavors must agree through.

use daogen_codegen::GenerationOptions;
use daogen_schema::{Column, PkCategory, Relation, ResolvedDatabase, Table, Type};

/// `actual ` in multiplatform output, nothing otherwise.
pub(crate) fn actual(options: &GenerationOptions) -> &'static str {
    if options.multiplatform { "actual " } else { "" }
}

/// Primary-key columns in ordinal order.
pub(crate) fn pk_columns<'a>(table: &'a Table) -> Vec<&'a Column> {
    table
        .primary_keys
        .iter()
        .filter_map(|pk| table.column(&pk.column))
        .collect()
}

/// The left-shift/OR packing of the key parts, 8-bit aligned in ordinal
/// order: `a shl 8 or b`, `a shl 8 or b shl 16 or c`, ...
pub(crate) fn pack_expr(names: &[String]) -> String {
    let mut out = names.first().cloned().unwrap_or_default();
    for (i, name) in names.iter().enumerate().skip(1) {
        out.push_str(&format!(" shl {} or {}", 8 * i, name));
    }
    out
}

/// The database-side rendering of the packed key used in the table-object
/// header, quotes escaped for embedding in a Kotlin string literal.
pub(crate) fn sql_pack_string(table: &Table) -> String {
    let names: Vec<&str> = table.primary_keys.iter().map(|pk| pk.column.as_str()).collect();
    let mut out = names.first().map_or(String::new(), |n| n.to_string());
    for (i, name) in names.iter().enumerate().skip(1) {
        out.push_str(&format!("\\\" << {} | \\\"{}", 8 * i, name));
    }
    out
}

/// Class-side property names of the key parts, in ordinal order.
pub(crate) fn pk_property_names(table: &Table) -> Vec<String> {
    pk_columns(table)
        .iter()
        .map(|c| c.class_display_name.clone())
        .collect()
}

/// Whether an edge can appear in class-bearing output: both endpoints must
/// support entity classes and the edge must not be blacklisted.
pub(crate) fn edge_usable(db: &ResolvedDatabase, relation: &Relation) -> bool {
    if db.edge_blacklisted(relation) {
        return false;
    }
    let supports = |name: &str| {
        db.database()
            .table(name)
            .map(|t| t.pk_category().supports_class())
            .unwrap_or(false)
    };
    supports(&relation.key.from_table) && supports(&relation.key.to_table)
}

pub(crate) fn usable_foreign_keys<'a>(
    db: &'a ResolvedDatabase,
    table: &Table,
) -> Vec<&'a Relation> {
    db.relations(&table.name)
        .foreign_keys
        .iter()
        .filter(|r| edge_usable(db, r))
        .collect()
}

pub(crate) fn usable_referencing_keys<'a>(
    db: &'a ResolvedDatabase,
    table: &Table,
) -> Vec<&'a Relation> {
    db.relations(&table.name)
        .referencing_keys
        .iter()
        .filter(|r| edge_usable(db, r))
        .collect()
}

/// Class display name of a table, looked up by name.
pub(crate) fn class_name_of(db: &ResolvedDatabase, table: &str) -> String {
    db.database()
        .table(table)
        .map(|t| t.class_display_name.clone())
        .unwrap_or_else(|| table.to_string())
}

/// Object display name of a table, looked up by name.
pub(crate) fn object_name_of(db: &ResolvedDatabase, table: &str) -> String {
    db.database()
        .table(table)
        .map(|t| t.object_display_name.clone())
        .unwrap_or_else(|| table.to_string())
}

/// Whether a column is part of the table's primary key.
pub(crate) fn is_pk_column(table: &Table, column: &Column) -> bool {
    table.primary_keys.iter().any(|pk| pk.column == column.name)
}

/// The Kotlin type a column exposes in the disconnected flavors, where
/// `nullable_by_default` can widen non-key columns.
pub(crate) fn data_kotlin_type(table: &Table, column: &Column, options: &GenerationOptions) -> String {
    let base = column.data_type.ty.kotlin_type();
    let nullable =
        !column.not_null || (options.nullable_by_default && !is_pk_column(table, column));
    if nullable {
        format!("{}?", base)
    } else {
        base.to_string()
    }
}

/// The Kotlin type a column exposes in the entity class.
pub(crate) fn class_kotlin_type(column: &Column) -> String {
    let base = column.data_type.ty.kotlin_type();
    if column.not_null {
        base.to_string()
    } else {
        format!("{}?", base)
    }
}

/// Decimal columns carry a raw backing property plus a converted accessor
/// in the entity class.
pub(crate) fn needs_backing(column: &Column, table: &Table) -> bool {
    column.data_type.ty == Type::Decimal || table.make_constructor
}

/// The key category's Kotlin id type, packed for composites.
pub(crate) fn key_type(table: &Table) -> &'static str {
    table.pk_category().key_type()
}

pub(crate) fn name_column_property(table: &Table) -> Option<String> {
    table.name_column().map(|c| c.class_display_name.clone())
}

/// Equality body over the primary-key properties only.
pub(crate) fn equals_expr(table: &Table, other: &str) -> String {
    let names = pk_property_names(table);
    names
        .iter()
        .map(|n| format!("{} == {}.{}", n, other, n))
        .collect::<Vec<_>>()
        .join(" && ")
}

/// Hash derived from the primary-key value.
pub(crate) fn hash_expr(table: &Table) -> String {
    let names = pk_property_names(table);
    match table.pk_category() {
        PkCategory::Long => format!("{}.hashCode()", names.join("")),
        PkCategory::Composite => pack_expr(&names),
        _ => names.join(""),
    }
}

#[cfg(test)]
pub(crate) mod tests_fixtures {
    use daogen_schema::{
        Column, Database, ForeignKey, PrimaryKey, ResolvedDatabase, ResolverConfig, Table,
        TableElement, Type, resolve,
    };

    pub(crate) fn col(name: &str, ty: Type, params: &[&str], not_null: bool, auto: bool) -> Column {
        let params = params.iter().map(|p| p.to_string()).collect();
        Column::new(name, ty.resolve(params).unwrap(), not_null, auto)
    }

    fn customers_table() -> Table {
        Table::new(
            "customers",
            [
                col("id", Type::Int, &[], true, true),
                col("name", Type::Varchar, &["100"], true, false),
            ],
            vec![PrimaryKey::new(0, "id")],
        )
        .unwrap()
    }

    fn orders_table(extra: impl IntoIterator<Item = Column>) -> Table {
        let mut columns = vec![
            col("id", Type::Int, &[], true, false),
            col("customer_id", Type::Int, &[], false, false),
            col("total", Type::Decimal, &["20", "10"], false, false),
        ];
        columns.extend(extra);
        Table::new("orders", columns, vec![PrimaryKey::new(0, "id")]).unwrap()
    }

    fn shop_database(orders: Table) -> Database {
        let mut db = Database::new(Some("public".into()));
        db.push_table(customers_table());
        db.push_table(orders);
        db.add_foreign_key(ForeignKey::new("orders", "customer_id", "customers", "id"))
            .unwrap();
        db
    }

    /// customers(id, name) ← orders(id, customer_id?, total?).
    pub(crate) fn shop() -> ResolvedDatabase {
        resolve(shop_database(orders_table([])), &ResolverConfig::default()).unwrap()
    }

    /// The shop schema with an extra blacklisted `notes` column on orders.
    pub(crate) fn shop_with_blacklisted_notes() -> ResolvedDatabase {
        let mut orders = orders_table([col("notes", Type::Text, &[], false, false)]);
        orders.blacklisted.insert(TableElement::Column("notes".into()));
        resolve(shop_database(orders), &ResolverConfig::default()).unwrap()
    }

    /// A single table with a two-part integer primary key.
    pub(crate) fn composite() -> ResolvedDatabase {
        let mut db = Database::new(None);
        db.push_table(
            Table::new(
                "grid_cells",
                [
                    col("row", Type::Int, &[], true, false),
                    col("col", Type::Int, &[], true, false),
                    col("label", Type::Varchar, &["50"], false, false),
                ],
                vec![PrimaryKey::new(0, "row"), PrimaryKey::new(1, "col")],
            )
            .unwrap(),
        );
        resolve(db, &ResolverConfig::default()).unwrap()
    }

    /// A table with no primary key at all: table-definition output only.
    pub(crate) fn keyless() -> ResolvedDatabase {
        let mut db = Database::new(None);
        db.push_table(
            Table::new(
                "audit_log",
                [
                    col("message", Type::Text, &[], true, false),
                    col("logged_at", Type::Long, &[], true, false),
                ],
                vec![],
            )
            .unwrap(),
        );
        resolve(db, &ResolverConfig::default()).unwrap()
    }
}
