use std::path::Path;

use daogen_codegen::GenerationOptions;
use daogen_codegen_kotlin::generate;
use daogen_schema::{
    Column, Database, ForeignKey, PrimaryKey, ResolvedDatabase, ResolverConfig, Table, Type,
    resolve,
};

fn shop() -> ResolvedDatabase {
    let mut db = Database::new(Some("public".into()));
    db.push_table(
        Table::new(
            "customers",
            [
                Column::new("id", Type::Int.resolve(vec![]).unwrap(), true, true),
                Column::new(
                    "name",
                    Type::Varchar.resolve(vec!["100".into()]).unwrap(),
                    true,
                    false,
                ),
            ],
            vec![PrimaryKey::new(0, "id")],
        )
        .unwrap(),
    );
    db.push_table(
        Table::new(
            "orders",
            [
                Column::new("id", Type::Int.resolve(vec![]).unwrap(), true, false),
                Column::new("customer_id", Type::Int.resolve(vec![]).unwrap(), false, false),
            ],
            vec![PrimaryKey::new(0, "id")],
        )
        .unwrap(),
    );
    db.add_foreign_key(ForeignKey::new("orders", "customer_id", "customers", "id"))
        .unwrap();
    resolve(db, &ResolverConfig::default()).unwrap()
}

#[test]
fn test_jvm_file_content() {
    let db = shop();
    let options = GenerationOptions {
        out_package: "com.example.db".into(),
        ..GenerationOptions::default()
    };
    let out = generate(&db, &options);
    assert!(out.failures.is_empty());

    let customers = out
        .files
        .iter()
        .find(|f| f.path() == Path::new("com/example/db/customers.kt"))
        .unwrap();

    insta::assert_snapshot!(customers.content(), @r###"
    package com.example.db

    import org.jetbrains.exposed.sql.transactions.transaction
    import org.jetbrains.exposed.sql.Table
    import org.jetbrains.exposed.sql.SizedIterable
    import org.jetbrains.exposed.dao.*

    object customers : IntIdTable("customers", "id") {

    	// Database Columns

    	val id = integer("id").autoIncrement().primaryKey()
    	val name = varchar("name", 100)

    	// Referencing/Exported Keys (One to Many)

    	// 1 keys.  Not present in object
    }


    class customer(id: EntityID<Int>) : IntEntity(id) {

    	companion object : IntEntityClass<customer>(customers) {
    	}

    	// Database Columns

    	val id by customers.id
    	val name by customers.name

    	// Referencing/Exported Keys (One to Many)

    	val orders by order optionalReferrersOn orders.customer_fk

    	// Helper Methods

    	override fun equals(other: Any?): Boolean {
    		if(other == null || other !is customer)
    			return false

    		return id == other.id
    	}

    	override fun hashCode() = id

    	override fun toString() = name
    }
    "###);
}

#[test]
fn test_multiplatform_tree_written_to_disk() {
    let db = shop();
    let options = GenerationOptions {
        out_package: "com.example.db".into(),
        multiplatform: true,
        serialization: true,
        data_transfer: true,
        ..GenerationOptions::default()
    };
    let out = generate(&db, &options);

    let dir = tempfile::tempdir().unwrap();
    for file in &out.files {
        file.write(dir.path()).unwrap();
    }

    for path in [
        "commonMain/kotlin/com/example/db/orders.kt",
        "jsMain/kotlin/com/example/db/orders.kt",
        "jvmMain/kotlin/com/example/db/orders.kt",
        "jvmMain/kotlin/com/example/db/endpoints.kt",
    ] {
        assert!(dir.path().join(path).is_file(), "missing {}", path);
    }

    let common = std::fs::read_to_string(
        dir.path().join("commonMain/kotlin/com/example/db/orders.kt"),
    )
    .unwrap();
    let js =
        std::fs::read_to_string(dir.path().join("jsMain/kotlin/com/example/db/orders.kt")).unwrap();
    let jvm = std::fs::read_to_string(
        dir.path().join("jvmMain/kotlin/com/example/db/orders.kt"),
    )
    .unwrap();

    // all three flavors expose the relation under the same name
    assert!(common.contains("fun customer_fk(): customer?"));
    assert!(js.contains("actual fun customer_fk(): customer?"));
    assert!(jvm.contains("actual fun customer_fk(): customer? = customer_fkRef"));
}

#[test]
fn test_blacklist_leaves_other_tables_untouched() {
    let options = GenerationOptions::default();

    let plain = generate(&shop(), &options);

    let mut raw = shop().into_database();
    raw.table_mut("orders")
        .unwrap()
        .blacklisted
        .insert(daogen_schema::TableElement::Column("customer_id".into()));
    let restricted = generate(&resolve(raw, &ResolverConfig::default()).unwrap(), &options);

    let content = |out: &daogen_codegen_kotlin::Output, name: &str| {
        out.files
            .iter()
            .find(|f| f.path() == Path::new(name))
            .unwrap()
            .content()
            .to_string()
    };

    assert_ne!(content(&plain, "orders.kt"), content(&restricted, "orders.kt"));
    assert_eq!(
        content(&plain, "customers.kt"),
        content(&restricted, "customers.kt")
    );
}
