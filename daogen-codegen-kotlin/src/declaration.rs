//! The declaration-only flavor: the `expect` contract both concrete
//! flavors satisfy in a multiplatform layout.

use daogen_codegen::{CodeBuilder, GenerationOptions};
use daogen_schema::{ResolvedDatabase, Table};

use crate::support::{
    class_name_of, data_kotlin_type, key_type, name_column_property, usable_foreign_keys,
    usable_referencing_keys,
};

/// Render the common `expect class` declaration for one table.
///
/// Signatures only, no bodies: columns as properties, relations as
/// functions, plus the equality/hashing/string contract and the
/// serialization companion when enabled.
pub fn declaration(db: &ResolvedDatabase, table: &Table, options: &GenerationOptions) -> String {
    let class = &table.class_display_name;
    let key = key_type(table);

    let mut b = CodeBuilder::kotlin();

    if options.serialization {
        b.push_line(&format!("@Serializable(with={}.Companion::class)", class));
    }
    b.push_line(&format!("expect class {} {{", class));
    b.push_indent();

    for column in table.generated_columns() {
        let kw = if column.mutable { "var" } else { "val" };
        b.push_line(&format!(
            "{} {}: {}",
            kw,
            column.class_display_name,
            data_kotlin_type(table, column, options)
        ));
    }

    let fks = usable_foreign_keys(db, table);
    let rks = usable_referencing_keys(db, table);
    if !fks.is_empty() || !rks.is_empty() {
        b.push_blank();
        for rel in &fks {
            let to_class = class_name_of(db, &rel.key.to_table);
            let ret = if rel.nullable {
                format!("{}?", to_class)
            } else {
                to_class
            };
            b.push_line(&format!("fun {}(): {}", rel.fk_class_name, ret));
        }
        for rel in &rks {
            let from_class = class_name_of(db, &rel.key.from_table);
            b.push_line(&format!("fun {}(): List<{}>", rel.rk_class_name, from_class));
        }
    }

    b.push_blank();
    b.push_line("override fun equals(other: Any?): Boolean");
    b.push_line("override fun hashCode(): Int");
    if name_column_property(table).is_some() {
        b.push_line("override fun toString(): String");
    }

    if options.serialization {
        b.push_blank();
        b.push_line(&format!("@Serializer({}::class)", class));
        b.push_line(&format!("companion object : KSerializer<{}> {{", class));
        b.push_indent();
        if options.data_transfer {
            b.push_line(&format!("fun getItem(id: {}): {}", key, class));
            b.push_line(&format!("fun allItems(): List<{}>", class));
            b.push_blank();
        }
        b.push_line("override val descriptor: SerialDescriptor");
        b.push_blank();
        b.push_line(&format!("override fun serialize(output: Encoder, obj: {})", class));
        b.push_blank();
        b.push_line(&format!("override fun deserialize(input: Decoder): {}", class));
        b.push_blank();
        b.push_line(&format!("fun serializer(): KSerializer<{}>", class));
        b.push_dedent();
        b.push_line("}");
    }

    b.push_dedent();
    b.push_line("}");
    b.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::tests_fixtures::shop;

    #[test]
    fn test_declaration_is_signatures_only() {
        let db = shop();
        let options = GenerationOptions {
            multiplatform: true,
            serialization: true,
            data_transfer: true,
            ..GenerationOptions::default()
        };
        let out = declaration(&db, db.database().table("customers").unwrap(), &options);

        assert_eq!(
            out,
            "@Serializable(with=customer.Companion::class)\n\
             expect class customer {\n\
             \tval id: Int\n\
             \tval name: String\n\
             \n\
             \tfun orders(): List<order>\n\
             \n\
             \toverride fun equals(other: Any?): Boolean\n\
             \toverride fun hashCode(): Int\n\
             \toverride fun toString(): String\n\
             \n\
             \t@Serializer(customer::class)\n\
             \tcompanion object : KSerializer<customer> {\n\
             \t\tfun getItem(id: Int): customer\n\
             \t\tfun allItems(): List<customer>\n\
             \n\
             \t\toverride val descriptor: SerialDescriptor\n\
             \n\
             \t\toverride fun serialize(output: Encoder, obj: customer)\n\
             \n\
             \t\toverride fun deserialize(input: Decoder): customer\n\
             \n\
             \t\tfun serializer(): KSerializer<customer>\n\
             \t}\n\
             }\n"
        );
    }

    #[test]
    fn test_relation_signatures_match_the_other_flavors() {
        let db = shop();
        let options = GenerationOptions {
            multiplatform: true,
            ..GenerationOptions::default()
        };
        let out = declaration(&db, db.database().table("orders").unwrap(), &options);

        assert!(out.starts_with("expect class order {"));
        assert!(out.contains("\tfun customer_fk(): customer?\n"));
        // no serialization: no companion block at all
        assert!(!out.contains("companion object"));
    }
}
