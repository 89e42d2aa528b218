//! The table-definition flavor: one Exposed object per table.

use daogen_codegen::{CodeBuilder, GenerationOptions};
use daogen_schema::{PkCategory, ResolvedDatabase, Result, Table};

use crate::support::{object_name_of, sql_pack_string, usable_foreign_keys, usable_referencing_keys};

/// Render the Exposed table object for one table.
///
/// Every primary-key category gets an object, even `Other`; the entity
/// class is where unsupported keys stop. Referencing keys are enumerated in
/// a comment only, never defined here.
pub fn object_block(
    db: &ResolvedDatabase,
    table: &Table,
    _options: &GenerationOptions,
) -> Result<String> {
    let pk_column = table
        .primary_key()
        .map(|pk| pk.column.clone())
        .unwrap_or_default();
    let header = match table.pk_category() {
        PkCategory::Int => format!(
            "object {} : IntIdTable(\"{}\", \"{}\") {{",
            table.object_display_name, table.name, pk_column
        ),
        PkCategory::Long => format!(
            "object {} : LongIdTable(\"{}\", \"{}\") {{",
            table.object_display_name, table.name, pk_column
        ),
        PkCategory::Composite => format!(
            "object {} : IntIdTable(\"{}\", \"{}\") {{",
            table.object_display_name,
            table.name,
            sql_pack_string(table)
        ),
        PkCategory::Other => format!(
            "object {} : Table(\"{}\") {{",
            table.object_display_name, table.name
        ),
    };

    let mut b = CodeBuilder::kotlin()
        .line(&header)
        .blank()
        .indent()
        .comment("Database Columns")
        .blank();

    for column in table.generated_columns() {
        let mut line = format!(
            "val {} = {}",
            column.object_display_name,
            column.data_type.render_target_type(&column.name)?
        );
        if !column.not_null {
            line.push_str(".nullable()");
        }
        if column.auto_increment {
            line.push_str(".autoIncrement()");
        }
        if let Some(pk) = table.primary_keys.iter().find(|pk| pk.column == column.name) {
            if table.primary_keys.len() > 1 {
                line.push_str(&format!(".primaryKey({})", pk.index));
            } else {
                line.push_str(".primaryKey()");
            }
        }
        b = b.line(&line);
    }

    let fks = usable_foreign_keys(db, table);
    if !fks.is_empty() {
        b = b
            .blank()
            .comment("Foreign/Imported Keys (One to Many)")
            .blank();
        for rel in fks {
            let call = if rel.nullable { "optReference" } else { "reference" };
            b = b.line(&format!(
                "val {} = {}(\"{}\", {})",
                rel.fk_object_name,
                call,
                rel.key.from_column,
                object_name_of(db, &rel.key.to_table)
            ));
        }
    }

    let rks = usable_referencing_keys(db, table);
    if !rks.is_empty() {
        b = b
            .blank()
            .comment("Referencing/Exported Keys (One to Many)")
            .blank()
            .line(&format!("// {} keys.  Not present in object", rks.len()));
    }

    Ok(b.dedent().line("}").build())
}
