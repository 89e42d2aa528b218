//! The entity-class flavor: a row-as-object abstraction over the table
//! object, with optional kotlinx.serialization companions.

use daogen_codegen::{CodeBuilder, GenerationOptions};
use daogen_schema::{Column, PkCategory, ResolvedDatabase, Table, Type};

use crate::support::{
    actual, class_kotlin_type, class_name_of, equals_expr, hash_expr, key_type, name_column_property,
    needs_backing, object_name_of, pack_expr, pk_columns, usable_foreign_keys,
    usable_referencing_keys,
};

/// Render the entity class for one table.
///
/// Callers must gate on [`PkCategory::supports_class`]; tables in the
/// `Other` category get table-definition output only.
pub fn entity_class(db: &ResolvedDatabase, table: &Table, options: &GenerationOptions) -> String {
    let class = &table.class_display_name;
    let object = &table.object_display_name;
    let key = key_type(table);
    let act = actual(options);

    let mut b = CodeBuilder::kotlin();

    if options.serialization {
        b.push_line(&format!("@Serializable(with={}.Companion::class)", class));
    }
    let ctor_param = if options.serialization { "val myId" } else { "id" };
    let ctor_arg = if options.serialization { "myId" } else { "id" };
    b.push_line(&format!(
        "{}class {}({}: EntityID<{}>) : {}Entity({}) {{",
        act, class, ctor_param, key, key, ctor_arg
    ));
    b.push_blank();
    b.push_indent();

    companion(&mut b, table, options);
    b.push_blank();

    b.push_line("// Database Columns");
    b.push_blank();
    for column in table.generated_columns() {
        column_property(&mut b, table, column, object);
    }

    let fks = usable_foreign_keys(db, table);
    if !fks.is_empty() {
        b.push_blank();
        b.push_line("// Foreign/Imported Keys (One to Many)");
        b.push_blank();
        for rel in fks {
            let delegate = if rel.nullable {
                "optionalReferencedOn"
            } else {
                "referencedOn"
            };
            let to_class = class_name_of(db, &rel.key.to_table);
            let source = format!(
                "{}.{}",
                object_name_of(db, &rel.key.from_table),
                rel.fk_object_name
            );
            if options.multiplatform {
                // the declaration exposes relations as functions; keep the
                // delegated property under a Ref suffix and satisfy the
                // contract with an actual wrapper
                b.push_line(&format!(
                    "val {}Ref by {} {} {}",
                    rel.fk_class_name, to_class, delegate, source
                ));
                let ret = if rel.nullable {
                    format!("{}?", to_class)
                } else {
                    to_class.clone()
                };
                b.push_line(&format!(
                    "actual fun {}(): {} = {}Ref",
                    rel.fk_class_name, ret, rel.fk_class_name
                ));
            } else {
                b.push_line(&format!(
                    "val {} by {} {} {}",
                    rel.fk_class_name, to_class, delegate, source
                ));
            }
        }
    }

    let rks = usable_referencing_keys(db, table);
    if !rks.is_empty() {
        b.push_blank();
        b.push_line("// Referencing/Exported Keys (One to Many)");
        b.push_blank();
        for rel in rks {
            let delegate = if rel.nullable {
                "optionalReferrersOn"
            } else {
                "referrersOn"
            };
            let from_class = class_name_of(db, &rel.key.from_table);
            let source = format!(
                "{}.{}",
                object_name_of(db, &rel.key.from_table),
                rel.fk_object_name
            );
            if options.multiplatform {
                b.push_line(&format!(
                    "val {}Ref by {} {} {}",
                    rel.rk_class_name, from_class, delegate, source
                ));
                b.push_line(&format!(
                    "actual fun {}(): List<{}> = {}Ref.toList()",
                    rel.rk_class_name, from_class, rel.rk_class_name
                ));
            } else {
                b.push_line(&format!(
                    "val {} by {} {} {}",
                    rel.rk_class_name, from_class, delegate, source
                ));
            }
        }
    }

    b.push_blank();
    b.push_line("// Helper Methods");
    b.push_blank();

    b.push_line(&format!("{}override fun equals(other: Any?): Boolean {{", act));
    b.push_indent();
    b.push_line(&format!("if(other == null || other !is {})", class));
    b.push_indent();
    b.push_line("return false");
    b.push_dedent();
    b.push_blank();
    b.push_line(&format!("return {}", equals_expr(table, "other")));
    b.push_dedent();
    b.push_line("}");
    b.push_blank();
    b.push_line(&format!("{}override fun hashCode() = {}", act, hash_expr(table)));

    if let Some(name_prop) = name_column_property(table) {
        b.push_blank();
        b.push_line(&format!("{}override fun toString() = {}", act, name_prop));
    }

    b.push_dedent();
    b.push_line("}");
    b.build()
}

/// One property per column, with a raw backing property where the exposed
/// type differs from the stored one or the constructor helper assigns it.
fn column_property(b: &mut CodeBuilder, table: &Table, column: &Column, object: &str) {
    let prop = &column.class_display_name;
    let source = format!("{}.{}", object, column.object_display_name);
    if !needs_backing(column, table) {
        let kw = if column.mutable { "var" } else { "val" };
        b.push_line(&format!("{} {} by {}", kw, prop, source));
        return;
    }

    b.push_line(&format!("private var _{} by {}", prop, source));
    let kw = if column.mutable { "var" } else { "val" };
    b.push_line(&format!("{} {}: {}", kw, prop, class_kotlin_type(column)));
    b.push_indent();
    let opt = if column.not_null { "" } else { "?" };
    if column.data_type.ty == Type::Decimal {
        // stored with the declared fixed scale; expose the logical value
        let scale = column.data_type.params.get(1).map(String::as_str).unwrap_or("0");
        b.push_line(&format!("get() = _{}{}.stripTrailingZeros()", prop, opt));
        if column.mutable {
            b.push_line(&format!(
                "set(value) {{ _{} = value{}.setScale({}) }}",
                prop, opt, scale
            ));
        }
    } else {
        b.push_line(&format!("get() = _{}", prop));
        if column.mutable {
            b.push_line(&format!("set(value) {{ _{} = value }}", prop));
        }
    }
    b.push_dedent();
}

fn companion(b: &mut CodeBuilder, table: &Table, options: &GenerationOptions) {
    let class = &table.class_display_name;
    let object = &table.object_display_name;
    let key = key_type(table);
    let act = actual(options);

    if options.serialization {
        b.push_line(&format!("@Serializer({}::class)", class));
    }
    let mut header = format!(
        "{}companion object : {}EntityClass<{}>({})",
        act, key, class, object
    );
    if options.serialization {
        header.push_str(&format!(", KSerializer<{}>", class));
    }
    header.push_str(" {");
    b.push_line(&header);
    b.push_indent();

    if table.pk_category() == PkCategory::Composite {
        composite_helpers(b, table);
    }

    if options.serialization {
        if options.data_transfer {
            b.push_line(&format!(
                "{}fun getItem(id: {}) = transaction{{ super.get(id) }}",
                act, key
            ));
            b.push_line(&format!(
                "{}fun allItems() = transaction{{ super.all().toList() }}",
                act
            ));
            b.push_blank();
        }
        if options.serialization_include_columns {
            all_columns_serializer(b, table, options);
        } else {
            key_serializer(b, table, options);
        }
        b.push_line(&format!(
            "{}fun serializer(): KSerializer<{}> = this",
            act, class
        ));
    }

    if table.make_constructor {
        constructor_helper(b, table);
    }

    b.push_dedent();
    b.push_line("}");
}

/// Pack the key parts into the synthetic id, and the reverse lookup.
fn composite_helpers(b: &mut CodeBuilder, table: &Table) {
    let parts = pk_columns(table);
    let params = parts
        .iter()
        .map(|c| format!("{}: {}", c.class_display_name, c.data_type.ty.kotlin_type()))
        .collect::<Vec<_>>()
        .join(", ");
    let names: Vec<String> = parts.iter().map(|c| c.class_display_name.clone()).collect();
    let args = names.join(", ");
    b.push_line(&format!("fun packKey({}) = {}", params, pack_expr(&names)));
    b.push_line(&format!("fun fromParts({}) = get(packKey({}))", params, args));
    b.push_blank();
}

/// Serializes just the primary key as a hex string.
fn key_serializer(b: &mut CodeBuilder, table: &Table, options: &GenerationOptions) {
    let class = &table.class_display_name;
    let key = key_type(table);
    let act = actual(options);
    let pk = table
        .primary_key()
        .map(|pk| pk.column.clone())
        .unwrap_or_default();

    b.push_line(&format!(
        "{}override val descriptor: SerialDescriptor = StringDescriptor.withName(\"{}\")",
        act, class
    ));
    b.push_blank();

    b.push_line(&format!(
        "{}override fun serialize(output: Encoder, obj: {}) {{",
        act, class
    ));
    b.push_indent();
    b.push_line(&format!(
        "output.encodeString(HexConverter.printHexBinary(obj.{}.toString().toUtf8Bytes()))",
        pk
    ));
    b.push_dedent();
    b.push_line("}");
    b.push_blank();

    b.push_line(&format!(
        "{}override fun deserialize(input: Decoder): {} {{",
        act, class
    ));
    b.push_indent();
    b.push_line(&format!(
        "return {}[stringFromUtf8Bytes(HexConverter.parseHexBinary(input.decodeString())).to{}()]",
        class, key
    ));
    b.push_dedent();
    b.push_line("}");
    b.push_blank();
}

/// Serializes every column as a hex string element; deserialization only
/// needs the key element back to re-fetch the row.
fn all_columns_serializer(b: &mut CodeBuilder, table: &Table, options: &GenerationOptions) {
    let class = &table.class_display_name;
    let key = key_type(table);
    let act = actual(options);
    let columns: Vec<&Column> = table.generated_columns().collect();
    let pk_name = table
        .primary_key()
        .map(|pk| pk.column.clone())
        .unwrap_or_default();
    let pk_index = columns
        .iter()
        .position(|c| c.name == pk_name)
        .unwrap_or(0);

    b.push_line(&format!(
        "{}override val descriptor: SerialDescriptor = object : SerialClassDescImpl(\"{}\") {{",
        act, class
    ));
    b.push_indent();
    b.push_line("init{");
    b.push_indent();
    for column in &columns {
        b.push_line(&format!("addElement(\"{}\")", column.name));
    }
    b.push_dedent();
    b.push_line("}");
    b.push_dedent();
    b.push_line("}");
    b.push_blank();

    b.push_line(&format!(
        "{}override fun serialize(output: Encoder, obj: {}) {{",
        act, class
    ));
    b.push_indent();
    b.push_line("val compositeOutput: CompositeEncoder = output.beginStructure(descriptor)");
    for (index, column) in columns.iter().enumerate() {
        b.push_line(&format!(
            "compositeOutput.encodeStringElement(descriptor, {}, HexConverter.printHexBinary(obj.{}.toString().toUtf8Bytes()))",
            index, column.class_display_name
        ));
    }
    b.push_line("compositeOutput.endStructure(descriptor)");
    b.push_dedent();
    b.push_line("}");
    b.push_blank();

    b.push_line(&format!(
        "{}override fun deserialize(input: Decoder): {} {{",
        act, class
    ));
    b.push_indent();
    b.push_line("val inp: CompositeDecoder = input.beginStructure(descriptor)");
    b.push_line(&format!("var id: {}? = null", key));
    b.push_line("loop@ while (true) {");
    b.push_indent();
    b.push_line("when (val i = inp.decodeElementIndex(descriptor)) {");
    b.push_indent();
    b.push_line("CompositeDecoder.READ_DONE -> break@loop");
    b.push_line(&format!(
        "{} -> id = stringFromUtf8Bytes(HexConverter.parseHexBinary(inp.decodeStringElement(descriptor, i))).to{}()",
        pk_index, key
    ));
    b.push_line(
        "else -> if (i < descriptor.elementsCount) continue@loop else throw SerializationException(\"Unknown index $i\")",
    );
    b.push_dedent();
    b.push_line("}");
    b.push_dedent();
    b.push_line("}");
    b.push_blank();
    b.push_line("inp.endStructure(descriptor)");
    b.push_line("if(id == null)");
    b.push_indent();
    b.push_line(&format!(
        "throw SerializationException(\"Id '{}' @ index {} not found\")",
        pk_name, pk_index
    ));
    b.push_dedent();
    b.push_line("else");
    b.push_indent();
    b.push_line(&format!("return {}[id]", class));
    b.push_dedent();
    b.push_dedent();
    b.push_line("}");
    b.push_blank();
}

/// `new(...)` helper assigning every column through its backing property.
fn constructor_helper(b: &mut CodeBuilder, table: &Table) {
    let params = table
        .generated_columns()
        .map(|c| format!("{}: {}", c.class_display_name, class_kotlin_type(c)))
        .collect::<Vec<_>>()
        .join(", ");
    b.push_line(&format!("fun new({}) = new {{", params));
    b.push_indent();
    for column in table.generated_columns() {
        b.push_line(&format!(
            "_{} = {}",
            column.class_display_name, column.class_display_name
        ));
    }
    b.push_dedent();
    b.push_line("}");
}
