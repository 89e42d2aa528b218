//! The disconnected data-class flavor: plain constructor properties, with
//! relationships exposed as remote-fetch accessor functions.

use daogen_codegen::{CodeBuilder, GenerationOptions};
use daogen_schema::{Column, ResolvedDatabase, Table};

use crate::support::{
    actual, class_name_of, data_kotlin_type, equals_expr, hash_expr, key_type,
    name_column_property, usable_foreign_keys, usable_referencing_keys,
};

/// Render the data class for one table.
///
/// The shape mirrors the entity class exactly (same display names, same
/// relation names) but carries no table-definition coupling: every
/// relationship accessor fetches through the configured request client.
pub fn data_class(db: &ResolvedDatabase, table: &Table, options: &GenerationOptions) -> String {
    let class = &table.class_display_name;
    let act = actual(options);

    let mut b = CodeBuilder::kotlin();

    if options.serialization {
        b.push_line(&format!("@Serializable(with={}.Companion::class)", class));
    }
    b.push_line(&format!("{}data class {}(", act, class));
    b.push_indent();
    let columns: Vec<&Column> = table.generated_columns().collect();
    for (index, column) in columns.iter().enumerate() {
        let kw = if column.mutable { "var" } else { "val" };
        let sep = if index + 1 == columns.len() { "" } else { "," };
        b.push_line(&format!(
            "{} {}: {}{}",
            kw,
            column.class_display_name,
            data_kotlin_type(table, column, options),
            sep
        ));
    }
    b.push_dedent();
    b.push_line(") {");
    b.push_blank();
    b.push_indent();

    relation_accessors(&mut b, db, table, options);

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

    if options.serialization {
        b.push_blank();
        companion(&mut b, table, options);
    }

    b.push_dedent();
    b.push_line("}");
    b.build()
}

fn relation_accessors(
    b: &mut CodeBuilder,
    db: &ResolvedDatabase,
    table: &Table,
    options: &GenerationOptions,
) {
    let act = actual(options);
    let client = options.request_client_name();

    let fks = usable_foreign_keys(db, table);
    let rks = usable_referencing_keys(db, table);
    if fks.is_empty() && rks.is_empty() {
        return;
    }

    for rel in &fks {
        let to_class = class_name_of(db, &rel.key.to_table);
        let from_prop = table
            .column(&rel.key.from_column)
            .map(|c| c.class_display_name.clone())
            .unwrap_or_else(|| rel.key.from_column.clone());
        if rel.nullable {
            b.push_line(&format!(
                "{}fun {}(): {}? = {}?.let {{ callEndpoint({}.Companion::getItem, {}, it) }}",
                act, rel.fk_class_name, to_class, from_prop, to_class, client
            ));
        } else {
            b.push_line(&format!(
                "{}fun {}(): {} = callEndpoint({}.Companion::getItem, {}, {})",
                act, rel.fk_class_name, to_class, to_class, client, from_prop
            ));
        }
    }

    for rel in &rks {
        let from_class = class_name_of(db, &rel.key.from_table);
        let from_prop = db
            .database()
            .table(&rel.key.from_table)
            .and_then(|t| t.column(&rel.key.from_column))
            .map(|c| c.class_display_name.clone())
            .unwrap_or_else(|| rel.key.from_column.clone());
        let to_prop = table
            .column(&rel.key.to_column)
            .map(|c| c.class_display_name.clone())
            .unwrap_or_else(|| rel.key.to_column.clone());
        b.push_line(&format!(
            "{}fun {}(): List<{}> = callEndpoint({}.Companion::allItems, {}).filter {{ it.{} == {} }}",
            act, rel.rk_class_name, from_class, from_class, client, from_prop, to_prop
        ));
    }

    b.push_blank();
}

fn companion(b: &mut CodeBuilder, table: &Table, options: &GenerationOptions) {
    let class = &table.class_display_name;
    let key = key_type(table);
    let act = actual(options);
    let client = options.request_client_name();

    b.push_line(&format!("@Serializer({}::class)", class));
    b.push_line(&format!(
        "{}companion object : KSerializer<{}> {{",
        act, class
    ));
    b.push_indent();

    if options.data_transfer {
        b.push_line(&format!(
            "{}fun getItem(id: {}): {} = callEndpoint(this::getItem, {}, id)",
            act, key, class, client
        ));
        b.push_line(&format!(
            "{}fun allItems(): List<{}> = callEndpoint(this::allItems, {})",
            act, class, client
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
    b.push_dedent();
    b.push_line("}");
}

/// Key-only wire form: the primary key as a hex string, re-fetched through
/// the endpoint on the way back in.
fn key_serializer(b: &mut CodeBuilder, table: &Table, options: &GenerationOptions) {
    let class = &table.class_display_name;
    let key = key_type(table);
    let act = actual(options);
    let pk_prop = table
        .primary_key()
        .and_then(|pk| table.column(&pk.column))
        .map(|c| c.class_display_name.clone())
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
        pk_prop
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
        "return getItem(stringFromUtf8Bytes(HexConverter.parseHexBinary(input.decodeString())).to{}())",
        key
    ));
    b.push_dedent();
    b.push_line("}");
    b.push_blank();
}

/// All-columns wire form: every column as a hex string element, rebuilt
/// positionally into a new instance.
fn all_columns_serializer(b: &mut CodeBuilder, table: &Table, options: &GenerationOptions) {
    let class = &table.class_display_name;
    let act = actual(options);
    let columns: Vec<&Column> = table.generated_columns().collect();

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
    for column in &columns {
        b.push_line(&format!(
            "var temp_{}: {}? = null",
            column.class_display_name,
            column.data_type.ty.kotlin_type()
        ));
    }
    b.push_line("loop@ while (true) {");
    b.push_indent();
    b.push_line("when (val i = inp.decodeElementIndex(descriptor)) {");
    b.push_indent();
    b.push_line("CompositeDecoder.READ_DONE -> break@loop");
    for (index, column) in columns.iter().enumerate() {
        b.push_line(&format!(
            "{} -> temp_{} = stringFromUtf8Bytes(HexConverter.parseHexBinary(inp.decodeStringElement(descriptor, i))){}",
            index,
            column.class_display_name,
            column.data_type.ty.from_string_suffix()
        ));
    }
    b.push_line(
        "else -> if (i < descriptor.elementsCount) continue@loop else throw SerializationException(\"Unknown index $i\")",
    );
    b.push_dedent();
    b.push_line("}");
    b.push_dedent();
    b.push_line("}");
    b.push_blank();
    b.push_line("inp.endStructure(descriptor)");
    b.push_blank();
    b.push_line(&format!("return {}(", class));
    b.push_indent();
    for (index, column) in columns.iter().enumerate() {
        let sep = if index + 1 == columns.len() { "" } else { "," };
        b.push_line(&format!(
            "temp_{} ?: throw SerializationException(\"Missing value for {}\"){}",
            column.class_display_name, column.class_display_name, sep
        ));
    }
    b.push_dedent();
    b.push_line(")");
    b.push_dedent();
    b.push_line("}");
    b.push_blank();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::tests_fixtures::shop;

    fn data_options() -> GenerationOptions {
        GenerationOptions {
            multiplatform: true,
            serialization: true,
            data_transfer: true,
            ..GenerationOptions::default()
        }
    }

    #[test]
    fn test_data_class_shape() {
        let db = shop();
        let options = data_options();
        let table = db.database().table("orders").unwrap();
        let out = data_class(&db, table, &options);

        assert!(out.starts_with("@Serializable(with=order.Companion::class)\n"));
        assert!(out.contains("actual data class order(\n"));
        assert!(out.contains("\tval id: Int,\n"));
        assert!(out.contains("\tval customer_id: Int?,\n"));
        assert!(out.contains("\tval total: BigDecimal?\n"));
        assert!(out.contains(") {\n"));
    }

    #[test]
    fn test_relations_fetch_through_the_client() {
        let db = shop();
        let options = data_options();

        let orders = data_class(&db, db.database().table("orders").unwrap(), &options);
        assert!(orders.contains(
            "\tactual fun customer_fk(): customer? = customer_id?.let { callEndpoint(customer.Companion::getItem, Client, it) }\n"
        ));

        let customers = data_class(&db, db.database().table("customers").unwrap(), &options);
        assert!(customers.contains(
            "\tactual fun orders(): List<order> = callEndpoint(order.Companion::allItems, Client).filter { it.customer_id == id }\n"
        ));
    }

    #[test]
    fn test_companion_endpoints_and_key_serializer() {
        let db = shop();
        let options = data_options();
        let out = data_class(&db, db.database().table("customers").unwrap(), &options);

        assert!(out.contains("\t@Serializer(customer::class)\n"));
        assert!(out.contains("\tactual companion object : KSerializer<customer> {\n"));
        assert!(out.contains(
            "\t\tactual fun getItem(id: Int): customer = callEndpoint(this::getItem, Client, id)\n"
        ));
        assert!(out.contains(
            "\t\tactual fun allItems(): List<customer> = callEndpoint(this::allItems, Client)\n"
        ));
        // deserialization re-fetches by key instead of touching a table object
        assert!(out.contains(
            "\t\t\treturn getItem(stringFromUtf8Bytes(HexConverter.parseHexBinary(input.decodeString())).toInt())\n"
        ));
    }

    #[test]
    fn test_all_columns_deserializer_rebuilds_the_instance() {
        let db = shop();
        let options = GenerationOptions {
            serialization_include_columns: true,
            ..data_options()
        };
        let out = data_class(&db, db.database().table("customers").unwrap(), &options);

        assert!(out.contains("var temp_id: Int? = null"));
        assert!(out.contains("var temp_name: String? = null"));
        assert!(out.contains("0 -> temp_id = stringFromUtf8Bytes(HexConverter.parseHexBinary(inp.decodeStringElement(descriptor, i))).toInt()"));
        assert!(out.contains("temp_id ?: throw SerializationException(\"Missing value for id\"),"));
        assert!(out.contains("temp_name ?: throw SerializationException(\"Missing value for name\")"));
    }

    #[test]
    fn test_nullable_by_default_widens_data_columns() {
        let db = shop();
        let options = GenerationOptions {
            nullable_by_default: true,
            ..data_options()
        };
        let out = data_class(&db, db.database().table("customers").unwrap(), &options);

        // the key keeps its type; data columns widen
        assert!(out.contains("\tval id: Int,\n"));
        assert!(out.contains("\tval name: String?\n"));
    }

    #[test]
    fn test_custom_request_client_name() {
        let db = shop();
        let options = GenerationOptions {
            request_client: "com.example.net.ApiClient".into(),
            ..data_options()
        };
        let out = data_class(&db, db.database().table("customers").unwrap(), &options);
        assert!(out.contains("callEndpoint(this::getItem, ApiClient, id)"));
        assert!(!out.contains("com.example.net.ApiClient,"));
    }
}
