//! Whole-database generation: per-table files, coordinated flavors, and
//! the endpoint registration manifest.

use std::path::PathBuf;

use daogen_codegen::{GenerationOptions, OutputFile, export_header};
use daogen_schema::ResolvedDatabase;

use crate::class_block::entity_class;
use crate::data_class::data_class;
use crate::declaration::declaration;
use crate::object_block::object_block;
use crate::support::key_type;

/// A per-table generation problem. Generation never aborts the run for
/// one table; failures are collected alongside the surviving files.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum Failure {
    /// The primary key does not fit any supported entity-class category;
    /// only the table-definition flavor was emitted.
    #[error("table '{table}': unsupported primary key type, object generated without a class")]
    #[diagnostic(
        code(daogen::codegen::unsupported_key),
        help("only single int/long keys and all-integer composite keys carry an entity class")
    )]
    UnsupportedKeyType { table: String },

    /// A column failed to render, so the table was dropped from the output.
    #[error("table '{table}': {message}")]
    #[diagnostic(code(daogen::codegen::render))]
    Render { table: String, message: String },
}

/// Everything one generation run produced.
#[derive(Debug, Clone, Default)]
pub struct Output {
    pub files: Vec<OutputFile>,
    pub failures: Vec<Failure>,
}

/// Generate the full output tree for a resolved database.
///
/// Single-platform runs produce one file per table under the package path;
/// multiplatform runs produce the common declaration, the js data class,
/// and the jvm entity per table under the usual source-set layout.
pub fn generate(db: &ResolvedDatabase, options: &GenerationOptions) -> Output {
    render(db, options, None)
}

/// Like [`generate`], but stamps every jvm file with the origin header so
/// a later run can trace the output back to its model document.
pub fn render_export(db: &ResolvedDatabase, options: &GenerationOptions, origin: &str) -> Output {
    render(db, options, Some(origin))
}

fn render(db: &ResolvedDatabase, options: &GenerationOptions, origin: Option<&str>) -> Output {
    let mut out = Output::default();

    for (table, _) in db.tables() {
        let object = match object_block(db, table, options) {
            Ok(block) => block,
            Err(e) => {
                out.failures.push(Failure::Render {
                    table: table.name.clone(),
                    message: e.to_string(),
                });
                continue;
            }
        };

        let supported = table.pk_category().supports_class();
        if options.do_dao && !supported {
            out.failures.push(Failure::UnsupportedKeyType {
                table: table.name.clone(),
            });
        }

        let mut jvm = String::new();
        if let Some(origin) = origin {
            jvm.push_str(&export_header(origin));
            jvm.push('\n');
        }
        jvm.push_str(&jvm_header(options));
        jvm.push_str(&object);
        if options.do_dao && supported {
            jvm.push('\n');
            jvm.push('\n');
            jvm.push_str(&entity_class(db, table, options));
        }

        if options.multiplatform {
            out.files
                .push(OutputFile::new(platform_path("jvmMain", options, &table.name), jvm));
            if supported {
                let mut common = common_header(options);
                common.push_str(&declaration(db, table, options));
                out.files.push(OutputFile::new(
                    platform_path("commonMain", options, &table.name),
                    common,
                ));

                let mut js = js_header(options);
                js.push_str(&data_class(db, table, options));
                out.files
                    .push(OutputFile::new(platform_path("jsMain", options, &table.name), js));
            }
        } else {
            out.files
                .push(OutputFile::new(flat_path(options, &table.name), jvm));
        }
    }

    if options.data_transfer && options.serialization {
        let content = endpoint_registrations(db, options);
        let path = if options.multiplatform {
            platform_path("jvmMain", options, "endpoints")
        } else {
            flat_path(options, "endpoints")
        };
        out.files.push(OutputFile::new(path, content));
    }

    out
}

/// The server-side endpoint manifest: one getItem/allItems registration
/// pair per class-bearing table.
pub fn endpoint_registrations(db: &ResolvedDatabase, options: &GenerationOptions) -> String {
    let mut content = String::new();
    if !options.out_package.is_empty() {
        content.push_str(&format!("package {}\n\n", options.out_package));
    }
    content.push_str("import com.rnett.kframe.data.EndpointManager\n");
    content.push_str("import com.rnett.kframe.data.addEndpoint\n\n");
    content.push_str("fun registerEndpoints() {\n");
    for (table, _) in db.tables() {
        if !table.pk_category().supports_class() {
            continue;
        }
        let class = &table.class_display_name;
        content.push_str(&format!(
            "\tEndpointManager.addEndpoint({}.Companion::getItem, {}, {}Serializer)\n",
            class,
            class,
            key_type(table)
        ));
        content.push_str(&format!(
            "\tEndpointManager.addEndpoint({}.Companion::allItems, {}.list)\n",
            class, class
        ));
    }
    content.push_str("}\n");
    content
}

fn package_dir(options: &GenerationOptions) -> PathBuf {
    options.out_package.split('.').filter(|s| !s.is_empty()).collect()
}

fn flat_path(options: &GenerationOptions, table: &str) -> PathBuf {
    package_dir(options).join(format!("{}.kt", table))
}

fn platform_path(source_set: &str, options: &GenerationOptions, table: &str) -> PathBuf {
    PathBuf::from(source_set)
        .join("kotlin")
        .join(package_dir(options))
        .join(format!("{}.kt", table))
}

fn package_line(options: &GenerationOptions) -> String {
    if options.out_package.is_empty() {
        String::new()
    } else {
        format!("package {}\n\n", options.out_package)
    }
}

fn serialization_imports() -> &'static str {
    "import kotlinx.serialization.*\n\
     import kotlinx.serialization.internal.HexConverter\n\
     import kotlinx.serialization.internal.StringDescriptor\n\
     import kotlinx.serialization.internal.SerialClassDescImpl\n"
}

fn client_import(options: &GenerationOptions) -> String {
    if options.data_transfer && options.request_client.contains('.') {
        format!("import {}\n", options.request_client)
    } else {
        String::new()
    }
}

fn jvm_header(options: &GenerationOptions) -> String {
    let mut header = package_line(options);
    header.push_str(
        "import org.jetbrains.exposed.sql.transactions.transaction\n\
         import org.jetbrains.exposed.sql.Table\n\
         import org.jetbrains.exposed.sql.SizedIterable\n\
         import org.jetbrains.exposed.dao.*\n",
    );
    if options.serialization {
        header.push_str(serialization_imports());
    }
    header.push_str(&client_import(options));
    header.push('\n');
    header
}

fn js_header(options: &GenerationOptions) -> String {
    let mut header = package_line(options);
    if options.serialization {
        header.push_str(serialization_imports());
    }
    if options.data_transfer {
        header.push_str("import com.rnett.kframe.data.callEndpoint\n");
    }
    header.push_str(&client_import(options));
    header.push('\n');
    header
}

fn common_header(options: &GenerationOptions) -> String {
    let mut header = package_line(options);
    if options.serialization {
        header.push_str(serialization_imports());
    }
    header.push('\n');
    header
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::tests_fixtures::{keyless, shop};
    use daogen_codegen::exported_from;
    use std::path::Path;

    fn full_options() -> GenerationOptions {
        GenerationOptions {
            out_package: "com.example.db".into(),
            serialization: true,
            data_transfer: true,
            multiplatform: true,
            ..GenerationOptions::default()
        }
    }

    fn find<'a>(out: &'a Output, path: &str) -> &'a OutputFile {
        out.files
            .iter()
            .find(|f| f.path() == Path::new(path))
            .unwrap_or_else(|| panic!("missing file {}", path))
    }

    #[test]
    fn test_single_platform_layout() {
        let db = shop();
        let options = GenerationOptions {
            out_package: "com.example.db".into(),
            ..GenerationOptions::default()
        };
        let out = generate(&db, &options);

        assert_eq!(out.files.len(), 2);
        let orders = find(&out, "com/example/db/orders.kt");
        assert!(orders.content().starts_with("package com.example.db\n"));
        assert!(orders.content().contains("import org.jetbrains.exposed.dao.*"));
        assert!(orders.content().contains("object orders : IntIdTable(\"orders\", \"id\") {"));
        assert!(orders.content().contains("class order(id: EntityID<Int>) : IntEntity(id) {"));
        assert!(out.failures.is_empty());
    }

    #[test]
    fn test_multiplatform_layout() {
        let db = shop();
        let out = generate(&db, &full_options());

        // 3 source sets x 2 tables + the endpoint manifest
        assert_eq!(out.files.len(), 7);
        let common = find(&out, "commonMain/kotlin/com/example/db/customers.kt");
        assert!(common.content().contains("expect class customer {"));
        let js = find(&out, "jsMain/kotlin/com/example/db/customers.kt");
        assert!(js.content().contains("actual data class customer("));
        assert!(js.content().contains("import com.rnett.kframe.data.callEndpoint"));
        let jvm = find(&out, "jvmMain/kotlin/com/example/db/customers.kt");
        assert!(jvm.content().contains("actual class customer"));
        assert!(jvm.content().contains("import kotlinx.serialization.*"));
    }

    #[test]
    fn test_endpoint_manifest() {
        let db = shop();
        let out = generate(&db, &full_options());
        let endpoints = find(&out, "jvmMain/kotlin/com/example/db/endpoints.kt");

        assert!(endpoints.content().contains("fun registerEndpoints() {"));
        assert!(endpoints.content().contains(
            "\tEndpointManager.addEndpoint(customer.Companion::getItem, customer, IntSerializer)\n"
        ));
        assert!(endpoints.content().contains(
            "\tEndpointManager.addEndpoint(order.Companion::allItems, order.list)\n"
        ));
    }

    #[test]
    fn test_unsupported_key_gets_object_only_and_a_warning() {
        let db = keyless();
        let out = generate(&db, &full_options());

        assert!(out.failures.contains(&Failure::UnsupportedKeyType {
            table: "audit_log".into()
        }));
        // jvm object file exists, class-bearing source sets skip the table
        let jvm = find(&out, "jvmMain/kotlin/com/example/db/audit_log.kt");
        assert!(jvm.content().contains("object audit_logs : Table(\"audit_log\") {"));
        assert!(!jvm.content().contains("class audit_log("));
        assert!(!out
            .files
            .iter()
            .any(|f| f.path() == Path::new("jsMain/kotlin/com/example/db/audit_log.kt")));
    }

    #[test]
    fn test_export_header_traces_back_to_the_model() {
        let db = shop();
        let options = GenerationOptions::default();
        let out = render_export(&db, &options, "models/shop.json");

        let first = &out.files[0];
        assert_eq!(exported_from(first.content()), Some("models/shop.json"));
    }

    #[test]
    fn test_no_package_means_no_package_line() {
        let db = shop();
        let out = generate(&db, &GenerationOptions::default());
        let orders = find(&out, "orders.kt");
        assert!(!orders.content().contains("package"));
        assert!(orders.content().starts_with("import org.jetbrains.exposed"));
    }
}
