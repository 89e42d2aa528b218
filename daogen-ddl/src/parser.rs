//! Statement-level parsing and the cross-table key linking pass.
//!
//! Statements are split on `;` and parsed independently, so one malformed
//! statement never takes the rest of the batch down with it. Foreign keys
//! are collected while tables are built and linked afterwards, so forward
//! references between tables work in any statement order.

use std::fs;
use std::path::Path;

use miette::SourceSpan;

use daogen_schema::{
    Column, DataType, Database, ForeignKey, PrimaryKey, Table, Type, normalize_ddl,
};

use crate::clause::{
    Clause, ClauseError, find_ignore_case, normalize_identifier, parens_content, split_commas,
    strip_prefix_ignore_case,
};
use crate::error::{Error, Result, SourceContext};

/// Every table that could be built, plus one diagnostic per statement,
/// clause, or key that had to be skipped.
#[derive(Debug)]
pub struct ParseOutcome {
    pub database: Database,
    pub diagnostics: Vec<Error>,
}

impl ParseOutcome {
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Parse a `;`-separated batch of DDL statements.
pub fn parse_batch(sql: &str) -> ParseOutcome {
    parse_batch_named(sql, "<ddl>")
}

/// Parse a batch, naming its source in diagnostics.
pub fn parse_batch_named(sql: &str, name: &str) -> ParseOutcome {
    let src = sql.replace("\r\n", "\n");
    let mut parser = Parser {
        ctx: SourceContext::new(src.clone(), name),
        database: Database::new(None),
        pending: Vec::new(),
        diagnostics: Vec::new(),
    };
    for statement in src.split(';') {
        parser.statement(&src, statement);
    }
    parser.link();
    ParseOutcome {
        database: parser.database,
        diagnostics: parser.diagnostics,
    }
}

/// Read and parse a DDL file, naming it in any diagnostics.
pub fn parse_file(path: &Path) -> Result<ParseOutcome> {
    let sql = fs::read_to_string(path).map_err(|source| {
        Box::new(Error::Io {
            path: path.to_path_buf(),
            source,
        })
    })?;
    Ok(parse_batch_named(&sql, &path.display().to_string()))
}

struct PendingKey {
    key: ForeignKey,
    span: SourceSpan,
}

struct Parser {
    ctx: SourceContext,
    database: Database,
    pending: Vec<PendingKey>,
    diagnostics: Vec<Error>,
}

impl Parser {
    fn statement(&mut self, src: &str, raw: &str) {
        let stmt = strip_leading_comments(raw);
        if stmt.is_empty() {
            return;
        }
        if strip_prefix_ignore_case(stmt, "alter table").is_some() {
            self.alter_foreign_key(src, stmt);
            return;
        }
        let Some(after_create) = strip_prefix_ignore_case(stmt, "create table") else {
            // anything else in the batch is not schema-bearing
            return;
        };

        let span = span_of(src, stmt);
        let Some(open) = after_create.find('(') else {
            self.diagnostics.push(*self.ctx.statement_error(
                "create table statement has no column list",
                Some(span),
            ));
            return;
        };
        let Some(body) = parens_content(after_create) else {
            self.diagnostics.push(*self.ctx.statement_error(
                "unbalanced parentheses in create table statement",
                Some(span),
            ));
            return;
        };

        let mut name_part = after_create[..open].trim();
        if let Some(rest) = strip_prefix_ignore_case(name_part, "if not exists") {
            name_part = rest.trim();
        }
        let (schema, table_name) = split_qualified(name_part);
        if table_name.is_empty() {
            self.diagnostics.push(
                *self
                    .ctx
                    .statement_error("create table statement has no table name", Some(span)),
            );
            return;
        }
        if self.database.schema.is_none() {
            self.database.schema = schema;
        }

        let mut columns: Vec<Column> = Vec::new();
        let mut inline_pks: Vec<String> = Vec::new();
        let mut constraint_pks: Option<Vec<String>> = None;

        for piece in split_commas(body) {
            let cspan = span_of(src, piece);
            match Clause::classify(piece) {
                Ok(Clause::DataColumn {
                    name,
                    type_name,
                    params,
                    not_null,
                    auto_increment,
                    primary_key,
                }) => {
                    let data_type = self.resolve_type(&type_name, params, cspan);
                    if primary_key {
                        inline_pks.push(name.clone());
                    }
                    columns.push(Column::new(name, data_type, not_null, auto_increment));
                }
                Ok(Clause::PrimaryKeyConstraint { columns }) => {
                    if constraint_pks.is_some() {
                        self.diagnostics.push(*self.ctx.statement_error(
                            "table declares more than one primary key constraint",
                            Some(cspan),
                        ));
                    } else {
                        constraint_pks = Some(columns);
                    }
                }
                Ok(Clause::ForeignKeyConstraint {
                    column,
                    ref_table,
                    ref_column,
                }) => self.pending.push(PendingKey {
                    key: ForeignKey::new(table_name.clone(), column, ref_table, ref_column),
                    span: cspan,
                }),
                Err(ClauseError::Empty) => {}
                Err(ClauseError::CompositeForeignKey) => self
                    .diagnostics
                    .push(*self.ctx.composite_foreign_key(Some(cspan))),
                Err(err) => self
                    .diagnostics
                    .push(*self.ctx.statement_error(err.to_string(), Some(cspan))),
            }
        }

        let pk_columns = constraint_pks.unwrap_or(inline_pks);
        let primary_keys = pk_columns
            .into_iter()
            .enumerate()
            .map(|(i, column)| PrimaryKey::new(i as u32, column))
            .collect();

        match Table::new(table_name.clone(), columns, primary_keys) {
            Ok(table) => {
                if self.database.table(&table_name).is_some() {
                    self.diagnostics.push(*self.ctx.statement_error(
                        format!(
                            "table '{}' is defined more than once; the later definition wins",
                            table_name
                        ),
                        Some(span),
                    ));
                }
                self.database.push_table(table);
            }
            Err(err) => self.diagnostics.push(*self.ctx.statement_error(
                format!("invalid table '{}': {}", table_name, err),
                Some(span),
            )),
        }
    }

    /// `alter table <t> add [constraint <n>] foreign key (...) references ...`
    fn alter_foreign_key(&mut self, src: &str, stmt: &str) {
        let span = span_of(src, stmt);
        let Some(fk_at) = find_ignore_case(stmt, "foreign key") else {
            return;
        };
        let Some(after_alter) = strip_prefix_ignore_case(stmt, "alter table") else {
            return;
        };

        let mut rest = after_alter.trim_start();
        if let Some(after_only) = strip_prefix_ignore_case(rest, "only ") {
            rest = after_only.trim_start();
        }
        let name_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let (_, table) = split_qualified(&rest[..name_end]);
        if table.is_empty() {
            return;
        }

        match Clause::classify(&stmt[fk_at..]) {
            Ok(Clause::ForeignKeyConstraint {
                column,
                ref_table,
                ref_column,
            }) => self.pending.push(PendingKey {
                key: ForeignKey::new(table, column, ref_table, ref_column),
                span,
            }),
            Ok(_) => {}
            Err(ClauseError::CompositeForeignKey) => self
                .diagnostics
                .push(*self.ctx.composite_foreign_key(Some(span))),
            Err(err) => self
                .diagnostics
                .push(*self.ctx.statement_error(err.to_string(), Some(span))),
        }
    }

    fn resolve_type(&mut self, type_name: &str, params: Vec<String>, span: SourceSpan) -> DataType {
        match normalize_ddl(type_name, params) {
            Ok(dt) if dt.ty == Type::Unknown => {
                self.diagnostics.push(*self.ctx.unsupported_type(
                    type_name,
                    "not a recognized database type",
                    Some(span),
                ));
                dt
            }
            Ok(dt) => dt,
            Err(err) => {
                self.diagnostics.push(*self.ctx.unsupported_type(
                    type_name,
                    err.to_string(),
                    Some(span),
                ));
                DataType {
                    ty: Type::Unknown,
                    params: Vec::new(),
                }
            }
        }
    }

    /// Link collected keys once every table exists; a key naming a missing
    /// endpoint is dropped with a diagnostic instead of failing the batch.
    fn link(&mut self) {
        for pending in std::mem::take(&mut self.pending) {
            let display = pending.key.to_string();
            if let Err(err) = self.database.add_foreign_key(pending.key) {
                self.diagnostics.push(*self.ctx.dangling_foreign_key(
                    display,
                    err.to_string(),
                    Some(pending.span),
                ));
            }
        }
    }
}

fn span_of(src: &str, slice: &str) -> SourceSpan {
    let start = slice.as_ptr() as usize - src.as_ptr() as usize;
    (start, slice.len()).into()
}

fn strip_leading_comments(text: &str) -> &str {
    let mut rest = text.trim();
    while rest.starts_with("--") {
        match rest.find('\n') {
            Some(nl) => rest = rest[nl + 1..].trim(),
            None => return "",
        }
    }
    rest
}

/// Split a possibly schema-qualified name into `(schema, table)`.
fn split_qualified(name: &str) -> (Option<String>, String) {
    match name.rfind('.') {
        Some(dot) => (
            Some(normalize_identifier(&name[..dot])),
            normalize_identifier(&name[dot + 1..]),
        ),
        None => (None, normalize_identifier(name)),
    }
}
