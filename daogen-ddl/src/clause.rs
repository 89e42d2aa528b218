//! Classification of the clauses inside a `create table (...)` body.

use thiserror::Error;

/// One comma-separated clause of a `create table` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// A column definition, e.g. `"name" varchar(100) not null`.
    DataColumn {
        name: String,
        type_name: String,
        params: Vec<String>,
        not_null: bool,
        auto_increment: bool,
        /// Set by an inline `primary key` modifier on the column itself.
        primary_key: bool,
    },
    /// A `primary key (a, b, ...)` constraint; ordinal is list position.
    PrimaryKeyConstraint { columns: Vec<String> },
    /// A single-column `foreign key (col) references table (col)` constraint.
    ForeignKeyConstraint {
        column: String,
        ref_table: String,
        ref_column: String,
    },
}

/// Why a clause could not be classified. The parser converts these into
/// span-carrying diagnostics and skips the clause.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClauseError {
    #[error("empty clause")]
    Empty,

    #[error("unrecognized constraint clause")]
    Unrecognized,

    #[error("composite foreign keys are not supported")]
    CompositeForeignKey,

    #[error("malformed primary key constraint")]
    MalformedPrimaryKey,

    #[error("malformed foreign key constraint")]
    MalformedForeignKey,

    #[error("column '{column}' has no type")]
    MissingType { column: String },
}

impl Clause {
    /// Classify one clause of a statement body.
    ///
    /// Constraints are detected by keyword; everything else is treated as a
    /// column definition. Unquoted identifiers fold to lowercase; quoted
    /// ones keep their exact case with the quotes stripped, so `"Order_ID"`
    /// and `order_id` name different columns.
    pub fn classify(text: &str) -> Result<Clause, ClauseError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ClauseError::Empty);
        }

        let folded = text.to_lowercase();
        // a leading `constraint <name>` prefix is transparent
        let (folded, text) = if folded.starts_with("constraint ") {
            let rest = skip_tokens(text, 2);
            (rest.to_lowercase(), rest)
        } else {
            (folded, text)
        };

        if folded.starts_with("primary key") {
            return classify_primary_key(text);
        }
        if folded.starts_with("foreign key") {
            return classify_foreign_key(text);
        }
        if folded.starts_with("unique")
            || folded.starts_with("check")
            || folded.starts_with("index")
            || folded.starts_with("key ")
            || folded.starts_with("exclude")
        {
            return Err(ClauseError::Unrecognized);
        }

        classify_data_column(text)
    }
}

fn classify_primary_key(text: &str) -> Result<Clause, ClauseError> {
    let body = parens_content(text).ok_or(ClauseError::MalformedPrimaryKey)?;
    let columns: Vec<String> = split_commas(body)
        .into_iter()
        .map(|c| normalize_identifier(c))
        .filter(|c| !c.is_empty())
        .collect();
    if columns.is_empty() {
        return Err(ClauseError::MalformedPrimaryKey);
    }
    Ok(Clause::PrimaryKeyConstraint { columns })
}

fn classify_foreign_key(text: &str) -> Result<Clause, ClauseError> {
    let references =
        find_ignore_case(text, "references").ok_or(ClauseError::MalformedForeignKey)?;
    let (head, tail) = text.split_at(references);
    let tail = &tail["references".len()..];

    let from = parens_content(head).ok_or(ClauseError::MalformedForeignKey)?;
    let from_columns = split_commas(from);
    if from_columns.len() > 1 {
        return Err(ClauseError::CompositeForeignKey);
    }
    let column = normalize_identifier(from_columns[0]);

    let paren = tail.find('(').ok_or(ClauseError::MalformedForeignKey)?;
    // drop a schema qualifier before unquoting so each part keeps its own
    let target = tail[..paren].trim();
    let target = target.rsplit_once('.').map_or(target, |(_, t)| t);
    let ref_table = normalize_identifier(target);
    let to = parens_content(tail).ok_or(ClauseError::MalformedForeignKey)?;
    let to_columns = split_commas(to);
    if to_columns.len() > 1 {
        return Err(ClauseError::CompositeForeignKey);
    }
    let ref_column = normalize_identifier(to_columns[0]);

    if column.is_empty() || ref_table.is_empty() || ref_column.is_empty() {
        return Err(ClauseError::MalformedForeignKey);
    }
    Ok(Clause::ForeignKeyConstraint {
        column,
        ref_table,
        ref_column,
    })
}

fn classify_data_column(text: &str) -> Result<Clause, ClauseError> {
    let mut parts = text.splitn(2, char::is_whitespace);
    let name = normalize_identifier(parts.next().unwrap_or(""));
    let rest = parts.next().unwrap_or("").trim();
    if name.is_empty() {
        return Err(ClauseError::Empty);
    }
    if rest.is_empty() {
        return Err(ClauseError::MissingType { column: name });
    }

    let mut spec = rest.to_lowercase();
    let not_null = spec.contains("not null");
    spec = spec.replace("not null", " ");
    let auto_increment = spec.contains("auto_increment") || spec.contains("autoincrement");
    spec = spec.replace("auto_increment", " ").replace("autoincrement", " ");
    let primary_key = spec.contains("primary key");
    spec = spec.replace("primary key", " ");
    // everything from a default clause on is irrelevant to the model
    if let Some(default) = spec.find(" default ") {
        spec.truncate(default);
    }

    let (type_name, params) = match spec.find('(') {
        Some(open) => {
            let params = parens_content(&spec)
                .ok_or_else(|| ClauseError::MissingType {
                    column: name.clone(),
                })?
                .to_string();
            let params = split_commas(&params)
                .into_iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect();
            (spec[..open].trim().to_string(), params)
        }
        None => (collapse_whitespace(&spec), Vec::new()),
    };
    if type_name.is_empty() {
        return Err(ClauseError::MissingType { column: name });
    }

    Ok(Clause::DataColumn {
        name,
        type_name,
        params,
        not_null,
        auto_increment,
        primary_key,
    })
}

/// Skip `n` whitespace-delimited tokens.
fn skip_tokens(text: &str, n: usize) -> &str {
    let mut rest = text;
    for _ in 0..n {
        rest = rest.trim_start();
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        rest = &rest[end..];
    }
    rest.trim_start()
}

/// The content of the first `(...)` group, outermost parens only.
pub(crate) fn parens_content(text: &str) -> Option<&str> {
    let open = text.find('(')?;
    let mut depth = 0usize;
    for (i, c) in text[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[open + 1..open + i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split on commas that are not nested inside parentheses.
pub(crate) fn split_commas(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                out.push(text[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(text[start..].trim());
    out
}

/// Strip quoting from an identifier. Quoted identifiers keep their exact
/// case; unquoted ones fold to lowercase.
pub(crate) fn normalize_identifier(text: &str) -> String {
    let text = text.trim();
    let bytes = text.as_bytes();
    let quoted = bytes.len() >= 2
        && matches!(
            (bytes[0], bytes[bytes.len() - 1]),
            (b'"', b'"') | (b'`', b'`') | (b'[', b']') | (b'\'', b'\'')
        );
    if quoted {
        text[1..text.len() - 1].to_string()
    } else {
        text.to_lowercase()
    }
}

/// Byte offset of the first ASCII-case-insensitive occurrence of `needle`.
/// The match starts with an ASCII byte, so the offset is always a valid
/// slice boundary in `text`.
pub(crate) fn find_ignore_case(text: &str, needle: &str) -> Option<usize> {
    text.as_bytes()
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle.as_bytes()))
}

/// Strip a leading ASCII keyword regardless of its case.
pub(crate) fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.as_bytes().get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix.as_bytes()) {
        Some(&text[prefix.len()..])
    } else {
        None
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_column() {
        let clause = Clause::classify("id integer not null auto_increment").unwrap();
        assert_eq!(
            clause,
            Clause::DataColumn {
                name: "id".into(),
                type_name: "integer".into(),
                params: vec![],
                not_null: true,
                auto_increment: true,
                primary_key: false,
            }
        );
    }

    #[test]
    fn test_quoted_identifier_keeps_its_case() {
        let clause = Clause::classify("\"Order_Total\" decimal(20,10)").unwrap();
        assert_eq!(
            clause,
            Clause::DataColumn {
                name: "Order_Total".into(),
                type_name: "decimal".into(),
                params: vec!["20".into(), "10".into()],
                not_null: false,
                auto_increment: false,
                primary_key: false,
            }
        );
    }

    #[test]
    fn test_unquoted_identifier_is_folded() {
        let clause = Clause::classify("OrderTotal decimal(20,10)").unwrap();
        let Clause::DataColumn { name, .. } = clause else {
            panic!("expected a data column");
        };
        assert_eq!(name, "ordertotal");
    }

    #[test]
    fn test_multi_word_type() {
        let clause = Clause::classify("weight double precision").unwrap();
        assert_eq!(
            clause,
            Clause::DataColumn {
                name: "weight".into(),
                type_name: "double precision".into(),
                params: vec![],
                not_null: false,
                auto_increment: false,
                primary_key: false,
            }
        );
    }

    #[test]
    fn test_default_clause_is_ignored() {
        let clause = Clause::classify("active boolean not null default true").unwrap();
        assert_eq!(
            clause,
            Clause::DataColumn {
                name: "active".into(),
                type_name: "boolean".into(),
                params: vec![],
                not_null: true,
                auto_increment: false,
                primary_key: false,
            }
        );
    }

    #[test]
    fn test_primary_key_constraint() {
        let clause = Clause::classify("PRIMARY KEY (\"A\", b)").unwrap();
        assert_eq!(
            clause,
            Clause::PrimaryKeyConstraint {
                columns: vec!["A".into(), "b".into()],
            }
        );
    }

    #[test]
    fn test_named_constraint_prefix_is_transparent() {
        let clause = Clause::classify("constraint pk_orders primary key (id)").unwrap();
        assert_eq!(
            clause,
            Clause::PrimaryKeyConstraint {
                columns: vec!["id".into()],
            }
        );
    }

    #[test]
    fn test_foreign_key_constraint() {
        let clause =
            Clause::classify("foreign key (customer_id) references customers (id)").unwrap();
        assert_eq!(
            clause,
            Clause::ForeignKeyConstraint {
                column: "customer_id".into(),
                ref_table: "customers".into(),
                ref_column: "id".into(),
            }
        );
    }

    #[test]
    fn test_qualified_reference_keeps_quoted_case() {
        let clause = Clause::classify(
            "foreign key (customer_id) references \"Public\".\"Customers\" (id)",
        )
        .unwrap();
        assert_eq!(
            clause,
            Clause::ForeignKeyConstraint {
                column: "customer_id".into(),
                ref_table: "Customers".into(),
                ref_column: "id".into(),
            }
        );
    }

    #[test]
    fn test_non_ascii_names_do_not_skew_the_keyword_scan() {
        // 'İ' grows by a byte under to_lowercase; the REFERENCES offset must
        // come from the original text, not a folded copy
        let clause =
            Clause::classify("FOREIGN KEY (\"İl_id\") REFERENCES \"İller\" (id)").unwrap();
        assert_eq!(
            clause,
            Clause::ForeignKeyConstraint {
                column: "İl_id".into(),
                ref_table: "İller".into(),
                ref_column: "id".into(),
            }
        );
    }

    #[test]
    fn test_composite_foreign_key_rejected() {
        let err =
            Clause::classify("foreign key (a, b) references other (x, y)").unwrap_err();
        assert_eq!(err, ClauseError::CompositeForeignKey);
    }

    #[test]
    fn test_unique_constraint_unrecognized() {
        assert_eq!(
            Clause::classify("unique (email)").unwrap_err(),
            ClauseError::Unrecognized
        );
    }

    #[test]
    fn test_column_without_type() {
        assert_eq!(
            Clause::classify("orphan").unwrap_err(),
            ClauseError::MissingType {
                column: "orphan".into()
            }
        );
    }
}
