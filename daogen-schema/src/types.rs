//! The fixed set of logical database types and their rendering templates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A logical database type.
///
/// Each type carries a parameterized database-type template, a parameterized
/// Kotlin column-builder template, the Kotlin runtime type it maps to, and a
/// declared parameter count. Templates use `$name` for the column name and
/// `$1`, `$2`, ... for positional parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Int,
    Long,
    Float,
    Double,
    Decimal,
    Bool,
    Char,
    Varchar,
    Text,
    Unknown,
}

impl Type {
    pub const ALL: [Type; 10] = [
        Type::Int,
        Type::Long,
        Type::Float,
        Type::Double,
        Type::Decimal,
        Type::Bool,
        Type::Char,
        Type::Varchar,
        Type::Text,
        Type::Unknown,
    ];

    /// The database-side type template, e.g. `varchar($1)`.
    pub fn database_template(self) -> &'static str {
        match self {
            Type::Int => "int",
            Type::Long => "bigint",
            Type::Float => "float",
            Type::Double => "double precision",
            Type::Decimal => "decimal($1, $2)",
            Type::Bool => "boolean",
            Type::Char => "char",
            Type::Varchar => "varchar($1)",
            Type::Text => "text",
            Type::Unknown => "",
        }
    }

    /// The Kotlin (Exposed) column-builder template, e.g. `varchar($name, $1)`.
    pub fn kotlin_template(self) -> &'static str {
        match self {
            Type::Int => "integer",
            Type::Long => "long",
            Type::Float => "float",
            Type::Double => "double",
            Type::Decimal => "decimal($name, $1, $2)",
            Type::Bool => "bool",
            Type::Char => "char",
            Type::Varchar => "varchar($name, $1)",
            Type::Text => "text",
            // explicit placeholder so unknown catalog types never fail a run
            Type::Unknown => "// TODO unknown type",
        }
    }

    /// The Kotlin runtime type a column of this type exposes.
    pub fn kotlin_type(self) -> &'static str {
        match self {
            Type::Int => "Int",
            Type::Long => "Long",
            Type::Float => "Float",
            Type::Double => "Double",
            Type::Decimal => "BigDecimal",
            Type::Bool => "Boolean",
            Type::Char => "Char",
            Type::Varchar | Type::Text | Type::Unknown => "String",
        }
    }

    /// Conversion suffix parsing this type back out of a string, used by the
    /// generated all-columns deserializer.
    pub fn from_string_suffix(self) -> &'static str {
        match self {
            Type::Int => ".toInt()",
            Type::Long => ".toLong()",
            Type::Float => ".toFloat()",
            Type::Double => ".toDouble()",
            Type::Decimal => ".toBigDecimal()",
            Type::Bool => ".toBoolean()",
            Type::Char => ".single()",
            Type::Varchar | Type::Text | Type::Unknown => "",
        }
    }

    /// Number of parameters this type's templates expect.
    pub fn param_count(self) -> usize {
        match self {
            Type::Decimal => 2,
            Type::Varchar => 1,
            _ => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Type::Int => "int",
            Type::Long => "long",
            Type::Float => "float",
            Type::Double => "double",
            Type::Decimal => "decimal",
            Type::Bool => "bool",
            Type::Char => "char",
            Type::Varchar => "varchar",
            Type::Text => "text",
            Type::Unknown => "unknown",
        }
    }

    /// Bind this type to concrete parameter values.
    ///
    /// Fails with [`Error::ParameterCountMismatch`] unless exactly
    /// [`Type::param_count`] parameters are supplied.
    pub fn resolve(self, params: Vec<String>) -> Result<DataType> {
        if params.len() != self.param_count() {
            return Err(Box::new(Error::ParameterCountMismatch {
                type_name: self.name(),
                expected: self.param_count(),
                supplied: params.len(),
            }));
        }
        Ok(DataType { ty: self, params })
    }
}

/// Normalize a DDL type name (with its synonyms) into a bound [`DataType`].
///
/// `double precision` deliberately maps to an oversized decimal rather than
/// a float type; any unrecognized name maps to [`Type::Unknown`], which
/// renders as a placeholder instead of failing the run.
pub fn normalize_ddl(type_name: &str, params: Vec<String>) -> Result<DataType> {
    let folded = type_name.trim().to_lowercase();
    if folded == "double precision" {
        return Type::Decimal.resolve(vec!["200".into(), "200".into()]);
    }
    if folded.starts_with("text") {
        return Type::Text.resolve(vec![]);
    }
    let ty = match folded.as_str() {
        "int" | "integer" => Type::Int,
        "bigint" => Type::Long,
        "float" | "real" => Type::Float,
        "decimal" | "numeric" => Type::Decimal,
        "boolean" | "bool" | "bit" => Type::Bool,
        "char" | "character" => Type::Char,
        "varchar" | "character varying" => Type::Varchar,
        _ => return Type::Unknown.resolve(vec![]),
    };
    ty.resolve(params)
}

/// A [`Type`] bound to concrete parameter values, e.g. `varchar(255)`.
///
/// Construct through [`Type::resolve`]; the parameter count is validated
/// there, so rendering a resolved `DataType` cannot underflow its template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataType {
    #[serde(rename = "type")]
    pub ty: Type,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,
}

impl DataType {
    /// Render the Kotlin column-builder expression for a column.
    ///
    /// Substitutes the column name and each parameter positionally into the
    /// Kotlin template; templates without a `$name` slot get the column name
    /// appended as a call argument.
    pub fn render_target_type(&self, column_name: &str) -> Result<String> {
        let rendered = self.substitute(self.ty.kotlin_template())?;
        if self.ty.kotlin_template().contains("$name") {
            Ok(rendered.replace("$name", &format!("\"{}\"", column_name)))
        } else {
            Ok(format!("{}(\"{}\")", rendered, column_name))
        }
    }

    /// Render the database-side type string, the template inverse used for
    /// round-tripping and display.
    pub fn render_database_type(&self) -> Result<String> {
        self.substitute(self.ty.database_template())
    }

    fn substitute(&self, template: &str) -> Result<String> {
        let mut out = template.to_string();
        // templates reference at most $1..$9
        for index in 1..=9 {
            let slot = format!("${}", index);
            if !out.contains(&slot) {
                continue;
            }
            let value = self.params.get(index - 1).ok_or_else(|| {
                Box::new(Error::MissingParameter {
                    type_name: self.ty.name(),
                    index,
                    supplied: self.params.len(),
                })
            })?;
            out = out.replace(&slot, value);
        }
        Ok(out)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.render_database_type() {
            Ok(s) => write!(f, "{}", s),
            Err(_) => write!(f, "{}", self.ty.database_template()),
        }
    }
}
