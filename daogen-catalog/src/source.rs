//! The metadata source boundary.

/// Errors a metadata source may raise; opaque to this crate.
pub type SourceError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Column metadata as reported by a database catalog, in the shape the
/// common driver metadata calls return it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    pub name: String,
    /// Catalog type name, e.g. `varchar`, `numeric`, `int4`.
    pub type_name: String,
    /// Declared size (varchar length, numeric precision).
    pub size: Option<u32>,
    /// Numeric scale, where the type has one.
    pub scale: Option<u32>,
    pub nullable: bool,
    pub auto_increment: bool,
}

/// One primary-key constituent with its declared ordinal position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKeyMeta {
    pub column: String,
    pub ordinal: u32,
}

/// One imported (outgoing) foreign key of the queried table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedKeyMeta {
    pub from_column: String,
    pub to_table: String,
    pub to_column: String,
}

/// A live database catalog.
///
/// Implementations wrap a concrete connection; methods take `&mut self` so
/// a single handle can serve the whole bounded acquisition sequence. Every
/// result must be fully materialized before the call returns — no cursor
/// escapes the call that opened it.
pub trait CatalogSource {
    /// Table names in the given schema, in catalog order.
    fn tables(&mut self, schema: Option<&str>) -> Result<Vec<String>, SourceError>;

    /// Columns of one table, in declaration order.
    fn columns(&mut self, schema: Option<&str>, table: &str)
    -> Result<Vec<ColumnMeta>, SourceError>;

    /// Primary-key constituents of one table.
    fn primary_keys(
        &mut self,
        schema: Option<&str>,
        table: &str,
    ) -> Result<Vec<PrimaryKeyMeta>, SourceError>;

    /// Foreign keys *from* one table to any other.
    fn imported_keys(
        &mut self,
        schema: Option<&str>,
        table: &str,
    ) -> Result<Vec<ImportedKeyMeta>, SourceError>;
}
