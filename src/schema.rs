//! Schema definitions consumed by the compiler.
//!
//! A [`Schema`] is an immutable snapshot of table/column/foreign-key metadata.
//! It is loaded once (from JSON or TOML) and shared read-only by every
//! compile call.
//!
//! # Example
//! ```
//! use condsql::schema::{Schema, SchemaProvider};
//!
//! let json = r#"{
//!     "tables": [{
//!         "name": "users",
//!         "columns": [
//!             { "name": "id", "type": "int" },
//!             { "name": "email", "type": "varchar", "length": 120 }
//!         ]
//!     }]
//! }"#;
//!
//! let schema = Schema::from_json(json).unwrap();
//! assert!(schema.table("users").is_some());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CompileError, CompileResult};

/// Read-only access to table metadata.
pub trait SchemaProvider: Send + Sync {
    /// Look up a table by name.
    fn table(&self, name: &str) -> Option<&TableSchema>;

    /// Look up a table, failing with [`CompileError::UnknownTable`].
    fn get_table(&self, name: &str) -> CompileResult<&TableSchema> {
        self.table(name)
            .ok_or_else(|| CompileError::UnknownTable(name.to_string()))
    }
}

/// Declared column type tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnType {
    Int,
    TinyInt,
    SmallInt,
    MediumInt,
    BigInt,
    Float,
    Decimal,
    Double,
    Year,
    Char,
    Varchar,
    Date,
    Time,
    DateTime,
    Point,
    /// Any other tag; not constrained by validation.
    Other(String),
}

impl ColumnType {
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ColumnType::Int
                | ColumnType::TinyInt
                | ColumnType::SmallInt
                | ColumnType::MediumInt
                | ColumnType::BigInt
                | ColumnType::Float
                | ColumnType::Decimal
                | ColumnType::Double
                | ColumnType::Year
        )
    }

    pub fn is_string(&self) -> bool {
        matches!(self, ColumnType::Char | ColumnType::Varchar)
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, ColumnType::Date | ColumnType::Time | ColumnType::DateTime)
    }

    pub fn as_str(&self) -> &str {
        match self {
            ColumnType::Int => "int",
            ColumnType::TinyInt => "tinyint",
            ColumnType::SmallInt => "smallint",
            ColumnType::MediumInt => "mediumint",
            ColumnType::BigInt => "bigint",
            ColumnType::Float => "float",
            ColumnType::Decimal => "decimal",
            ColumnType::Double => "double",
            ColumnType::Year => "year",
            ColumnType::Char => "char",
            ColumnType::Varchar => "varchar",
            ColumnType::Date => "date",
            ColumnType::Time => "time",
            ColumnType::DateTime => "datetime",
            ColumnType::Point => "point",
            ColumnType::Other(tag) => tag,
        }
    }
}

impl From<&str> for ColumnType {
    fn from(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "int" | "integer" => ColumnType::Int,
            "tinyint" => ColumnType::TinyInt,
            "smallint" => ColumnType::SmallInt,
            "mediumint" => ColumnType::MediumInt,
            "bigint" => ColumnType::BigInt,
            "float" => ColumnType::Float,
            "decimal" => ColumnType::Decimal,
            "double" => ColumnType::Double,
            "year" => ColumnType::Year,
            "char" => ColumnType::Char,
            "varchar" => ColumnType::Varchar,
            "date" => ColumnType::Date,
            "time" => ColumnType::Time,
            "datetime" => ColumnType::DateTime,
            "point" => ColumnType::Point,
            other => ColumnType::Other(other.to_string()),
        }
    }
}

impl From<String> for ColumnType {
    fn from(tag: String) -> Self {
        ColumnType::from(tag.as_str())
    }
}

impl From<ColumnType> for String {
    fn from(typ: ColumnType) -> Self {
        typ.as_str().to_string()
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outgoing foreign key declared on a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKeyRef {
    /// Referenced table.
    pub table: String,
    /// Referenced column.
    pub column: String,
    /// Owning column; filled from the declaring column when omitted.
    #[serde(default)]
    pub owner: String,
}

/// Column definition with type information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    #[serde(rename = "type", alias = "typ")]
    pub typ: ColumnType,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub length: Option<u32>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyRef>,
}

impl ColumnSchema {
    pub fn new(name: &str, typ: impl Into<ColumnType>) -> Self {
        Self {
            name: name.to_string(),
            typ: typ.into(),
            nullable: false,
            length: None,
            foreign_keys: Vec::new(),
        }
    }

    /// Mark as nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Set max length.
    pub fn length(mut self, max: u32) -> Self {
        self.length = Some(max);
        self
    }

    /// Declare a foreign key to `table.column`.
    pub fn references(mut self, table: &str, column: &str) -> Self {
        self.foreign_keys.push(ForeignKeyRef {
            table: table.to_string(),
            column: column.to_string(),
            owner: self.name.clone(),
        });
        self
    }
}

/// Table definition with its ordered columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnSchema>,
}

impl TableSchema {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: Vec::new(),
        }
    }

    /// Builder: add a column.
    pub fn column(mut self, col: ColumnSchema) -> Self {
        self.columns.push(col);
        self
    }

    pub fn get_column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.get_column(name).is_some()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// All outgoing foreign keys, in column order.
    pub fn foreign_keys(&self) -> impl Iterator<Item = &ForeignKeyRef> {
        self.columns.iter().flat_map(|c| c.foreign_keys.iter())
    }

    /// Outgoing foreign keys pointing at `table`.
    pub fn foreign_keys_to<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a ForeignKeyRef> {
        self.foreign_keys().filter(move |fk| fk.table == table)
    }

    fn link_foreign_keys(&mut self) {
        for col in &mut self.columns {
            for fk in &mut col.foreign_keys {
                if fk.owner.is_empty() {
                    fk.owner = col.name.clone();
                }
            }
        }
    }
}

/// Immutable schema snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    pub tables: Vec<TableSchema>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Add a table to the schema.
    pub fn add_table(&mut self, mut table: TableSchema) {
        table.link_foreign_keys();
        self.tables.push(table);
    }

    /// Builder form of [`Schema::add_table`].
    pub fn with_table(mut self, table: TableSchema) -> Self {
        self.add_table(table);
        self
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }

    /// Load schema from JSON string.
    pub fn from_json(json: &str) -> CompileResult<Self> {
        let raw: Schema =
            serde_json::from_str(json).map_err(|e| CompileError::SchemaLoad(e.to_string()))?;
        Ok(raw.linked())
    }

    /// Load schema from TOML string (`[[tables]]` / `[[tables.columns]]`).
    pub fn from_toml(input: &str) -> CompileResult<Self> {
        let raw: Schema =
            toml::from_str(input).map_err(|e| CompileError::SchemaLoad(e.to_string()))?;
        Ok(raw.linked())
    }

    /// Load a schema file, picking the format from its extension.
    pub fn from_file(path: &std::path::Path) -> CompileResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CompileError::SchemaLoad(format!("failed to read {}: {}", path.display(), e))
        })?;
        let schema = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&content)?,
            _ => Self::from_json(&content)?,
        };
        tracing::info!(
            "Loaded {} table schemas from {}",
            schema.tables.len(),
            path.display()
        );
        Ok(schema)
    }

    fn linked(mut self) -> Self {
        for table in &mut self.tables {
            table.link_foreign_keys();
        }
        self
    }
}

impl SchemaProvider for Schema {
    fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|t| t.name == name)
    }
}
