//! Error types for condsql.

use thiserror::Error;

/// Every way a compile call can fail.
///
/// Each kind is a distinct variant so callers can match on it; the fields
/// carry the table/column context needed for diagnostics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// Table is not in the schema.
    #[error("Unknown table: '{0}'")]
    UnknownTable(String),

    /// Column is missing from the schema of the table it is validated against.
    #[error("Database column \"{table}.{column}\" does not exist{}", suggestion_suffix(.suggestion))]
    UnknownColumn {
        table: String,
        column: String,
        suggestion: Option<String>,
    },

    /// Column resolved to a table that does not declare it.
    #[error("Column \"{column}\" does not exist in table \"{table}\"{}", suggestion_suffix(.suggestion))]
    UnknownColumnInTable {
        table: String,
        column: String,
        suggestion: Option<String>,
    },

    /// Null value for a column declared NOT NULL.
    #[error("\"{table}.{column}\" cannot be null")]
    NullNotAllowed { table: String, column: String },

    /// Non-numeric value for an integer or floating column.
    #[error("\"{table}.{column}\" must be numeric")]
    NotNumeric { table: String, column: String },

    /// String longer than the declared column length.
    #[error("\"{table}.{column}\" length exceeded (must be at most {max} characters, got {actual})")]
    LengthExceeded {
        table: String,
        column: String,
        max: u32,
        actual: usize,
    },

    /// Value is not a date, time or datetime in an accepted format.
    #[error("\"{table}.{column}\": bad date format")]
    BadTemporalFormat { table: String, column: String },

    /// Value is not a pair of numeric coordinates.
    #[error("\"{table}.{column}\": bad point format")]
    BadPointFormat { table: String, column: String },

    /// Condition input has a shape no rule accepts.
    #[error("Malformed condition: {0}")]
    MalformedCondition(String),

    /// Column position holds something other than a name or a non-empty name list.
    #[error("Column name must be a string")]
    ColumnMustBeString,

    /// Logical or list operator applied to a non-list.
    #[error("Operator \"{0}\" needs an array")]
    OperatorNeedsArray(String),

    /// `{sub, operator}` group with an operator other than AND/OR.
    #[error("Operator \"{0}\" not supported in sub-group")]
    UnsupportedSubOperator(String),

    /// Null compared with an operator other than `=` or `!=`.
    #[error("Bad operator \"{0}\" for null value")]
    NullWithUnsupportedOperator(String),

    /// BETWEEN value is not a list of two non-null bounds.
    #[error("\"BETWEEN\" on \"{0}\" expects an array of 2 non-null elements")]
    BadBetweenShape(String),

    /// Join entry has no table or an unreadable option.
    #[error("Malformed join: {0}")]
    MalformedJoin(String),

    /// Join uses an option from the old join format.
    #[error("Join option \"{0}\" is no longer supported")]
    UnsupportedLegacyOption(String),

    /// No foreign key links the two tables in either direction.
    #[error("No foreign key found between \"{origin}\" and \"{joined}\"")]
    NoForeignKeyFound { origin: String, joined: String },

    /// Several foreign keys link the two tables; `on` must pick one.
    #[error("More than one foreign key links \"{origin}\" and \"{joined}\" ({candidates}); specify \"on\" explicitly")]
    AmbiguousForeignKey {
        origin: String,
        joined: String,
        candidates: String,
    },

    /// Value cannot be rendered as a SQL literal.
    #[error("Unsupported value shape: {0}")]
    UnsupportedValueShape(String),

    /// Schema file could not be decoded.
    #[error("Schema load error: {0}")]
    SchemaLoad(String),

    /// `condsql.toml` could not be read or decoded.
    #[error("Configuration error: {0}")]
    Config(String),
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(". Did you mean '{}'?", s),
        None => String::new(),
    }
}

impl CompileError {
    /// Create a malformed condition error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedCondition(message.into())
    }

    /// Create a malformed join error.
    pub fn malformed_join(message: impl Into<String>) -> Self {
        Self::MalformedJoin(message.into())
    }
}

/// Result type alias for condsql operations.
pub type CompileResult<T> = Result<T, CompileError>;
