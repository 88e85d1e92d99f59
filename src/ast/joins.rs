use serde::{Deserialize, Serialize};

use crate::ast::JoinKind;

/// One projected column of a joined table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedField {
    /// Column in the joined table.
    pub source: String,
    /// Name it is exposed under in the origin namespace.
    pub exposed: String,
}

impl ProjectedField {
    pub fn same(name: &str) -> Self {
        Self {
            source: name.to_string(),
            exposed: name.to_string(),
        }
    }

    pub fn renamed(source: &str, exposed: &str) -> Self {
        Self {
            source: source.to_string(),
            exposed: exposed.to_string(),
        }
    }
}

pub type FieldProjection = Vec<ProjectedField>;

/// One `on` entry of a join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OnEntry {
    /// Column shorthand; the counterpart comes from foreign-key metadata.
    Column(String),
    /// `origin.origin_col = joined.joined_col`
    Pair { origin: String, joined: String },
    /// Boolean expression passed through verbatim.
    Raw(String),
}

/// A join definition after shorthand has been canonicalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedJoin {
    pub table: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub kind: JoinKind,
    /// Real table the join hangs off (used for schema lookups).
    pub origin: String,
    /// Name the origin is rendered under, when aliased.
    #[serde(default)]
    pub origin_alias: Option<String>,
    /// Empty means "infer from foreign keys".
    #[serde(default)]
    pub on: Vec<OnEntry>,
    #[serde(default)]
    pub fields: FieldProjection,
    /// Nested filter compiled against the joined table.
    #[serde(default)]
    pub filter: Option<serde_json::Value>,
}

impl NormalizedJoin {
    pub fn new(table: &str, origin: &str) -> Self {
        Self {
            table: table.to_string(),
            alias: None,
            kind: JoinKind::Inner,
            origin: origin.to_string(),
            origin_alias: None,
            on: Vec::new(),
            fields: Vec::new(),
            filter: None,
        }
    }

    /// Name the joined table is rendered under.
    pub fn rendered_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.table)
    }

    /// Name the origin is rendered under.
    pub fn rendered_origin(&self) -> &str {
        self.origin_alias.as_deref().unwrap_or(&self.origin)
    }

    /// Projection entry exposed as `name`, if any.
    pub fn projected(&self, name: &str) -> Option<&ProjectedField> {
        self.fields.iter().find(|f| f.exposed == name)
    }
}
