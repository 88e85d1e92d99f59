use std::fmt;

use serde::{Deserialize, Serialize};

/// Connective joining sibling fragments at one recursion level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Glue {
    #[default]
    And,
    Or,
    /// Assignment lists (`SET a = 1 , b = 2`).
    Comma,
}

impl Glue {
    /// Parse a logical tag (`OR`/`AND`, any case).
    pub fn logical(tag: &str) -> Option<Glue> {
        match tag.to_uppercase().as_str() {
            "AND" => Some(Glue::And),
            "OR" => Some(Glue::Or),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Glue::And => "AND",
            Glue::Or => "OR",
            Glue::Comma => ",",
        }
    }

    /// Separator placed between sibling fragments.
    pub fn separator(&self) -> String {
        format!(" {} ", self.as_str())
    }
}

impl fmt::Display for Glue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinKind {
    pub fn parse(tag: &str) -> Option<JoinKind> {
        match tag.trim().to_uppercase().as_str() {
            "INNER" => Some(JoinKind::Inner),
            "LEFT" | "LEFT OUTER" => Some(JoinKind::Left),
            "RIGHT" | "RIGHT OUTER" => Some(JoinKind::Right),
            "FULL" | "FULL OUTER" => Some(JoinKind::Full),
            "CROSS" => Some(JoinKind::Cross),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER",
            JoinKind::Left => "LEFT",
            JoinKind::Right => "RIGHT",
            JoinKind::Full => "FULL",
            JoinKind::Cross => "CROSS",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    #[serde(alias = "ASC")]
    Asc,
    #[serde(alias = "DESC")]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}
