//! Join shorthand normalization.
//!
//! Accepted entry shapes:
//!
//! ```text
//! ["users"]                                          -- bare table
//! {"users": ["name", "email"]}                       -- table with projection
//! {"users": {"on": "user_id", "fields": {...}}}      -- table with record
//! [{"table": "users", "alias": "u", "type": "LEFT"}] -- anonymous record
//! ```

use serde_json::{Map, Value as Json};

use crate::ast::*;
use crate::error::{CompileError, CompileResult};
use crate::parser::tokens::has_comparison;

/// Option names from the old join format; rejected so old call shapes fail loudly.
pub const LEGACY_OPTIONS: &[&str] = &["full_on", "join_field", "join_fields", "full_fields"];

const RECORD_KEYS: &[&str] = &["table", "alias", "on", "fields", "type", "where", "origin"];

/// Canonicalize raw join input into [`NormalizedJoin`] records.
///
/// `origin` is the statement's table and `origin_alias` the name it is
/// rendered under. Records may hang off an earlier join through `origin`.
pub fn normalize_joins(
    origin: &str,
    origin_alias: Option<&str>,
    raw: &Json,
) -> CompileResult<Vec<NormalizedJoin>> {
    let entries: Vec<(Option<&str>, &Json)> = match raw {
        Json::Null => return Ok(Vec::new()),
        Json::String(_) => vec![(None, raw)],
        Json::Array(items) => items.iter().map(|v| (None, v)).collect(),
        Json::Object(map) => map
            .iter()
            .map(|(k, v)| match k.parse::<usize>() {
                Ok(_) => (None, v),
                Err(_) => (Some(k.as_str()), v),
            })
            .collect(),
        other => {
            return Err(CompileError::malformed_join(format!(
                "joins must be a list or a mapping, got {}",
                other
            )));
        }
    };

    let mut joins: Vec<NormalizedJoin> = Vec::with_capacity(entries.len());
    for (key, item) in entries {
        let mut join = NormalizedJoin::new("", origin);
        join.origin_alias = origin_alias.map(str::to_string);

        match (key, item) {
            (None, Json::String(table)) => join.table = table.clone(),
            (Some(table), Json::Array(_)) => {
                join.table = table.to_string();
                join.fields = parse_fields(item)?;
            }
            (key, Json::Object(record)) => apply_record(&mut join, key, record, &joins)?,
            (key, other) => {
                return Err(CompileError::malformed_join(format!(
                    "cannot read join entry {}: {}",
                    key.unwrap_or("#"),
                    other
                )));
            }
        }

        if join.table.trim().is_empty() {
            return Err(CompileError::malformed_join("no table could be determined"));
        }
        joins.push(join);
    }

    Ok(joins)
}

fn apply_record(
    join: &mut NormalizedJoin,
    key: Option<&str>,
    record: &Map<String, Json>,
    earlier: &[NormalizedJoin],
) -> CompileResult<()> {
    for name in record.keys() {
        if LEGACY_OPTIONS.contains(&name.as_str()) {
            return Err(CompileError::UnsupportedLegacyOption(name.clone()));
        }
        if !RECORD_KEYS.contains(&name.as_str()) {
            tracing::warn!("Ignoring unknown join option '{}'", name);
        }
    }

    match (record.get("table"), key) {
        (Some(table), key) => {
            join.table = string_option(record, "table", table)?;
            // With an explicit table, a mapping key names the alias.
            join.alias = key.map(str::to_string);
        }
        (None, Some(table)) => join.table = table.to_string(),
        (None, None) => {
            return Err(CompileError::malformed_join(
                "anonymous join entry needs a \"table\"",
            ));
        }
    }

    if let Some(alias) = record.get("alias") {
        join.alias = Some(string_option(record, "alias", alias)?);
    }

    if let Some(kind) = record.get("type") {
        let tag = string_option(record, "type", kind)?;
        join.kind = JoinKind::parse(&tag)
            .ok_or_else(|| CompileError::malformed_join(format!("unknown join type \"{}\"", tag)))?;
    }

    if let Some(origin) = record.get("origin") {
        let origin = string_option(record, "origin", origin)?;
        match earlier
            .iter()
            .find(|j| j.rendered_name() == origin || j.table == origin)
        {
            Some(parent) => {
                join.origin = parent.table.clone();
                join.origin_alias = parent.alias.clone();
            }
            None if join.origin_alias.as_deref() == Some(origin.as_str()) => {}
            None => {
                join.origin = origin;
                join.origin_alias = None;
            }
        }
    }

    if let Some(on) = record.get("on") {
        join.on = parse_on(on)?;
    }

    if let Some(fields) = record.get("fields") {
        join.fields = parse_fields(fields)?;
    }

    match record.get("where") {
        None | Some(Json::Null) => {}
        Some(filter) => join.filter = Some(filter.clone()),
    }

    Ok(())
}

fn string_option(record: &Map<String, Json>, name: &str, value: &Json) -> CompileResult<String> {
    value.as_str().map(str::to_string).ok_or_else(|| {
        CompileError::malformed_join(format!(
            "\"{}\" must be a string in join on {}",
            name,
            record.get("table").unwrap_or(&Json::Null)
        ))
    })
}

fn on_string(expr: &str) -> OnEntry {
    if has_comparison(expr) {
        OnEntry::Raw(expr.to_string())
    } else {
        OnEntry::Column(expr.trim().to_string())
    }
}

/// Parse an `on` option: a string, a list, or an `{origin: joined}` mapping.
fn parse_on(on: &Json) -> CompileResult<Vec<OnEntry>> {
    match on {
        Json::Null => Ok(Vec::new()),
        Json::String(expr) => Ok(vec![on_string(expr)]),
        Json::Array(items) => {
            let mut entries = Vec::new();
            for item in items {
                entries.extend(parse_on(item)?);
            }
            Ok(entries)
        }
        Json::Object(map) => map
            .iter()
            .map(|(k, v)| match (k.parse::<usize>(), v) {
                (Ok(_), Json::String(expr)) => Ok(on_string(expr)),
                (Err(_), Json::String(joined)) => Ok(OnEntry::Pair {
                    origin: k.clone(),
                    joined: joined.clone(),
                }),
                _ => Err(CompileError::malformed_join(format!(
                    "bad \"on\" entry {}: {}",
                    k, v
                ))),
            })
            .collect(),
        other => Err(CompileError::malformed_join(format!(
            "bad \"on\" option: {}",
            other
        ))),
    }
}

/// Parse a field projection: positional names keep their name, keyed
/// entries rename `source` to the mapped value.
fn parse_fields(fields: &Json) -> CompileResult<FieldProjection> {
    let bad = |v: &Json| CompileError::malformed_join(format!("bad projected field: {}", v));
    match fields {
        Json::Null => Ok(Vec::new()),
        Json::Array(items) => items
            .iter()
            .map(|v| v.as_str().map(ProjectedField::same).ok_or_else(|| bad(v)))
            .collect(),
        Json::Object(map) => map
            .iter()
            .map(|(k, v)| {
                let target = v.as_str().ok_or_else(|| bad(v))?;
                Ok(match k.parse::<usize>() {
                    Ok(_) => ProjectedField::same(target),
                    Err(_) => ProjectedField::renamed(k, target),
                })
            })
            .collect(),
        other => Err(bad(other)),
    }
}
