//! Column discovery over flattened rows.
//!
//! The column set is never stored. It is derived from the rows on demand:
//! every key that only ever holds scalars, minus the keys that carry the same
//! value in every row of a multi-row result.

use std::collections::HashSet;

use indexmap::IndexSet;
use serde::Serialize;

use crate::{
    data::{DistinctKey, Row, Value},
    format::field_label,
    metadata::{ColumnMetadata, SemanticType, semantic_type},
};

pub fn columns(rows: &[Row]) -> Vec<String> {
    let mut candidates: IndexSet<&str> = IndexSet::new();
    let mut rejected: HashSet<&str> = HashSet::new();
    for row in rows {
        for (key, value) in row {
            if value.is_scalar() {
                candidates.insert(key.as_str());
            } else {
                rejected.insert(key.as_str());
            }
        }
    }

    candidates
        .into_iter()
        .filter(|key| !rejected.contains(key))
        .filter(|key| rows.len() <= 1 || varies(rows, key))
        .map(str::to_string)
        .collect()
}

fn varies(rows: &[Row], key: &str) -> bool {
    let first = rows[0].get(key);
    rows.iter().any(|row| row.get(key) != first)
}

pub fn numeric_fields(rows: &[Row]) -> Vec<String> {
    if rows.is_empty() {
        return Vec::new();
    }
    columns(rows)
        .into_iter()
        .filter(|field| {
            rows.iter().all(|row| match row.get(field) {
                None | Some(Value::Null) => true,
                Some(Value::Number(n)) => n.is_finite(),
                Some(_) => false,
            })
        })
        .collect()
}

/// Number of distinct values `field` takes across `rows`. A missing key and an
/// explicit null count as two different values.
pub fn distinct_count(rows: &[Row], field: &str) -> usize {
    rows.iter()
        .map(|row| DistinctKey::of(row.get(field)))
        .collect::<HashSet<_>>()
        .len()
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ColumnProfile {
    pub name: String,
    pub label: String,
    pub semantic_type: SemanticType,
    pub numeric: bool,
    pub distinct: usize,
}

pub fn profile_columns(rows: &[Row], metadata: &[ColumnMetadata]) -> Vec<ColumnProfile> {
    let numeric: HashSet<String> = numeric_fields(rows).into_iter().collect();
    columns(rows)
        .into_iter()
        .map(|name| ColumnProfile {
            label: field_label(&name),
            semantic_type: semantic_type(&name, metadata),
            numeric: numeric.contains(&name),
            distinct: distinct_count(rows, &name),
            name,
        })
        .collect()
}
