//! Flattening of grouped and nested query rows.
//!
//! Aggregation pipelines report their grouping key under `_id`, either as a
//! scalar or as a record of key parts, and often nest detail rows as arrays of
//! records. [`flatten_rows()`] turns both shapes into flat rows that the schema
//! inspector and the table engine can treat uniformly.
//!
//! Only the first array-of-records field of a row (in key order) is expanded.
//! Any further array-of-records fields are reduced to an item count, so rows
//! carrying several nested collections lose the detail of all but the first.

use log::trace;

use crate::{
    data::{Row, Value},
    format::items_summary,
};

pub const GROUP_KEY: &str = "_id";
pub const GROUP_FIELD: &str = "group";

pub fn flatten_rows(rows: &[Row]) -> Vec<Row> {
    let mut flattened = Vec::with_capacity(rows.len());
    for row in rows {
        flatten_row_into(row, &mut flattened);
    }
    flattened
}

fn flatten_row_into(source: &Row, out: &mut Vec<Row>) {
    let mut row = source.clone();
    if let Some(group) = row.shift_remove(GROUP_KEY) {
        expand_group(&mut row, group);
    }

    let expansion_key = row
        .iter()
        .find(|(_, value)| value.is_record_array())
        .map(|(key, _)| key.clone());

    let Some(expansion_key) = expansion_key else {
        out.push(row);
        return;
    };

    let Some(Value::Array(items)) = row.shift_remove(&expansion_key) else {
        out.push(row);
        return;
    };
    trace!("Expanding '{expansion_key}' into {} row(s)", items.len());

    let context = parent_context(row);
    for item in items {
        let mut expanded = context.clone();
        if let Value::Record(fields) = item {
            for (key, value) in fields {
                expanded.insert(key, value);
            }
        }
        out.push(expanded);
    }
}

fn expand_group(row: &mut Row, group: Value) {
    match group {
        Value::Record(parts) => {
            for (key, value) in parts {
                row.insert(format!("{GROUP_FIELD}.{key}"), value);
            }
        }
        Value::Array(parts) => {
            for (idx, value) in parts.into_iter().enumerate() {
                row.insert(format!("{GROUP_FIELD}.{idx}"), value);
            }
        }
        scalar => {
            row.insert(GROUP_FIELD.to_string(), scalar);
        }
    }
}

/// Fields of the parent row carried onto every expanded child. Records and
/// empty arrays are dropped; other arrays are reduced to text.
fn parent_context(row: Row) -> Row {
    row.into_iter()
        .filter_map(|(key, value)| match value {
            Value::Record(_) => None,
            Value::Array(items) if items.is_empty() => None,
            Value::Array(items) => {
                let summary = if items[0].is_record() {
                    items_summary(items.len())
                } else {
                    Value::summary_text(&items)
                };
                Some((key, Value::Text(summary)))
            }
            scalar => Some((key, scalar)),
        })
        .collect()
}
