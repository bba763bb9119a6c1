//! CSV export of flattened rows.
//!
//! The header is the union of keys across every flattened row in first-seen
//! order. Nothing is pruned: constant and nested columns are written too.

use anyhow::{Context, Result};
use indexmap::IndexSet;
use log::info;

use crate::{
    cli::FlattenArgs,
    data::{Row, Value},
    format::{RECORD_PLACEHOLDER, items_summary},
    io_utils,
    normalize::flatten_rows,
};

pub fn execute(args: &FlattenArgs) -> Result<()> {
    let response = io_utils::load_response(&args.input)?;
    let flattened = flatten_rows(&response.data);
    let headers = header_union(&flattened);

    let mut writer = io_utils::open_csv_writer(args.output.as_deref())?;
    writer
        .write_record(&headers)
        .context("Writing CSV header")?;
    for (idx, row) in flattened.iter().enumerate() {
        let record = headers
            .iter()
            .map(|key| csv_cell(row.get(key.as_str())))
            .collect::<Vec<_>>();
        writer
            .write_record(&record)
            .with_context(|| format!("Writing row {}", idx + 1))?;
    }
    writer.flush().context("Flushing CSV output")?;
    info!(
        "Flattened {} row(s) into {} row(s) across {} column(s)",
        response.data.len(),
        flattened.len(),
        headers.len()
    );
    Ok(())
}

pub fn header_union(rows: &[Row]) -> Vec<String> {
    rows.iter()
        .flat_map(|row| row.keys())
        .cloned()
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

fn csv_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::Array(items)) => items_summary(items.len()),
        Some(Value::Record(_)) => RECORD_PLACEHOLDER.to_string(),
        Some(other) => other.as_display(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::row_from_json;
    use serde_json::json;

    #[test]
    fn header_union_keeps_first_seen_order() {
        let rows = vec![
            row_from_json(json!({"b": 1, "a": 2})).unwrap(),
            row_from_json(json!({"c": 3, "a": 4})).unwrap(),
        ];
        assert_eq!(header_union(&rows), vec!["b", "a", "c"]);
    }

    #[test]
    fn cells_are_plain_text() {
        assert_eq!(csv_cell(None), "");
        assert_eq!(csv_cell(Some(&Value::Null)), "");
        assert_eq!(csv_cell(Some(&Value::Number(1234.5))), "1234.5");
        assert_eq!(
            csv_cell(Some(&Value::from(json!([1, 2])))),
            "[2 items]"
        );
        assert_eq!(csv_cell(Some(&Value::from(json!({"a": 1})))), "[object]");
    }
}
