use anyhow::{Context, Result};
use log::debug;

use crate::{
    cli::FormatArgs,
    data::Value,
    format::format_value,
    metadata::{ColumnMetadata, SemanticType},
};

const VALUE_FIELD: &str = "value";

pub fn execute(args: &FormatArgs) -> Result<()> {
    let raw: serde_json::Value = serde_json::from_str(&args.value)
        .with_context(|| format!("Parsing --value {:?} as JSON", args.value))?;
    let value = Value::from(raw);
    let semantic_type = args.semantic_type.unwrap_or(SemanticType::Text);
    debug!("Formatting {value:?} as {semantic_type}");
    let metadata = [ColumnMetadata::new(VALUE_FIELD, semantic_type)];
    println!("{}", format_value(Some(&value), VALUE_FIELD, &metadata));
    Ok(())
}
