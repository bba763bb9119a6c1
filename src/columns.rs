//! Column profiles of a query result.
//!
//! Lists the columns the table would show, with their declared type, whether
//! they hold numbers, and how many distinct values they take.

use anyhow::Result;
use log::info;

use crate::{cli::ColumnsArgs, io_utils, normalize::flatten_rows, schema, table};

pub fn execute(args: &ColumnsArgs) -> Result<()> {
    let response = io_utils::load_response(&args.input)?;
    let flattened = flatten_rows(&response.data);
    let profiles = schema::profile_columns(&flattened, &response.columns);

    if profiles.is_empty() {
        info!("No displayable columns in {:?}", args.input);
        return Ok(());
    }

    let rows = profiles
        .iter()
        .enumerate()
        .map(|(idx, profile)| {
            vec![
                (idx + 1).to_string(),
                profile.name.clone(),
                profile.label.clone(),
                profile.semantic_type.to_string(),
                if profile.numeric { "yes" } else { "no" }.to_string(),
                profile.distinct.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    let headers = ["#", "name", "label", "type", "numeric", "distinct"]
        .map(str::to_string)
        .to_vec();
    print!(
        "{}",
        table::render_grid(&headers, &rows, &[true, false, false, false, false, true])
    );
    info!(
        "Profiled {} column(s) across {} flattened row(s)",
        profiles.len(),
        flattened.len()
    );
    Ok(())
}
