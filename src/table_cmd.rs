use anyhow::{Context, Result};
use log::{debug, info};

use crate::{
    cli::TableArgs,
    io_utils,
    normalize::flatten_rows,
    table::{SortState, TableSettings, TableView},
};

pub fn execute(args: &TableArgs) -> Result<()> {
    let sort = args
        .sort
        .as_deref()
        .map(SortState::parse)
        .transpose()
        .context("Parsing --sort")?;
    let response = io_utils::load_response(&args.input)?;
    let flattened = flatten_rows(&response.data);

    let settings = TableSettings::default()
        .with_rows_per_page(args.rows_per_page)
        .with_sort(sort)
        .with_page(args.page, flattened.len());
    debug!("Table settings: {settings:?}");

    let view = TableView::from_flattened(&flattened, &response.columns, &settings);
    if args.json {
        let rendered = serde_json::to_string_pretty(&view).context("Serializing table view")?;
        println!("{rendered}");
    } else {
        print!("{}", view.render());
    }
    info!(
        "Rendered page {} of {} ({} row(s) total)",
        view.page, view.total_pages, view.total_rows
    );
    Ok(())
}
