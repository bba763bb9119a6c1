use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::metadata::SemanticType;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Shape analytics query results into tables and chart plans",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Decide whether and how a query result can be charted
    Plan(PlanArgs),
    /// Render a query result as a sorted, paginated table
    Table(TableArgs),
    /// Profile the displayable columns of a query result
    Columns(ColumnsArgs),
    /// Write the flattened rows of a query result as CSV
    Flatten(FlattenArgs),
    /// Format a single JSON value the way a table cell would show it
    Format(FormatArgs),
}

#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Query response JSON file ('-' for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Number of rows to chart (defaults to the configured default limit)
    #[arg(long)]
    pub limit: Option<usize>,
    /// Planner thresholds as YAML or JSON
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Emit the full plan as pretty-printed JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct TableArgs {
    /// Query response JSON file ('-' for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Sort directive of the form `column[:asc|desc]`
    #[arg(long)]
    pub sort: Option<String>,
    /// 1-based page to display
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    /// Rows shown per page
    #[arg(long = "rows-per-page", default_value_t = crate::table::DEFAULT_ROWS_PER_PAGE)]
    pub rows_per_page: usize,
    /// Emit the table view as pretty-printed JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    /// Query response JSON file ('-' for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
}

#[derive(Debug, Args)]
pub struct FlattenArgs {
    /// Query response JSON file ('-' for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Output CSV file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct FormatArgs {
    /// JSON value to format, e.g. `1234567` or `"2024-03-05"`
    #[arg(long, allow_hyphen_values = true)]
    pub value: String,
    /// Semantic type of the value (MONEY, PERCENTAGE, YEAR, QUARTER, MONTH, DATE, NUMERIC, TEXT)
    #[arg(long = "type", value_parser = parse_semantic_type)]
    pub semantic_type: Option<SemanticType>,
}

fn parse_semantic_type(value: &str) -> Result<SemanticType, String> {
    value.parse::<SemanticType>().map_err(|err| err.to_string())
}
