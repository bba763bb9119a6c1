pub mod chart;
pub mod cli;
pub mod columns;
pub mod config;
pub mod data;
pub mod fields;
pub mod flatten_cmd;
pub mod format;
pub mod format_cmd;
pub mod io_utils;
pub mod metadata;
pub mod metrics;
pub mod normalize;
pub mod plan_cmd;
pub mod response;
pub mod schema;
pub mod table;
pub mod table_cmd;
pub mod view;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("result_lens", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Plan(args) => plan_cmd::execute(&args),
        Commands::Table(args) => table_cmd::execute(&args),
        Commands::Columns(args) => columns::execute(&args),
        Commands::Flatten(args) => flatten_cmd::execute(&args),
        Commands::Format(args) => format_cmd::execute(&args),
    }
}
