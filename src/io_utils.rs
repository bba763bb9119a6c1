//! Input and output plumbing for the command handlers.
//!
//! A path of `-` means stdin for inputs and stdout for outputs.

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result};
use csv::QuoteStyle;
use log::debug;

use crate::response::QueryResponse;

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    if is_dash(path) {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file = File::open(path).with_context(|| format!("Opening input file {path:?}"))?;
    Ok(Box::new(BufReader::new(file)))
}

pub fn load_response(path: &Path) -> Result<QueryResponse> {
    let reader = open_input(path)?;
    let response = QueryResponse::from_reader(reader)
        .with_context(|| format!("Reading query response from {path:?}"))?;
    debug!(
        "Loaded {} row(s) and {} column type(s) from {:?}",
        response.data.len(),
        response.columns.len(),
        path
    );
    Ok(response)
}

pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(p) if !is_dash(p) => Ok(Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        ))),
        _ => Ok(Box::new(io::stdout())),
    }
}

pub fn open_csv_writer(path: Option<&Path>) -> Result<csv::Writer<Box<dyn Write>>> {
    let mut builder = csv::WriterBuilder::new();
    builder.quote_style(QuoteStyle::Necessary);
    Ok(builder.from_writer(open_output(path)?))
}
