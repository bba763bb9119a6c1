//! Thresholds that drive chart planning.
//!
//! Defaults reproduce the behaviour the front-end ships with. A config file
//! (YAML, or JSON when the extension is `.json`) may override any subset of
//! fields; omitted fields keep their defaults.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PlannerConfig {
    /// Fewest distinct values a categorical axis may have.
    pub min_categories: usize,
    /// Most distinct values a text or temporal axis may have.
    pub max_categories: usize,
    /// Most distinct values a plain numeric column may have when it is used as
    /// an axis.
    pub max_numeric_categories: usize,
    /// Result sets with more flattened rows than this are table-only.
    pub max_chart_rows: usize,
    pub default_limit: usize,
    pub grouped_bar_max_rows: usize,
    pub long_label_chars: usize,
    pub horizontal_bar_max_rows: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            min_categories: 2,
            max_categories: 50,
            max_numeric_categories: 20,
            max_chart_rows: 200,
            default_limit: 10,
            grouped_bar_max_rows: 12,
            long_label_chars: 25,
            horizontal_bar_max_rows: 40,
        }
    }
}

impl PlannerConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.min_categories >= 1,
            "min_categories must be at least 1"
        );
        ensure!(
            self.min_categories <= self.max_categories,
            "min_categories ({}) cannot exceed max_categories ({})",
            self.min_categories,
            self.max_categories
        );
        ensure!(
            self.min_categories <= self.max_numeric_categories,
            "min_categories ({}) cannot exceed max_numeric_categories ({})",
            self.min_categories,
            self.max_numeric_categories
        );
        ensure!(
            self.max_chart_rows >= 2,
            "max_chart_rows must allow at least 2 rows"
        );
        ensure!(self.default_limit > 0, "default_limit must be positive");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening config file {path:?}"))?;
        let reader = BufReader::new(file);
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config: PlannerConfig = if is_json {
            serde_json::from_reader(reader).context("Parsing config JSON")?
        } else {
            serde_yaml::from_reader(reader).context("Parsing config YAML")?
        };
        config
            .validate()
            .with_context(|| format!("Validating config {path:?}"))?;
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
