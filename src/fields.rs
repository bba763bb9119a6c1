//! Axis selection for charts.
//!
//! The categorical field is chosen by walking [`CategoricalRule::ORDER`]; the
//! first rule that yields a field wins. Cardinality is always measured over
//! the full, untruncated row set.

use std::{ops::RangeInclusive, sync::LazyLock};

use regex::Regex;
use serde::Serialize;

use crate::{
    config::PlannerConfig,
    data::Row,
    metadata::{ColumnMetadata, SemanticType, semantic_type},
    normalize::GROUP_FIELD,
    schema::distinct_count,
};

static CODE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)code|id|key|num").expect("valid code token regex"));
static NAME_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)name|title|description").expect("valid name token regex"));

/// Everything the categorical rules look at.
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    pub rows: &'a [Row],
    pub columns: &'a [String],
    pub numeric: &'a [String],
    pub metadata: &'a [ColumnMetadata],
    pub config: &'a PlannerConfig,
}

impl FieldContext<'_> {
    fn is_numeric(&self, field: &str) -> bool {
        self.numeric.iter().any(|n| n == field)
    }

    fn text_columns(&self) -> impl Iterator<Item = &String> {
        self.columns.iter().filter(move |c| !self.is_numeric(c))
    }

    fn type_of(&self, field: &str) -> SemanticType {
        semantic_type(field, self.metadata)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoricalRule {
    /// A column literally named `group`, produced from a scalar `_id`.
    GroupField,
    /// Numeric column typed YEAR, QUARTER or MONTH.
    NumericPeriod,
    /// Text column typed DATE.
    DateText,
    /// Any text column.
    Text,
    /// Numeric column with few distinct values, such as a code.
    NumericCode,
}

impl CategoricalRule {
    pub const ORDER: [CategoricalRule; 5] = [
        CategoricalRule::GroupField,
        CategoricalRule::NumericPeriod,
        CategoricalRule::DateText,
        CategoricalRule::Text,
        CategoricalRule::NumericCode,
    ];

    pub fn cardinality(self, config: &PlannerConfig) -> RangeInclusive<usize> {
        match self {
            CategoricalRule::NumericCode => config.min_categories..=config.max_numeric_categories,
            _ => config.min_categories..=config.max_categories,
        }
    }

    /// First field this rule admits, if any.
    pub fn select(self, ctx: &FieldContext<'_>) -> Option<String> {
        let range = self.cardinality(ctx.config);
        let admits = |field: &&String| range.contains(&distinct_count(ctx.rows, field));
        let found = match self {
            CategoricalRule::GroupField => ctx
                .columns
                .iter()
                .filter(|c| c.as_str() == GROUP_FIELD)
                .find(admits),
            CategoricalRule::NumericPeriod => ctx
                .numeric
                .iter()
                .filter(|f| ctx.type_of(f).is_numeric_period())
                .find(admits),
            CategoricalRule::DateText => ctx
                .text_columns()
                .filter(|f| ctx.type_of(f) == SemanticType::Date)
                .find(admits),
            CategoricalRule::Text => ctx.text_columns().find(admits),
            CategoricalRule::NumericCode => ctx.numeric.iter().find(admits),
        };
        found.cloned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoricalChoice {
    pub field: String,
    pub rule: CategoricalRule,
}

pub fn categorical_field(ctx: &FieldContext<'_>) -> Option<CategoricalChoice> {
    CategoricalRule::ORDER.into_iter().find_map(|rule| {
        rule.select(ctx)
            .map(|field| CategoricalChoice { field, rule })
    })
}

pub fn is_time_series(field: &str, metadata: &[ColumnMetadata]) -> bool {
    semantic_type(field, metadata).is_temporal()
}

/// Finds a human-readable companion for a code-like axis, e.g.
/// `supplier_name` for `supplier_code`. Only used to enrich tooltips.
pub fn related_name_field(rows: &[Row], columns: &[String], field: &str) -> Option<String> {
    if !CODE_TOKEN.is_match(field) {
        return None;
    }
    let base = CODE_TOKEN.replace_all(field, "");
    let base = base.trim().to_lowercase();
    let first_row = rows.first();

    columns
        .iter()
        .filter(|candidate| candidate.as_str() != field && NAME_TOKEN.is_match(candidate))
        .find(|candidate| {
            if base.is_empty() {
                first_row
                    .and_then(|row| row.get(candidate.as_str()))
                    .is_some_and(|value| value.is_truthy())
            } else {
                candidate.to_lowercase().contains(&base)
            }
        })
        .cloned()
}
