//! Chart planning.
//!
//! [`plan_chart()`] turns a raw result set into a [`ChartPlan`]: whether a
//! chart can be drawn at all, which field is the axis, which metrics become
//! series, how the rows are ordered and how many of them are shown. The plan
//! is rebuilt from scratch for every (rows, metadata, limit, config) input and
//! the same input always yields the same plan.
//!
//! A result set that cannot be charted is not an error. The plan comes back
//! with `chartable == false` and a reason meant for the user; the table view
//! stays available either way.

use std::{cmp::Ordering, fmt};

use log::debug;
use serde::Serialize;

use crate::{
    config::PlannerConfig,
    data::{Row, Value, compare_natural},
    fields::{self, CategoricalRule, FieldContext},
    metadata::{ColumnMetadata, SemanticType, semantic_type},
    metrics,
    normalize::flatten_rows,
    schema,
};

/// Display limits offered to the user, smallest first.
pub const LIMIT_STEPS: [usize; 5] = [10, 20, 30, 50, 100];
pub const SHOW_MORE_STEP: usize = 20;
pub const MIN_CHART_ROWS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartType {
    Line,
    Bar,
    HorizontalBar,
    GroupedBar,
}

impl ChartType {
    pub fn as_str(self) -> &'static str {
        match self {
            ChartType::Line => "line",
            ChartType::Bar => "bar",
            ChartType::HorizontalBar => "horizontal-bar",
            ChartType::GroupedBar => "grouped-bar",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NoData,
    TooFewRows,
    NoNumericField,
    NoCategoricalField,
    TooManyRows { max: usize },
    NoMetric,
}

impl Rejection {
    pub fn reason(self) -> String {
        match self {
            Rejection::NoData => "No chart data available".to_string(),
            Rejection::TooFewRows => {
                "Not chartable for this output: at least 2 rows are needed".to_string()
            }
            Rejection::NoNumericField => {
                "Not chartable for this output: no numeric columns".to_string()
            }
            Rejection::NoCategoricalField => {
                "Not chartable for this output: no categorical column".to_string()
            }
            Rejection::TooManyRows { max } => {
                format!("Dataset too large (>{max} rows). Showing table only.")
            }
            Rejection::NoMetric => "No suitable metric found".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPlan {
    pub chartable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Rows to draw, already sorted and truncated.
    pub rows: Vec<Row>,
    pub categorical_field: Option<String>,
    pub categorical_rule: Option<CategoricalRule>,
    pub name_field: Option<String>,
    pub primary_metric: Option<String>,
    /// Only set when the second series is actually drawn (grouped bars).
    pub secondary_metric: Option<String>,
    pub chart_type: Option<ChartType>,
    pub is_time_series: bool,
    /// Flattened row count before truncation.
    pub full_row_count: usize,
    pub limit: usize,
}

impl ChartPlan {
    fn rejected(rejection: Rejection, full_row_count: usize, limit: usize) -> Self {
        debug!("Chart rejected: {}", rejection.reason());
        Self {
            chartable: false,
            reason: Some(rejection.reason()),
            rows: Vec::new(),
            categorical_field: None,
            categorical_rule: None,
            name_field: None,
            primary_metric: None,
            secondary_metric: None,
            chart_type: None,
            is_time_series: false,
            full_row_count,
            limit,
        }
    }

    /// Limit controls only make sense for truncatable charts with more rows
    /// than the smallest step.
    pub fn shows_limit_controls(&self) -> bool {
        self.chartable && !self.is_time_series && self.full_row_count > LIMIT_STEPS[0]
    }

    pub fn has_more(&self) -> bool {
        self.limit < self.full_row_count
    }

    pub fn show_more_limit(&self) -> usize {
        self.limit
            .saturating_add(SHOW_MORE_STEP)
            .min(self.full_row_count)
    }

    pub fn limit_options(&self) -> Vec<LimitOption> {
        limit_options(self.full_row_count, self.limit)
    }

    pub fn summary(&self) -> String {
        format!(
            "Showing top {} of {} results",
            self.limit.min(self.full_row_count),
            self.full_row_count
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LimitOption {
    pub label: String,
    pub value: usize,
    pub disabled: bool,
    pub selected: bool,
}

pub fn limit_options(total: usize, current: usize) -> Vec<LimitOption> {
    let mut options: Vec<LimitOption> = LIMIT_STEPS
        .iter()
        .map(|&step| LimitOption {
            label: step.to_string(),
            value: step,
            disabled: step > total,
            selected: step == current,
        })
        .collect();
    if total > LIMIT_STEPS[LIMIT_STEPS.len() - 1] {
        options.push(LimitOption {
            label: "All".to_string(),
            value: total,
            disabled: false,
            selected: current == total,
        });
    }
    options
}

pub fn plan_chart(
    rows: &[Row],
    metadata: &[ColumnMetadata],
    limit: usize,
    config: &PlannerConfig,
) -> ChartPlan {
    let limit = limit.max(1);
    if rows.is_empty() {
        return ChartPlan::rejected(Rejection::NoData, 0, limit);
    }
    let flattened = flatten_rows(rows);
    plan_flattened(&flattened, metadata, limit, config)
}

/// Plans a chart for rows that have already been through the normalizer.
pub fn plan_flattened(
    flattened: &[Row],
    metadata: &[ColumnMetadata],
    limit: usize,
    config: &PlannerConfig,
) -> ChartPlan {
    let limit = limit.max(1);
    let total = flattened.len();
    if total < MIN_CHART_ROWS {
        return ChartPlan::rejected(Rejection::TooFewRows, total, limit);
    }

    let numeric = schema::numeric_fields(flattened);
    if numeric.is_empty() {
        return ChartPlan::rejected(Rejection::NoNumericField, total, limit);
    }

    let columns = schema::columns(flattened);
    let ctx = FieldContext {
        rows: flattened,
        columns: &columns,
        numeric: &numeric,
        metadata,
        config,
    };
    let Some(choice) = fields::categorical_field(&ctx) else {
        return ChartPlan::rejected(Rejection::NoCategoricalField, total, limit);
    };
    debug!(
        "Categorical field '{}' selected by {:?}",
        choice.field, choice.rule
    );

    if total > config.max_chart_rows {
        return ChartPlan::rejected(
            Rejection::TooManyRows {
                max: config.max_chart_rows,
            },
            total,
            limit,
        );
    }

    let candidates = metrics::metric_candidates(&numeric, &choice.field);
    let Some(primary) = metrics::primary_metric(&candidates) else {
        return ChartPlan::rejected(Rejection::NoMetric, total, limit);
    };
    let secondary = metrics::secondary_metric(&candidates, primary);

    let is_time_series = fields::is_time_series(&choice.field, metadata);
    let mut sorted = sort_for_chart(flattened, &choice.field, primary, is_time_series);
    if !is_time_series && sorted.len() > limit {
        sorted.truncate(limit);
    }

    let inputs = ChartTypeInputs {
        is_time_series,
        displayed_rows: sorted.len(),
        has_secondary: secondary.is_some(),
        has_long_labels: has_long_labels(&sorted, &choice.field, config.long_label_chars),
        metrics_compatible: metrics_compatible(primary, secondary, metadata),
    };
    let chart_type = choose_chart_type(&inputs, config);
    debug!("Chart type {chart_type} chosen from {inputs:?}");

    let name_field = fields::related_name_field(flattened, &columns, &choice.field);
    ChartPlan {
        chartable: true,
        reason: None,
        rows: sorted,
        categorical_field: Some(choice.field),
        categorical_rule: Some(choice.rule),
        name_field,
        primary_metric: Some(primary.to_string()),
        secondary_metric: secondary
            .filter(|_| chart_type == ChartType::GroupedBar)
            .map(str::to_string),
        chart_type: Some(chart_type),
        is_time_series,
        full_row_count: total,
        limit,
    }
}

/// Time series ascend along the axis; everything else descends by the
/// primary metric with missing values counted as zero. The sort is stable.
pub fn sort_for_chart(
    rows: &[Row],
    categorical: &str,
    primary: &str,
    time_series: bool,
) -> Vec<Row> {
    let mut sorted = rows.to_vec();
    if time_series {
        sorted.sort_by(|a, b| compare_natural(a.get(categorical), b.get(categorical)));
    } else {
        sorted.sort_by(|a, b| {
            metric_value(b, primary)
                .partial_cmp(&metric_value(a, primary))
                .unwrap_or(Ordering::Equal)
        });
    }
    sorted
}

fn metric_value(row: &Row, field: &str) -> f64 {
    row.get(field).and_then(Value::as_number).unwrap_or(0.0)
}

/// Axis label as the chart would print it; falsy values print as nothing.
fn label_text(value: Option<&Value>) -> String {
    match value {
        Some(value) if value.is_truthy() => value.as_display(),
        _ => String::new(),
    }
}

/// Label length is measured in UTF-16 code units, as a browser reports it.
pub fn has_long_labels(rows: &[Row], categorical: &str, max_chars: usize) -> bool {
    rows.iter()
        .any(|row| label_text(row.get(categorical)).encode_utf16().count() > max_chars)
}

/// Percentages share an axis badly with money or raw counts.
pub fn metrics_compatible(
    primary: &str,
    secondary: Option<&str>,
    metadata: &[ColumnMetadata],
) -> bool {
    let Some(secondary) = secondary else {
        return true;
    };
    let first = semantic_type(primary, metadata);
    let second = semantic_type(secondary, metadata);
    !(scale_mismatch(first, second) || scale_mismatch(second, first))
}

fn scale_mismatch(left: SemanticType, right: SemanticType) -> bool {
    left == SemanticType::Percentage
        && matches!(right, SemanticType::Money | SemanticType::Numeric)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartTypeInputs {
    pub is_time_series: bool,
    pub displayed_rows: usize,
    pub has_secondary: bool,
    pub has_long_labels: bool,
    pub metrics_compatible: bool,
}

pub struct ChartTypeRule {
    pub name: &'static str,
    pub applies: fn(&ChartTypeInputs, &PlannerConfig) -> bool,
    pub chart_type: ChartType,
}

/// Evaluated top to bottom; the last rule always applies.
pub const CHART_TYPE_RULES: [ChartTypeRule; 4] = [
    ChartTypeRule {
        name: "time-series",
        applies: is_time_series_rule,
        chart_type: ChartType::Line,
    },
    ChartTypeRule {
        name: "dual-series",
        applies: is_grouped_bar_rule,
        chart_type: ChartType::GroupedBar,
    },
    ChartTypeRule {
        name: "long-labels",
        applies: is_horizontal_bar_rule,
        chart_type: ChartType::HorizontalBar,
    },
    ChartTypeRule {
        name: "single-series",
        applies: always,
        chart_type: ChartType::Bar,
    },
];

fn is_time_series_rule(inputs: &ChartTypeInputs, _: &PlannerConfig) -> bool {
    inputs.is_time_series
}

fn is_grouped_bar_rule(inputs: &ChartTypeInputs, config: &PlannerConfig) -> bool {
    inputs.has_secondary
        && inputs.displayed_rows <= config.grouped_bar_max_rows
        && !inputs.has_long_labels
        && inputs.metrics_compatible
}

fn is_horizontal_bar_rule(inputs: &ChartTypeInputs, config: &PlannerConfig) -> bool {
    inputs.has_long_labels && inputs.displayed_rows <= config.horizontal_bar_max_rows
}

fn always(_: &ChartTypeInputs, _: &PlannerConfig) -> bool {
    true
}

pub fn choose_chart_type(inputs: &ChartTypeInputs, config: &PlannerConfig) -> ChartType {
    CHART_TYPE_RULES
        .iter()
        .find(|rule| (rule.applies)(inputs, config))
        .map(|rule| rule.chart_type)
        .unwrap_or(ChartType::Bar)
}
