use std::fmt::Write as _;

use anyhow::{Context, Result};
use log::info;

use crate::{
    chart::{ChartPlan, plan_chart},
    cli::PlanArgs,
    config::PlannerConfig,
    format::format_value,
    io_utils,
    metadata::ColumnMetadata,
    table::{column_header, render_grid},
};

pub fn execute(args: &PlanArgs) -> Result<()> {
    let config = PlannerConfig::load_or_default(args.config.as_deref())?;
    let response = io_utils::load_response(&args.input)?;
    let limit = args.limit.unwrap_or(config.default_limit).max(1);
    info!(
        "Planning chart for {} row(s) from {:?} with limit {}",
        response.data.len(),
        args.input,
        limit
    );

    let plan = plan_chart(&response.data, &response.columns, limit, &config);
    if args.json {
        let rendered = serde_json::to_string_pretty(&plan).context("Serializing chart plan")?;
        println!("{rendered}");
    } else {
        print!("{}", describe_plan(&plan, &response.columns));
    }
    match &plan.chart_type {
        Some(chart_type) => info!("Planned {chart_type} chart over {} row(s)", plan.rows.len()),
        None => info!("Result is table-only"),
    }
    Ok(())
}

/// Human-readable rendering of a plan: the decisions, the series as a grid,
/// then the limit controls when they apply.
pub fn describe_plan(plan: &ChartPlan, metadata: &[ColumnMetadata]) -> String {
    let mut out = String::new();
    if !plan.chartable {
        let _ = writeln!(out, "Chart: none");
        if let Some(reason) = &plan.reason {
            let _ = writeln!(out, "Reason: {reason}");
        }
        return out;
    }

    let dash = || "-".to_string();
    let _ = writeln!(
        out,
        "Chart: {}",
        plan.chart_type.map(|t| t.to_string()).unwrap_or_else(dash)
    );
    let axis = plan.categorical_field.clone().unwrap_or_else(dash);
    match plan.categorical_rule {
        Some(rule) => {
            let rule = serde_json::to_value(rule)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            let _ = writeln!(out, "Axis: {axis} ({rule})");
        }
        None => {
            let _ = writeln!(out, "Axis: {axis}");
        }
    }
    let _ = writeln!(
        out,
        "Primary metric: {}",
        plan.primary_metric.clone().unwrap_or_else(dash)
    );
    if let Some(secondary) = &plan.secondary_metric {
        let _ = writeln!(out, "Secondary metric: {secondary}");
    }
    if let Some(name) = &plan.name_field {
        let _ = writeln!(out, "Name field: {name}");
    }
    let _ = writeln!(
        out,
        "Time series: {}",
        if plan.is_time_series { "yes" } else { "no" }
    );
    let _ = writeln!(out);

    let series: Vec<&str> = [
        plan.categorical_field.as_deref(),
        plan.primary_metric.as_deref(),
        plan.secondary_metric.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect();
    let headers: Vec<String> = series.iter().map(|f| column_header(f)).collect();
    let right_align: Vec<bool> = (0..series.len()).map(|idx| idx > 0).collect();
    let cells: Vec<Vec<String>> = plan
        .rows
        .iter()
        .map(|row| {
            series
                .iter()
                .map(|field| format_value(row.get(*field), field, metadata))
                .collect()
        })
        .collect();
    out.push_str(&render_grid(&headers, &cells, &right_align));

    if plan.shows_limit_controls() {
        let _ = writeln!(out);
        let options = plan
            .limit_options()
            .iter()
            .map(|option| {
                if option.selected {
                    format!("[{}]", option.label)
                } else if option.disabled {
                    format!("({})", option.label)
                } else {
                    option.label.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(out, "Limit: {options}");
        let _ = writeln!(out, "{}", plan.summary());
        if plan.has_more() {
            let _ = writeln!(out, "Show more: {}", plan.show_more_limit());
        }
    }
    out
}
