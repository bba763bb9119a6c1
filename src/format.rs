//! Display formatting for cells, axis ticks and tooltips.
//!
//! [`format_value()`] is the single entry point. It renders a cell according
//! to the semantic type declared for its column and never fails: shapes it
//! does not understand degrade to a placeholder or to their plain text.

use std::sync::LazyLock;

use chrono::Month;
use heck::ToTitleCase;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    data::{Value, number_text},
    metadata::{ColumnMetadata, SemanticType, semantic_type},
};

pub const MISSING_PLACEHOLDER: &str = "-";
pub const RECORD_PLACEHOLDER: &str = "[object]";

static DATE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})").expect("valid date prefix regex"));

pub fn format_value(value: Option<&Value>, field: &str, metadata: &[ColumnMetadata]) -> String {
    let value = match value {
        None | Some(Value::Null) => return MISSING_PLACEHOLDER.to_string(),
        Some(value) => value,
    };
    match value {
        Value::Array(items) => items_summary(items.len()),
        Value::Record(_) => RECORD_PLACEHOLDER.to_string(),
        Value::Number(n) if n.is_finite() => format_number(*n, semantic_type(field, metadata)),
        Value::Text(text) if semantic_type(field, metadata) == SemanticType::Date => {
            format_date(text)
        }
        other => other.as_display(),
    }
}

pub fn items_summary(count: usize) -> String {
    format!("[{count} items]")
}

/// Human label for a field name: `supplier_code` becomes `Supplier Code`.
pub fn field_label(name: &str) -> String {
    name.to_title_case()
}

fn format_number(value: f64, ty: SemanticType) -> String {
    match ty {
        SemanticType::Quarter if (1.0..=4.0).contains(&value) => {
            format!("Q{}", number_text(value))
        }
        SemanticType::Month => month_abbreviation(value).unwrap_or_else(|| number_text(value)),
        SemanticType::Year | SemanticType::Quarter => number_text(value),
        SemanticType::Percentage => format!("{}%", to_fixed(value * 100.0, 2)),
        SemanticType::Money => format_money(value),
        SemanticType::Numeric | SemanticType::Date | SemanticType::Text => {
            format!("{}{}", sign(value), grouped(value.abs(), 0, 3))
        }
    }
}

fn format_money(value: f64) -> String {
    let magnitude = value.abs();
    let body = if magnitude >= 1_000_000_000.0 {
        format!("{}B", to_fixed(magnitude / 1_000_000_000.0, 2))
    } else if magnitude >= 1_000_000.0 {
        format!("{}M", to_fixed(magnitude / 1_000_000.0, 2))
    } else if magnitude >= 10_000.0 {
        format!("{}K", to_fixed(magnitude / 1_000.0, 1))
    } else {
        grouped(magnitude, 2, 2)
    };
    format!("{}${body}", sign(value))
}

fn sign(value: f64) -> &'static str {
    if value < 0.0 { "-" } else { "" }
}

fn month_abbreviation(value: f64) -> Option<String> {
    if value.fract() != 0.0 || !(1.0..=12.0).contains(&value) {
        return None;
    }
    let month = Month::try_from(value as u8).ok()?;
    Some(month.name()[..3].to_string())
}

fn format_date(text: &str) -> String {
    let Some(captures) = DATE_PREFIX.captures(text) else {
        return text.to_string();
    };
    let month = captures[2]
        .parse::<f64>()
        .ok()
        .and_then(month_abbreviation);
    let day = captures[3].parse::<u32>().ok();
    match (month, day) {
        (Some(month), Some(day)) => format!("{}{} {month} {}", day, ordinal_suffix(day), &captures[1]),
        _ => text.to_string(),
    }
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Fixed-point rendering of the exact binary value, rounding ties away from
/// zero.
fn to_fixed(value: f64, places: u32) -> String {
    let precision = places as usize;
    match Decimal::from_f64_retain(value) {
        Some(decimal) => {
            let rounded =
                decimal.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
            format!("{rounded:.precision$}")
        }
        None => format!("{value:.precision$}"),
    }
}

/// Thousands-grouped rendering of a non-negative value with between
/// `min_fraction` and `max_fraction` fraction digits.
fn grouped(value: f64, min_fraction: u32, max_fraction: u32) -> String {
    let fixed = to_fixed(value, max_fraction);
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let mut fraction = fraction.to_string();
    while fraction.len() > min_fraction as usize && fraction.ends_with('0') {
        fraction.pop();
    }

    let digits: Vec<char> = integer.chars().collect();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + fraction.len() + 1);
    for (idx, digit) in digits.iter().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(*digit);
    }
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(&fraction);
    }
    out
}
