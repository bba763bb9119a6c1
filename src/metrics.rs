use std::sync::LazyLock;

use regex::Regex;

static PRIORITY_METRIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)spend|amount|total|count|avg|mean").expect("valid metric regex")
});

/// Numeric fields eligible as chart series: everything numeric except the axis.
pub fn metric_candidates(numeric: &[String], categorical: &str) -> Vec<String> {
    numeric
        .iter()
        .filter(|field| field.as_str() != categorical)
        .cloned()
        .collect()
}

pub fn primary_metric(candidates: &[String]) -> Option<&str> {
    candidates
        .iter()
        .find(|field| PRIORITY_METRIC.is_match(field))
        .or_else(|| candidates.first())
        .map(String::as_str)
}

pub fn secondary_metric<'a>(candidates: &'a [String], primary: &str) -> Option<&'a str> {
    candidates
        .iter()
        .find(|field| field.as_str() != primary)
        .map(String::as_str)
}
