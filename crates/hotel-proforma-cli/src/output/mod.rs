pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// P&L rows carry an `id` and a `cells` list.
pub(crate) fn is_pl_rows(rows: &[Value]) -> bool {
    rows.first()
        .map(|r| r.get("id").is_some() && r.get("cells").map_or(false, Value::is_array))
        .unwrap_or(false)
}

/// A year series serializes as `{"y0": .., "y1": ..}`.
pub(crate) fn as_series(value: &Value) -> Option<&Map<String, Value>> {
    match value {
        Value::Object(map) if !map.is_empty() && map.keys().all(|k| is_year_key(k)) => Some(map),
        _ => None,
    }
}

/// Year keys of a series in projection order.
pub(crate) fn year_headers(series: &Map<String, Value>) -> Vec<String> {
    let mut years: Vec<String> = series.keys().cloned().collect();
    years.sort_by_key(|k| k[1..].parse::<u8>().unwrap_or(u8::MAX));
    years
}

fn is_year_key(key: &str) -> bool {
    key.strip_prefix('y')
        .map_or(false, |n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_series_detection() {
        let series = json!({ "y10": "3", "y0": "0", "y2": "1.5" });
        let map = as_series(&series).unwrap();
        assert_eq!(year_headers(map), vec!["y0", "y2", "y10"]);
        assert!(as_series(&json!({ "year": "1" })).is_none());
        assert!(as_series(&json!({})).is_none());
    }

    #[test]
    fn test_pl_row_detection() {
        let rows = vec![json!({ "id": "ebitda", "cells": [] })];
        assert!(is_pl_rows(&rows));
        assert!(!is_pl_rows(&[json!({ "month": 1 })]));
        assert!(!is_pl_rows(&[]));
    }
}
