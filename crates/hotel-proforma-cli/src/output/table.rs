use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{as_series, is_pl_rows, year_headers};

/// Format output as tables using the tabled crate.
///
/// P&L rows and year series become a line x year matrix; other results
/// print as a Field/Value table followed by one table per nested list.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result(result);
                print_envelope(map);
            } else {
                print_object(map);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result(result: &Value) {
    match result {
        Value::Array(rows) if is_pl_rows(rows) => print_pl_matrix(rows),
        Value::Array(arr) => print_array_table(arr),
        Value::Object(map) => print_object(map),
        other => println!("{}", format_value(other)),
    }
}

fn print_envelope(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// Scalars first, then year series as a matrix, then each nested section.
fn print_object(map: &Map<String, Value>) {
    let mut scalars = Builder::default();
    scalars.push_record(["Field", "Value"]);
    let mut scalar_count = 0;
    let mut series: Vec<(&str, &Map<String, Value>)> = Vec::new();
    let mut sections: Vec<(&str, &Value)> = Vec::new();

    for (key, val) in map {
        if let Some(s) = as_series(val) {
            series.push((key.as_str(), s));
        } else if matches!(val, Value::Array(a) if !a.is_empty() && a[0].is_object())
            || matches!(val, Value::Object(_))
        {
            sections.push((key.as_str(), val));
        } else {
            scalars.push_record([key.as_str(), &format_value(val)]);
            scalar_count += 1;
        }
    }

    if scalar_count > 0 {
        println!("{}", Table::from(scalars));
    }

    if let Some((_, first)) = series.first() {
        let years = year_headers(first);
        let mut builder = Builder::default();
        builder.push_record(std::iter::once("Series".to_string()).chain(years.iter().cloned()));
        for (name, s) in &series {
            let cells = years.iter().map(|y| s.get(y).map(format_value).unwrap_or_default());
            builder.push_record(std::iter::once(name.to_string()).chain(cells));
        }
        println!("{}", Table::from(builder));
    }

    for (name, section) in sections {
        println!("\n{}:", name);
        match section {
            Value::Array(rows) if is_pl_rows(rows) => print_pl_matrix(rows),
            Value::Array(arr) => print_array_table(arr),
            Value::Object(inner) => print_object(inner),
            _ => {}
        }
    }
}

fn print_pl_matrix(rows: &[Value]) {
    let years: Vec<String> = rows
        .first()
        .and_then(|r| r.get("cells"))
        .and_then(Value::as_array)
        .map(|cells| {
            cells
                .iter()
                .filter_map(|c| c.get("year").and_then(Value::as_str).map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    let mut builder = Builder::default();
    builder.push_record(std::iter::once("Line".to_string()).chain(years.iter().cloned()));
    for row in rows {
        let label = row.get("label").and_then(Value::as_str).unwrap_or_default();
        let cells = row
            .get("cells")
            .and_then(Value::as_array)
            .map(|cells| {
                cells
                    .iter()
                    .map(|c| c.get("total").map(format_value).unwrap_or_default())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        builder.push_record(std::iter::once(label.to_string()).chain(cells));
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
