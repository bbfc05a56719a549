use serde_json::{Map, Value};
use std::io;

use super::{as_series, is_pl_rows, year_headers};

type StdoutWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
///
/// P&L rows print one line per row with a column per year. An object whose
/// values are year series prints one line per series. Other objects fall
/// back to field,value pairs; a nested `rows` list (the debt schedule) is
/// written as its own table.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Array(rows) if is_pl_rows(rows) => write_pl_csv(&mut wtr, rows),
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        Value::Object(map) => {
            if map.values().all(|v| as_series(v).is_some()) {
                write_series_csv(&mut wtr, map);
            } else if let Some(Value::Array(rows)) = map.get("rows") {
                write_array_csv(&mut wtr, rows);
            } else {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                }
            }
        }
        _ => {
            let _ = wtr.write_record([&format_csv_value(result)]);
        }
    }

    let _ = wtr.flush();
}

fn write_pl_csv(wtr: &mut StdoutWriter<'_>, rows: &[Value]) {
    let cells_of = |row: &Value| -> Vec<Value> {
        row.get("cells")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    };

    let years: Vec<String> = rows
        .first()
        .map(|r| {
            cells_of(r)
                .iter()
                .filter_map(|c| c.get("year").and_then(Value::as_str).map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    let header = ["id", "label", "group", "kind"]
        .into_iter()
        .map(str::to_string)
        .chain(years);
    let _ = wtr.write_record(header);

    for row in rows {
        let fixed = ["id", "label", "group", "kind"]
            .into_iter()
            .map(|k| row.get(k).map(format_csv_value).unwrap_or_default());
        let totals = cells_of(row)
            .into_iter()
            .map(|c| c.get("total").map(format_csv_value).unwrap_or_default())
            .collect::<Vec<_>>();
        let _ = wtr.write_record(fixed.chain(totals));
    }
}

fn write_series_csv(wtr: &mut StdoutWriter<'_>, map: &Map<String, Value>) {
    let Some(first) = map.values().find_map(as_series) else {
        return;
    };
    let years = year_headers(first);
    let _ = wtr.write_record(std::iter::once("series".to_string()).chain(years.iter().cloned()));

    for (name, value) in map {
        if let Some(series) = as_series(value) {
            let cells = years
                .iter()
                .map(|y| series.get(y).map(format_csv_value).unwrap_or_default());
            let _ = wtr.write_record(std::iter::once(name.clone()).chain(cells));
        }
    }
}

fn write_array_csv(wtr: &mut StdoutWriter<'_>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
