use serde_json::Value;

/// Print just the key answer value from the output.
///
/// P&L output prints the EBITDA line; objects are searched for well-known
/// fields in priority order (descending into the exit block of a full
/// pro-forma), then fall back to the first field.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Array(rows) = result_obj {
        if let Some(ebitda) = rows.iter().find(|r| r.get("id").and_then(Value::as_str) == Some("ebitda")) {
            let totals: Vec<String> = ebitda
                .get("cells")
                .and_then(Value::as_array)
                .map(|cells| {
                    cells
                        .iter()
                        .map(|c| c.get("total").map(format_minimal).unwrap_or_default())
                        .collect()
                })
                .unwrap_or_default();
            println!("{}", totals.join(","));
            return;
        }
    }

    let priority_keys = [
        "irr_levered",
        "irr_unlevered",
        "monthly_payment",
        "revpar",
        "rooms_revenue",
    ];

    let exit_block = result_obj.get("exit");
    for candidate in [exit_block, Some(result_obj)].into_iter().flatten() {
        if let Value::Object(map) = candidate {
            for key in &priority_keys {
                if let Some(val) = map.get(*key) {
                    if !val.is_null() {
                        println!("{}", format_minimal(val));
                        return;
                    }
                }
            }
        }
    }

    if let Value::Object(map) = result_obj {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
