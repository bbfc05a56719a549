use serde_json::Value;
use std::io::{self, Read};

/// Read a document from stdin if data is being piped. JSON is tried first,
/// then YAML. Returns None if stdin is a TTY (interactive) or empty.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: Value = match serde_json::from_str(trimmed) {
        Ok(v) => v,
        Err(json_err) => serde_yaml::from_str(trimmed)
            .map_err(|_| format!("stdin is neither JSON nor YAML: {json_err}"))?,
    };
    Ok(Some(value))
}
