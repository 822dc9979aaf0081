use serde_json::Value;

use super::result_of;

/// Key output fields, in order of priority.
const PRIORITY_KEYS: [&str; 4] = ["monthly_payment", "psk", "valid", "rate"];

/// Print just the key answer value from the output.
///
/// For an offer list this is one line per offer; otherwise the first
/// priority field present, falling back to the first field.
pub fn print_minimal(value: &Value) {
    match result_of(value) {
        Value::Array(items) => {
            for item in items {
                println!("{}", key_value(item));
            }
        }
        other => println!("{}", key_value(other)),
    }
}

fn key_value(value: &Value) -> String {
    if let Value::Object(map) = value {
        for key in &PRIORITY_KEYS {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    return format_minimal(val);
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_minimal(val));
        }
    }

    format_minimal(value)
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
