//! Human-readable change summaries for audit entries

use serde_json::Value;

const MAX_STRING_CHARS: usize = 40;

/// Summarize top-level field changes between two serialized entities
///
/// Returns `None` when nothing changed. `updated_at` is ignored since it
/// changes on every write.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let (Value::Object(b), Value::Object(a)) = (before, after) else {
        return (before != after).then(|| format!("{} -> {}", format_value(before), format_value(after)));
    };

    let mut changes: Vec<String> = Vec::new();

    for (key, old) in b.iter().filter(|(k, _)| k.as_str() != "updated_at") {
        match a.get(key) {
            Some(new) if new != old => {
                changes.push(format!("{}: {} -> {}", key, format_value(old), format_value(new)))
            }
            Some(_) => {}
            None => changes.push(format!("{}: {} -> (removed)", key, format_value(old))),
        }
    }

    for (key, new) in a.iter().filter(|(k, _)| !b.contains_key(k.as_str())) {
        changes.push(format!("{}: (added) -> {}", key, format_value(new)));
    }

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.chars().count() > MAX_STRING_CHARS => {
            let head: String = s.chars().take(MAX_STRING_CHARS - 3).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(fields) => format!("{{{} fields}}", fields.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_changed_fields_only() {
        let before = json!({"name": "Nájem", "amount": 1_800_000, "my_percentage": 100});
        let after = json!({"name": "Nájem", "amount": 1_800_000, "my_percentage": 50});

        assert_eq!(
            generate_diff(&before, &after).as_deref(),
            Some("my_percentage: 100 -> 50")
        );
    }

    #[test]
    fn test_added_and_removed() {
        let before = json!({"name": "Auto", "note": "servis"});
        let after = json!({"name": "Auto", "is_mine": false});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("note: \"servis\" -> (removed)"));
        assert!(diff.contains("is_mine: (added) -> false"));
    }

    #[test]
    fn test_updated_at_is_ignored() {
        let before = json!({"salary": 1, "updated_at": "2025-01-01T00:00:00Z"});
        let after = json!({"salary": 1, "updated_at": "2025-01-02T00:00:00Z"});
        assert!(generate_diff(&before, &after).is_none());
    }

    #[test]
    fn test_arrays_are_summarized() {
        let before = json!({"envelopes": [1]});
        let after = json!({"envelopes": [1, 2, 3]});
        assert_eq!(
            generate_diff(&before, &after).as_deref(),
            Some("envelopes: [1 items] -> [3 items]")
        );
    }

    #[test]
    fn test_long_multibyte_string_is_truncated_safely() {
        let before = json!({"note": "ř".repeat(100)});
        let after = json!({"note": "krátká"});
        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("...\""));
    }

    #[test]
    fn test_scalar_values() {
        assert_eq!(generate_diff(&json!(1), &json!(2)).as_deref(), Some("1 -> 2"));
        assert!(generate_diff(&json!("a"), &json!("a")).is_none());
    }
}
