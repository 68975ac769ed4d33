use serde_json::Value;

/// Placeholder for values the server did not send
pub const NOT_AVAILABLE: &str = "N/A";

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format an optional value, returning a default if None
pub fn format_optional<T: ToString>(value: Option<T>, default: &str) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| default.to_string())
}

/// First letter upper case, the rest lower case ("annotation" -> "Annotation")
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Format a timestamp as "Feb 10, 2025 09:12 UTC"; other strings pass through
pub fn format_date(date: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(date) {
        Ok(dt) => dt.with_timezone(&chrono::Utc).format("%b %d, %Y %H:%M UTC").to_string(),
        Err(_) => date.to_string(),
    }
}

/// Render a JSON value for a table cell: strings unquoted, null as N/A
pub fn format_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => NOT_AVAILABLE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("héllo wörld", 6), "hél...");
    }

    #[test]
    fn test_format_optional() {
        assert_eq!(format_optional(Some(5), "N/A"), "5");
        assert_eq!(format_optional(None::<i64>, "N/A"), "N/A");
        assert_eq!(format_optional(Some("2d"), "None"), "2d");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("annotation"), "Annotation");
        assert_eq!(capitalize("IN PROGRESS"), "In progress");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2025-02-10T09:12:00.000000Z"), "Feb 10, 2025 09:12 UTC");
        assert_eq!(format_date("yesterday"), "yesterday");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(Some(&json!("car"))), "car");
        assert_eq!(format_value(Some(&json!(12))), "12");
        assert_eq!(format_value(Some(&Value::Null)), "N/A");
        assert_eq!(format_value(None), "N/A");
    }
}
