use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::error::JsonLibError;
use crate::format::Format;

/// How a value is rendered to text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub format: Format,
    /// Spaces per nesting level for JSON; `None` renders on one line.
    pub indent: Option<usize>,
    /// Print strings without quotes.
    pub raw: bool,
}

impl Default for Style {
    fn default() -> Self {
        Style {
            format: Format::Json,
            indent: Some(2),
            raw: false,
        }
    }
}

/// Format a Value as a string in the given style.
pub fn format_value(value: &Value, style: &Style) -> Result<String, JsonLibError> {
    // Raw mode: if the value is a string, output it without quotes
    if style.raw {
        if let Value::String(s) = value {
            return Ok(s.clone());
        }
    }

    match style.format {
        Format::Json => format_json(value, style.indent),
        Format::Yaml => format_yaml(value),
    }
}

fn format_json(value: &Value, indent: Option<usize>) -> Result<String, JsonLibError> {
    let Some(width) = indent else {
        return serde_json::to_string(value).map_err(|e| JsonLibError::Output(e.to_string()));
    };
    let pad = " ".repeat(width);
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(pad.as_bytes());
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .map_err(|e| JsonLibError::Output(e.to_string()))?;
    String::from_utf8(buf).map_err(|e| JsonLibError::Output(e.to_string()))
}

fn format_yaml(value: &Value) -> Result<String, JsonLibError> {
    serde_yaml::to_string(value).map_err(|e| JsonLibError::Output(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn style(format: Format, indent: Option<usize>, raw: bool) -> Style {
        Style { format, indent, raw }
    }

    #[test]
    fn json_pretty() {
        let val = json!({"a": 1, "b": 2});
        let out = format_value(&val, &Style::default()).unwrap();
        assert_eq!(out, "{\n  \"a\": 1,\n  \"b\": 2\n}");
    }

    #[test]
    fn json_custom_indent() {
        let val = json!({"a": [1]});
        let out = format_value(&val, &style(Format::Json, Some(4), false)).unwrap();
        assert_eq!(out, "{\n    \"a\": [\n        1\n    ]\n}");
    }

    #[test]
    fn json_compact() {
        let val = json!({"a": 1, "b": [true, null]});
        let out = format_value(&val, &style(Format::Json, None, false)).unwrap();
        assert_eq!(out, r#"{"a":1,"b":[true,null]}"#);
    }

    #[test]
    fn json_keeps_insertion_order() {
        let val: Value = serde_json::from_str(r#"{"z": 1, "a": 2}"#).unwrap();
        let out = format_value(&val, &style(Format::Json, None, false)).unwrap();
        assert_eq!(out, r#"{"z":1,"a":2}"#);
    }

    #[test]
    fn yaml_output() {
        let val = json!({"name": "test", "count": 3});
        let out = format_value(&val, &style(Format::Yaml, None, false)).unwrap();
        assert!(out.contains("name: test"));
        assert!(out.contains("count: 3"));
    }

    #[test]
    fn raw_string() {
        let val = json!("hello world");
        let out = format_value(&val, &style(Format::Json, Some(2), true)).unwrap();
        assert_eq!(out, "hello world");
    }

    #[test]
    fn raw_non_string_ignored() {
        let val = json!(42);
        let out = format_value(&val, &style(Format::Json, Some(2), true)).unwrap();
        assert_eq!(out, "42");
    }
}
