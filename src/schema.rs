use serde_json::Value;
use tracing::debug;

use crate::error::JsonLibError;

/// Check `instance` against a JSON Schema, reporting every violation.
pub fn validate(instance: &Value, schema: &Value) -> Result<(), JsonLibError> {
    let validator = jsonschema::validator_for(schema)
        .map_err(|e| JsonLibError::InvalidSchema(e.to_string()))?;

    let violations: Vec<String> = validator
        .iter_errors(instance)
        .map(|e| {
            let at = e.instance_path.to_string();
            if at.is_empty() {
                e.to_string()
            } else {
                format!("{at}: {e}")
            }
        })
        .collect();

    if violations.is_empty() {
        debug!("json matches schema");
        Ok(())
    } else {
        debug!(violations = violations.len(), "json does not match schema");
        Err(JsonLibError::SchemaViolation(violations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn person_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "age": {"type": "integer", "minimum": 0}
            },
            "required": ["name"]
        })
    }

    #[test]
    fn valid_document_passes() {
        assert!(validate(&json!({"name": "Ann", "age": 3}), &person_schema()).is_ok());
    }

    #[test]
    fn every_violation_is_reported() {
        match validate(&json!({"age": -1}), &person_schema()) {
            Err(JsonLibError::SchemaViolation(v)) => assert_eq!(v.len(), 2),
            other => panic!("expected violations, got {other:?}"),
        }
    }

    #[test]
    fn violation_names_location() {
        match validate(&json!({"name": 5}), &person_schema()) {
            Err(JsonLibError::SchemaViolation(v)) => assert!(v[0].contains("/name")),
            other => panic!("expected violations, got {other:?}"),
        }
    }

    #[test]
    fn invalid_schema_errors() {
        assert!(matches!(
            validate(&json!({}), &json!({"type": 12})),
            Err(JsonLibError::InvalidSchema(_))
        ));
    }
}
