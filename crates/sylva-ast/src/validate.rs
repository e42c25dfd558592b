//! Runtime type assertions for untyped input
//!
//! Typed construction cannot put a wrong child into a field: each field is a
//! closed sum type. These checks cover the remaining dynamic path, where a
//! tree arrives as JSON and every structural field has to be checked against
//! the variants it permits.

use serde_json::Value;

use crate::error::{Shape, TypeMismatch};

/// Runtime variant name of an untyped value.
///
/// Tagged objects report their `"type"` tag; everything else reports its JSON
/// type.
pub fn type_of(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::String(_) => "string".to_string(),
        Value::Array(_) => "array".to_string(),
        Value::Object(map) => match map.get("type") {
            Some(Value::String(tag)) => tag.clone(),
            _ => "object".to_string(),
        },
    }
}

fn conforms(value: &Value, allowed: &[&str], allow_null: bool) -> bool {
    match value {
        Value::Null => allow_null,
        Value::Object(_) => {
            let actual = type_of(value);
            allowed.iter().any(|name| *name == actual)
        }
        _ => false,
    }
}

/// Succeeds when `value` is null and null is allowed, or its runtime variant
/// is one of `allowed`.
pub fn assert_type(
    operation: &str,
    value: &Value,
    allowed: &[&str],
    allow_null: bool,
) -> Result<(), TypeMismatch> {
    if conforms(value, allowed, allow_null) {
        Ok(())
    } else {
        Err(TypeMismatch::new(
            operation,
            allowed,
            allow_null,
            type_of(value),
            Shape::Value,
        ))
    }
}

/// Element-wise [`assert_type`] over a sequence.
///
/// Reports the first non-conforming element. A value that is not a sequence
/// at all is reported as a top-level mismatch.
pub fn assert_array_of<'v>(
    operation: &str,
    value: &'v Value,
    allowed: &[&str],
    allow_null: bool,
) -> Result<&'v [Value], TypeMismatch> {
    let Value::Array(items) = value else {
        return Err(TypeMismatch::new(
            operation,
            allowed,
            allow_null,
            type_of(value),
            Shape::Array,
        ));
    };

    if let Some(bad) = items.iter().find(|item| !conforms(item, allowed, allow_null)) {
        return Err(TypeMismatch::new(
            operation,
            allowed,
            allow_null,
            type_of(bad),
            Shape::ArrayElement,
        ));
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const EXPR: &[&str] = &["Identifier", "Literal"];

    #[test]
    fn type_of_reports_tags_and_json_types() {
        assert_eq!(type_of(&json!({"type": "Identifier", "name": "x"})), "Identifier");
        assert_eq!(type_of(&json!({"name": "x"})), "object");
        assert_eq!(type_of(&json!({"type": 3})), "object");
        assert_eq!(type_of(&json!(null)), "null");
        assert_eq!(type_of(&json!(1.5)), "number");
        assert_eq!(type_of(&json!([1])), "array");
    }

    #[test]
    fn assert_type_accepts_allowed_variant() {
        assert!(assert_type("op", &json!({"type": "Literal"}), EXPR, false).is_ok());
    }

    #[test]
    fn assert_type_null_depends_on_flag() {
        assert!(assert_type("op", &Value::Null, EXPR, true).is_ok());

        let err = assert_type("op", &Value::Null, EXPR, false).unwrap_err();
        assert_eq!(err.actual, "null");
        assert!(!err.allow_null);
    }

    #[test]
    fn assert_type_rejects_unrelated_variant() {
        let err = assert_type("BinaryExpression.left", &json!({"type": "Program"}), EXPR, true)
            .unwrap_err();
        assert_eq!(err.operation, "BinaryExpression.left");
        assert_eq!(err.allowed, vec!["Identifier", "Literal"]);
        assert!(err.allow_null);
        assert_eq!(err.actual, "Program");
        assert_eq!(err.shape, Shape::Value);
    }

    #[test]
    fn assert_array_of_reports_first_bad_element() {
        let value = json!([{"type": "Identifier"}, 4, "x"]);
        let err = assert_array_of("CallExpression.arguments", &value, EXPR, false).unwrap_err();
        assert_eq!(err.actual, "number");
        assert_eq!(err.shape, Shape::ArrayElement);
    }

    #[test]
    fn assert_array_of_rejects_non_sequence() {
        let err = assert_array_of("op", &json!({"type": "Literal"}), EXPR, false).unwrap_err();
        assert_eq!(err.actual, "Literal");
        assert_eq!(err.shape, Shape::Array);
    }

    #[test]
    fn assert_array_of_allows_null_elements_when_permitted() {
        let value = json!([null, {"type": "Literal"}]);
        let items = assert_array_of("op", &value, EXPR, true).unwrap();
        assert_eq!(items.len(), 2);
        assert!(assert_array_of("op", &value, EXPR, false).is_err());
    }

    #[test]
    fn empty_sequence_conforms() {
        assert!(assert_array_of("op", &json!([]), EXPR, false).unwrap().is_empty());
    }
}
