//! Payload validation against schema descriptions.
//!
//! Validation never fails: every problem becomes a human-readable entry in
//! [`ValidationResult::errors`], and [`ValidationResult::data`] carries the
//! sanitized part of the input that matched.

use serde_json::{Map, Value};

use crate::types::{FieldSchema, SchemaNode, ValidationResult};

/// Validate an input value against a schema.
///
/// Errors are reported in schema declaration order, and for arrays in item
/// order. Input keys the schema does not mention are ignored.
///
/// # Example
///
/// ```
/// use request_guard::{validate, FieldType, SchemaNode};
/// use serde_json::json;
///
/// let schema = SchemaNode::object([
///     ("name", SchemaNode::field(FieldType::String, true)),
///     ("age", SchemaNode::field(FieldType::Number, false)),
/// ]);
///
/// let result = validate(&schema, &json!({ "name": "Ada", "age": "old", "extra": 1 }));
/// assert!(!result.is_valid);
/// assert_eq!(result.data, json!({ "name": "Ada" }));
/// assert_eq!(result.errors, vec!["age must be a number"]);
/// ```
pub fn validate(schema: &SchemaNode, input: &Value) -> ValidationResult {
    let (data, errors) = match schema {
        SchemaNode::Array(element) => match input.as_array() {
            Some(items) => validate_array(element, items, &ArrayLabels::top_level()),
            None => (
                Value::Array(Vec::new()),
                vec!["Input values must be an array".to_string()],
            ),
        },
        SchemaNode::Object(entries) => validate_object(entries, input),
        SchemaNode::Field(field) => {
            let mut errors = Vec::new();
            let data = check_field(field, Some(input), "Value", &mut errors)
                .cloned()
                .unwrap_or(Value::Null);
            (data, errors)
        }
    };

    ValidationResult::new(data, errors)
}

/// Error phrasing for scalar array items.
struct ArrayLabels {
    required: String,
    wrong_type_prefix: String,
}

impl ArrayLabels {
    fn top_level() -> Self {
        Self {
            required: "Array value is required".to_string(),
            wrong_type_prefix: "Array value".to_string(),
        }
    }

    fn for_key(key: &str) -> Self {
        Self {
            required: format!("{} is required", key),
            wrong_type_prefix: key.to_string(),
        }
    }
}

fn validate_object(entries: &[(String, SchemaNode)], input: &Value) -> (Value, Vec<String>) {
    let mut data = Map::new();
    let mut errors = Vec::new();

    for (key, node) in entries {
        let value = input.get(key);

        match node {
            SchemaNode::Array(element) => {
                let Some(items) = value.and_then(Value::as_array) else {
                    errors.push(format!("{} must be an array", key));
                    continue;
                };
                let (item_data, item_errors) =
                    validate_array(element, items, &ArrayLabels::for_key(key));
                data.insert(key.clone(), item_data);
                errors.extend(item_errors);
            }
            SchemaNode::Object(_) => {
                // Missing nested objects are validated as empty ones.
                let nested = validate(node, value.unwrap_or(&Value::Null));
                data.insert(key.clone(), nested.data);
                errors.extend(nested.errors);
            }
            SchemaNode::Field(field) => {
                if let Some(v) = check_field(field, value, key, &mut errors) {
                    data.insert(key.clone(), v.clone());
                }
            }
        }
    }

    (Value::Object(data), errors)
}

fn validate_array(
    element: &SchemaNode,
    items: &[Value],
    labels: &ArrayLabels,
) -> (Value, Vec<String>) {
    let mut data = Vec::with_capacity(items.len());
    let mut errors = Vec::new();

    match element {
        SchemaNode::Field(field) => {
            if field.required && items.is_empty() {
                errors.push("Array must not be empty".to_string());
            }

            for item in items {
                if !has_value(Some(item)) {
                    if field.required {
                        errors.push(labels.required.clone());
                    }
                    continue;
                }
                if !field.field_type.matches(item) {
                    errors.push(format!(
                        "{} must be a {}",
                        labels.wrong_type_prefix, field.field_type
                    ));
                    continue;
                }
                data.push(item.clone());
            }
        }
        // Structural items are always kept, even when they carry errors.
        SchemaNode::Object(_) | SchemaNode::Array(_) => {
            for item in items {
                let nested = validate(element, item);
                errors.extend(nested.errors);
                data.push(nested.data);
            }
        }
    }

    (Value::Array(data), errors)
}

/// Apply the field rule to a scalar value.
///
/// Returns the value when it belongs in the output.
fn check_field<'a>(
    field: &FieldSchema,
    value: Option<&'a Value>,
    label: &str,
    errors: &mut Vec<String>,
) -> Option<&'a Value> {
    if !has_value(value) {
        if field.required {
            errors.push(format!("{} is required", label));
        }
        return None;
    }

    let value = value?;
    if !field.field_type.matches(value) {
        errors.push(format!("{} must be a {}", label, field.field_type));
        return None;
    }

    Some(value)
}

fn has_value(value: Option<&Value>) -> bool {
    !matches!(value, None | Some(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldType;
    use serde_json::json;

    fn string(required: bool) -> SchemaNode {
        SchemaNode::field(FieldType::String, required)
    }

    fn number(required: bool) -> SchemaNode {
        SchemaNode::field(FieldType::Number, required)
    }

    #[test]
    fn required_missing() {
        let schema = SchemaNode::object([("a", string(true))]);
        let result = validate(&schema, &json!({}));
        assert!(!result.is_valid);
        assert_eq!(result.data, json!({}));
        assert_eq!(result.errors, vec!["a is required"]);
    }

    #[test]
    fn null_counts_as_missing() {
        let schema = SchemaNode::object([("a", string(true)), ("b", string(false))]);
        let result = validate(&schema, &json!({ "a": null, "b": null }));
        assert_eq!(result.data, json!({}));
        assert_eq!(result.errors, vec!["a is required"]);
    }

    #[test]
    fn type_mismatch_is_omitted() {
        let schema = SchemaNode::object([("a", number(false))]);
        let result = validate(&schema, &json!({ "a": "x" }));
        assert!(!result.is_valid);
        assert_eq!(result.data, json!({}));
        assert_eq!(result.errors, vec!["a must be a number"]);
    }

    #[test]
    fn pass_through() {
        let schema = SchemaNode::object([("a", string(true))]);
        let result = validate(&schema, &json!({ "a": "hi" }));
        assert!(result.is_valid);
        assert_eq!(result.data, json!({ "a": "hi" }));
        assert!(result.errors.is_empty());
    }

    #[test]
    fn unknown_keys_ignored() {
        let schema = SchemaNode::object([("a", string(false))]);
        let result = validate(&schema, &json!({ "a": "x", "b": 2 }));
        assert!(result.is_valid);
        assert_eq!(result.data, json!({ "a": "x" }));
    }

    #[test]
    fn scalar_array_required_empty() {
        let schema = SchemaNode::object([("a", SchemaNode::array(number(true)))]);
        let result = validate(&schema, &json!({ "a": [] }));
        assert!(result.errors.contains(&"Array must not be empty".to_string()));
        assert_eq!(result.data, json!({ "a": [] }));
    }

    #[test]
    fn scalar_array_drops_bad_items() {
        let schema = SchemaNode::object([("a", SchemaNode::array(number(true)))]);
        let result = validate(&schema, &json!({ "a": [1, "two", null, 3] }));
        assert_eq!(result.data, json!({ "a": [1, 3] }));
        assert_eq!(result.errors, vec!["a must be a number", "a is required"]);
    }

    #[test]
    fn optional_scalar_array_skips_nulls_silently() {
        let schema = SchemaNode::object([("a", SchemaNode::array(string(false)))]);
        let result = validate(&schema, &json!({ "a": ["x", null] }));
        assert!(result.is_valid);
        assert_eq!(result.data, json!({ "a": ["x"] }));
    }

    #[test]
    fn nested_object_array_keeps_invalid_items() {
        let schema = SchemaNode::object([(
            "a",
            SchemaNode::array(SchemaNode::object([("b", string(true))])),
        )]);
        let result = validate(&schema, &json!({ "a": [{ "b": "x" }, {}] }));
        assert!(!result.is_valid);
        assert_eq!(result.data, json!({ "a": [{ "b": "x" }, {}] }));
        assert_eq!(result.errors, vec!["b is required"]);
    }

    #[test]
    fn non_array_value_for_array_schema() {
        let schema = SchemaNode::object([("a", SchemaNode::array(string(false)))]);
        let result = validate(&schema, &json!({ "a": "notArray" }));
        assert_eq!(result.errors, vec!["a must be an array"]);
        assert!(result.data.get("a").is_none());

        let result = validate(&schema, &json!({}));
        assert_eq!(result.errors, vec!["a must be an array"]);
    }

    #[test]
    fn top_level_array_schema() {
        let schema = SchemaNode::array(string(true));
        let result = validate(&schema, &json!(["a", 1, null]));
        assert_eq!(result.data, json!(["a"]));
        assert_eq!(
            result.errors,
            vec!["Array value must be a string", "Array value is required"]
        );

        let result = validate(&schema, &json!([]));
        assert_eq!(result.errors, vec!["Array must not be empty"]);
    }

    #[test]
    fn top_level_array_schema_rejects_non_array_input() {
        let schema = SchemaNode::array(SchemaNode::object([("b", string(true))]));
        let result = validate(&schema, &json!({ "b": "x" }));
        assert_eq!(result.data, json!([]));
        assert_eq!(result.errors, vec!["Input values must be an array"]);
    }

    #[test]
    fn missing_nested_object_validated_as_empty() {
        let schema = SchemaNode::object([(
            "address",
            SchemaNode::object([("city", string(true)), ("zip", string(false))]),
        )]);
        let result = validate(&schema, &json!({}));
        assert_eq!(result.data, json!({ "address": {} }));
        assert_eq!(result.errors, vec!["city is required"]);
    }

    #[test]
    fn top_level_field_schema() {
        let schema = number(true);
        assert_eq!(validate(&schema, &json!(4)).data, json!(4));

        let result = validate(&schema, &json!(null));
        assert_eq!(result.data, Value::Null);
        assert_eq!(result.errors, vec!["Value is required"]);

        let result = validate(&schema, &json!(true));
        assert_eq!(result.errors, vec!["Value must be a number"]);
    }

    #[test]
    fn nested_arrays_recurse() {
        let schema = SchemaNode::array(SchemaNode::array(number(false)));
        let result = validate(&schema, &json!([[1, "x"], 2]));
        assert_eq!(result.data, json!([[1], []]));
        assert_eq!(
            result.errors,
            vec!["Array value must be a number", "Input values must be an array"]
        );
    }

    #[test]
    fn errors_follow_declaration_order() {
        let schema = SchemaNode::object([
            ("z", string(true)),
            ("m", number(true)),
            ("a", SchemaNode::field(FieldType::Boolean, true)),
        ]);
        let result = validate(&schema, &json!({ "a": "no", "m": null }));
        assert_eq!(
            result.errors,
            vec!["z is required", "m is required", "a must be a boolean"]
        );
    }

    #[test]
    fn repeated_calls_are_identical() {
        let schema = SchemaNode::object([
            ("a", string(true)),
            ("b", SchemaNode::array(SchemaNode::object([("c", number(true))]))),
        ]);
        let input = json!({ "b": [{ "c": 1 }, { "c": "2" }] });
        let first = validate(&schema, &input);
        let second = validate(&schema, &input);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
