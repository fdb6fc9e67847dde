//! Parsing schema descriptions into [`SchemaNode`].
//!
//! Descriptions are plain JSON:
//!
//! ```json
//! {
//!     "name": { "type": "string", "required": true },
//!     "address": { "city": { "type": "string", "required": false } },
//!     "tags": [{ "type": "string", "required": false }],
//!     "items": [{ "sku": { "type": "string", "required": true } }]
//! }
//! ```
//!
//! An object carrying both `type` and `required` is a field; any other object
//! is a nested object schema; a one-element array is an array schema.

use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::types::{json_type_name, FieldType, SchemaNode};

impl SchemaNode {
    /// Parse a JSON schema description.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` with the JSON Pointer of the first malformed node.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        parse_node(value, "")
    }
}

/// Whether a description object should be read as a scalar field.
pub(crate) fn is_field_description(map: &Map<String, Value>) -> bool {
    map.contains_key("type") && map.contains_key("required")
}

fn parse_node(value: &Value, path: &str) -> Result<SchemaNode, SchemaError> {
    match value {
        Value::Array(items) => parse_array(items, path),
        Value::Object(map) if is_field_description(map) => parse_field(map, path),
        Value::Object(map) => parse_object(map, path),
        other => Err(SchemaError::InvalidNode {
            path: display_path(path),
            actual: json_type_name(other).to_string(),
        }),
    }
}

fn parse_array(items: &[Value], path: &str) -> Result<SchemaNode, SchemaError> {
    let [element] = items else {
        return Err(SchemaError::ArrayArity {
            path: display_path(path),
            found: items.len(),
        });
    };

    let element_path = format!("{}/0", path);
    if element.is_array() {
        return Err(SchemaError::NestedArray {
            path: element_path,
        });
    }

    Ok(SchemaNode::array(parse_node(element, &element_path)?))
}

fn parse_field(map: &Map<String, Value>, path: &str) -> Result<SchemaNode, SchemaError> {
    let field_type = match &map["type"] {
        Value::String(s) => FieldType::parse(s).ok_or_else(|| SchemaError::UnknownType {
            path: format!("{}/type", path),
            value: s.clone(),
        })?,
        other => {
            return Err(SchemaError::UnknownType {
                path: format!("{}/type", path),
                value: other.to_string(),
            })
        }
    };

    let required = match &map["required"] {
        Value::Bool(b) => *b,
        other => {
            return Err(SchemaError::InvalidRequired {
                path: format!("{}/required", path),
                actual: json_type_name(other).to_string(),
            })
        }
    };

    Ok(SchemaNode::field(field_type, required))
}

fn parse_object(map: &Map<String, Value>, path: &str) -> Result<SchemaNode, SchemaError> {
    let mut entries = Vec::with_capacity(map.len());
    for (key, value) in map {
        let child_path = format!("{}/{}", path, escape_pointer(key));
        entries.push((key.clone(), parse_node(value, &child_path)?));
    }
    Ok(SchemaNode::Object(entries))
}

/// Escape a key for use as a JSON Pointer segment (`~` → `~0`, `/` → `~1`).
pub(crate) fn escape_pointer(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_field() {
        let node = SchemaNode::from_value(&json!({ "type": "number", "required": false })).unwrap();
        assert_eq!(node, SchemaNode::field(FieldType::Number, false));
    }

    #[test]
    fn parses_nested_shapes_in_order() {
        let node = SchemaNode::from_value(&json!({
            "name": { "type": "string", "required": true },
            "address": { "city": { "type": "string", "required": false } },
            "tags": [{ "type": "string", "required": false }],
            "items": [{ "sku": { "type": "string", "required": true } }]
        }))
        .unwrap();

        let SchemaNode::Object(entries) = &node else {
            panic!("expected object schema");
        };
        let names: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, ["name", "address", "tags", "items"]);
        assert_eq!(
            entries[2].1,
            SchemaNode::array(SchemaNode::field(FieldType::String, false))
        );
        assert!(matches!(&entries[3].1, SchemaNode::Array(e) if matches!(**e, SchemaNode::Object(_))));
    }

    #[test]
    fn object_with_only_type_key_is_nested_object() {
        // "type" alone does not make a field; its value must then be a node.
        let err = SchemaNode::from_value(&json!({ "type": "string" })).unwrap_err();
        assert_eq!(
            err,
            SchemaError::InvalidNode {
                path: "/type".into(),
                actual: "string".into()
            }
        );
    }

    #[test]
    fn rejects_unknown_type() {
        let err = SchemaNode::from_value(&json!({
            "age": { "type": "integer", "required": true }
        }))
        .unwrap_err();
        assert_eq!(err.path(), "/age/type");
        assert!(matches!(err, SchemaError::UnknownType { value, .. } if value == "integer"));
    }

    #[test]
    fn rejects_non_boolean_required() {
        let err = SchemaNode::from_value(&json!({
            "age": { "type": "number", "required": "yes" }
        }))
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::InvalidRequired {
                path: "/age/required".into(),
                actual: "string".into()
            }
        );
    }

    #[test]
    fn rejects_nested_arrays() {
        let err = SchemaNode::from_value(&json!({
            "matrix": [[{ "type": "number", "required": true }]]
        }))
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::NestedArray {
                path: "/matrix/0".into()
            }
        );
    }

    #[test]
    fn rejects_array_arity() {
        let err = SchemaNode::from_value(&json!([])).unwrap_err();
        assert_eq!(err, SchemaError::ArrayArity { path: "/".into(), found: 0 });

        let two = json!([
            { "type": "number", "required": true },
            { "type": "string", "required": true }
        ]);
        let err = SchemaNode::from_value(&two).unwrap_err();
        assert!(matches!(err, SchemaError::ArrayArity { found: 2, .. }));
    }

    #[test]
    fn escapes_pointer_segments() {
        let err = SchemaNode::from_value(&json!({ "a/b": 1 })).unwrap_err();
        assert_eq!(err.path(), "/a~1b");
    }

    #[test]
    fn round_trips_description() {
        let description = json!({
            "user": {
                "id": { "type": "string", "required": true },
                "roles": [{ "type": "string", "required": true }]
            }
        });
        let node = SchemaNode::from_value(&description).unwrap();
        assert_eq!(node.to_value(), description);
    }
}
