//! Core types for request payload validation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys that mark a schema object as a scalar field rather than a nested object.
pub const FIELD_KEYS: &[&str] = &["type", "required"];

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Scalar type a field schema accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
}

impl FieldType {
    /// Parse a type name from a schema description.
    ///
    /// Returns `None` for unknown names (caller should error).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "string" => Some(FieldType::String),
            "number" => Some(FieldType::Number),
            "boolean" => Some(FieldType::Boolean),
            _ => None,
        }
    }

    /// Name used in schema descriptions and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
        }
    }

    /// Whether a (non-null) value has this type.
    pub fn matches(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (FieldType::String, Value::String(_))
                | (FieldType::Number, Value::Number(_))
                | (FieldType::Boolean, Value::Bool(_))
        )
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scalar leaf: expected type plus whether a value must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSchema {
    pub field_type: FieldType,
    pub required: bool,
}

/// A node of a schema description.
///
/// Object entries keep their declaration order, which is also the order
/// validation errors are reported in.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// Scalar leaf.
    Field(FieldSchema),
    /// Named mapping of sub-schemas.
    Object(Vec<(String, SchemaNode)>),
    /// Zero or more items, each validated against the element.
    Array(Box<SchemaNode>),
}

impl SchemaNode {
    /// Build a field schema.
    pub fn field(field_type: FieldType, required: bool) -> Self {
        SchemaNode::Field(FieldSchema {
            field_type,
            required,
        })
    }

    /// Build an object schema from `(name, node)` pairs, in order.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, SchemaNode)>,
    {
        SchemaNode::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build an array schema around an element node.
    pub fn array(element: SchemaNode) -> Self {
        SchemaNode::Array(Box::new(element))
    }

    /// Render the node back into its JSON description form.
    pub fn to_value(&self) -> Value {
        match self {
            SchemaNode::Field(field) => {
                let mut map = Map::new();
                map.insert("type".into(), Value::String(field.field_type.as_str().into()));
                map.insert("required".into(), Value::Bool(field.required));
                Value::Object(map)
            }
            SchemaNode::Object(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(name, node)| (name.clone(), node.to_value()))
                    .collect(),
            ),
            SchemaNode::Array(element) => Value::Array(vec![element.to_value()]),
        }
    }
}

/// Outcome of validating an input against a schema.
///
/// `data` mirrors the schema shape and holds only values that were present
/// and correctly typed. `is_valid` is true exactly when `errors` is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub data: Value,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub(crate) fn new(data: Value, errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            data,
            errors,
        }
    }
}
