//! Contract → JSON Schema export.
//!
//! Renders a contract as an MCP `inputSchema` object so transports can
//! advertise tools without a second, hand-maintained schema. Consolidated
//! branches become `if`/`then` clauses keyed on the discriminant.

use super::contract::{Contract, FieldType, StringFormat, UnknownFields};
use serde_json::{json, Map, Value};

impl Contract {
    /// JSON Schema (draft 2020-12 subset) describing this contract.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for rule in self.fields.values() {
            let mut schema = field_schema(&rule.field_type);
            if let Value::Object(map) = &mut schema {
                map.insert("description".to_string(), json!(rule.description));
                if let Some(default) = &rule.default {
                    map.insert("default".to_string(), default.clone());
                }
            }
            properties.insert(rule.name.clone(), schema);
            if rule.required {
                required.push(json!(rule.name));
            }
        }

        let mut schema = Map::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".to_string(), Value::Array(required));
        }
        if self.unknown_fields == UnknownFields::Reject {
            schema.insert("additionalProperties".to_string(), json!(false));
        }

        if let Some(variant) = &self.variant {
            let clauses: Vec<Value> = variant
                .branches
                .values()
                .map(|branch| {
                    let mut then_props = Map::new();
                    then_props.insert(variant.options_field.clone(), branch.options.to_json_schema());
                    for restriction in &branch.restrictions {
                        then_props.insert(
                            restriction.field.clone(),
                            json!({ "enum": restriction.allowed }),
                        );
                    }
                    let mut if_props = Map::new();
                    if_props.insert(
                        variant.discriminant.clone(),
                        json!({ "const": branch.value }),
                    );
                    json!({
                        "if": {
                            "properties": if_props,
                            "required": [variant.discriminant],
                        },
                        "then": { "properties": then_props },
                    })
                })
                .collect();
            schema.insert("allOf".to_string(), Value::Array(clauses));
        }

        Value::Object(schema)
    }
}

fn field_schema(field_type: &FieldType) -> Value {
    match field_type {
        FieldType::String {
            min_len,
            max_len,
            format,
        } => {
            let mut map = Map::new();
            map.insert("type".to_string(), json!("string"));
            if let Some(min) = min_len {
                map.insert("minLength".to_string(), json!(min));
            }
            if let Some(max) = max_len {
                map.insert("maxLength".to_string(), json!(max));
            }
            match format {
                Some(StringFormat::Uuid) => {
                    map.insert("format".to_string(), json!("uuid"));
                }
                Some(StringFormat::DateTime) => {
                    map.insert("format".to_string(), json!("date-time"));
                }
                None => {}
            }
            Value::Object(map)
        }
        FieldType::Integer { min, max } => bounded("integer", min.map(Value::from), max.map(Value::from)),
        FieldType::Number { min, max } => bounded("number", min.map(Value::from), max.map(Value::from)),
        FieldType::Boolean {
            coerce_strings: false,
        } => json!({ "type": "boolean" }),
        FieldType::Boolean {
            coerce_strings: true,
        } => json!({
            "anyOf": [
                { "type": "boolean" },
                { "type": "string", "enum": ["true", "false"] },
            ]
        }),
        FieldType::Enum { values } => json!({ "type": "string", "enum": values }),
        FieldType::Array {
            items,
            min_items,
            max_items,
        } => {
            let mut map = Map::new();
            map.insert("type".to_string(), json!("array"));
            map.insert("items".to_string(), field_schema(items));
            if let Some(min) = min_items {
                map.insert("minItems".to_string(), json!(min));
            }
            if let Some(max) = max_items {
                map.insert("maxItems".to_string(), json!(max));
            }
            Value::Object(map)
        }
        FieldType::Object { contract } => contract.to_json_schema(),
        FieldType::Record => json!({ "type": "object" }),
    }
}

fn bounded(kind: &str, min: Option<Value>, max: Option<Value>) -> Value {
    let mut map = Map::new();
    map.insert("type".to_string(), json!(kind));
    if let Some(min) = min {
        map.insert("minimum".to_string(), min);
    }
    if let Some(max) = max {
        map.insert("maximum".to_string(), max);
    }
    Value::Object(map)
}
