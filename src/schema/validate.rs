//! Contract validation.
//!
//! Walks a [`Contract`] depth-first over raw arguments, collecting one
//! [`FieldError`] per problem instead of stopping at the first. On success
//! the returned map holds normalized arguments: defaults applied, loose
//! booleans coerced, undeclared fields stripped (unless the contract allows
//! them). Pure function of `(contract, raw)`.

use super::contract::{Contract, FieldType, StringFormat, UnknownFields, VariantRule};
use crate::types::Error;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// One offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Dotted path, with `[i]` for array items (e.g. `options.severity[0]`).
    pub path: String,
    pub message: String,
}

impl FieldError {
    fn new(path: &str, message: impl Into<String>) -> Self {
        let path = if path.is_empty() { "(root)" } else { path };
        Self {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every field error produced by one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    pub errors: Vec<FieldError>,
}

impl ValidationFailure {
    /// Caller-facing validation error naming the tool and every field.
    pub fn into_error(self, tool_name: &str) -> Error {
        Error::validation(format!("Validation failed for {}: {}", tool_name, self))
    }

    pub fn paths(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.path.as_str()).collect()
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join(", "))
    }
}

/// Normalized arguments, or every field error found.
pub type ValidationResult = std::result::Result<Map<String, Value>, ValidationFailure>;

/// Validate raw arguments against a contract.
///
/// `null` raw arguments are treated as an empty object.
pub fn validate_contract(contract: &Contract, raw: &Value) -> ValidationResult {
    let mut errors = Vec::new();
    let normalized = walk_object(contract, raw, "", &mut errors);
    if errors.is_empty() {
        Ok(normalized)
    } else {
        Err(ValidationFailure { errors })
    }
}

fn is_whole(num: &serde_json::Number) -> bool {
    num.as_u64().is_some() || num.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

pub(crate) fn value_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn walk_object(
    contract: &Contract,
    raw: &Value,
    prefix: &str,
    errors: &mut Vec<FieldError>,
) -> Map<String, Value> {
    let empty = Map::new();
    let input = match raw {
        Value::Object(map) => map,
        Value::Null => &empty,
        other => {
            errors.push(FieldError::new(
                prefix,
                format!("expected object, got {}", value_type_name(other)),
            ));
            return Map::new();
        }
    };

    let mut out = Map::new();

    for rule in contract.fields.values() {
        let path = join_path(prefix, &rule.name);
        match input.get(&rule.name) {
            None | Some(Value::Null) => {
                if let Some(default) = &rule.default {
                    out.insert(rule.name.clone(), default.clone());
                } else if rule.required {
                    let message = match rule.field_type.enum_values() {
                        Some(values) => format!(
                            "required field is missing (expected one of: {})",
                            values.join(", ")
                        ),
                        None => "required field is missing".to_string(),
                    };
                    errors.push(FieldError::new(&path, message));
                }
            }
            Some(value) => {
                if let Some(normalized) = check_value(&rule.field_type, value, &path, errors) {
                    out.insert(rule.name.clone(), normalized);
                }
            }
        }
    }

    for (key, value) in input {
        if contract.fields.contains_key(key) {
            continue;
        }
        match contract.unknown_fields {
            UnknownFields::Strip => {}
            UnknownFields::Allow => {
                out.insert(key.clone(), value.clone());
            }
            UnknownFields::Reject => {
                errors.push(FieldError::new(&join_path(prefix, key), "unknown field"));
            }
        }
    }

    if let Some(variant) = &contract.variant {
        walk_variant(variant, &mut out, prefix, errors);
    }

    out
}

/// Validate the selected branch's options and sibling restrictions.
///
/// Runs only when the discriminant itself passed its enum check.
fn walk_variant(
    variant: &VariantRule,
    out: &mut Map<String, Value>,
    prefix: &str,
    errors: &mut Vec<FieldError>,
) {
    let Some(selected) = out.get(&variant.discriminant).and_then(Value::as_str) else {
        return;
    };
    let Some(branch) = variant.get(selected) else {
        return;
    };

    for restriction in &branch.restrictions {
        if let Some(actual) = out.get(&restriction.field).and_then(Value::as_str) {
            if !restriction.allowed.iter().any(|a| a == actual) {
                errors.push(FieldError::new(
                    &join_path(prefix, &restriction.field),
                    format!(
                        "'{}' is not valid when {} is '{}', expected one of: {}",
                        actual,
                        variant.discriminant,
                        selected,
                        restriction.allowed.join(", ")
                    ),
                ));
            }
        }
    }

    let options_path = join_path(prefix, &variant.options_field);
    let raw_options = out
        .get(&variant.options_field)
        .cloned()
        .unwrap_or(Value::Null);
    let normalized = walk_object(&branch.options, &raw_options, &options_path, errors);
    out.insert(variant.options_field.clone(), Value::Object(normalized));
}

fn check_value(
    field_type: &FieldType,
    value: &Value,
    path: &str,
    errors: &mut Vec<FieldError>,
) -> Option<Value> {
    let mismatch = |expected: &str| {
        FieldError::new(
            path,
            format!("expected {}, got {}", expected, value_type_name(value)),
        )
    };

    match field_type {
        FieldType::String {
            min_len,
            max_len,
            format,
        } => {
            let Some(s) = value.as_str() else {
                errors.push(mismatch("string"));
                return None;
            };
            let len = s.chars().count();
            let before = errors.len();
            if let Some(min) = min_len {
                if len < *min {
                    errors.push(FieldError::new(
                        path,
                        format!("must contain at least {} character(s), got {}", min, len),
                    ));
                }
            }
            if let Some(max) = max_len {
                if len > *max {
                    errors.push(FieldError::new(
                        path,
                        format!("must contain at most {} character(s), got {}", max, len),
                    ));
                }
            }
            match format {
                Some(StringFormat::Uuid) if uuid::Uuid::parse_str(s).is_err() => {
                    errors.push(FieldError::new(path, format!("'{}' is not a valid UUID", s)));
                }
                Some(StringFormat::DateTime) if chrono::DateTime::parse_from_rfc3339(s).is_err() => {
                    errors.push(FieldError::new(
                        path,
                        format!("'{}' is not an RFC 3339 date-time", s),
                    ));
                }
                _ => {}
            }
            (errors.len() == before).then(|| value.clone())
        }

        FieldType::Integer { min, max } => {
            let n = match value {
                Value::Number(num) => num.as_i64().or_else(|| {
                    num.as_f64()
                        .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                        .map(|f| f as i64)
                }),
                _ => None,
            };
            let Some(n) = n else {
                errors.push(match value {
                    // Whole numbers outside the i64 range are bounds failures.
                    Value::Number(num) if is_whole(num) => {
                        if num.as_f64().is_some_and(|f| f < 0.0) {
                            let min = min.unwrap_or(i64::MIN);
                            FieldError::new(path, format!("must be >= {}, got {}", min, num))
                        } else {
                            let max = max.unwrap_or(i64::MAX);
                            FieldError::new(path, format!("must be <= {}, got {}", max, num))
                        }
                    }
                    Value::Number(num) => {
                        FieldError::new(path, format!("expected integer, got {}", num))
                    }
                    _ => mismatch("integer"),
                });
                return None;
            };
            let before = errors.len();
            if let Some(min) = min {
                if n < *min {
                    errors.push(FieldError::new(path, format!("must be >= {}, got {}", min, n)));
                }
            }
            if let Some(max) = max {
                if n > *max {
                    errors.push(FieldError::new(path, format!("must be <= {}, got {}", max, n)));
                }
            }
            (errors.len() == before).then(|| Value::from(n))
        }

        FieldType::Number { min, max } => {
            let Some(n) = value.as_f64() else {
                errors.push(mismatch("number"));
                return None;
            };
            let before = errors.len();
            if let Some(min) = min {
                if n < *min {
                    errors.push(FieldError::new(path, format!("must be >= {}, got {}", min, n)));
                }
            }
            if let Some(max) = max {
                if n > *max {
                    errors.push(FieldError::new(path, format!("must be <= {}, got {}", max, n)));
                }
            }
            (errors.len() == before).then(|| value.clone())
        }

        FieldType::Boolean { coerce_strings } => match value {
            Value::Bool(_) => Some(value.clone()),
            Value::String(s) if *coerce_strings && (s == "true" || s == "false") => {
                Some(Value::Bool(s == "true"))
            }
            Value::String(s) if *coerce_strings => {
                errors.push(FieldError::new(
                    path,
                    format!("expected boolean or \"true\"/\"false\", got '{}'", s),
                ));
                None
            }
            _ => {
                errors.push(mismatch("boolean"));
                None
            }
        },

        FieldType::Enum { values } => {
            let Some(s) = value.as_str() else {
                errors.push(FieldError::new(
                    path,
                    format!(
                        "invalid value {}, expected one of: {}",
                        value,
                        values.join(", ")
                    ),
                ));
                return None;
            };
            if values.iter().any(|v| v == s) {
                Some(value.clone())
            } else {
                errors.push(FieldError::new(
                    path,
                    format!(
                        "invalid value '{}', expected one of: {}",
                        s,
                        values.join(", ")
                    ),
                ));
                None
            }
        }

        FieldType::Array {
            items,
            min_items,
            max_items,
        } => {
            let Some(arr) = value.as_array() else {
                errors.push(mismatch("array"));
                return None;
            };
            let before = errors.len();
            if let Some(min) = min_items {
                if arr.len() < *min {
                    errors.push(FieldError::new(
                        path,
                        format!("must contain at least {} item(s), got {}", min, arr.len()),
                    ));
                }
            }
            if let Some(max) = max_items {
                if arr.len() > *max {
                    errors.push(FieldError::new(
                        path,
                        format!("must contain at most {} item(s), got {}", max, arr.len()),
                    ));
                }
            }
            let normalized: Vec<Value> = arr
                .iter()
                .enumerate()
                .filter_map(|(i, item)| check_value(items, item, &format!("{}[{}]", path, i), errors))
                .collect();
            (errors.len() == before).then_some(Value::Array(normalized))
        }

        FieldType::Object { contract } => {
            if !value.is_object() {
                errors.push(mismatch("object"));
                return None;
            }
            let before = errors.len();
            let normalized = walk_object(contract, value, path, errors);
            (errors.len() == before).then_some(Value::Object(normalized))
        }

        FieldType::Record => {
            if value.is_object() {
                Some(value.clone())
            } else {
                errors.push(mismatch("object"));
                None
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::contract::{BranchRule, FieldRule};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    fn search_contract() -> Contract {
        Contract::new()
            .field(FieldRule::required("query", FieldType::text(1, 1000), "Search query"))
            .field(FieldRule::optional(
                "type",
                FieldType::one_of(&["code", "decision", "error"]),
                "Context type",
            ))
            .field(FieldRule::optional(
                "tags",
                FieldType::array_of(FieldType::string().max_len(50)).max_len(3),
                "Tags",
            ))
            .field(
                FieldRule::optional("limit", FieldType::int_range(1, 100), "Max results")
                    .default_value(json!(10)),
            )
            .field(FieldRule::optional(
                "minSimilarity",
                FieldType::number_range(0.0, 100.0),
                "Minimum similarity",
            ))
    }

    #[test]
    fn test_valid_args_get_defaults() {
        let args = validate_contract(&search_contract(), &json!({"query": "auth"})).unwrap();
        assert_eq!(Value::Object(args), json!({"query": "auth", "limit": 10}));
    }

    #[test]
    fn test_null_args_treated_as_empty_object() {
        let contract = Contract::new().field(
            FieldRule::optional("message", FieldType::string(), "Message")
                .default_value(json!("Hello AIDIS!")),
        );
        let args = validate_contract(&contract, &Value::Null).unwrap();
        assert_eq!(args["message"], "Hello AIDIS!");
    }

    #[test]
    fn test_non_object_root_fails() {
        let failure = validate_contract(&search_contract(), &json!([1, 2])).unwrap_err();
        assert_eq!(failure.errors[0].path, "(root)");
        assert!(failure.errors[0].message.contains("expected object, got array"));
    }

    #[test]
    fn test_errors_are_collected_not_short_circuited() {
        let raw = json!({
            "type": "bogus",
            "tags": ["a", "b", "c", "d"],
            "limit": 500,
            "minSimilarity": "high",
        });
        let failure = validate_contract(&search_contract(), &raw).unwrap_err();
        assert_eq!(
            failure.paths(),
            vec!["query", "type", "tags", "limit", "minSimilarity"]
        );
        assert!(failure.errors[0].message.contains("required field is missing"));
        assert!(failure.errors[1].message.contains("invalid value 'bogus'"));
        assert!(failure.errors[2].message.contains("at most 3 item(s)"));
        assert!(failure.errors[3].message.contains("must be <= 100"));
        assert!(failure.errors[4].message.contains("expected number, got string"));
    }

    #[test]
    fn test_missing_enum_lists_values() {
        let contract = Contract::new().field(FieldRule::required(
            "type",
            FieldType::one_of(&["alerts", "trends"]),
            "Type",
        ));
        let failure = validate_contract(&contract, &json!({})).unwrap_err();
        assert_eq!(
            failure.errors[0].to_string(),
            "type: required field is missing (expected one of: alerts, trends)"
        );
    }

    #[test]
    fn test_empty_string_under_min_length() {
        let contract =
            Contract::new().field(FieldRule::required("title", FieldType::text(1, 255), "Title"));
        let failure = validate_contract(&contract, &json!({"title": ""})).unwrap_err();
        assert_eq!(failure.paths(), vec!["title"]);
        let err = failure.into_error("task_create");
        assert!(err.to_string().contains("Validation failed for task_create: title:"));
    }

    #[test]
    fn test_string_length_counts_characters() {
        let contract =
            Contract::new().field(FieldRule::required("name", FieldType::text(1, 3), "Name"));
        assert!(validate_contract(&contract, &json!({"name": "日本語"})).is_ok());
        assert!(validate_contract(&contract, &json!({"name": "日本語!"})).is_err());
    }

    #[test]
    fn test_array_item_paths() {
        let contract = Contract::new().field(FieldRule::required(
            "task_ids",
            FieldType::array_of(FieldType::uuid()).min_len(1).max_len(50),
            "Task ids",
        ));
        let raw = json!({"task_ids": ["59823126-9442-45dd-87e7-3dfae691e41f", "nope", 7]});
        let failure = validate_contract(&contract, &raw).unwrap_err();
        assert_eq!(failure.paths(), vec!["task_ids[1]", "task_ids[2]"]);

        let failure = validate_contract(&contract, &json!({"task_ids": []})).unwrap_err();
        assert!(failure.errors[0].message.contains("at least 1 item(s)"));
    }

    #[test]
    fn test_nested_object_paths() {
        let alternative = Contract::new()
            .field(FieldRule::required("name", FieldType::string(), "Name"))
            .field(FieldRule::required("reasonRejected", FieldType::string(), "Why"));
        let contract = Contract::new().field(FieldRule::optional(
            "alternativesConsidered",
            FieldType::array_of(FieldType::object(alternative)),
            "Alternatives",
        ));
        let raw = json!({"alternativesConsidered": [{"name": "a", "reasonRejected": "b"}, {"name": "c"}]});
        let failure = validate_contract(&contract, &raw).unwrap_err();
        assert_eq!(failure.paths(), vec!["alternativesConsidered[1].reasonRejected"]);
    }

    #[test]
    fn test_loose_boolean_coercion() {
        let contract = Contract::new().field(
            FieldRule::optional("includeStats", FieldType::loose_boolean(), "Stats")
                .default_value(json!(false)),
        );
        let args = validate_contract(&contract, &json!({"includeStats": "true"})).unwrap();
        assert_eq!(args["includeStats"], json!(true));
        let args = validate_contract(&contract, &json!({"includeStats": "false"})).unwrap();
        assert_eq!(args["includeStats"], json!(false));
        assert!(validate_contract(&contract, &json!({"includeStats": "yes"})).is_err());

        let strict = Contract::new().field(FieldRule::optional("flag", FieldType::boolean(), "Flag"));
        assert!(validate_contract(&strict, &json!({"flag": "true"})).is_err());
    }

    #[test]
    fn test_integer_accepts_whole_floats_only() {
        let contract = Contract::new().field(FieldRule::required("n", FieldType::integer(), "N"));
        let args = validate_contract(&contract, &json!({"n": 5.0})).unwrap();
        assert_eq!(args["n"], json!(5));
        let failure = validate_contract(&contract, &json!({"n": 1.5})).unwrap_err();
        assert!(failure.errors[0].message.contains("expected integer, got 1.5"));
    }

    #[test]
    fn test_integer_beyond_i64_is_a_bounds_error() {
        let failure = validate_contract(
            &search_contract(),
            &json!({"query": "q", "limit": u64::MAX}),
        )
        .unwrap_err();
        assert_eq!(
            failure.errors[0].message,
            "must be <= 100, got 18446744073709551615"
        );

        let unbounded = Contract::new().field(FieldRule::required("n", FieldType::integer(), "N"));
        let failure = validate_contract(&unbounded, &json!({"n": -1e20})).unwrap_err();
        assert!(failure.errors[0].message.starts_with("must be >= -9223372036854775808"));
    }

    #[test]
    fn test_non_string_enum_value_lists_choices() {
        for bad in [json!(5), json!(true), json!(["code"])] {
            let failure = validate_contract(
                &search_contract(),
                &json!({"query": "q", "type": bad.clone()}),
            )
            .unwrap_err();
            assert_eq!(
                failure.errors[0].message,
                format!("invalid value {}, expected one of: code, decision, error", bad)
            );
        }
    }

    #[test]
    fn test_formats() {
        let contract = Contract::new()
            .field(FieldRule::optional("id", FieldType::uuid(), "Id"))
            .field(FieldRule::optional("since", FieldType::date_time(), "Since"));
        assert!(validate_contract(
            &contract,
            &json!({"id": "59823126-9442-45dd-87e7-3dfae691e41f", "since": "2024-05-01T10:00:00Z"})
        )
        .is_ok());
        let failure =
            validate_contract(&contract, &json!({"id": "x", "since": "yesterday"})).unwrap_err();
        assert_eq!(failure.paths(), vec!["id", "since"]);
    }

    #[test]
    fn test_unknown_field_policies() {
        let base = Contract::new().field(FieldRule::optional("a", FieldType::string(), "A"));
        let raw = json!({"a": "x", "extra": 1});

        let stripped = validate_contract(&base, &raw).unwrap();
        assert!(!stripped.contains_key("extra"));

        let allowed =
            validate_contract(&base.clone().unknown_fields(UnknownFields::Allow), &raw).unwrap();
        assert_eq!(allowed["extra"], json!(1));

        let failure =
            validate_contract(&base.unknown_fields(UnknownFields::Reject), &raw).unwrap_err();
        assert_eq!(failure.errors[0].to_string(), "extra: unknown field");
    }

    fn analyze_contract() -> Contract {
        let variant = VariantRule::new("action", "phase-3")
            .branch(
                BranchRule::new("start", "Start service", &["pattern_detection_start"])
                    .restrict("target", &["service"]),
            )
            .branch(
                BranchRule::new("analyze", "Analyze", &["pattern_analyze_project"])
                    .restrict("target", &["project", "session"])
                    .options(
                        Contract::passthrough().field(
                            FieldRule::optional("limit", FieldType::int_range(1, 10), "Limit")
                                .default_value(json!(5)),
                        ),
                    ),
            );
        Contract::consolidated(
            variant,
            "Action",
            vec![FieldRule::required(
                "target",
                FieldType::one_of(&["project", "session", "service"]),
                "Target",
            )],
        )
    }

    #[test]
    fn test_variant_options_are_validated_with_defaults() {
        let args = validate_contract(
            &analyze_contract(),
            &json!({"action": "analyze", "target": "project", "options": {"extra": true}}),
        )
        .unwrap();
        assert_eq!(args["options"], json!({"limit": 5, "extra": true}));

        let failure = validate_contract(
            &analyze_contract(),
            &json!({"action": "analyze", "target": "project", "options": {"limit": 99}}),
        )
        .unwrap_err();
        assert_eq!(failure.paths(), vec!["options.limit"]);
    }

    #[test]
    fn test_variant_restrictions() {
        let failure = validate_contract(
            &analyze_contract(),
            &json!({"action": "start", "target": "project"}),
        )
        .unwrap_err();
        assert_eq!(
            failure.errors[0].to_string(),
            "target: 'project' is not valid when action is 'start', expected one of: service"
        );
    }

    #[test]
    fn test_invalid_discriminant_skips_branch_validation() {
        let failure = validate_contract(
            &analyze_contract(),
            &json!({"action": "explode", "target": "project", "options": {"limit": 99}}),
        )
        .unwrap_err();
        assert_eq!(failure.paths(), vec!["action"]);
        assert!(failure.errors[0]
            .message
            .contains("invalid value 'explode', expected one of: start, analyze"));
    }

    proptest! {
        #[test]
        fn prop_limit_bounds(limit in -1000i64..1000) {
            let result = validate_contract(&search_contract(), &json!({"query": "q", "limit": limit}));
            prop_assert_eq!(result.is_ok(), (1..=100).contains(&limit));
        }

        #[test]
        fn prop_one_error_per_bad_field(bad_count in 0usize..4) {
            let mut raw = json!({"query": "q"});
            let bad = [("type", json!(1)), ("limit", json!("x")), ("minSimilarity", json!(-1))];
            for (key, value) in bad.iter().take(bad_count) {
                raw[*key] = value.clone();
            }
            match validate_contract(&search_contract(), &raw) {
                Ok(_) => prop_assert_eq!(bad_count, 0),
                Err(failure) => prop_assert_eq!(failure.errors.len(), bad_count),
            }
        }
    }
}
