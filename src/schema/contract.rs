//! Declarative input contracts.
//!
//! A [`Contract`] is the single definition of a tool's input: the validator
//! walks it, the catalog derives parameter docs from it, and the JSON Schema
//! exporter renders it. Contracts are built once at startup and never mutated.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

// =============================================================================
// Field types
// =============================================================================

/// Extra constraint on string contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StringFormat {
    Uuid,
    DateTime,
}

/// Type of a single field, including its bounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldType {
    String {
        min_len: Option<usize>,
        max_len: Option<usize>,
        format: Option<StringFormat>,
    },
    Integer {
        min: Option<i64>,
        max: Option<i64>,
    },
    Number {
        min: Option<f64>,
        max: Option<f64>,
    },
    /// `coerce_strings` accepts the literals `"true"` / `"false"`.
    Boolean {
        coerce_strings: bool,
    },
    Enum {
        values: Vec<String>,
    },
    Array {
        items: Box<FieldType>,
        min_items: Option<usize>,
        max_items: Option<usize>,
    },
    Object {
        contract: Box<Contract>,
    },
    /// Free-form JSON object.
    Record,
}

impl FieldType {
    pub fn string() -> Self {
        FieldType::String {
            min_len: None,
            max_len: None,
            format: None,
        }
    }

    /// String with inclusive character-count bounds.
    pub fn text(min_len: usize, max_len: usize) -> Self {
        FieldType::String {
            min_len: Some(min_len),
            max_len: Some(max_len),
            format: None,
        }
    }

    pub fn uuid() -> Self {
        FieldType::String {
            min_len: None,
            max_len: None,
            format: Some(StringFormat::Uuid),
        }
    }

    pub fn date_time() -> Self {
        FieldType::String {
            min_len: None,
            max_len: None,
            format: Some(StringFormat::DateTime),
        }
    }

    pub fn integer() -> Self {
        FieldType::Integer {
            min: None,
            max: None,
        }
    }

    pub fn int_range(min: i64, max: i64) -> Self {
        FieldType::Integer {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn number() -> Self {
        FieldType::Number {
            min: None,
            max: None,
        }
    }

    pub fn number_range(min: f64, max: f64) -> Self {
        FieldType::Number {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn boolean() -> Self {
        FieldType::Boolean {
            coerce_strings: false,
        }
    }

    /// Boolean that also accepts `"true"` / `"false"` strings.
    pub fn loose_boolean() -> Self {
        FieldType::Boolean {
            coerce_strings: true,
        }
    }

    pub fn one_of(values: &[&str]) -> Self {
        FieldType::Enum {
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn array_of(items: FieldType) -> Self {
        FieldType::Array {
            items: Box::new(items),
            min_items: None,
            max_items: None,
        }
    }

    pub fn object(contract: Contract) -> Self {
        FieldType::Object {
            contract: Box::new(contract),
        }
    }

    pub fn record() -> Self {
        FieldType::Record
    }

    /// Set a minimum length (strings) or item count (arrays).
    pub fn min_len(self, n: usize) -> Self {
        match self {
            FieldType::String { max_len, format, .. } => FieldType::String {
                min_len: Some(n),
                max_len,
                format,
            },
            FieldType::Array { items, max_items, .. } => FieldType::Array {
                items,
                min_items: Some(n),
                max_items,
            },
            other => other,
        }
    }

    /// Set a maximum length (strings) or item count (arrays).
    pub fn max_len(self, n: usize) -> Self {
        match self {
            FieldType::String { min_len, format, .. } => FieldType::String {
                min_len,
                max_len: Some(n),
                format,
            },
            FieldType::Array { items, min_items, .. } => FieldType::Array {
                items,
                min_items,
                max_items: Some(n),
            },
            other => other,
        }
    }

    /// Set an inclusive lower bound on a numeric type.
    pub fn at_least(self, n: i64) -> Self {
        match self {
            FieldType::Integer { max, .. } => FieldType::Integer { min: Some(n), max },
            FieldType::Number { max, .. } => FieldType::Number {
                min: Some(n as f64),
                max,
            },
            other => other,
        }
    }

    /// Human-readable type name for parameter docs.
    pub fn display_name(&self) -> String {
        match self {
            FieldType::String {
                format: Some(StringFormat::Uuid),
                ..
            } => "string(uuid)".to_string(),
            FieldType::String {
                format: Some(StringFormat::DateTime),
                ..
            } => "string(date-time)".to_string(),
            FieldType::String { .. } => "string".to_string(),
            FieldType::Integer { .. } => "integer".to_string(),
            FieldType::Number { .. } => "number".to_string(),
            FieldType::Boolean { .. } => "boolean".to_string(),
            FieldType::Enum { values } => format!("enum({})", values.join("|")),
            FieldType::Array { items, .. } => format!("{}[]", items.display_name()),
            FieldType::Object { .. } | FieldType::Record => "object".to_string(),
        }
    }

    /// Enumeration values, if this is an enum.
    pub fn enum_values(&self) -> Option<&[String]> {
        match self {
            FieldType::Enum { values } => Some(values),
            _ => None,
        }
    }
}

// =============================================================================
// Field rules
// =============================================================================

/// One field of a contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldRule {
    pub name: String,
    pub field_type: FieldType,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    pub description: String,
}

impl FieldRule {
    pub fn required(name: &str, field_type: FieldType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            required: true,
            default: None,
            description: description.to_string(),
        }
    }

    pub fn optional(name: &str, field_type: FieldType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            required: false,
            default: None,
            description: description.to_string(),
        }
    }

    /// Attach a default. A defaulted field is never required.
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self.required = false;
        self
    }

    /// Parameter description with the default appended, as shown by `explain`.
    pub fn doc_description(&self) -> String {
        match &self.default {
            Some(default) => format!("{} (default: {})", self.description, default),
            None => self.description.clone(),
        }
    }
}

// =============================================================================
// Consolidated variants
// =============================================================================

/// Restricts a sibling field's values while a particular branch is selected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldRestriction {
    pub field: String,
    pub allowed: Vec<String>,
}

/// One discriminant value of a consolidated tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchRule {
    pub value: String,
    pub description: String,
    /// Contract for the options object when this branch is selected.
    pub options: Contract,
    pub restrictions: Vec<FieldRestriction>,
    /// Legacy tool names this branch replaces.
    pub replaces: Vec<String>,
}

impl BranchRule {
    pub fn new(value: &str, description: &str, replaces: &[&str]) -> Self {
        Self {
            value: value.to_string(),
            description: description.to_string(),
            options: Contract::passthrough(),
            restrictions: Vec::new(),
            replaces: replaces.iter().map(|r| r.to_string()).collect(),
        }
    }

    pub fn options(mut self, options: Contract) -> Self {
        self.options = options;
        self
    }

    pub fn restrict(mut self, field: &str, allowed: &[&str]) -> Self {
        self.restrictions.push(FieldRestriction {
            field: field.to_string(),
            allowed: allowed.iter().map(|a| a.to_string()).collect(),
        });
        self
    }
}

/// Discriminated sub-dispatch declared by a consolidated tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantRule {
    pub discriminant: String,
    pub options_field: String,
    /// Migration batch reported in `consolidationInfo`.
    pub phase: String,
    pub branches: IndexMap<String, BranchRule>,
}

impl VariantRule {
    pub fn new(discriminant: &str, phase: &str) -> Self {
        Self {
            discriminant: discriminant.to_string(),
            options_field: "options".to_string(),
            phase: phase.to_string(),
            branches: IndexMap::new(),
        }
    }

    pub fn branch(mut self, branch: BranchRule) -> Self {
        self.branches.insert(branch.value.clone(), branch);
        self
    }

    /// Valid discriminant values, in declaration order.
    pub fn values(&self) -> Vec<&str> {
        self.branches.keys().map(String::as_str).collect()
    }

    pub fn get(&self, value: &str) -> Option<&BranchRule> {
        self.branches.get(value)
    }
}

// =============================================================================
// Contract
// =============================================================================

/// Treatment of fields a contract does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownFields {
    /// Dropped from the normalized arguments.
    Strip,
    /// Forwarded unchanged.
    Allow,
    /// Reported as field errors.
    Reject,
}

/// Ordered set of field rules for one tool or one consolidated branch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contract {
    pub fields: IndexMap<String, FieldRule>,
    pub unknown_fields: UnknownFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<VariantRule>,
}

impl Default for Contract {
    fn default() -> Self {
        Self::new()
    }
}

impl Contract {
    /// Empty contract that strips undeclared fields.
    pub fn new() -> Self {
        Self {
            fields: IndexMap::new(),
            unknown_fields: UnknownFields::Strip,
            variant: None,
        }
    }

    /// Empty contract that forwards undeclared fields.
    pub fn passthrough() -> Self {
        Self {
            unknown_fields: UnknownFields::Allow,
            ..Self::new()
        }
    }

    pub fn field(mut self, rule: FieldRule) -> Self {
        self.fields.insert(rule.name.clone(), rule);
        self
    }

    pub fn unknown_fields(mut self, policy: UnknownFields) -> Self {
        self.unknown_fields = policy;
        self
    }

    /// Contract for a consolidated tool.
    ///
    /// The discriminant becomes a required enum over the branch values and
    /// the options field an object defaulting to `{}`; `extra` fields are
    /// declared between them.
    pub fn consolidated(variant: VariantRule, discriminant_doc: &str, extra: Vec<FieldRule>) -> Self {
        let values: Vec<&str> = variant.values();
        let mut contract = Contract::new().field(FieldRule::required(
            &variant.discriminant,
            FieldType::one_of(&values),
            discriminant_doc,
        ));
        for rule in extra {
            contract = contract.field(rule);
        }
        let options_field = variant.options_field.clone();
        contract = contract.field(
            FieldRule::optional(
                &options_field,
                FieldType::record(),
                "Branch-specific options",
            )
            .default_value(Value::Object(serde_json::Map::new())),
        );
        contract.variant = Some(variant);
        contract
    }

    pub fn get(&self, name: &str) -> Option<&FieldRule> {
        self.fields.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldRule> {
        self.fields.values().filter(|f| f.required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_names() {
        assert_eq!(FieldType::string().display_name(), "string");
        assert_eq!(FieldType::uuid().display_name(), "string(uuid)");
        assert_eq!(
            FieldType::array_of(FieldType::text(0, 50)).display_name(),
            "string[]"
        );
        assert_eq!(
            FieldType::one_of(&["asc", "desc"]).display_name(),
            "enum(asc|desc)"
        );
    }

    #[test]
    fn test_modifiers_apply_to_matching_kind() {
        let tags = FieldType::array_of(FieldType::string()).max_len(20);
        assert!(matches!(
            tags,
            FieldType::Array {
                max_items: Some(20),
                ..
            }
        ));

        let unchanged = FieldType::boolean().max_len(3);
        assert_eq!(unchanged, FieldType::boolean());

        let offset = FieldType::integer().at_least(0);
        assert_eq!(offset, FieldType::Integer { min: Some(0), max: None });
    }

    #[test]
    fn test_default_makes_field_optional() {
        let rule = FieldRule::required("limit", FieldType::int_range(1, 100), "Max results")
            .default_value(json!(10));
        assert!(!rule.required);
        assert_eq!(rule.doc_description(), "Max results (default: 10)");
    }

    #[test]
    fn test_consolidated_contract_layout() {
        let variant = VariantRule::new("type", "phase-3")
            .branch(BranchRule::new("alerts", "Alerts", &["pattern_get_alerts"]))
            .branch(BranchRule::new("trends", "Trends", &["pattern_get_trends"]));
        let contract = Contract::consolidated(
            variant,
            "Insight type",
            vec![FieldRule::optional("scope", FieldType::string(), "Scope")],
        );

        let names: Vec<&str> = contract.fields.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["type", "scope", "options"]);

        let discriminant = contract.get("type").unwrap();
        assert!(discriminant.required);
        assert_eq!(
            discriminant.field_type.enum_values().unwrap(),
            &["alerts".to_string(), "trends".to_string()]
        );
        assert_eq!(contract.get("options").unwrap().default, Some(json!({})));
        assert_eq!(contract.variant.as_ref().unwrap().values(), vec!["alerts", "trends"]);
    }
}
