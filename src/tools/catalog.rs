//! Tool catalog: typed definitions, derived parameter docs, validation.
//!
//! Owns tool *definitions*, not implementations; handlers are bound by the
//! dispatcher. Each definition carries exactly one contract; parameter docs
//! and the advertised JSON Schema are derived from it, never maintained by hand.

use crate::schema::{validate_contract, Contract, ValidationResult, VariantRule};
use crate::types::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Documentation types
// =============================================================================

/// Parameter documentation, derived from a contract field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDoc {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub required: bool,
    pub description: String,
}

/// A stored usage example. `args` must satisfy the tool's own contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolExample {
    pub title: String,
    pub args: Value,
}

impl ToolExample {
    pub fn new(title: &str, args: Value) -> Self {
        Self {
            title: title.to_string(),
            args,
        }
    }

    /// Render as a call expression, e.g. `context_stats()`.
    pub fn render(&self, tool_name: &str) -> String {
        let empty = self.args.as_object().map_or(true, |m| m.is_empty());
        if empty {
            return format!("{}()", tool_name);
        }
        let body = serde_json::to_string_pretty(&self.args).unwrap_or_else(|_| self.args.to_string());
        format!("{}({})", tool_name, body)
    }
}

// =============================================================================
// Tool definition
// =============================================================================

/// Complete definition of one tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub category: String,
    pub description: String,
    pub returns: String,
    pub contract: Contract,
    pub examples: Vec<ToolExample>,
}

impl ToolDefinition {
    pub fn new(name: &str, category: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            category: category.to_string(),
            description: description.to_string(),
            returns: String::new(),
            contract: Contract::new(),
            examples: Vec::new(),
        }
    }

    pub fn returns(mut self, returns: &str) -> Self {
        self.returns = returns.to_string();
        self
    }

    pub fn contract(mut self, contract: Contract) -> Self {
        self.contract = contract;
        self
    }

    pub fn example(mut self, title: &str, args: Value) -> Self {
        self.examples.push(ToolExample::new(title, args));
        self
    }

    /// Consolidated sub-dispatch, if this tool fronts several legacy operations.
    pub fn variant(&self) -> Option<&VariantRule> {
        self.contract.variant.as_ref()
    }

    pub fn is_consolidated(&self) -> bool {
        self.contract.variant.is_some()
    }

    /// Parameter list derived from the contract.
    pub fn parameter_docs(&self) -> Vec<ParameterDoc> {
        self.contract
            .fields
            .values()
            .map(|rule| ParameterDoc {
                name: rule.name.clone(),
                type_name: rule.field_type.display_name(),
                required: rule.required,
                description: rule.doc_description(),
            })
            .collect()
    }

    /// Compact signature line.
    ///
    /// Format: `tool_name(param1: type, param2?: type)`
    pub fn signature(&self) -> String {
        let params: Vec<String> = self
            .contract
            .fields
            .values()
            .map(|p| {
                let optional = if p.required { "" } else { "?" };
                format!("{}{}: {}", p.name, optional, p.field_type.display_name())
            })
            .collect();

        format!("{}({})", self.name, params.join(", "))
    }
}

// =============================================================================
// Tool catalog
// =============================================================================

/// Immutable-after-startup registry of tool definitions.
///
/// Keeps registration order so discovery output groups categories in the
/// order they were declared.
#[derive(Debug, Default)]
pub struct ToolCatalog {
    entries: IndexMap<String, ToolDefinition>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// The full AIDIS tool surface.
    pub fn standard() -> Result<Self> {
        let mut catalog = Self::new();
        for definition in super::definitions::all() {
            catalog.register(definition)?;
        }
        Ok(catalog)
    }

    /// Register a tool definition. Names must be unique and non-empty.
    pub fn register(&mut self, definition: ToolDefinition) -> Result<()> {
        if definition.name.is_empty() {
            return Err(Error::internal("Tool name cannot be empty"));
        }
        if self.entries.contains_key(&definition.name) {
            return Err(Error::internal(format!(
                "Tool '{}' is registered twice",
                definition.name
            )));
        }
        self.entries.insert(definition.name.clone(), definition);
        Ok(())
    }

    /// Get a tool definition by name.
    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.entries.get(name)
    }

    /// Check if a tool exists.
    pub fn has_tool(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Tool names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Tool definitions in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.entries.values()
    }

    /// Definitions grouped by category, categories in first-seen order.
    pub fn by_category(&self) -> IndexMap<&str, Vec<&ToolDefinition>> {
        let mut groups: IndexMap<&str, Vec<&ToolDefinition>> = IndexMap::new();
        for definition in self.entries.values() {
            groups
                .entry(definition.category.as_str())
                .or_default()
                .push(definition);
        }
        groups
    }

    /// Validate raw arguments against a tool's contract.
    ///
    /// A missing contract is a configuration defect (`Internal`), distinct
    /// from the caller-facing not-found raised for unknown tool names.
    pub fn validate(&self, name: &str, raw: &Value) -> Result<ValidationResult> {
        let definition = self
            .entries
            .get(name)
            .ok_or_else(|| Error::internal(format!("No contract registered for tool: {}", name)))?;
        Ok(validate_contract(&definition.contract, raw))
    }

    /// MCP-style tool listing: name, description, inputSchema.
    pub fn tool_listing(&self) -> Vec<Value> {
        self.entries
            .values()
            .map(|d| {
                serde_json::json!({
                    "name": d.name,
                    "description": d.description,
                    "inputSchema": d.contract.to_json_schema(),
                })
            })
            .collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
