//! Discovery tools that answer from the catalog itself.
//!
//! `aidis_help`, `aidis_explain` and `aidis_examples` never touch an external
//! collaborator. Each response carries structured fields plus a rendered
//! `text` block for clients that only display text.

use super::catalog::{ToolCatalog, ToolDefinition};
use crate::dispatch::ToolHandler;
use crate::types::{Error, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::fmt::Write as _;
use std::sync::Arc;

pub const HELP_TOOL: &str = "aidis_help";
pub const EXPLAIN_TOOL: &str = "aidis_explain";
pub const EXAMPLES_TOOL: &str = "aidis_examples";
pub const PING_TOOL: &str = "aidis_ping";

/// Handlers the dispatcher binds without being asked.
pub fn builtin_handlers(catalog: &Arc<ToolCatalog>) -> Vec<(&'static str, Arc<dyn ToolHandler>)> {
    vec![
        (HELP_TOOL, Arc::new(HelpTool::new(catalog.clone())) as Arc<dyn ToolHandler>),
        (EXPLAIN_TOOL, Arc::new(ExplainTool::new(catalog.clone()))),
        (EXAMPLES_TOOL, Arc::new(ExamplesTool::new(catalog.clone()))),
        (PING_TOOL, Arc::new(PingTool)),
    ]
}

fn requested_tool(args: &Value) -> Result<String> {
    args.get("toolName")
        .and_then(Value::as_str)
        .map(|name| name.trim().to_lowercase())
        .ok_or_else(|| Error::validation("toolName is required"))
}

fn not_found(name: &str) -> Error {
    Error::not_found(format!(
        "Tool \"{}\" not found. Use '{}' to see all available tools.",
        name, HELP_TOOL
    ))
}

// =============================================================================
// aidis_help
// =============================================================================

#[derive(Debug, Clone)]
pub struct HelpTool {
    catalog: Arc<ToolCatalog>,
}

impl HelpTool {
    pub fn new(catalog: Arc<ToolCatalog>) -> Self {
        Self { catalog }
    }

    fn quick_start() -> Vec<String> {
        vec![
            format!("{} <toolName> - detailed help for any tool", EXPLAIN_TOOL),
            format!("{} <toolName> - usage examples", EXAMPLES_TOOL),
            format!("{} - test connectivity", PING_TOOL),
            "project_current - check the active project".to_string(),
        ]
    }

    pub fn render(&self) -> Value {
        let groups = self.catalog.by_category();
        let mut text = String::from("AIDIS - AI Development Intelligence System\n\n");
        let _ = writeln!(
            text,
            "{} tools available across {} categories:\n",
            self.catalog.len(),
            groups.len()
        );

        let mut categories = Vec::with_capacity(groups.len());
        for (category, tools) in &groups {
            let _ = writeln!(text, "## {} ({} tools)", category, tools.len());
            for tool in tools {
                let _ = writeln!(text, "- {}: {}", tool.name, tool.description);
            }
            text.push('\n');

            categories.push(json!({
                "name": category,
                "toolCount": tools.len(),
                "tools": tools
                    .iter()
                    .map(|t| json!({ "name": t.name, "description": t.description }))
                    .collect::<Vec<_>>(),
            }));
        }

        let quick_start = Self::quick_start();
        text.push_str("Quick start:\n");
        for line in &quick_start {
            let _ = writeln!(text, "- {}", line);
        }

        json!({
            "totalTools": self.catalog.len(),
            "categories": categories,
            "quickStart": quick_start,
            "text": text,
        })
    }
}

#[async_trait]
impl ToolHandler for HelpTool {
    async fn call(&self, _args: Value) -> Result<Value> {
        Ok(self.render())
    }
}

// =============================================================================
// aidis_explain
// =============================================================================

#[derive(Debug, Clone)]
pub struct ExplainTool {
    catalog: Arc<ToolCatalog>,
}

impl ExplainTool {
    pub fn new(catalog: Arc<ToolCatalog>) -> Self {
        Self { catalog }
    }

    pub fn explain(&self, name: &str) -> Result<Value> {
        let definition = self.catalog.get(name).ok_or_else(|| not_found(name))?;
        let parameters = definition.parameter_docs();

        let mut text = format!("{}\n\n", definition.name);
        let _ = writeln!(text, "Category: {}", definition.category);
        let _ = writeln!(text, "Purpose: {}", definition.description);
        let _ = writeln!(text, "Signature: {}\n", definition.signature());
        if parameters.is_empty() {
            text.push_str("Parameters: none\n\n");
        } else {
            text.push_str("Parameters:\n");
            for p in &parameters {
                let requirement = if p.required { "required" } else { "optional" };
                let _ = writeln!(
                    text,
                    "- {} ({}, {}): {}",
                    p.name, p.type_name, requirement, p.description
                );
            }
            text.push('\n');
        }
        if let Some(consolidation) = consolidation_text(definition) {
            text.push_str(&consolidation);
        }
        if !definition.returns.is_empty() {
            let _ = writeln!(text, "Returns: {}\n", definition.returns);
        }
        let _ = write!(
            text,
            "Tip: use {} {} to see usage examples.",
            EXAMPLES_TOOL, definition.name
        );

        let mut out = json!({
            "toolName": definition.name,
            "category": definition.category,
            "description": definition.description,
            "signature": definition.signature(),
            "parameters": parameters,
            "returns": definition.returns,
            "text": text,
        });
        if let Some(variant) = definition.variant() {
            out["consolidation"] = json!({
                "discriminant": variant.discriminant,
                "phase": variant.phase,
                "branches": variant
                    .branches
                    .values()
                    .map(|b| json!({
                        "value": b.value,
                        "description": b.description,
                        "replaces": b.replaces,
                    }))
                    .collect::<Vec<_>>(),
            });
        }
        Ok(out)
    }
}

fn consolidation_text(definition: &ToolDefinition) -> Option<String> {
    let variant = definition.variant()?;
    let mut text = format!("Modes (select with '{}'):\n", variant.discriminant);
    for branch in variant.branches.values() {
        let _ = writeln!(
            text,
            "- {}: {} (replaces {})",
            branch.value,
            branch.description,
            branch.replaces.join(", ")
        );
    }
    text.push('\n');
    Some(text)
}

#[async_trait]
impl ToolHandler for ExplainTool {
    async fn call(&self, args: Value) -> Result<Value> {
        let name = requested_tool(&args)?;
        self.explain(&name)
    }
}

// =============================================================================
// aidis_examples
// =============================================================================

#[derive(Debug, Clone)]
pub struct ExamplesTool {
    catalog: Arc<ToolCatalog>,
}

impl ExamplesTool {
    pub fn new(catalog: Arc<ToolCatalog>) -> Self {
        Self { catalog }
    }

    pub fn examples(&self, name: &str) -> Result<Value> {
        let Some(definition) = self.catalog.get(name) else {
            return Err(Error::not_found(format!(
                "Tool \"{}\" not found. Available tools: {}. Use '{}' to see all tools organized by category.",
                name,
                self.catalog.names().join(", "),
                HELP_TOOL
            )));
        };

        if definition.examples.is_empty() {
            let message = format!(
                "No examples available yet for \"{}\". Use {} {} for parameter documentation.",
                definition.name, EXPLAIN_TOOL, definition.name
            );
            return Ok(json!({
                "toolName": definition.name,
                "examples": [],
                "message": message,
                "text": message,
            }));
        }

        let mut text = format!("Examples for {}\n\n", definition.name);
        let mut examples = Vec::with_capacity(definition.examples.len());
        for (i, example) in definition.examples.iter().enumerate() {
            let call = example.render(&definition.name);
            let _ = writeln!(text, "{}. {}\n{}\n", i + 1, example.title, call);
            examples.push(json!({
                "title": example.title,
                "args": example.args,
                "call": call,
            }));
        }
        let _ = write!(
            text,
            "Use {} {} for complete parameter documentation.",
            EXPLAIN_TOOL, definition.name
        );

        Ok(json!({
            "toolName": definition.name,
            "examples": examples,
            "text": text,
        }))
    }
}

#[async_trait]
impl ToolHandler for ExamplesTool {
    async fn call(&self, args: Value) -> Result<Value> {
        let name = requested_tool(&args)?;
        self.examples(&name)
    }
}

// =============================================================================
// aidis_ping
// =============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct PingTool;

#[async_trait]
impl ToolHandler for PingTool {
    async fn call(&self, args: Value) -> Result<Value> {
        let message = args
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Hello AIDIS!");
        Ok(json!({
            "message": format!("AIDIS Pong! {}", message),
            "status": "operational",
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorKind;
    use pretty_assertions::assert_eq;

    fn catalog() -> Arc<ToolCatalog> {
        Arc::new(ToolCatalog::standard().unwrap())
    }

    #[tokio::test]
    async fn test_help_counts_every_tool() {
        let help = HelpTool::new(catalog()).call(json!({})).await.unwrap();
        assert_eq!(help["totalTools"], 41);

        let categories = help["categories"].as_array().unwrap();
        assert_eq!(categories.len(), 10);
        assert_eq!(categories[0]["name"], "System & Navigation");
        let listed: u64 = categories.iter().map(|c| c["toolCount"].as_u64().unwrap()).sum();
        assert_eq!(listed, 41);
        assert!(help["text"].as_str().unwrap().contains("## Task Management (6 tools)"));
    }

    #[tokio::test]
    async fn test_explain_lists_parameters_from_contract() {
        let out = ExplainTool::new(catalog())
            .call(json!({"toolName": "context_search"}))
            .await
            .unwrap();

        assert_eq!(out["category"], "Context Management");
        let params = out["parameters"].as_array().unwrap();
        let query = params.iter().find(|p| p["name"] == "query").unwrap();
        assert_eq!(query["required"], true);
        assert_eq!(query["type"], "string");
        let limit = params.iter().find(|p| p["name"] == "limit").unwrap();
        assert_eq!(limit["required"], false);
        assert!(limit["description"].as_str().unwrap().ends_with("(default: 10)"));
        assert!(out.get("consolidation").is_none());
    }

    #[tokio::test]
    async fn test_explain_is_case_insensitive() {
        let out = ExplainTool::new(catalog())
            .call(json!({"toolName": "Task_Create"}))
            .await
            .unwrap();
        assert_eq!(out["toolName"], "task_create");
    }

    #[tokio::test]
    async fn test_explain_consolidated_lists_modes() {
        let out = ExplainTool::new(catalog())
            .call(json!({"toolName": "pattern_insights"}))
            .await
            .unwrap();
        assert_eq!(out["consolidation"]["discriminant"], "type");
        assert_eq!(out["consolidation"]["branches"].as_array().unwrap().len(), 7);
        assert!(out["text"].as_str().unwrap().contains("replaces pattern_get_alerts"));
    }

    #[tokio::test]
    async fn test_explain_unknown_points_to_help() {
        let err = ExplainTool::new(catalog())
            .call(json!({"toolName": "context_serch"}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.message().contains(HELP_TOOL));
    }

    #[tokio::test]
    async fn test_examples_known_tool() {
        let out = ExamplesTool::new(catalog())
            .call(json!({"toolName": "context_store"}))
            .await
            .unwrap();
        let examples = out["examples"].as_array().unwrap();
        assert_eq!(examples.len(), 3);
        assert!(examples[0]["call"].as_str().unwrap().starts_with("context_store({"));
    }

    #[tokio::test]
    async fn test_examples_undocumented_tool_is_not_an_error() {
        let out = ExamplesTool::new(catalog())
            .call(json!({"toolName": "decision_stats"}))
            .await
            .unwrap();
        assert_eq!(out["examples"], json!([]));
        assert!(out["message"].as_str().unwrap().starts_with("No examples available yet"));
    }

    #[tokio::test]
    async fn test_examples_unknown_tool_lists_available() {
        let err = ExamplesTool::new(catalog())
            .call(json!({"toolName": "nope"}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.message().contains("context_search"));
    }

    #[tokio::test]
    async fn test_ping_uses_message() {
        let out = PingTool.call(json!({"message": "hi"})).await.unwrap();
        assert_eq!(out["message"], "AIDIS Pong! hi");
        assert_eq!(out["status"], "operational");
    }
}
