use crate::schema::{Contract, FieldRule, FieldType};
use crate::tools::catalog::ToolDefinition;
use serde_json::json;

const CATEGORY: &str = "System & Navigation";

fn tool_name_contract() -> Contract {
    Contract::new().field(FieldRule::required(
        "toolName",
        FieldType::text(1, 100),
        "Name of the tool to look up",
    ))
}

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new("aidis_ping", CATEGORY, "Test connectivity to AIDIS server")
            .returns("Pong response with timestamp and status")
            .contract(
                Contract::new().field(
                    FieldRule::optional("message", FieldType::string().max_len(500), "Optional test message")
                        .default_value(json!("Hello AIDIS!")),
                ),
            )
            .example("Test basic connectivity", json!({}))
            .example(
                "Test with custom message",
                json!({"message": "Health check from agent"}),
            ),
        ToolDefinition::new(
            "aidis_status",
            CATEGORY,
            "Get server status and health information",
        )
        .returns("Server health report with version, uptime, database status, memory usage")
        .example("Get server health report", json!({})),
        ToolDefinition::new(
            "aidis_help",
            CATEGORY,
            "List all tools grouped by category with a quick-start guide",
        )
        .returns("Categorized tool listing, tool count and quick-start guide")
        .example("Show every tool", json!({})),
        ToolDefinition::new(
            "aidis_explain",
            CATEGORY,
            "Get detailed documentation for a specific tool",
        )
        .returns("Category, description, parameter list and return-value summary")
        .contract(tool_name_contract())
        .example("Explain context search", json!({"toolName": "context_search"})),
        ToolDefinition::new("aidis_examples", CATEGORY, "Get usage examples for a specific tool")
            .returns("Stored usage examples for the tool")
            .contract(tool_name_contract())
            .example("Examples for task creation", json!({"toolName": "task_create"})),
    ]
}
