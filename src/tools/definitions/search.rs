use super::limit;
use crate::schema::{Contract, FieldRule, FieldType};
use crate::tools::catalog::ToolDefinition;
use serde_json::json;

const CATEGORY: &str = "Smart Search & AI";

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new("smart_search", CATEGORY, "Intelligent search across all project data")
            .returns("Ranked results from contexts, decisions, naming, tasks and code")
            .contract(
                Contract::new()
                    .field(FieldRule::required("query", FieldType::text(1, 1000), "Search query"))
                    .field(FieldRule::optional(
                        "scope",
                        FieldType::one_of(&[
                            "contexts",
                            "decisions",
                            "naming",
                            "agents",
                            "tasks",
                            "code",
                            "all",
                        ]),
                        "Data sources to search",
                    ))
                    .field(limit(10, 100)),
            )
            .example(
                "Search everything about caching",
                json!({"query": "redis caching", "scope": "all"}),
            ),
        ToolDefinition::new(
            "get_recommendations",
            CATEGORY,
            "Get AI-powered recommendations for development",
        )
        .returns("Recommendations with rationale and confidence")
        .contract(
            Contract::new()
                .field(FieldRule::required(
                    "context",
                    FieldType::string().max_len(2000),
                    "Description of the current work",
                ))
                .field(FieldRule::optional(
                    "type",
                    FieldType::one_of(&["naming", "implementation", "architecture", "testing"]),
                    "Recommendation type",
                )),
        )
        .example(
            "Ask for testing advice",
            json!({"context": "Adding integration tests for the payment service", "type": "testing"}),
        ),
    ]
}
