use super::{limit, metadata, project_id, session_id, tags, CONTEXT_TYPES};
use crate::schema::{Contract, FieldRule, FieldType};
use crate::tools::catalog::ToolDefinition;
use serde_json::json;

const CATEGORY: &str = "Context Management";

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "context_store",
            CATEGORY,
            "Store development context with automatic embedding",
        )
        .returns("Stored context with generated ID, timestamp, and searchable embedding")
        .contract(
            Contract::new()
                .field(FieldRule::required(
                    "content",
                    FieldType::text(1, 10_000),
                    "The context content (code, decisions, discussions, etc.)",
                ))
                .field(FieldRule::required(
                    "type",
                    FieldType::one_of(CONTEXT_TYPES),
                    "Context type",
                ))
                .field(tags("tags", "Optional tags for categorization"))
                .field(FieldRule::optional(
                    "relevanceScore",
                    FieldType::number_range(0.0, 10.0),
                    "Relevance score 0-10",
                ))
                .field(metadata())
                .field(project_id())
                .field(session_id()),
        )
        .example(
            "Store a code solution",
            json!({
                "content": "Fixed authentication bug by adding null check in validateToken()",
                "type": "code",
                "tags": ["bug-fix", "authentication", "security"],
                "relevanceScore": 8
            }),
        )
        .example(
            "Record a technical decision",
            json!({
                "content": "Decided to use Redis for caching instead of in-memory due to scalability",
                "type": "decision",
                "tags": ["architecture", "caching", "scalability"],
                "relevanceScore": 9
            }),
        )
        .example(
            "Store planning notes",
            json!({
                "content": "Phase 2 will focus on user authentication and authorization",
                "type": "planning",
                "tags": ["roadmap", "authentication", "phase-2"]
            }),
        ),
        ToolDefinition::new(
            "context_search",
            CATEGORY,
            "Search stored contexts using semantic similarity",
        )
        .returns("Array of matching contexts with similarity scores and search reasons")
        .contract(
            Contract::new()
                .field(FieldRule::required(
                    "query",
                    FieldType::text(1, 1000),
                    "Search query (uses semantic similarity)",
                ))
                .field(FieldRule::optional(
                    "type",
                    FieldType::one_of(CONTEXT_TYPES),
                    "Filter by context type",
                ))
                .field(tags("tags", "Filter by tags"))
                .field(limit(10, 100))
                .field(FieldRule::optional(
                    "minSimilarity",
                    FieldType::number_range(0.0, 100.0),
                    "Minimum similarity percentage 0-100",
                ))
                .field(FieldRule::optional(
                    "offset",
                    FieldType::integer().at_least(0),
                    "Pagination offset",
                ))
                .field(project_id())
                .field(session_id()),
        )
        .example(
            "Find authentication-related contexts",
            json!({"query": "authentication login security", "type": "code", "limit": 5}),
        )
        .example(
            "Search for recent error solutions",
            json!({"query": "error handling exception", "type": "error", "minSimilarity": 70}),
        ),
        ToolDefinition::new(
            "context_get_recent",
            CATEGORY,
            "Get recent contexts chronologically (newest first)",
        )
        .returns("Array of recent contexts ordered by creation time")
        .contract(Contract::new().field(limit(5, 20)).field(project_id()))
        .example("Get last 5 contexts", json!({"limit": 5}))
        .example(
            "Get recent contexts for specific project",
            json!({"limit": 10, "projectId": "web-app-project"}),
        ),
        ToolDefinition::new("context_stats", CATEGORY, "Get context statistics for a project")
            .returns("Statistics including total contexts, types distribution, recent activity")
            .contract(Contract::new().field(project_id()))
            .example("Get current project stats", json!({}))
            .example("Get stats for specific project", json!({"projectId": "mobile-app"})),
    ]
}
