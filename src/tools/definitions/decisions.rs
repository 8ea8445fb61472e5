use super::{limit, metadata, project_id, string_list, tags};
use crate::schema::{Contract, FieldRule, FieldType};
use crate::tools::catalog::ToolDefinition;
use serde_json::json;

const CATEGORY: &str = "Technical Decisions";

const DECISION_TYPES: &[&str] = &[
    "architecture",
    "library",
    "framework",
    "pattern",
    "api_design",
    "database",
    "deployment",
    "security",
    "performance",
    "ui_ux",
    "testing",
    "tooling",
    "process",
    "naming_convention",
    "code_style",
];

fn alternative() -> Contract {
    Contract::new()
        .field(FieldRule::required("name", FieldType::string(), "Alternative name"))
        .field(string_list("pros", "Advantages"))
        .field(string_list("cons", "Disadvantages"))
        .field(FieldRule::required(
            "reasonRejected",
            FieldType::string(),
            "Why it was not chosen",
        ))
}

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new("decision_record", CATEGORY, "Record a technical decision with context")
            .returns("Recorded decision with generated ID")
            .contract(
                Contract::new()
                    .field(FieldRule::required(
                        "decisionType",
                        FieldType::one_of(DECISION_TYPES),
                        "Decision type",
                    ))
                    .field(FieldRule::required("title", FieldType::text(1, 255), "Decision title"))
                    .field(FieldRule::required(
                        "description",
                        FieldType::text(1, 5000),
                        "What was decided",
                    ))
                    .field(FieldRule::required(
                        "rationale",
                        FieldType::string().max_len(2000),
                        "Why it was decided",
                    ))
                    .field(FieldRule::required(
                        "impactLevel",
                        FieldType::one_of(&["low", "medium", "high", "critical"]),
                        "Impact level",
                    ))
                    .field(FieldRule::optional(
                        "alternativesConsidered",
                        FieldType::array_of(FieldType::object(alternative())),
                        "Alternatives that were considered",
                    ))
                    .field(FieldRule::optional(
                        "problemStatement",
                        FieldType::string().max_len(2000),
                        "Problem being solved",
                    ))
                    .field(string_list("affectedComponents", "Components affected by the decision"))
                    .field(tags("tags", "Tags"))
                    .field(project_id())
                    .field(metadata()),
            )
            .example(
                "Record architecture decision",
                json!({
                    "decisionType": "architecture",
                    "title": "Use microservices architecture",
                    "description": "Split monolith into focused microservices",
                    "rationale": "Better scalability and team independence",
                    "impactLevel": "high"
                }),
            ),
        ToolDefinition::new("decision_search", CATEGORY, "Search technical decisions with filters")
            .returns("Matching decisions ranked by relevance")
            .contract(
                Contract::new()
                    .field(FieldRule::required("query", FieldType::text(1, 1000), "Search query"))
                    .field(FieldRule::optional(
                        "decisionType",
                        FieldType::one_of(DECISION_TYPES),
                        "Filter by decision type",
                    ))
                    .field(limit(10, 100))
                    .field(FieldRule::optional(
                        "includeOutcome",
                        FieldType::boolean(),
                        "Include recorded outcomes",
                    )),
            )
            .example(
                "Find database decisions",
                json!({"query": "database schema design", "decisionType": "database"}),
            ),
        ToolDefinition::new("decision_update", CATEGORY, "Update decision status, outcomes, or lessons")
            .returns("Updated decision")
            .contract(
                Contract::new()
                    .field(FieldRule::required("decisionId", FieldType::uuid(), "Decision ID"))
                    .field(FieldRule::optional(
                        "outcome",
                        FieldType::string().max_len(2000),
                        "Observed outcome",
                    ))
                    .field(FieldRule::optional(
                        "lessons",
                        FieldType::string().max_len(2000),
                        "Lessons learned",
                    ))
                    .field(FieldRule::optional(
                        "status",
                        FieldType::one_of(&["active", "superseded", "deprecated"]),
                        "Decision status",
                    )),
            ),
        ToolDefinition::new(
            "decision_stats",
            CATEGORY,
            "Get technical decision statistics and analysis",
        )
        .returns("Decision counts by type, status and impact"),
    ]
}
