use super::{project_id, tags, ENTITY_TYPES};
use crate::schema::{Contract, FieldRule, FieldType};
use crate::tools::catalog::ToolDefinition;
use serde_json::json;

const CATEGORY: &str = "Naming Registry";

fn entity_type() -> FieldRule {
    FieldRule::required("entityType", FieldType::one_of(ENTITY_TYPES), "Kind of entity being named")
}

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new("naming_register", CATEGORY, "Register a name to prevent conflicts")
            .returns("Registered name entry with conflict status")
            .contract(
                Contract::new()
                    .field(FieldRule::required(
                        "canonicalName",
                        FieldType::text(1, 255),
                        "Canonical name to register",
                    ))
                    .field(entity_type())
                    .field(FieldRule::optional(
                        "description",
                        FieldType::string().max_len(1000),
                        "What the name refers to",
                    ))
                    .field(FieldRule::optional(
                        "aliases",
                        FieldType::array_of(FieldType::string().max_len(255)).max_len(10),
                        "Alternative names",
                    ))
                    .field(tags("contextTags", "Context tags"))
                    .field(project_id()),
            )
            .example(
                "Register a function name",
                json!({
                    "entityType": "function",
                    "canonicalName": "validateEmailFormat",
                    "description": "Validates email address format using regex"
                }),
            ),
        ToolDefinition::new(
            "naming_check",
            CATEGORY,
            "Check for naming conflicts before using a name",
        )
        .returns("Conflict report with suggestions when the name is taken")
        .contract(
            Contract::new()
                .field(FieldRule::required(
                    "proposedName",
                    FieldType::text(1, 255),
                    "Name to check",
                ))
                .field(entity_type())
                .field(tags("contextTags", "Context tags"))
                .field(project_id()),
        )
        .example(
            "Check if a function name is available",
            json!({
                "entityType": "function",
                "proposedName": "processUserData",
                "contextTags": ["user", "processing"]
            }),
        )
        .example(
            "Check component name availability",
            json!({"entityType": "component", "proposedName": "UserProfile"}),
        ),
        ToolDefinition::new("naming_suggest", CATEGORY, "Get name suggestions based on description")
            .returns("Ranked name suggestions following project conventions")
            .contract(
                Contract::new()
                    .field(FieldRule::required(
                        "description",
                        FieldType::text(1, 1000),
                        "Description of the entity to name",
                    ))
                    .field(entity_type())
                    .field(tags("contextTags", "Context tags"))
                    .field(project_id()),
            )
            .example(
                "Get function name suggestions",
                json!({
                    "entityType": "function",
                    "description": "handles user authentication with JWT tokens"
                }),
            ),
        ToolDefinition::new(
            "naming_stats",
            CATEGORY,
            "Get naming statistics and convention compliance",
        )
        .returns("Counts per entity type and convention compliance score")
        .contract(Contract::new().field(project_id())),
    ]
}
