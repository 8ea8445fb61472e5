use super::{metadata, project_id};
use crate::schema::{Contract, FieldRule, FieldType};
use crate::tools::catalog::ToolDefinition;
use serde_json::json;

const CATEGORY: &str = "Project Management";

fn project_ref() -> Contract {
    Contract::new().field(FieldRule::required(
        "project",
        FieldType::text(1, 255),
        "Project ID or name",
    ))
}

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new("project_list", CATEGORY, "List all available projects with statistics")
            .returns("Array of projects with metadata and optional statistics")
            .contract(
                Contract::new().field(
                    FieldRule::optional(
                        "includeStats",
                        FieldType::loose_boolean(),
                        "Include context statistics",
                    )
                    .default_value(json!(false)),
                ),
            )
            .example("List all projects", json!({}))
            .example("List projects with statistics", json!({"includeStats": true})),
        ToolDefinition::new("project_create", CATEGORY, "Create a new project")
            .returns("Created project with ID and metadata")
            .contract(
                Contract::new()
                    .field(FieldRule::required("name", FieldType::text(1, 255), "Unique project name"))
                    .field(FieldRule::optional(
                        "description",
                        FieldType::string().max_len(2000),
                        "Project description",
                    ))
                    .field(FieldRule::optional("gitRepoUrl", FieldType::string(), "Git repository URL"))
                    .field(FieldRule::optional(
                        "rootDirectory",
                        FieldType::string(),
                        "Root directory path",
                    ))
                    .field(metadata()),
            )
            .example(
                "Create a new web application project",
                json!({
                    "name": "my-web-app",
                    "description": "React/Node.js web application",
                    "gitRepoUrl": "https://github.com/user/my-web-app",
                    "rootDirectory": "/home/user/projects/my-web-app"
                }),
            )
            .example("Create minimal project", json!({"name": "quick-prototype"})),
        ToolDefinition::new(
            "project_switch",
            CATEGORY,
            "Switch to a different project (sets as current)",
        )
        .returns("Confirmation of project switch with new current project details")
        .contract(project_ref())
        .example("Switch by project name", json!({"project": "my-web-app"})),
        ToolDefinition::new(
            "project_current",
            CATEGORY,
            "Get the currently active project information",
        )
        .returns("Current project details or null if no project is set")
        .example("Get current active project", json!({})),
        ToolDefinition::new(
            "project_info",
            CATEGORY,
            "Get detailed information about a specific project",
        )
        .returns("Detailed project information including metadata and statistics")
        .contract(project_ref())
        .example("Get project details by name", json!({"project": "my-web-app"})),
        ToolDefinition::new(
            "project_insights",
            CATEGORY,
            "Get comprehensive project health and insights",
        )
        .returns("Project health metrics, activity patterns, and recommendations")
        .contract(Contract::new().field(project_id())),
    ]
}
