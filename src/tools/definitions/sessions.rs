use super::session_id;
use crate::schema::{Contract, FieldRule, FieldType};
use crate::tools::catalog::ToolDefinition;
use serde_json::json;

const CATEGORY: &str = "Session Management";

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new("session_assign", CATEGORY, "Assign current session to a project")
            .returns("Confirmation of session assignment with project details")
            .contract(Contract::new().field(FieldRule::required(
                "projectName",
                FieldType::text(1, 255),
                "Name of the project to assign the session to",
            )))
            .example("Assign session to a project", json!({"projectName": "my-web-app"})),
        ToolDefinition::new("session_status", CATEGORY, "Get current session status and details")
            .returns("Session ID, project assignment, start time, duration, and context statistics")
            .example("Get current session information", json!({})),
        ToolDefinition::new(
            "session_new",
            CATEGORY,
            "Create a new session with optional title and project assignment",
        )
        .returns("New session ID and project assignment confirmation")
        .contract(
            Contract::new()
                .field(FieldRule::optional(
                    "title",
                    FieldType::string().max_len(500),
                    "Optional custom title for the session",
                ))
                .field(FieldRule::optional(
                    "projectName",
                    FieldType::text(1, 255),
                    "Optional project to assign the new session to",
                )),
        )
        .example(
            "Create new session with title",
            json!({"title": "Feature Development Sprint", "projectName": "aidis-bootstrap"}),
        )
        .example("Create simple new session", json!({})),
        ToolDefinition::new(
            "session_update",
            CATEGORY,
            "Update session title and description for better organization",
        )
        .returns("Updated session details with new title/description and metadata")
        .contract(
            Contract::new()
                .field(FieldRule::optional(
                    "title",
                    FieldType::string().max_len(500),
                    "New title for the session",
                ))
                .field(FieldRule::optional(
                    "description",
                    FieldType::string().max_len(2000),
                    "New description for the session",
                ))
                .field(session_id()),
        )
        .example(
            "Update session title only",
            json!({
                "sessionId": "67b60ed0-1234-5678-9abc-def012345678",
                "title": "Authentication Module Development"
            }),
        ),
        ToolDefinition::new(
            "session_details",
            CATEGORY,
            "Get detailed session information including title, description, and metadata",
        )
        .returns("Complete session information including timestamps, project, and activity metrics")
        .contract(Contract::new().field(session_id()))
        .example(
            "Get session details with metadata",
            json!({"sessionId": "67b60ed0-1234-5678-9abc-def012345678"}),
        ),
    ]
}
