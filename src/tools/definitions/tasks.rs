use super::{limit, metadata, project_id, tags, PRIORITIES, TASK_STATUSES};
use crate::schema::{Contract, FieldRule, FieldType};
use crate::tools::catalog::ToolDefinition;
use serde_json::json;

const CATEGORY: &str = "Task Management";

const TASK_TYPES: &[&str] = &[
    "feature",
    "bug",
    "bugfix",
    "refactor",
    "test",
    "review",
    "docs",
    "documentation",
    "devops",
    "general",
];

fn task_id() -> FieldRule {
    FieldRule::required("taskId", FieldType::uuid(), "Task ID")
}

fn assigned_to() -> FieldRule {
    FieldRule::optional("assignedTo", FieldType::string().max_len(255), "Agent the task is assigned to")
}

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new("task_create", CATEGORY, "Create a new task for coordination")
            .returns("Created task with ID, status and priority")
            .contract(
                Contract::new()
                    .field(FieldRule::required("title", FieldType::text(1, 255), "Task title"))
                    .field(FieldRule::optional(
                        "description",
                        FieldType::string().max_len(2000),
                        "Task description",
                    ))
                    .field(
                        FieldRule::optional("type", FieldType::one_of(TASK_TYPES), "Task type")
                            .default_value(json!("general")),
                    )
                    .field(
                        FieldRule::optional("priority", FieldType::one_of(PRIORITIES), "Priority")
                            .default_value(json!("medium")),
                    )
                    .field(FieldRule::optional(
                        "status",
                        FieldType::one_of(TASK_STATUSES),
                        "Initial status",
                    ))
                    .field(assigned_to())
                    .field(FieldRule::optional(
                        "dependencies",
                        FieldType::array_of(FieldType::string()).max_len(10),
                        "IDs of tasks this task depends on",
                    ))
                    .field(tags("tags", "Tags"))
                    .field(project_id())
                    .field(metadata()),
            )
            .example(
                "Create implementation task",
                json!({
                    "title": "Implement user authentication",
                    "description": "Add JWT-based auth with login/logout",
                    "priority": "high",
                    "assignedTo": "CodeAgent"
                }),
            )
            .example(
                "Create bug fix task",
                json!({
                    "title": "Fix login redirect issue",
                    "description": "Users not redirected after successful login",
                    "type": "bugfix",
                    "priority": "urgent",
                    "assignedTo": "QaAgent",
                    "tags": ["bug", "authentication", "frontend"]
                }),
            ),
        ToolDefinition::new("task_list", CATEGORY, "List tasks with optional filtering")
            .returns("Tasks matching the filters")
            .contract(
                Contract::new()
                    .field(FieldRule::optional(
                        "status",
                        FieldType::one_of(TASK_STATUSES),
                        "Filter by status",
                    ))
                    .field(FieldRule::optional(
                        "priority",
                        FieldType::one_of(PRIORITIES),
                        "Filter by priority",
                    ))
                    .field(FieldRule::optional(
                        "assignedAgent",
                        FieldType::uuid(),
                        "Filter by assigned agent ID",
                    ))
                    .field(limit(10, 100)),
            )
            .example("List blocked tasks", json!({"status": "blocked"})),
        ToolDefinition::new("task_update", CATEGORY, "Update task status and assignment")
            .returns("Updated task")
            .contract(
                Contract::new()
                    .field(task_id())
                    .field(FieldRule::optional(
                        "status",
                        FieldType::one_of(TASK_STATUSES),
                        "New status",
                    ))
                    .field(FieldRule::optional(
                        "priority",
                        FieldType::one_of(PRIORITIES),
                        "New priority",
                    ))
                    .field(assigned_to())
                    .field(FieldRule::optional(
                        "progress",
                        FieldType::number_range(0.0, 100.0),
                        "Completion percentage",
                    ))
                    .field(FieldRule::optional(
                        "notes",
                        FieldType::string().max_len(2000),
                        "Progress notes",
                    )),
            )
            .example(
                "Mark task as completed",
                json!({"taskId": "59823126-9442-45dd-87e7-3dfae691e41f", "status": "completed"}),
            )
            .example(
                "Reassign task to different agent",
                json!({
                    "taskId": "59823126-9442-45dd-87e7-3dfae691e41f",
                    "status": "in_progress",
                    "assignedTo": "CodeReviewGuru"
                }),
            ),
        ToolDefinition::new(
            "task_details",
            CATEGORY,
            "Get detailed information for a specific task",
        )
        .returns("Full task record including dependencies and history")
        .contract(Contract::new().field(task_id()).field(project_id()))
        .example(
            "Get full task details",
            json!({"taskId": "59823126-9442-45dd-87e7-3dfae691e41f"}),
        ),
        ToolDefinition::new(
            "task_bulk_update",
            CATEGORY,
            "Update multiple tasks atomically with the same changes",
        )
        .returns("Per-task results and a count of updated tasks")
        .contract(
            Contract::new()
                .field(FieldRule::required(
                    "task_ids",
                    FieldType::array_of(FieldType::uuid()).min_len(1).max_len(50),
                    "IDs of the tasks to update (1-50)",
                ))
                .field(FieldRule::optional(
                    "status",
                    FieldType::one_of(&["todo", "in_progress", "blocked", "completed", "cancelled"]),
                    "New status",
                ))
                .field(assigned_to())
                .field(FieldRule::optional(
                    "priority",
                    FieldType::one_of(PRIORITIES),
                    "New priority",
                ))
                .field(metadata())
                .field(FieldRule::optional(
                    "notes",
                    FieldType::string().max_len(2000),
                    "Notes applied to every task",
                ))
                .field(project_id()),
        )
        .example(
            "Complete two tasks at once",
            json!({
                "task_ids": [
                    "59823126-9442-45dd-87e7-3dfae691e41f",
                    "0f8fad5b-d9cb-469f-a165-70867728950e"
                ],
                "status": "completed"
            }),
        ),
        ToolDefinition::new(
            "task_progress_summary",
            CATEGORY,
            "Get task progress summary with grouping and completion percentages",
        )
        .returns("Groups with task counts and completion percentages")
        .contract(
            Contract::new()
                .field(
                    FieldRule::optional(
                        "groupBy",
                        FieldType::one_of(&["phase", "status", "priority", "type", "assignedTo"]),
                        "Grouping dimension",
                    )
                    .default_value(json!("phase")),
                )
                .field(project_id()),
        ),
    ]
}
