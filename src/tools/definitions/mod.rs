//! Static definitions of the AIDIS tool surface, one module per category.
//!
//! Shared field rules live here so every tool that takes `tags` or `limit`
//! enforces the same bounds.

use crate::schema::{FieldRule, FieldType};
use crate::tools::catalog::ToolDefinition;
use serde_json::json;

mod context;
mod decisions;
mod metrics;
mod naming;
mod patterns;
mod projects;
mod search;
mod sessions;
mod system;
mod tasks;

/// Every definition, in catalog order.
pub(crate) fn all() -> Vec<ToolDefinition> {
    let mut definitions = Vec::new();
    definitions.extend(system::definitions());
    definitions.extend(context::definitions());
    definitions.extend(projects::definitions());
    definitions.extend(sessions::definitions());
    definitions.extend(naming::definitions());
    definitions.extend(decisions::definitions());
    definitions.extend(tasks::definitions());
    definitions.extend(search::definitions());
    definitions.extend(patterns::definitions());
    definitions.extend(metrics::definitions());
    definitions
}

pub(crate) const CONTEXT_TYPES: &[&str] = &[
    "code",
    "decision",
    "error",
    "discussion",
    "planning",
    "completion",
    "milestone",
    "reflections",
    "handoff",
];

pub(crate) const ENTITY_TYPES: &[&str] = &[
    "variable",
    "function",
    "class",
    "interface",
    "type",
    "component",
    "file",
    "directory",
    "module",
    "service",
    "endpoint",
    "database_table",
    "database_column",
    "config_key",
    "environment_var",
    "css_class",
    "html_id",
];

pub(crate) const TASK_STATUSES: &[&str] = &["todo", "in_progress", "completed", "blocked"];

pub(crate) const PRIORITIES: &[&str] = &["low", "medium", "high", "urgent"];

pub(crate) const SEVERITIES: &[&str] = &["critical", "high", "medium", "low"];

pub(crate) fn tags(name: &str, description: &str) -> FieldRule {
    FieldRule::optional(
        name,
        FieldType::array_of(FieldType::string().max_len(50)).max_len(20),
        description,
    )
}

/// Integer `limit` with the given default and upper bound.
pub(crate) fn limit(default: i64, max: i64) -> FieldRule {
    FieldRule::optional(
        "limit",
        FieldType::int_range(1, max),
        &format!("Maximum results (max: {})", max),
    )
    .default_value(json!(default))
}

pub(crate) fn project_id() -> FieldRule {
    FieldRule::optional(
        "projectId",
        FieldType::string(),
        "Project ID (uses current if not specified)",
    )
}

pub(crate) fn session_id() -> FieldRule {
    FieldRule::optional(
        "sessionId",
        FieldType::string(),
        "Session ID (uses current if not specified)",
    )
}

pub(crate) fn metadata() -> FieldRule {
    FieldRule::optional("metadata", FieldType::record(), "Additional metadata as key-value pairs")
}

pub(crate) fn string_list(name: &str, description: &str) -> FieldRule {
    FieldRule::optional(name, FieldType::array_of(FieldType::string()), description)
}

pub(crate) fn timeframe(default: &str) -> FieldRule {
    FieldRule::optional(
        "timeframe",
        FieldType::text(1, 20),
        "Time window such as 7d, 30d or 90d",
    )
    .default_value(json!(default))
}

pub(crate) fn flag(name: &str, default: bool, description: &str) -> FieldRule {
    FieldRule::optional(name, FieldType::loose_boolean(), description).default_value(json!(default))
}

pub(crate) fn confidence(name: &str, default: f64) -> FieldRule {
    FieldRule::optional(
        name,
        FieldType::number_range(0.0, 1.0),
        "Minimum confidence between 0 and 1",
    )
    .default_value(json!(default))
}
