use super::{flag, limit, project_id, string_list, timeframe, SEVERITIES};
use crate::schema::{BranchRule, Contract, FieldRule, FieldType, VariantRule};
use crate::tools::catalog::ToolDefinition;
use serde_json::json;

const CATEGORY: &str = "Development Metrics";

fn collect_variant() -> VariantRule {
    VariantRule::new("scope", "TT009-2-1")
        .branch(
            BranchRule::new("project", "Collect metrics for a project", &["metrics_collect_project"])
                .options(
                    Contract::passthrough().field(
                        FieldRule::optional(
                            "trigger",
                            FieldType::one_of(&["manual", "git_commit", "scheduled", "task_completion"]),
                            "What triggered the collection",
                        )
                        .default_value(json!("manual")),
                    ),
                ),
        )
        .branch(
            BranchRule::new("core", "Core development metrics", &["metrics_get_core_metrics"]).options(
                Contract::passthrough()
                    .field(string_list("metricTypes", "Metric types to include"))
                    .field(timeframe("30d")),
            ),
        )
        .branch(BranchRule::new(
            "patterns",
            "Pattern intelligence metrics",
            &["metrics_get_pattern_intelligence"],
        ))
        .branch(
            BranchRule::new(
                "productivity",
                "Developer productivity and health",
                &["metrics_get_productivity_health"],
            )
            .options(
                Contract::passthrough()
                    .field(FieldRule::optional("developerId", FieldType::string(), "Developer filter"))
                    .field(timeframe("30d")),
            ),
        )
}

fn analyze_variant() -> VariantRule {
    VariantRule::new("operation", "TT009-2-2")
        .branch(
            BranchRule::new("dashboard", "Metrics dashboard", &["metrics_get_dashboard"]).options(
                Contract::passthrough()
                    .field(timeframe("30d"))
                    .field(flag("includeAlerts", true, "Include active alerts")),
            ),
        )
        .branch(
            BranchRule::new("trends", "Metric trends and forecasts", &["metrics_get_trends"]).options(
                Contract::passthrough()
                    .field(string_list("metricTypes", "Metric types to include"))
                    .field(timeframe("30d"))
                    .field(flag("includeForecast", true, "Include a forecast"))
                    .field(
                        FieldRule::optional(
                            "forecastPeriods",
                            FieldType::int_range(1, 90),
                            "Periods to forecast",
                        )
                        .default_value(json!(7)),
                    ),
            ),
        )
        .branch(
            BranchRule::new(
                "correlations",
                "Correlations between metrics",
                &["metrics_calculate_correlations"],
            )
            .options(
                Contract::passthrough()
                    .field(FieldRule::optional("metric1", FieldType::string(), "First metric"))
                    .field(FieldRule::optional("metric2", FieldType::string(), "Second metric"))
                    .field(
                        FieldRule::optional(
                            "correlationType",
                            FieldType::one_of(&["pearson", "spearman", "kendall"]),
                            "Correlation method",
                        )
                        .default_value(json!("pearson")),
                    ),
            ),
        )
        .branch(
            BranchRule::new(
                "executive_summary",
                "Executive summary of development health",
                &["metrics_get_executive_summary"],
            )
            .options(Contract::passthrough().field(timeframe("30d"))),
        )
        .branch(
            BranchRule::new(
                "aggregation",
                "Aggregate metrics across projects or over time",
                &["metrics_aggregate_projects", "metrics_aggregate_timeline"],
            )
            .options(
                Contract::passthrough()
                    .field(
                        FieldRule::optional(
                            "aggregationType",
                            FieldType::one_of(&[
                                "sum",
                                "average",
                                "median",
                                "percentile",
                                "count",
                                "min",
                                "max",
                            ]),
                            "Aggregation function",
                        )
                        .default_value(json!("average")),
                    )
                    .field(
                        FieldRule::optional(
                            "granularity",
                            FieldType::one_of(&["hourly", "daily", "weekly", "monthly"]),
                            "Bucket size",
                        )
                        .default_value(json!("daily")),
                    )
                    .field(string_list("projectIds", "Projects to aggregate")),
            ),
        )
}

fn control_variant() -> VariantRule {
    VariantRule::new("operation", "TT009-2-3")
        .branch(
            BranchRule::new(
                "collection_management",
                "Start or stop background metrics collection",
                &["metrics_start_collection", "metrics_stop_collection"],
            )
            .restrict("action", &["start", "stop", "status"]),
        )
        .branch(
            BranchRule::new(
                "alerts",
                "List, acknowledge or resolve metric alerts",
                &["metrics_get_alerts", "metrics_acknowledge_alert", "metrics_resolve_alert"],
            )
            .restrict("action", &["list", "acknowledge", "resolve"])
            .options(
                Contract::passthrough()
                    .field(FieldRule::optional("alertId", FieldType::uuid(), "Alert to update"))
                    .field(FieldRule::optional(
                        "severity",
                        FieldType::one_of(SEVERITIES),
                        "Severity filter",
                    ))
                    .field(limit(20, 100)),
            ),
        )
        .branch(BranchRule::new(
            "performance",
            "Metrics subsystem performance",
            &["metrics_get_performance"],
        ))
        .branch(
            BranchRule::new("export", "Export metrics data", &["metrics_export_data"]).options(
                Contract::passthrough()
                    .field(
                        FieldRule::optional(
                            "format",
                            FieldType::one_of(&["csv", "json", "excel"]),
                            "Export format",
                        )
                        .default_value(json!("json")),
                    )
                    .field(timeframe("30d")),
            ),
        )
}

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "metrics_collect",
            CATEGORY,
            "Unified metrics collection across project, core, pattern and productivity scopes",
        )
        .returns("Collected metrics for the selected scope")
        .contract(Contract::consolidated(
            collect_variant(),
            "Collection scope",
            vec![FieldRule::optional(
                "target",
                FieldType::string(),
                "Project ID to collect for (current project if omitted)",
            )],
        ))
        .example("Collect project metrics", json!({"scope": "project"})),
        ToolDefinition::new(
            "metrics_analyze",
            CATEGORY,
            "Unified metrics analysis: dashboards, trends, correlations, summaries and aggregation",
        )
        .returns("Analysis result for the selected operation")
        .contract(Contract::consolidated(
            analyze_variant(),
            "Analysis operation",
            vec![FieldRule::optional("scope", FieldType::string(), "Analysis scope")],
        ))
        .example(
            "Thirty day dashboard",
            json!({"operation": "dashboard", "options": {"timeframe": "30d"}}),
        ),
        ToolDefinition::new(
            "metrics_control",
            CATEGORY,
            "Unified metrics control: collection, alerts, performance and export",
        )
        .returns("Result of the control operation")
        .contract(Contract::consolidated(
            control_variant(),
            "Control operation",
            vec![
                FieldRule::optional("action", FieldType::string(), "Sub-action for the operation"),
                project_id(),
            ],
        ))
        .example(
            "Acknowledge an alert",
            json!({
                "operation": "alerts",
                "action": "acknowledge",
                "options": {"alertId": "0f8fad5b-d9cb-469f-a165-70867728950e"}
            }),
        )
        .example("Export as CSV", json!({"operation": "export", "options": {"format": "csv"}})),
    ]
}
