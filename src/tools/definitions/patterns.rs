//! Pattern detection surface: two consolidated tools replacing seventeen
//! single-purpose pattern tools.

use super::{confidence, flag, limit, project_id, session_id, string_list, timeframe, SEVERITIES};
use crate::schema::{BranchRule, Contract, FieldRule, FieldType, VariantRule};
use crate::tools::catalog::ToolDefinition;
use serde_json::json;

const CATEGORY: &str = "Pattern Detection";

pub(crate) const ANALYZE_PHASE: &str = "TT009-3-1";
pub(crate) const INSIGHTS_PHASE: &str = "TT009-3-2";

const TARGETS: &[&str] = &["project", "session", "commit", "git", "service"];

fn pattern_types() -> FieldRule {
    string_list("patternTypes", "Pattern types to include").default_value(json!(["all"]))
}

fn analyze_variant() -> VariantRule {
    VariantRule::new("action", ANALYZE_PHASE)
        .branch(
            BranchRule::new("start", "Start the pattern detection service", &["pattern_detection_start"])
                .restrict("target", &["service"]),
        )
        .branch(
            BranchRule::new("stop", "Stop the pattern detection service", &["pattern_detection_stop"])
                .restrict("target", &["service"]),
        )
        .branch(
            BranchRule::new(
                "status",
                "Report detection service status",
                &["pattern_detection_status"],
            )
            .restrict("target", &["service"]),
        )
        .branch(
            BranchRule::new(
                "analyze",
                "Analyze patterns for a project, session or commit",
                &[
                    "pattern_analyze_project",
                    "pattern_analyze_session",
                    "pattern_analyze_commit",
                ],
            )
            .restrict("target", &["project", "session", "commit"])
            .options(
                Contract::passthrough()
                    .field(project_id())
                    .field(session_id())
                    .field(string_list("commitShas", "Commits to analyze"))
                    .field(
                        FieldRule::optional(
                            "timeRangeDays",
                            FieldType::int_range(1, 365),
                            "Days of history to analyze",
                        )
                        .default_value(json!(30)),
                    )
                    .field(confidence("minConfidence", 0.5)),
            ),
        )
        .branch(
            BranchRule::new("detect", "Detect patterns in recent commits", &["pattern_detect_commits"])
                .restrict("target", &["commit"])
                .options(
                    Contract::passthrough()
                        .field(string_list("commitShas", "Commits to scan (latest when absent)"))
                        .field(project_id()),
                ),
        )
        .branch(
            BranchRule::new(
                "track",
                "Track git activity with pattern correlation",
                &["pattern_track_git_activity"],
            )
            .restrict("target", &["git"])
            .options(
                Contract::passthrough()
                    .field(project_id())
                    .field(string_list("filePaths", "Limit tracking to these paths")),
            ),
        )
        .branch(
            BranchRule::new("discovered", "List discovered patterns", &["pattern_get_discovered"])
                .restrict("target", &["project"])
                .options(
                    Contract::passthrough()
                        .field(pattern_types())
                        .field(confidence("minConfidence", 0.6))
                        .field(limit(100, 500))
                        .field(project_id()),
                ),
        )
        .branch(
            BranchRule::new(
                "performance",
                "Detection service performance metrics",
                &["pattern_get_performance"],
            )
            .restrict("target", &["service"]),
        )
}

fn insights_variant() -> VariantRule {
    VariantRule::new("type", INSIGHTS_PHASE)
        .branch(
            BranchRule::new("alerts", "Pattern alerts with a summary", &["pattern_get_alerts"]).options(
                Contract::passthrough()
                    .field(
                        FieldRule::optional(
                            "severity",
                            FieldType::array_of(FieldType::one_of(SEVERITIES)),
                            "Severities to include",
                        )
                        .default_value(json!(["medium", "high", "critical"])),
                    )
                    .field(
                        FieldRule::optional(
                            "status",
                            FieldType::one_of(&["active", "acknowledged", "resolved", "all"]),
                            "Alert status filter",
                        )
                        .default_value(json!("active")),
                    )
                    .field(project_id())
                    .field(session_id())
                    .field(limit(50, 500))
                    .field(flag("includeResolved", false, "Include resolved alerts")),
            ),
        )
        .branch(
            BranchRule::new(
                "session",
                "Pattern insights for one session",
                &["pattern_get_session_insights"],
            )
            .options(
                Contract::passthrough()
                    .field(session_id())
                    .field(flag("includeContextPatterns", true, "Include context patterns"))
                    .field(flag("includeActivityPatterns", true, "Include activity patterns"))
                    .field(flag("includeTimePatterns", true, "Include time patterns"))
                    .field(confidence("minConfidence", 0.6)),
            ),
        )
        .branch(
            BranchRule::new("insights", "Actionable insights", &["pattern_get_insights"]).options(
                Contract::passthrough()
                    .field(pattern_types())
                    .field(
                        FieldRule::optional(
                            "riskLevels",
                            FieldType::array_of(FieldType::one_of(SEVERITIES)),
                            "Risk levels to include",
                        )
                        .default_value(json!(["medium", "high", "critical"])),
                    )
                    .field(confidence("minConfidence", 0.7))
                    .field(
                        FieldRule::optional("maxAge", FieldType::string(), "Maximum insight age")
                            .default_value(json!("30d")),
                    )
                    .field(flag("includeRecommendations", true, "Attach recommendations"))
                    .field(
                        FieldRule::optional(
                            "limitResults",
                            FieldType::int_range(1, 1000),
                            "Maximum insights",
                        )
                        .default_value(json!(100)),
                    ),
            ),
        )
        .branch(
            BranchRule::new("trends", "Pattern trends with forecast", &["pattern_get_trends"]).options(
                Contract::passthrough()
                    .field(pattern_types())
                    .field(timeframe("30d"))
                    .field(flag("includeForecast", true, "Include a forecast"))
                    .field(
                        FieldRule::optional(
                            "forecastPeriods",
                            FieldType::int_range(1, 90),
                            "Periods to forecast",
                        )
                        .default_value(json!(7)),
                    )
                    .field(
                        FieldRule::optional(
                            "granularity",
                            FieldType::one_of(&["hourly", "daily", "weekly", "monthly"]),
                            "Bucket size",
                        )
                        .default_value(json!("daily")),
                    )
                    .field(
                        FieldRule::optional(
                            "smoothing",
                            FieldType::one_of(&["none", "moving_average", "exponential"]),
                            "Smoothing method",
                        )
                        .default_value(json!("moving_average")),
                    )
                    .field(project_id()),
            ),
        )
        .branch(
            BranchRule::new(
                "correlations",
                "Correlations between pattern types",
                &["pattern_get_correlations"],
            )
            .options(
                Contract::passthrough()
                    .field(FieldRule::optional("patternType1", FieldType::string(), "First pattern type"))
                    .field(FieldRule::optional("patternType2", FieldType::string(), "Second pattern type"))
                    .field(
                        FieldRule::optional(
                            "correlationType",
                            FieldType::one_of(&["pearson", "spearman", "kendall"]),
                            "Correlation method",
                        )
                        .default_value(json!("pearson")),
                    )
                    .field(timeframe("30d"))
                    .field(confidence("minConfidence", 0.5))
                    .field(flag("includeLagAnalysis", false, "Include lag analysis"))
                    .field(
                        FieldRule::optional("maxLag", FieldType::int_range(0, 90), "Maximum lag")
                            .default_value(json!(7)),
                    )
                    .field(project_id()),
            ),
        )
        .branch(
            BranchRule::new("anomalies", "Anomalous pattern activity", &["pattern_get_anomalies"])
                .options(
                    Contract::passthrough()
                        .field(pattern_types())
                        .field(
                            FieldRule::optional(
                                "detectionMethod",
                                FieldType::one_of(&["statistical", "threshold", "isolation_forest"]),
                                "Detection method",
                            )
                            .default_value(json!("statistical")),
                        )
                        .field(
                            FieldRule::optional(
                                "sensitivityLevel",
                                FieldType::one_of(&["low", "medium", "high"]),
                                "Detection sensitivity",
                            )
                            .default_value(json!("medium")),
                        )
                        .field(timeframe("30d"))
                        .field(flag("includeContext", true, "Attach surrounding context"))
                        .field(project_id())
                        .field(
                            FieldRule::optional(
                                "limitResults",
                                FieldType::int_range(1, 1000),
                                "Maximum anomalies",
                            )
                            .default_value(json!(50)),
                        ),
                ),
        )
        .branch(
            BranchRule::new(
                "recommendations",
                "Recommendations derived from patterns",
                &["pattern_get_recommendations"],
            )
            .options(
                Contract::passthrough()
                    .field(
                        FieldRule::optional("contextType", FieldType::string(), "Recommendation context")
                            .default_value(json!("development")),
                    )
                    .field(flag("includeActionItems", true, "Include action items"))
                    .field(flag("includePrioritization", true, "Include prioritization"))
                    .field(flag("includeRiskAssessment", true, "Include risk assessment"))
                    .field(
                        FieldRule::optional(
                            "maxRecommendations",
                            FieldType::int_range(1, 100),
                            "Maximum recommendations",
                        )
                        .default_value(json!(20)),
                    )
                    .field(project_id())
                    .field(session_id()),
            ),
        )
}

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "pattern_analyze",
            CATEGORY,
            "Unified pattern analysis: detection service control, analysis and discovery",
        )
        .returns("Result of the selected action plus consolidation details")
        .contract(Contract::consolidated(
            analyze_variant(),
            "Operation to perform",
            vec![FieldRule::required(
                "target",
                FieldType::one_of(TARGETS),
                "What the action applies to",
            )],
        ))
        .example(
            "Analyze the current project",
            json!({"target": "project", "action": "analyze", "options": {"timeRangeDays": 14}}),
        )
        .example(
            "Check detection service status",
            json!({"target": "service", "action": "status"}),
        ),
        ToolDefinition::new(
            "pattern_insights",
            CATEGORY,
            "Unified pattern insights: alerts, trends, correlations, anomalies and recommendations",
        )
        .returns("Insight data for the selected type plus consolidation details")
        .contract(Contract::consolidated(insights_variant(), "Insight type", Vec::new()))
        .example(
            "Critical alerts only",
            json!({"type": "alerts", "options": {"severity": ["critical"]}}),
        )
        .example(
            "Weekly trends with forecast",
            json!({"type": "trends", "options": {"granularity": "weekly", "forecastPeriods": 4}}),
        ),
    ]
}
