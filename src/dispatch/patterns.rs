//! `pattern_insights` alerts branch.
//!
//! Row retrieval belongs to an external [`AlertSource`]; this branch turns
//! the normalized options into an [`AlertQuery`] and summarizes whatever rows
//! come back.

use super::handler::ToolHandler;
use crate::types::{Error, Result};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// Filters for one alerts lookup, taken from the branch options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertQuery {
    pub severity: Vec<String>,
    /// `all` disables the status filter.
    pub status: String,
    pub project_id: Option<String>,
    pub session_id: Option<String>,
    pub limit: u64,
    pub include_resolved: bool,
}

impl AlertQuery {
    /// Build from the validated options object.
    pub fn from_options(options: &Value) -> Result<Self> {
        Ok(serde_json::from_value(options.clone())?)
    }

    /// Whether a row passes these filters.
    pub fn matches(&self, alert: &Value) -> bool {
        let field = |name: &str| alert.get(name).and_then(Value::as_str);
        let status = field("status").unwrap_or_default();

        if !self.include_resolved && status == "resolved" {
            return false;
        }
        if !self.severity.iter().any(|s| Some(s.as_str()) == field("severity")) {
            return false;
        }
        if self.status != "all" && status != self.status {
            return false;
        }
        if let Some(project) = &self.project_id {
            if field("project_id") != Some(project.as_str()) {
                return false;
            }
        }
        if let Some(session) = &self.session_id {
            if field("session_id") != Some(session.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Collaborator that fetches alert rows.
#[async_trait]
pub trait AlertSource: fmt::Debug + Send + Sync {
    async fn fetch_alerts(&self, query: &AlertQuery) -> Result<Vec<Value>>;
}

/// In-memory rows filtered with [`AlertQuery::matches`]. Useful for dry runs
/// and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticAlerts {
    rows: Vec<Value>,
}

impl StaticAlerts {
    pub fn new(rows: Vec<Value>) -> Self {
        Self { rows }
    }
}

#[async_trait]
impl AlertSource for StaticAlerts {
    async fn fetch_alerts(&self, query: &AlertQuery) -> Result<Vec<Value>> {
        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);
        Ok(self
            .rows
            .iter()
            .filter(|row| query.matches(row))
            .take(limit)
            .cloned()
            .collect())
    }
}

/// Branch handler for `pattern_insights` with `type: "alerts"`.
#[derive(Debug)]
pub struct PatternAlerts<S> {
    source: S,
}

impl<S: AlertSource> PatternAlerts<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

#[async_trait]
impl<S: AlertSource> ToolHandler for PatternAlerts<S> {
    async fn call(&self, args: Value) -> Result<Value> {
        let options = args
            .get("options")
            .ok_or_else(|| Error::internal("pattern_insights alerts called without options"))?;
        let query = AlertQuery::from_options(options)?;
        let alerts = self.source.fetch_alerts(&query).await?;

        tracing::debug!(rows = alerts.len(), "Fetched pattern alerts");

        Ok(json!({
            "type": "alerts",
            "projectId": query.project_id,
            "sessionId": query.session_id,
            "severity": query.severity,
            "status": query.status,
            "includeResolved": query.include_resolved,
            "totalAlerts": alerts.len(),
            "summary": summarize(&alerts),
            "alerts": alerts,
        }))
    }
}

fn count_by(alerts: &[Value], field: &str) -> IndexMap<String, u64> {
    let mut counts = IndexMap::new();
    for alert in alerts {
        if let Some(key) = alert.get(field).and_then(Value::as_str) {
            *counts.entry(key.to_string()).or_insert(0) += 1;
        }
    }
    counts
}

/// Distribution summary over alert rows.
pub fn summarize(alerts: &[Value]) -> Value {
    let critical = alerts
        .iter()
        .filter(|a| a.get("severity").and_then(Value::as_str) == Some("critical"))
        .count();
    let unresolved = alerts
        .iter()
        .filter(|a| a.get("status").and_then(Value::as_str) != Some("resolved"))
        .count();
    let average_confidence = if alerts.is_empty() {
        0.0
    } else {
        let total: f64 = alerts
            .iter()
            .map(|a| a.get("confidence_score").and_then(Value::as_f64).unwrap_or(0.0))
            .sum();
        total / alerts.len() as f64
    };

    json!({
        "totalAlerts": alerts.len(),
        "severityDistribution": count_by(alerts, "severity"),
        "statusDistribution": count_by(alerts, "status"),
        "patternTypeDistribution": count_by(alerts, "pattern_type"),
        "criticalAlerts": critical,
        "unresolvedAlerts": unresolved,
        "averageConfidence": average_confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn options() -> Value {
        json!({
            "severity": ["medium", "high", "critical"],
            "status": "active",
            "limit": 50,
            "includeResolved": false,
        })
    }

    fn rows() -> Vec<Value> {
        vec![
            json!({"alert_id": 1, "severity": "critical", "status": "active", "pattern_type": "file_churn", "confidence_score": 0.9, "project_id": "p1"}),
            json!({"alert_id": 2, "severity": "high", "status": "active", "pattern_type": "file_churn", "confidence_score": 0.7, "project_id": "p1"}),
            json!({"alert_id": 3, "severity": "low", "status": "active", "pattern_type": "cochange", "confidence_score": 0.4, "project_id": "p1"}),
            json!({"alert_id": 4, "severity": "high", "status": "resolved", "pattern_type": "cochange", "confidence_score": 0.8, "project_id": "p2"}),
        ]
    }

    #[tokio::test]
    async fn test_empty_source_yields_zero_summary() {
        let handler = PatternAlerts::new(StaticAlerts::default());
        let out = handler
            .call(json!({"type": "alerts", "options": options()}))
            .await
            .unwrap();

        assert_eq!(out["type"], "alerts");
        assert_eq!(out["totalAlerts"], 0);
        assert_eq!(out["alerts"], json!([]));
        assert_eq!(out["summary"]["averageConfidence"], 0.0);
        assert_eq!(out["summary"]["severityDistribution"], json!({}));
    }

    #[tokio::test]
    async fn test_filters_and_summarizes() {
        let handler = PatternAlerts::new(StaticAlerts::new(rows()));
        let out = handler
            .call(json!({"type": "alerts", "options": options()}))
            .await
            .unwrap();

        assert_eq!(out["totalAlerts"], 2);
        let summary = &out["summary"];
        assert_eq!(summary["criticalAlerts"], 1);
        assert_eq!(summary["unresolvedAlerts"], 2);
        assert_eq!(summary["patternTypeDistribution"], json!({"file_churn": 2}));
        let avg = summary["averageConfidence"].as_f64().unwrap();
        assert!((avg - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_query_status_all_and_resolved() {
        let mut query = AlertQuery::from_options(&options()).unwrap();
        query.status = "all".to_string();
        query.severity = vec!["high".to_string()];
        assert!(!query.matches(&rows()[3]));

        query.include_resolved = true;
        assert!(query.matches(&rows()[3]));

        query.project_id = Some("p1".to_string());
        assert!(!query.matches(&rows()[3]));
    }

    #[test]
    fn test_options_without_defaults_are_rejected() {
        let err = AlertQuery::from_options(&json!({"severity": ["high"]})).unwrap_err();
        assert_eq!(err.kind(), crate::types::ErrorKind::Internal);
    }
}
