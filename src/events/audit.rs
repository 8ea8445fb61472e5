//! Audit events emitted once per call.
//!
//! Emission is fire-and-forget: the sink write runs on a spawned task after
//! the response is computed, and sink failures are logged, never returned.

use crate::envelope::{CallEnvelope, ResponseEnvelope};
use crate::types::{AuditConfig, CorrelationId, Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Info,
    Error,
}

/// One audit record: `{actor, event_type, status, metadata}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub actor: String,
    pub event_type: String,
    pub status: AuditStatus,
    pub correlation_id: CorrelationId,
    pub timestamp: DateTime<Utc>,
    pub metadata: Value,
}

impl AuditEvent {
    /// Build the record for a finished call.
    ///
    /// `phase` is set for consolidated tools; their event type is
    /// `<tool>_consolidated`, other tools use `<tool>_call`. Failures append
    /// `_failed`.
    pub fn for_call(
        actor: &str,
        call: &CallEnvelope,
        response: &ResponseEnvelope,
        phase: Option<&str>,
        error_kind: Option<&str>,
    ) -> Self {
        let base = match phase {
            Some(_) => format!("{}_consolidated", call.tool_name),
            None => format!("{}_call", call.tool_name),
        };

        let mut metadata = json!({
            "toolName": call.tool_name,
            "executionTimeMs": response.execution_time_ms(),
        });
        if let Some(phase) = phase {
            metadata["phase"] = json!(phase);
            metadata["toolType"] = json!("consolidated");
        }
        if let Some(info) = response.consolidation_info() {
            metadata["originalTools"] = json!(info.original_tools);
        }

        let (event_type, status) = match response.error() {
            None => (base, AuditStatus::Info),
            Some(error) => {
                metadata["error"] = json!(error);
                if let Some(kind) = error_kind {
                    metadata["errorKind"] = json!(kind);
                }
                (format!("{}_failed", base), AuditStatus::Error)
            }
        };

        Self {
            actor: actor.to_string(),
            event_type,
            status,
            correlation_id: call.correlation_id.clone(),
            timestamp: Utc::now(),
            metadata,
        }
    }
}

/// Destination for audit events (event store, log, channel).
#[async_trait]
pub trait EventSink: fmt::Debug + Send + Sync {
    async fn record(&self, event: AuditEvent) -> Result<()>;
}

/// Writes each event as a structured `tracing` record.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

#[async_trait]
impl EventSink for TracingEventSink {
    async fn record(&self, event: AuditEvent) -> Result<()> {
        let metadata = serde_json::to_string(&event.metadata)?;
        tracing::info!(
            target: "aidis::audit",
            actor = %event.actor,
            event_type = %event.event_type,
            status = ?event.status,
            correlation_id = %event.correlation_id,
            metadata = %metadata,
            "audit"
        );
        Ok(())
    }
}

/// Forwards events to an mpsc receiver owned by the embedding application.
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    tx: mpsc::Sender<AuditEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<AuditEvent>) -> Self {
        Self { tx }
    }

    /// Sink plus the receiving end, with the given buffer size.
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<AuditEvent>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self::new(tx), rx)
    }
}

#[async_trait]
impl EventSink for ChannelEventSink {
    async fn record(&self, event: AuditEvent) -> Result<()> {
        self.tx
            .send(event)
            .await
            .map_err(|_| Error::internal("audit channel closed"))
    }
}

/// Spawns sink writes off the response path.
#[derive(Debug, Clone)]
pub struct AuditLogger {
    sink: Arc<dyn EventSink>,
    actor: String,
    enabled: bool,
}

impl AuditLogger {
    pub fn new(sink: Arc<dyn EventSink>, config: &AuditConfig) -> Self {
        Self {
            sink,
            actor: config.actor.clone(),
            enabled: config.enabled,
        }
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record `event` in the background.
    ///
    /// Returns the task handle (for tests and graceful shutdown), or `None`
    /// when auditing is disabled or no runtime is available.
    pub fn emit(&self, event: AuditEvent) -> Option<JoinHandle<()>> {
        if !self.enabled {
            return None;
        }
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::warn!(event_type = %event.event_type, "No async runtime; audit event dropped");
                return None;
            }
        };
        let sink = self.sink.clone();
        Some(runtime.spawn(async move {
            let event_type = event.event_type.clone();
            let correlation_id = event.correlation_id.clone();
            if let Err(e) = sink.record(event).await {
                tracing::warn!(
                    event_type = %event_type,
                    correlation_id = %correlation_id,
                    error = %e,
                    "Failed to record audit event"
                );
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::ToolOutput;
    use crate::envelope::{ConsolidationInfo, ResponseFormatter};
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    fn success(tool: &str, consolidation: Option<ConsolidationInfo>) -> (CallEnvelope, ResponseEnvelope) {
        let call = CallEnvelope::new(tool, json!({}));
        let response = ResponseFormatter.success(
            ToolOutput {
                data: json!({}),
                consolidation,
            },
            &call,
        );
        (call, response)
    }

    #[test]
    fn test_consolidated_success_event() {
        let info = ConsolidationInfo::new("TT009-3-2", &["pattern_get_alerts".to_string()]);
        let (call, response) = success("pattern_insights", Some(info));
        let event = AuditEvent::for_call("ai", &call, &response, Some("TT009-3-2"), None);

        assert_eq!(event.event_type, "pattern_insights_consolidated");
        assert_eq!(event.status, AuditStatus::Info);
        assert_eq!(event.metadata["phase"], "TT009-3-2");
        assert_eq!(event.metadata["originalTools"], json!(["pattern_get_alerts"]));
        assert_eq!(event.correlation_id, call.correlation_id);
    }

    #[test]
    fn test_flat_failure_event() {
        let call = CallEnvelope::new("task_create", json!({"title": ""}));
        let response = ResponseFormatter.failure(&Error::validation("Validation failed"), &call);
        let event = AuditEvent::for_call("ai", &call, &response, None, Some("validation"));

        assert_eq!(event.event_type, "task_create_call_failed");
        assert_eq!(event.status, AuditStatus::Error);
        assert_eq!(event.metadata["errorKind"], "validation");
        assert!(event.metadata.get("phase").is_none());
    }

    #[tokio::test]
    async fn test_channel_sink_receives_event() {
        let (sink, mut rx) = ChannelEventSink::channel(4);
        let logger = AuditLogger::new(Arc::new(sink), &AuditConfig::default());
        let (call, response) = success("context_stats", None);

        logger
            .emit(AuditEvent::for_call(logger.actor(), &call, &response, None, None))
            .unwrap()
            .await
            .unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.actor, "ai");
        assert_eq!(event.event_type, "context_stats_call");
    }

    #[tokio::test]
    async fn test_disabled_logger_emits_nothing() {
        let (sink, mut rx) = ChannelEventSink::channel(1);
        let config = AuditConfig {
            enabled: false,
            ..AuditConfig::default()
        };
        let logger = AuditLogger::new(Arc::new(sink), &config);
        let (call, response) = success("context_stats", None);

        assert!(logger
            .emit(AuditEvent::for_call("ai", &call, &response, None, None))
            .is_none());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    #[traced_test]
    async fn test_sink_failure_is_swallowed_and_logged() {
        let (sink, rx) = ChannelEventSink::channel(1);
        drop(rx);
        let logger = AuditLogger::new(Arc::new(sink), &AuditConfig::default());
        let (call, response) = success("context_stats", None);

        logger
            .emit(AuditEvent::for_call("ai", &call, &response, None, None))
            .unwrap()
            .await
            .unwrap();

        assert!(logs_contain("Failed to record audit event"));
        assert!(logs_contain("audit channel closed"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_tracing_sink_writes_record() {
        let logger = AuditLogger::new(Arc::new(TracingEventSink), &AuditConfig::default());
        let (call, response) = success("aidis_ping", None);

        logger
            .emit(AuditEvent::for_call("ai", &call, &response, None, None))
            .unwrap()
            .await
            .unwrap();

        assert!(logs_contain("aidis_ping_call"));
    }
}
