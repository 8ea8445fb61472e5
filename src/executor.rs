//! End-to-end call pipeline.
//!
//! ```text
//! ToolCall ─► CallEnvelope ─► known tool? ─► Validator ─► Dispatcher ─► ResponseFormatter ─► caller
//!                                 │              │             │                 │
//!                                 └── NotFound ──┴─ Validation ┴── Handler ──────┴─► AuditLogger (spawned)
//! ```
//!
//! Validation and not-found failures short-circuit before any handler runs.
//! Every call, successful or not, yields exactly one envelope and one audit
//! event.

use crate::dispatch::{Dispatcher, ToolOutput};
use crate::envelope::{CallEnvelope, ResponseEnvelope, ResponseFormatter, ToolCall};
use crate::events::{AuditEvent, AuditLogger, EventSink, TracingEventSink};
use crate::tools::ToolCatalog;
use crate::types::{AuditConfig, Config, Error, ErrorKind, Result};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;

#[derive(Debug)]
pub struct Executor {
    catalog: Arc<ToolCatalog>,
    dispatcher: Dispatcher,
    formatter: ResponseFormatter,
    audit_config: AuditConfig,
    audit: AuditLogger,
    slow_call_threshold: Duration,
}

impl Executor {
    /// Assemble the pipeline. Fails if the catalog is inconsistent.
    pub fn new(catalog: Arc<ToolCatalog>, dispatcher: Dispatcher, config: &Config) -> Result<Self> {
        catalog.check_consistency()?;
        tracing::info!(
            tools = catalog.len(),
            audit = config.audit.enabled,
            "Tool executor ready"
        );
        Ok(Self {
            audit: AuditLogger::new(Arc::new(TracingEventSink), &config.audit),
            audit_config: config.audit.clone(),
            catalog,
            dispatcher,
            formatter: ResponseFormatter,
            slow_call_threshold: config.dispatch.slow_call_threshold,
        })
    }

    /// Replace the default tracing audit sink.
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.audit = AuditLogger::new(sink, &self.audit_config);
        self
    }

    pub fn catalog(&self) -> &Arc<ToolCatalog> {
        &self.catalog
    }

    /// Execute a wire-format call.
    pub async fn execute(&self, call: ToolCall) -> ResponseEnvelope {
        self.execute_envelope(CallEnvelope::from(call)).await
    }

    /// Execute `tool` with raw arguments.
    pub async fn call(&self, tool: &str, args: Value) -> ResponseEnvelope {
        self.execute_envelope(CallEnvelope::new(tool, args)).await
    }

    pub async fn execute_envelope(&self, call: CallEnvelope) -> ResponseEnvelope {
        let span = tracing::info_span!(
            "tool_call",
            tool = %call.tool_name,
            correlation_id = %call.correlation_id,
        );
        async {
            let outcome = self.run(&call).await;
            let response = self.formatter.format(&outcome, &call);
            self.log_outcome(&call, &outcome, &response);
            self.audit(&call, &response, outcome.as_ref().err());
            response
        }
        .instrument(span)
        .await
    }

    /// Validate without dispatching. Returns the normalized arguments.
    pub fn validate_only(&self, tool: &str, raw: &Value) -> Result<Value> {
        if !self.catalog.has_tool(tool) {
            return Err(self.dispatcher.unknown_tool(tool));
        }
        self.catalog
            .validate(tool, raw)?
            .map(Value::Object)
            .map_err(|failure| failure.into_error(tool))
    }

    async fn run(&self, call: &CallEnvelope) -> Result<ToolOutput> {
        let args = self.validate_only(&call.tool_name, &call.raw_args)?;
        self.dispatcher.dispatch(&call.tool_name, args).await
    }

    fn log_outcome(&self, call: &CallEnvelope, outcome: &Result<ToolOutput>, response: &ResponseEnvelope) {
        let elapsed_ms = response.execution_time_ms();
        match outcome {
            Ok(_) => tracing::debug!(elapsed_ms, "Tool call succeeded"),
            Err(e) => match e.kind() {
                ErrorKind::Validation => tracing::debug!(error = %e, "Tool call rejected"),
                ErrorKind::NotFound => tracing::warn!(error = %e, "Tool call not found"),
                ErrorKind::Handler => tracing::warn!(error = %e, elapsed_ms, "Tool handler failed"),
                ErrorKind::Internal => tracing::error!(error = %e, "Tool call hit a configuration defect"),
            },
        }
        if Duration::from_millis(elapsed_ms) >= self.slow_call_threshold {
            tracing::warn!(
                tool = %call.tool_name,
                elapsed_ms,
                threshold_ms = u64::try_from(self.slow_call_threshold.as_millis()).unwrap_or(u64::MAX),
                "Slow tool call"
            );
        }
    }

    fn audit(&self, call: &CallEnvelope, response: &ResponseEnvelope, error: Option<&Error>) {
        let phase = self
            .catalog
            .get(&call.tool_name)
            .and_then(|d| d.variant())
            .map(|v| v.phase.as_str());
        let event = AuditEvent::for_call(
            self.audit.actor(),
            call,
            response,
            phase,
            error.map(|e| e.kind().as_str()),
        );
        // Fire-and-forget; the handle is only useful to tests.
        drop(self.audit.emit(event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::handler_fn;
    use crate::events::ChannelEventSink;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn executor() -> Executor {
        let catalog = Arc::new(ToolCatalog::standard().unwrap());
        let dispatcher = Dispatcher::builder(catalog.clone())
            .fallback(handler_fn(|args| async move { Ok(args) }))
            .build()
            .unwrap();
        Executor::new(catalog, dispatcher, &Config::default()).unwrap()
    }

    #[tokio::test]
    async fn test_success_passes_normalized_args() {
        let response = executor()
            .call("context_search", json!({"query": "auth", "ignored": 1}))
            .await;
        let data = response.data().unwrap();
        assert_eq!(data["limit"], 10);
        assert!(data.get("ignored").is_none());
    }

    #[tokio::test]
    async fn test_validation_failure_lists_every_field() {
        let response = executor()
            .call("context_store", json!({"content": "", "type": "poem"}))
            .await;
        let error = response.error().unwrap();
        assert!(error.starts_with("Validation failed for context_store"));
        assert!(error.contains("content:"));
        assert!(error.contains("type:"));
    }

    #[tokio::test]
    async fn test_audit_event_for_each_call() {
        let (sink, mut rx) = ChannelEventSink::channel(8);
        let executor = executor().with_event_sink(Arc::new(sink));

        executor.call("aidis_ping", json!({})).await;
        executor.call("nope", json!({})).await;

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        let mut types = vec![first.event_type, second.event_type];
        types.sort();
        assert_eq!(types, vec!["aidis_ping_call", "nope_call_failed"]);
    }

    #[test]
    fn test_validate_only() {
        let executor = executor();
        let args = executor
            .validate_only("project_list", &json!({"includeStats": "true"}))
            .unwrap();
        assert_eq!(args, json!({"includeStats": true}));

        let err = executor.validate_only("missing_tool", &json!({})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
