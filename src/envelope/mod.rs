//! Call and response envelopes.
//!
//! A [`CallEnvelope`] wraps one inbound invocation for the lifetime of the
//! call. The [`ResponseFormatter`] turns the dispatch outcome into a
//! [`ResponseEnvelope`], which is the only shape callers ever see:
//!
//! - **Success**: `{success: true, data, executionTimeMs, consolidationInfo?}`
//! - **Failure**: `{success: false, error, toolName, executionTimeMs}`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

use crate::dispatch::ToolOutput;
use crate::types::{CorrelationId, Error, Result};

/// Wire form of an invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCall {
    pub tool_name: String,
    #[serde(default)]
    pub args: Value,
}

/// One in-flight call. Created on receipt, dropped after the response.
#[derive(Debug, Clone)]
pub struct CallEnvelope {
    pub tool_name: String,
    pub raw_args: Value,
    pub correlation_id: CorrelationId,
    pub received_at: DateTime<Utc>,
    started: Instant,
}

impl CallEnvelope {
    pub fn new(tool_name: impl Into<String>, raw_args: Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            raw_args,
            correlation_id: CorrelationId::new(),
            received_at: Utc::now(),
            started: Instant::now(),
        }
    }

    /// Reuse a caller-supplied correlation id.
    pub fn with_correlation_id(mut self, id: CorrelationId) -> Self {
        self.correlation_id = id;
        self
    }

    /// Milliseconds since the call was received (monotonic clock).
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

impl From<ToolCall> for CallEnvelope {
    fn from(call: ToolCall) -> Self {
        Self::new(call.tool_name, call.args)
    }
}

/// Migration details attached to consolidated tool responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidationInfo {
    pub phase: String,
    /// Primary legacy tool the selected branch stands in for.
    pub original_tool_replaced: String,
    pub original_tools: Vec<String>,
}

impl ConsolidationInfo {
    pub fn new(phase: &str, original_tools: &[String]) -> Self {
        Self {
            phase: phase.to_string(),
            original_tool_replaced: original_tools.first().cloned().unwrap_or_default(),
            original_tools: original_tools.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessEnvelope {
    pub success: bool,
    pub data: Value,
    pub execution_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consolidation_info: Option<ConsolidationInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureEnvelope {
    pub success: bool,
    pub error: String,
    pub tool_name: String,
    pub execution_time_ms: u64,
}

/// Uniform response for every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseEnvelope {
    Success(SuccessEnvelope),
    Failure(FailureEnvelope),
}

impl ResponseEnvelope {
    pub fn is_success(&self) -> bool {
        matches!(self, ResponseEnvelope::Success(_))
    }

    pub fn execution_time_ms(&self) -> u64 {
        match self {
            ResponseEnvelope::Success(s) => s.execution_time_ms,
            ResponseEnvelope::Failure(f) => f.execution_time_ms,
        }
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            ResponseEnvelope::Success(s) => Some(&s.data),
            ResponseEnvelope::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ResponseEnvelope::Success(_) => None,
            ResponseEnvelope::Failure(f) => Some(&f.error),
        }
    }

    pub fn consolidation_info(&self) -> Option<&ConsolidationInfo> {
        match self {
            ResponseEnvelope::Success(s) => s.consolidation_info.as_ref(),
            ResponseEnvelope::Failure(_) => None,
        }
    }

    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Builds response envelopes. Timing is measured at formatting time.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseFormatter;

impl ResponseFormatter {
    pub fn format(&self, outcome: &Result<ToolOutput>, call: &CallEnvelope) -> ResponseEnvelope {
        match outcome {
            Ok(output) => self.success(output.clone(), call),
            Err(err) => self.failure(err, call),
        }
    }

    pub fn success(&self, output: ToolOutput, call: &CallEnvelope) -> ResponseEnvelope {
        ResponseEnvelope::Success(SuccessEnvelope {
            success: true,
            data: output.data,
            execution_time_ms: call.elapsed_ms(),
            consolidation_info: output.consolidation,
        })
    }

    pub fn failure(&self, err: &Error, call: &CallEnvelope) -> ResponseEnvelope {
        ResponseEnvelope::Failure(FailureEnvelope {
            success: false,
            error: err.message(),
            tool_name: call.tool_name.clone(),
            execution_time_ms: call.elapsed_ms(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_tool_call_wire_shape() {
        let call: ToolCall =
            serde_json::from_value(json!({"toolName": "aidis_ping", "args": {"message": "hi"}})).unwrap();
        assert_eq!(call.tool_name, "aidis_ping");
        assert_eq!(call.args["message"], "hi");

        let bare: ToolCall = serde_json::from_value(json!({"toolName": "aidis_help"})).unwrap();
        assert_eq!(bare.args, Value::Null);
    }

    #[test]
    fn test_success_shape_has_no_error() {
        let call = CallEnvelope::new("context_stats", json!({}));
        let envelope = ResponseFormatter.success(ToolOutput::plain(json!({"total": 3})), &call);
        let wire = envelope.to_json().unwrap();

        assert_eq!(wire["success"], true);
        assert_eq!(wire["data"], json!({"total": 3}));
        assert!(wire["executionTimeMs"].is_u64());
        assert!(wire.get("error").is_none());
        assert!(wire.get("consolidationInfo").is_none());
    }

    #[test]
    fn test_failure_shape_has_no_data() {
        let call = CallEnvelope::new("no_such_tool", json!({}));
        let err = Error::not_found("Unknown tool: no_such_tool");
        let wire = ResponseFormatter.failure(&err, &call).to_json().unwrap();

        assert_eq!(
            wire,
            json!({
                "success": false,
                "error": "Unknown tool: no_such_tool",
                "toolName": "no_such_tool",
                "executionTimeMs": wire["executionTimeMs"].clone(),
            })
        );
        assert!(wire.get("data").is_none());
    }

    #[test]
    fn test_consolidation_info_serialized_camel_case() {
        let call = CallEnvelope::new("pattern_insights", json!({"type": "alerts"}));
        let output = ToolOutput {
            data: json!({}),
            consolidation: Some(ConsolidationInfo::new(
                "TT009-3-2",
                &["pattern_get_alerts".to_string()],
            )),
        };
        let wire = ResponseFormatter.success(output, &call).to_json().unwrap();
        assert_eq!(
            wire["consolidationInfo"],
            json!({
                "phase": "TT009-3-2",
                "originalToolReplaced": "pattern_get_alerts",
                "originalTools": ["pattern_get_alerts"],
            })
        );
    }

    #[test]
    fn test_envelope_round_trips_through_untagged_enum() {
        let call = CallEnvelope::new("task_create", json!({}));
        let failure = ResponseFormatter.failure(&Error::validation("title: required field is missing"), &call);
        let back: ResponseEnvelope = serde_json::from_value(failure.to_json().unwrap()).unwrap();
        assert!(!back.is_success());
        assert_eq!(back.error(), Some("title: required field is missing"));
    }
}
