//! Audit event infrastructure.
//!
//! Every call produces one [`AuditEvent`], handed to an [`EventSink`] by the
//! [`AuditLogger`] without delaying the caller's response.

pub mod audit;

pub use audit::{AuditEvent, AuditLogger, AuditStatus, ChannelEventSink, EventSink, TracingEventSink};
