//! Core types for the dispatch core.
//!
//! This module provides foundational types used throughout the system:
//! - **IDs**: Strongly-typed identifiers (CorrelationId)
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Configuration structures for dispatch, audit, and observability

mod config;
mod errors;
mod ids;

pub use config::{AuditConfig, Config, DispatchConfig, ObservabilityConfig};
pub use errors::{Error, ErrorKind, Result};
pub use ids::CorrelationId;
