//! # AIDIS Core - Tool-Call Dispatch and Validation
//!
//! Entry point for every AIDIS tool invocation, providing:
//! - A typed catalog of the tool surface with declarative argument contracts
//! - Strict validation with type coercion, defaults and field-level errors
//! - Name-based dispatch, including discriminant sub-dispatch for
//!   consolidated tools
//! - Uniform success/failure envelopes with timing and migration metadata
//! - Built-in navigation tools (`aidis_help`, `aidis_explain`, `aidis_examples`)
//! - Fire-and-forget audit events
//!
//! ## Architecture
//!
//! Handlers are external collaborators bound at startup; the core owns
//! everything between the wire and the handler:
//! ```text
//!                    ┌──────────────────────────────────────────┐
//!   {toolName,  →    │                Executor                  │  →  envelope
//!    args}           │  ┌─────────┐ ┌──────────┐ ┌───────────┐  │
//!                    │  │ Catalog │→│Validator │→│Dispatcher │  │
//!                    │  └─────────┘ └──────────┘ └───────────┘  │
//!                    │          ┌──────────┐ ┌───────────┐      │
//!                    │          │Formatter │ │AuditLogger│      │
//!                    │          └──────────┘ └───────────┘      │
//!                    └──────────────────────────────────────────┘
//! ```

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

// Re-export public API
pub mod dispatch;
pub mod envelope;
pub mod events;
pub mod executor;
pub mod schema;
pub mod tools;
pub mod types;

// Internal utilities
pub mod observability;

pub use dispatch::{handler_fn, Dispatcher, ToolHandler, ToolOutput};
pub use envelope::{CallEnvelope, ResponseEnvelope, ToolCall};
pub use executor::Executor;
pub use tools::ToolCatalog;
pub use types::{Config, Error, ErrorKind, Result};
