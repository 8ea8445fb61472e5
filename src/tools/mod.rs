//! Tool catalog, static tool definitions and discovery tools.
//!
//! The catalog is built once at startup from [`definitions`] and shared
//! read-only by the validator, the dispatcher and the discovery tools.

pub mod catalog;
mod consistency;
mod definitions;
pub mod navigation;

pub use catalog::{ParameterDoc, ToolCatalog, ToolDefinition, ToolExample};
pub use navigation::{ExamplesTool, ExplainTool, HelpTool, PingTool, HELP_TOOL};
