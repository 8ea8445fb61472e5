//! Routing of validated calls to handlers.
//!
//! - [`Dispatcher`]: name to handler table built once at startup
//! - [`ConsolidatedTool`]: discriminant sub-dispatch inside one tool
//! - [`ToolHandler`]: the capability external collaborators implement

mod consolidated;
mod handler;
pub mod patterns;
mod recovery;
mod router;

pub use consolidated::{BoundBranch, ConsolidatedTool};
pub use handler::{handler_fn, FnHandler, ToolHandler, ToolOutput};
pub use patterns::{AlertQuery, AlertSource, PatternAlerts, StaticAlerts};
pub use recovery::with_recovery;
pub use router::{Dispatcher, DispatcherBuilder};
