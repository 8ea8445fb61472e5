//! Handler capability seam.
//!
//! Business logic lives outside this crate. Each tool (or consolidated
//! branch) is bound to one [`ToolHandler`], which receives arguments that
//! have already been validated and defaulted.

use crate::envelope::ConsolidationInfo;
use crate::types::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// One callable operation.
#[async_trait]
pub trait ToolHandler: fmt::Debug + Send + Sync {
    /// Invoke with normalized arguments (always a JSON object).
    async fn call(&self, args: Value) -> Result<Value>;
}

/// Result of a successful dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub data: Value,
    /// Present only for consolidated tools.
    pub consolidation: Option<ConsolidationInfo>,
}

impl ToolOutput {
    pub fn plain(data: Value) -> Self {
        Self {
            data,
            consolidation: None,
        }
    }
}

/// Adapter turning an async closure into a handler.
pub struct FnHandler<F> {
    f: F,
}

impl<F> fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler").finish_non_exhaustive()
    }
}

#[async_trait]
impl<F, Fut> ToolHandler for FnHandler<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value>> + Send,
{
    async fn call(&self, args: Value) -> Result<Value> {
        (self.f)(args).await
    }
}

/// Wrap an async closure as a shareable handler.
///
/// ```
/// use aidis_core::dispatch::handler_fn;
/// use serde_json::json;
///
/// let echo = handler_fn(|args| async move { Ok(json!({ "echo": args })) });
/// # let _ = echo;
/// ```
pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn ToolHandler>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    Arc::new(FnHandler { f })
}
