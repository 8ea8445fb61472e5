//! Dispatcher: tool name to bound handler.
//!
//! The routing table is built once by [`DispatcherBuilder::build`], which
//! refuses to produce a dispatcher with any catalog entry left unbound.
//! Lookups are O(1); unknown names return `NotFound` pointing at the help tool.

use super::consolidated::ConsolidatedTool;
use super::handler::{ToolHandler, ToolOutput};
use super::recovery::with_recovery;
use crate::tools::navigation::{builtin_handlers, HELP_TOOL};
use crate::tools::ToolCatalog;
use crate::types::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[derive(Debug)]
enum Route {
    Flat(Arc<dyn ToolHandler>),
    Consolidated(ConsolidatedTool),
}

/// Immutable routing table shared by all in-flight calls.
pub struct Dispatcher {
    routes: HashMap<String, Route>,
    help_tool: String,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("routes", &self.routes.len())
            .field("help_tool", &self.help_tool)
            .finish()
    }
}

impl Dispatcher {
    pub fn builder(catalog: Arc<ToolCatalog>) -> DispatcherBuilder {
        DispatcherBuilder::new(catalog)
    }

    pub fn has_route(&self, tool: &str) -> bool {
        self.routes.contains_key(tool)
    }

    /// Error returned for names with no route.
    pub fn unknown_tool(&self, tool: &str) -> Error {
        Error::not_found(format!(
            "Unknown tool: {}. Use '{}' to see available tools.",
            tool, self.help_tool
        ))
    }

    /// Invoke the handler bound to `tool` with already-normalized arguments.
    ///
    /// Handler errors and panics are contained to this call. Internal, I/O
    /// and serialization failures raised by a handler are reported as
    /// `Handler` errors; validation and not-found errors pass through.
    pub async fn dispatch(&self, tool: &str, args: Value) -> Result<ToolOutput> {
        let route = self.routes.get(tool).ok_or_else(|| self.unknown_tool(tool))?;
        let call = async {
            match route {
                Route::Flat(handler) => handler.call(args).await.map(ToolOutput::plain),
                Route::Consolidated(consolidated) => consolidated.handle(args).await,
            }
        };
        with_recovery(call, tool).await.map_err(|err| match err {
            Error::Internal(_) | Error::Io(_) | Error::Serialization(_) => {
                Error::handler(err.message())
            }
            other => other,
        })
    }
}

/// Collects handler bindings and checks them against the catalog.
pub struct DispatcherBuilder {
    catalog: Arc<ToolCatalog>,
    flat: HashMap<String, Arc<dyn ToolHandler>>,
    branches: HashMap<(String, String), Arc<dyn ToolHandler>>,
    fallback: Option<Arc<dyn ToolHandler>>,
    help_tool: String,
    problems: Vec<String>,
}

impl fmt::Debug for DispatcherBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatcherBuilder")
            .field("flat", &self.flat.len())
            .field("branches", &self.branches.len())
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

impl DispatcherBuilder {
    fn new(catalog: Arc<ToolCatalog>) -> Self {
        let mut flat = HashMap::new();
        for (name, handler) in builtin_handlers(&catalog) {
            if catalog.has_tool(name) {
                flat.insert(name.to_string(), handler);
            }
        }
        Self {
            catalog,
            flat,
            branches: HashMap::new(),
            fallback: None,
            help_tool: HELP_TOOL.to_string(),
            problems: Vec::new(),
        }
    }

    /// Bind a flat tool. Replaces any built-in binding of the same name.
    pub fn handler(mut self, tool: &str, handler: Arc<dyn ToolHandler>) -> Self {
        match self.catalog.get(tool) {
            None => self.problems.push(format!("handler bound for unknown tool '{}'", tool)),
            Some(definition) if definition.is_consolidated() => self.problems.push(format!(
                "'{}' is consolidated; bind its branches instead",
                tool
            )),
            Some(_) => {
                self.flat.insert(tool.to_string(), handler);
            }
        }
        self
    }

    /// Bind one branch of a consolidated tool.
    pub fn branch(mut self, tool: &str, value: &str, handler: Arc<dyn ToolHandler>) -> Self {
        let known = self
            .catalog
            .get(tool)
            .and_then(|d| d.variant())
            .map(|variant| variant.get(value).is_some());
        match known {
            None => self
                .problems
                .push(format!("branch bound for non-consolidated tool '{}'", tool)),
            Some(false) => self
                .problems
                .push(format!("'{}' has no branch '{}'", tool, value)),
            Some(true) => {
                self.branches
                    .insert((tool.to_string(), value.to_string()), handler);
            }
        }
        self
    }

    /// Handler for every tool or branch left unbound at build time.
    pub fn fallback(mut self, handler: Arc<dyn ToolHandler>) -> Self {
        self.fallback = Some(handler);
        self
    }

    /// Discovery tool named in not-found messages.
    pub fn help_tool(mut self, name: &str) -> Self {
        self.help_tool = name.to_string();
        self
    }

    pub fn build(mut self) -> Result<Dispatcher> {
        let mut routes = HashMap::with_capacity(self.catalog.len());

        for definition in self.catalog.definitions() {
            let name = definition.name.as_str();
            match definition.variant() {
                Some(variant) => {
                    let fallback = self.fallback.clone();
                    let branches = &self.branches;
                    match ConsolidatedTool::bind(name, variant, |value| {
                        branches
                            .get(&(name.to_string(), value.to_string()))
                            .cloned()
                            .or_else(|| fallback.clone())
                    }) {
                        Ok(consolidated) => {
                            routes.insert(name.to_string(), Route::Consolidated(consolidated));
                        }
                        Err(e) => self.problems.push(e.message()),
                    }
                }
                None => match self.flat.get(name).cloned().or_else(|| self.fallback.clone()) {
                    Some(handler) => {
                        routes.insert(name.to_string(), Route::Flat(handler));
                    }
                    None => self.problems.push(format!("No handler bound for {}", name)),
                },
            }
        }

        if !self.problems.is_empty() {
            return Err(Error::internal(format!(
                "Dispatcher configuration is incomplete: {}",
                self.problems.join("; ")
            )));
        }

        tracing::debug!(routes = routes.len(), "Dispatcher built");
        Ok(Dispatcher {
            routes,
            help_tool: self.help_tool,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::handler_fn;
    use crate::types::ErrorKind;
    use serde_json::json;

    fn catalog() -> Arc<ToolCatalog> {
        Arc::new(ToolCatalog::standard().unwrap())
    }

    fn echo() -> Arc<dyn ToolHandler> {
        handler_fn(|args| async move { Ok(json!({ "echo": args })) })
    }

    #[test]
    fn test_build_without_bindings_fails() {
        let err = Dispatcher::builder(catalog()).build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(err.message().contains("No handler bound for context_store"));
        assert!(err.message().contains("pattern_insights type='alerts'"));
        // Built-ins are bound automatically.
        assert!(!err.message().contains("for aidis_help"));
    }

    #[test]
    fn test_unknown_bindings_are_rejected() {
        let err = Dispatcher::builder(catalog())
            .handler("no_such_tool", echo())
            .handler("pattern_insights", echo())
            .branch("pattern_insights", "forecast", echo())
            .fallback(echo())
            .build()
            .unwrap_err();
        let message = err.message();
        assert!(message.contains("unknown tool 'no_such_tool'"));
        assert!(message.contains("'pattern_insights' is consolidated"));
        assert!(message.contains("has no branch 'forecast'"));
    }

    #[tokio::test]
    async fn test_unknown_tool_points_to_help() {
        let dispatcher = Dispatcher::builder(catalog()).fallback(echo()).build().unwrap();
        let err = dispatcher.dispatch("no_such_tool", json!({})).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(
            err.message(),
            "Unknown tool: no_such_tool. Use 'aidis_help' to see available tools."
        );
    }

    #[tokio::test]
    async fn test_explicit_binding_wins_over_fallback() {
        let dispatcher = Dispatcher::builder(catalog())
            .handler("context_stats", handler_fn(|_| async { Ok(json!({"total": 12})) }))
            .fallback(echo())
            .build()
            .unwrap();

        let out = dispatcher.dispatch("context_stats", json!({})).await.unwrap();
        assert_eq!(out.data, json!({"total": 12}));
        let out = dispatcher.dispatch("context_get_recent", json!({"limit": 5})).await.unwrap();
        assert_eq!(out.data, json!({"echo": {"limit": 5}}));
    }

    #[tokio::test]
    async fn test_collaborator_internal_error_is_a_handler_error() {
        let dispatcher = Dispatcher::builder(catalog())
            .handler(
                "context_stats",
                handler_fn(|_| async { Err(Error::internal("connection pool not initialized")) }),
            )
            .branch(
                "pattern_insights",
                "alerts",
                Arc::new(crate::dispatch::PatternAlerts::new(
                    crate::dispatch::StaticAlerts::default(),
                )),
            )
            .fallback(echo())
            .build()
            .unwrap();

        let err = dispatcher.dispatch("context_stats", json!({})).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Handler);
        assert_eq!(err.message(), "connection pool not initialized");

        let err = dispatcher
            .dispatch("pattern_insights", json!({"type": "alerts"}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Handler);
        assert!(err.message().contains("without options"));

        // Discriminant errors stay validation-class.
        let err = dispatcher
            .dispatch("pattern_insights", json!({"type": "forecast"}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    #[allow(clippy::panic)]
    async fn test_handler_panic_is_isolated() {
        let dispatcher = Dispatcher::builder(catalog())
            .handler(
                "task_create",
                handler_fn(|args| async move {
                    if args.get("title").is_some() {
                        panic!("constraint violated");
                    }
                    Ok(json!({}))
                }),
            )
            .fallback(echo())
            .build()
            .unwrap();

        let err = dispatcher
            .dispatch("task_create", json!({"title": "x"}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Handler);
        assert!(err.message().contains("constraint violated"));

        // The dispatcher keeps serving after a panic.
        assert!(dispatcher.dispatch("task_list", json!({})).await.is_ok());
    }

    #[tokio::test]
    async fn test_consolidated_route_attaches_info() {
        let dispatcher = Dispatcher::builder(catalog())
            .branch(
                "metrics_analyze",
                "dashboard",
                handler_fn(|_| async { Ok(json!({"widgets": 4})) }),
            )
            .fallback(echo())
            .build()
            .unwrap();

        let out = dispatcher
            .dispatch("metrics_analyze", json!({"operation": "dashboard", "options": {}}))
            .await
            .unwrap();
        assert_eq!(out.data, json!({"widgets": 4}));
        let info = out.consolidation.unwrap();
        assert_eq!(info.phase, "TT009-2-2");
        assert_eq!(info.original_tools, vec!["metrics_get_dashboard".to_string()]);
    }

    #[tokio::test]
    async fn test_help_is_builtin() {
        let dispatcher = Dispatcher::builder(catalog()).fallback(echo()).build().unwrap();
        let out = dispatcher.dispatch("aidis_help", json!({})).await.unwrap();
        assert_eq!(out.data["totalTools"], 41);
    }
}
