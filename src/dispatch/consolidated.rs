//! Consolidated-tool adapter.
//!
//! One registered tool fronts several legacy operations, selected by a
//! discriminant field. Selection is two explicit steps: [`ConsolidatedTool::resolve`]
//! checks the discriminant against the closed branch set, then
//! [`ConsolidatedTool::handle`] routes through the branch table.

use super::handler::{ToolHandler, ToolOutput};
use crate::envelope::ConsolidationInfo;
use crate::schema::VariantRule;
use crate::types::{Error, Result};
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;

/// A branch bound to its handler.
#[derive(Debug, Clone)]
pub struct BoundBranch {
    pub value: String,
    pub replaces: Vec<String>,
    pub handler: Arc<dyn ToolHandler>,
}

/// Discriminant router for one consolidated tool.
#[derive(Debug, Clone)]
pub struct ConsolidatedTool {
    tool: String,
    discriminant: String,
    phase: String,
    branches: IndexMap<String, BoundBranch>,
}

impl ConsolidatedTool {
    /// Bind every branch of `variant`. `lookup` returns the handler for a
    /// branch value; a missing handler is a configuration defect.
    pub fn bind<F>(tool: &str, variant: &VariantRule, mut lookup: F) -> Result<Self>
    where
        F: FnMut(&str) -> Option<Arc<dyn ToolHandler>>,
    {
        let mut branches = IndexMap::new();
        for rule in variant.branches.values() {
            let handler = lookup(&rule.value).ok_or_else(|| {
                Error::internal(format!(
                    "No handler bound for {} {}='{}'",
                    tool, variant.discriminant, rule.value
                ))
            })?;
            branches.insert(
                rule.value.clone(),
                BoundBranch {
                    value: rule.value.clone(),
                    replaces: rule.replaces.clone(),
                    handler,
                },
            );
        }
        Ok(Self {
            tool: tool.to_string(),
            discriminant: variant.discriminant.clone(),
            phase: variant.phase.clone(),
            branches,
        })
    }

    pub fn discriminant(&self) -> &str {
        &self.discriminant
    }

    pub fn values(&self) -> Vec<&str> {
        self.branches.keys().map(String::as_str).collect()
    }

    /// Select the branch named by the discriminant.
    ///
    /// Missing and unknown values are validation-class errors that list the
    /// full valid set. No handler runs on either path.
    pub fn resolve(&self, args: &Value) -> Result<&BoundBranch> {
        let valid = self.values().join(", ");
        let value = match args.get(&self.discriminant) {
            None | Some(Value::Null) => {
                return Err(Error::validation(format!(
                    "Missing required parameter '{}' for {}. Valid values: {}",
                    self.discriminant, self.tool, valid
                )))
            }
            Some(Value::String(s)) => s.as_str(),
            Some(other) => {
                return Err(Error::validation(format!(
                    "Invalid {} {} for {}. Valid values: {}",
                    self.discriminant, other, self.tool, valid
                )))
            }
        };
        self.branches.get(value).ok_or_else(|| {
            Error::validation(format!(
                "Invalid {} '{}' for {}. Valid values: {}",
                self.discriminant, value, self.tool, valid
            ))
        })
    }

    /// Route to the selected branch and attach consolidation details.
    pub async fn handle(&self, args: Value) -> Result<ToolOutput> {
        let branch = self.resolve(&args)?;
        tracing::debug!(
            tool = %self.tool,
            branch = %branch.value,
            "Routing consolidated call"
        );
        let data = branch.handler.call(args).await?;
        Ok(ToolOutput {
            data,
            consolidation: Some(ConsolidationInfo::new(&self.phase, &branch.replaces)),
        })
    }
}
