//! Startup consistency check between contracts, examples and exported schemas.
//!
//! Parameter docs are derived from contracts, so the only remaining drift is
//! between a tool's stored examples and its contract, and between the contract
//! and the JSON Schema advertised to transports. Both are verified here before
//! the executor accepts its first call.

use super::catalog::{ToolCatalog, ToolDefinition};
use crate::schema::validate_contract;
use crate::types::{Error, Result};

impl ToolCatalog {
    /// Verify every definition. Name uniqueness is already enforced by
    /// [`ToolCatalog::register`]; all other problems are collected into one
    /// `Internal` error.
    pub fn check_consistency(&self) -> Result<()> {
        let mut problems = Vec::new();
        for definition in self.definitions() {
            check_definition(definition, &mut problems);
        }

        if problems.is_empty() {
            tracing::debug!(tools = self.len(), "Tool catalog consistency check passed");
            Ok(())
        } else {
            Err(Error::internal(format!(
                "Tool catalog is inconsistent: {}",
                problems.join("; ")
            )))
        }
    }
}

fn check_definition(definition: &ToolDefinition, problems: &mut Vec<String>) {
    let name = &definition.name;

    if definition.category.is_empty() {
        problems.push(format!("{}: category is empty", name));
    }
    if definition.description.is_empty() {
        problems.push(format!("{}: description is empty", name));
    }

    if let Some(variant) = definition.variant() {
        let declared = definition
            .contract
            .get(&variant.discriminant)
            .and_then(|rule| rule.field_type.enum_values());
        let branches: Vec<&str> = variant.values();
        match declared {
            Some(values) if values.iter().map(String::as_str).eq(branches.iter().copied()) => {}
            Some(values) => problems.push(format!(
                "{}: discriminant '{}' declares [{}] but branches are [{}]",
                name,
                variant.discriminant,
                values.join(", "),
                branches.join(", ")
            )),
            None => problems.push(format!(
                "{}: discriminant '{}' is not declared as an enum field",
                name, variant.discriminant
            )),
        }
        if definition.contract.get(&variant.options_field).is_none() {
            problems.push(format!(
                "{}: options field '{}' is not declared",
                name, variant.options_field
            ));
        }
        for branch in variant.branches.values() {
            for restriction in &branch.restrictions {
                if definition.contract.get(&restriction.field).is_none() {
                    problems.push(format!(
                        "{}: branch '{}' restricts undeclared field '{}'",
                        name, branch.value, restriction.field
                    ));
                }
            }
        }
    }

    for example in &definition.examples {
        if let Err(failure) = validate_contract(&definition.contract, &example.args) {
            problems.push(format!(
                "{}: example '{}' violates its contract ({})",
                name, example.title, failure
            ));
        }
    }

    let schema = definition.contract.to_json_schema();
    match jsonschema::validator_for(&schema) {
        Ok(validator) => {
            for example in &definition.examples {
                if !validator.is_valid(&example.args) {
                    problems.push(format!(
                        "{}: example '{}' is rejected by the exported input schema",
                        name, example.title
                    ));
                }
            }
        }
        Err(e) => problems.push(format!("{}: exported input schema does not compile: {}", name, e)),
    }
}
