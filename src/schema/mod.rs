//! Input contracts and their validator.
//!
//! Contracts are declared once per tool (see `tools::definitions`) and drive
//! validation, parameter documentation and JSON Schema export alike.

pub mod contract;
mod json_schema;
pub mod validate;

pub use contract::{
    BranchRule, Contract, FieldRestriction, FieldRule, FieldType, StringFormat, UnknownFields,
    VariantRule,
};
pub use validate::{validate_contract, FieldError, ValidationFailure, ValidationResult};
