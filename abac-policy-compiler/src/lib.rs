//! This crate provides the core of the ABAC policy authoring wizard:
//! - Attribute catalog loading and lookup
//! - Operator resolution per attribute data type
//! - Compilation of wizard selections into policy documents
//! - Natural-language rendering of a selection
//! - Hydration of a selection from a stored policy document
//!
//! The core is synchronous and side-effect free. Fetching the catalog and
//! persisting documents are left to the caller.

mod catalog;
pub mod compile;
mod directory;
mod error;
mod hydrate;
mod operator;
pub mod render;
mod selection;
mod types;

// Re-exports for a small, focused public API
pub use catalog::{
    AttributeCatalog, AttributeCategory, AttributeConstraints, AttributeDefinition, DataType,
};
pub use compile::{
    check_complete, CompileOptions, PolicyCompiler, RuleIdScheme, DEFAULT_DESCRIPTION,
};
pub use directory::{Directory, EntityKind, NamedEntity};
pub use error::{IncompleteSelection, PolicyCompilerError, PolicyCompilerResult};
pub use hydrate::hydrate_selection;
pub use operator::{resolve_operator, Operator, OperatorDomain, UnknownOperator};
pub use render::{join_list, render_sentence};
pub use selection::{has_value, ConditionSelection, SelectionState};
pub use types::{
    AdditionalResourceAttachment, AttributeCondition, Conditions, Effect, PolicyDocument,
    PolicyStatus, Rule, RuleAction, RuleTarget,
};
