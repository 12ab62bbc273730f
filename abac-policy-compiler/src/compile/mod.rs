//! Policy compilation
//!
//! Turns a [`SelectionState`] into a [`PolicyDocument`]:
//! - subject and resource condition lists are built once from the catalog
//! - the action × resource cross product is expanded into rules
//! - selected additional resources get one shared condition list
//! - everything is merged into the final document
//!
//! A selection with no subject, no actions or no resources is rejected with
//! [`crate::PolicyCompilerError::IncompleteSelection`]; a document with an empty
//! rule set is never produced.

mod additional;
mod assembler;
mod conditions;
mod options;
mod rules;

use log::{debug, info};

pub use additional::attach_additional_resources;
pub use assembler::assemble_document;
pub use conditions::build_conditions;
pub use options::{CompileOptions, RuleIdScheme, DEFAULT_DESCRIPTION};

use crate::catalog::AttributeCatalog;
use crate::directory::Directory;
use crate::error::{IncompleteSelection, PolicyCompilerResult};
use crate::selection::SelectionState;
use crate::types::PolicyDocument;
use rules::{RuleExpander, RuleIdBatch};

/// Compiles selections against one catalog and directory.
///
/// The compiler holds no state between calls; compiling the same selection
/// twice yields the same document apart from the rule id token.
#[derive(Debug, Clone)]
pub struct PolicyCompiler<'a> {
    catalog: &'a AttributeCatalog,
    directory: &'a Directory,
    options: CompileOptions,
}

impl<'a> PolicyCompiler<'a> {
    pub fn new(catalog: &'a AttributeCatalog, directory: &'a Directory) -> Self {
        Self::with_options(catalog, directory, CompileOptions::default())
    }

    pub fn with_options(
        catalog: &'a AttributeCatalog,
        directory: &'a Directory,
        options: CompileOptions,
    ) -> Self {
        Self {
            catalog,
            directory,
            options,
        }
    }

    pub fn compile(&self, selection: &SelectionState) -> PolicyCompilerResult<PolicyDocument> {
        let subject_id = check_complete(selection)?;

        let subject_attributes = build_conditions(self.catalog, &selection.subject_conditions);
        let resource_attributes = build_conditions(self.catalog, &selection.resource_conditions);

        let expander = RuleExpander::new(self.directory, RuleIdBatch::new(&self.options.rule_ids));
        let rules = expander.expand(
            subject_id,
            &selection.action_ids,
            &selection.resource_ids,
            &subject_attributes,
            &resource_attributes,
        );
        debug!(
            "Expanded {} actions x {} resources into {} rules",
            selection.action_ids.len(),
            selection.resource_ids.len(),
            rules.len()
        );
        let additional_resources = attach_additional_resources(self.catalog, selection);

        let document = assemble_document(
            selection,
            subject_id,
            rules,
            additional_resources,
            &self.options.default_description,
        );
        info!(
            "Compiled policy '{}' with {} rules and {} additional resources",
            document.name,
            document.rules.len(),
            document.additional_resources.len()
        );
        Ok(document)
    }
}

/// Check that a selection can be compiled and return its subject id.
pub fn check_complete(selection: &SelectionState) -> Result<&str, IncompleteSelection> {
    let subject_id = selection.subject().ok_or(IncompleteSelection::MissingSubject)?;
    if selection.action_ids.is_empty() {
        return Err(IncompleteSelection::NoActions);
    }
    if selection.resource_ids.is_empty() {
        return Err(IncompleteSelection::NoResources);
    }
    Ok(subject_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AttributeCategory, AttributeDefinition, DataType};
    use crate::directory::NamedEntity;
    use crate::operator::Operator;
    use crate::selection::ConditionSelection;
    use crate::types::{AttributeCondition, Effect};
    use rstest::rstest;
    use serde_json::json;

    fn catalog() -> AttributeCatalog {
        AttributeCatalog::new(vec![
            AttributeDefinition::new("attr-dept", "department", DataType::String)
                .with_display_name("Department")
                .with_category(AttributeCategory::Subject),
            AttributeDefinition::new("attr-tags", "tags", DataType::Array)
                .with_display_name("Tags")
                .with_category(AttributeCategory::Resource),
            AttributeDefinition::new("attr-retention", "retention", DataType::Number)
                .with_display_name("Retention")
                .with_category(AttributeCategory::AdditionalResource),
        ])
    }

    fn directory() -> Directory {
        Directory {
            actions: vec![NamedEntity::new("Read", "Read"), NamedEntity::new("Export", "Export")],
            ..Directory::default()
        }
    }

    fn finance_selection() -> SelectionState {
        SelectionState {
            name: "Finance invoices".to_string(),
            subject_id: Some("Finance Team".to_string()),
            action_ids: vec!["Read".to_string(), "Export".to_string()],
            resource_ids: vec!["Invoices".to_string()],
            subject_conditions: ConditionSelection::default()
                .with_condition("attr-dept", "equals", json!("Finance")),
            ..SelectionState::default()
        }
    }

    fn fixed_ids() -> CompileOptions {
        CompileOptions::default().with_rule_ids(RuleIdScheme::Fixed("42".to_string()))
    }

    #[test]
    fn test_compile_finance_team_policy() {
        let catalog = catalog();
        let directory = directory();
        let document = PolicyCompiler::new(&catalog, &directory)
            .compile(&finance_selection())
            .unwrap();

        assert_eq!(document.rules.len(), 2);
        let expected = [AttributeCondition {
            name: "department".to_string(),
            operator: Operator::Equals,
            value: json!("Finance"),
        }];
        for (rule, action) in document.rules.iter().zip(["Read", "Export"]) {
            assert_eq!(&*rule.subject.attributes, &expected);
            assert_eq!(rule.subject.target_type, "Finance Team");
            assert_eq!(rule.action.name, action);
            assert_eq!(rule.object.target_type, "Invoices");
            assert!(rule.object.attributes.is_empty());
        }
        assert_eq!(document.subjects, vec!["Finance Team"]);
        assert_eq!(document.effect, Effect::Allow);
        assert!(document.additional_resources.is_empty());
    }

    #[test]
    fn test_array_attribute_defaults_to_includes() {
        let catalog = catalog();
        let directory = directory();
        let selection = SelectionState {
            resource_conditions: ConditionSelection::default()
                .with_value("attr-tags", json!(["pii", "finance"])),
            ..finance_selection()
        };

        let document = PolicyCompiler::new(&catalog, &directory)
            .compile(&selection)
            .unwrap();
        assert_eq!(
            document.rules[0].object.attributes[0].operator,
            Operator::Includes
        );
    }

    #[test]
    fn test_compile_is_idempotent() {
        let catalog = catalog();
        let directory = directory();
        let compiler = PolicyCompiler::with_options(&catalog, &directory, fixed_ids());
        let selection = SelectionState {
            additional_resource_ids: vec!["Archive".to_string()],
            additional_resource_conditions: ConditionSelection::default()
                .with_condition("attr-retention", "greater_than", json!(30)),
            ..finance_selection()
        };

        let first = compiler.compile(&selection).unwrap();
        let second = compiler.compile(&selection).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_timestamp_ids_differ_only_in_token() {
        let catalog = catalog();
        let directory = directory();
        let compiler = PolicyCompiler::new(&catalog, &directory);
        let document = compiler.compile(&finance_selection()).unwrap();

        for (index, rule) in document.rules.iter().enumerate() {
            let suffix = format!("-{index}");
            assert!(rule.id.starts_with("rule-"), "{}", rule.id);
            assert!(rule.id.ends_with(&suffix), "{}", rule.id);
        }
    }

    #[rstest]
    #[case::no_subject(
        SelectionState { subject_id: None, ..finance_selection() },
        IncompleteSelection::MissingSubject
    )]
    #[case::blank_subject(
        SelectionState { subject_id: Some(" ".to_string()), ..finance_selection() },
        IncompleteSelection::MissingSubject
    )]
    #[case::no_actions(
        SelectionState { action_ids: vec![], ..finance_selection() },
        IncompleteSelection::NoActions
    )]
    #[case::no_resources(
        SelectionState { resource_ids: vec![], ..finance_selection() },
        IncompleteSelection::NoResources
    )]
    #[case::no_actions_or_resources(
        SelectionState { action_ids: vec![], resource_ids: vec![], ..finance_selection() },
        IncompleteSelection::NoActions
    )]
    fn test_incomplete_selection_is_rejected(
        #[case] selection: SelectionState,
        #[case] expected: IncompleteSelection,
    ) {
        let catalog = catalog();
        let directory = directory();
        let error = PolicyCompiler::new(&catalog, &directory)
            .compile(&selection)
            .unwrap_err();
        assert_eq!(error.incomplete_selection(), Some(expected));
    }

    #[test]
    fn test_blank_description_gets_built_in_default() {
        let catalog = catalog();
        let directory = directory();
        let selection = SelectionState {
            description: "  ".to_string(),
            ..finance_selection()
        };
        let document = PolicyCompiler::new(&catalog, &directory)
            .compile(&selection)
            .unwrap();
        assert_eq!(document.description, DEFAULT_DESCRIPTION);
    }

    #[test]
    fn test_default_description_applied() {
        let catalog = catalog();
        let directory = directory();
        let options = fixed_ids().with_default_description("Created in the policy wizard");
        let document = PolicyCompiler::with_options(&catalog, &directory, options)
            .compile(&finance_selection())
            .unwrap();
        assert_eq!(document.description, "Created in the policy wizard");
    }

    #[test]
    fn test_stale_attribute_is_skipped() {
        let catalog = catalog();
        let directory = directory();
        let selection = SelectionState {
            subject_conditions: ConditionSelection::default()
                .with_value("attr-deleted", json!("x"))
                .with_value("attr-dept", json!("Finance")),
            ..finance_selection()
        };
        let document = PolicyCompiler::new(&catalog, &directory)
            .compile(&selection)
            .unwrap();
        let names: Vec<_> = document.rules[0]
            .subject
            .attributes
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["department"]);
    }
}
