//! Rule expansion over the action × resource cross product

use std::sync::Arc;

use crate::directory::{Directory, EntityKind};
use crate::types::{Conditions, Rule, RuleAction, RuleTarget};

use super::options::RuleIdScheme;

/// Rule ids for one compile: `rule-<token>-<index>`.
#[derive(Debug, Clone)]
pub(crate) struct RuleIdBatch {
    token: String,
}

impl RuleIdBatch {
    pub(crate) fn new(scheme: &RuleIdScheme) -> Self {
        Self {
            token: scheme.batch_token(),
        }
    }

    fn id(&self, index: usize) -> String {
        format!("rule-{}-{}", self.token, index)
    }
}

/// Expands a subject, its actions and its resources into individual rules.
#[derive(Debug)]
pub(crate) struct RuleExpander<'a> {
    directory: &'a Directory,
    ids: RuleIdBatch,
}

impl<'a> RuleExpander<'a> {
    pub(crate) fn new(directory: &'a Directory, ids: RuleIdBatch) -> Self {
        Self { directory, ids }
    }

    /// One rule per (action, resource) pair, actions outermost.
    ///
    /// The rule at action `i` and resource `j` gets index `i * resources + j`.
    /// Both condition lists are shared by every rule.
    pub(crate) fn expand(
        &self,
        subject_id: &str,
        action_ids: &[String],
        resource_ids: &[String],
        subject_attributes: &Conditions,
        resource_attributes: &Conditions,
    ) -> Vec<Rule> {
        let width = resource_ids.len();
        let mut rules = Vec::with_capacity(action_ids.len() * width);

        for (i, action_id) in action_ids.iter().enumerate() {
            let action = RuleAction {
                name: action_id.clone(),
                display_name: self
                    .directory
                    .label(EntityKind::Action, action_id)
                    .to_string(),
            };
            for (j, resource_id) in resource_ids.iter().enumerate() {
                rules.push(Rule {
                    id: self.ids.id(i * width + j),
                    subject: RuleTarget {
                        target_type: subject_id.to_string(),
                        attributes: Arc::clone(subject_attributes),
                    },
                    action: action.clone(),
                    object: RuleTarget {
                        target_type: resource_id.clone(),
                        attributes: Arc::clone(resource_attributes),
                    },
                    conditions: Vec::new(),
                });
            }
        }

        rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::NamedEntity;
    use crate::operator::Operator;
    use crate::types::AttributeCondition;
    use proptest::prelude::*;
    use serde_json::json;
    use std::collections::HashSet;

    fn expander(directory: &Directory) -> RuleExpander<'_> {
        RuleExpander::new(
            directory,
            RuleIdBatch::new(&RuleIdScheme::Fixed("1700000000000".to_string())),
        )
    }

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_expand_indexes_and_labels() {
        let directory = Directory {
            actions: vec![NamedEntity::new("read", "Read"), NamedEntity::new("export", "Export")],
            ..Directory::default()
        };
        let subject: Conditions = Arc::from(vec![AttributeCondition {
            name: "department".to_string(),
            operator: Operator::Equals,
            value: json!("Finance"),
        }]);
        let object: Conditions = Arc::from(Vec::new());

        let rules = expander(&directory).expand(
            "finance-team",
            &ids(&["read", "export"]),
            &ids(&["invoices", "receipts", "ledgers"]),
            &subject,
            &object,
        );

        assert_eq!(rules.len(), 6);
        assert_eq!(rules[0].id, "rule-1700000000000-0");
        assert_eq!(rules[4].id, "rule-1700000000000-4");
        assert_eq!(rules[4].action.name, "export");
        assert_eq!(rules[4].action.display_name, "Export");
        assert_eq!(rules[4].object.target_type, "receipts");
        assert!(rules.iter().all(|r| r.subject.target_type == "finance-team"));
        assert!(rules.iter().all(|r| r.conditions.is_empty()));
        // Condition lists are shared, not rebuilt per rule
        assert!(rules
            .iter()
            .all(|r| Arc::ptr_eq(&r.subject.attributes, &subject)
                && Arc::ptr_eq(&r.object.attributes, &object)));
    }

    #[test]
    fn test_expand_with_no_resources_is_empty() {
        let directory = Directory::default();
        let none: Conditions = Arc::from(Vec::new());
        let rules = expander(&directory).expand("s", &ids(&["read"]), &[], &none, &none);
        assert!(rules.is_empty());
    }

    proptest! {
        #[test]
        fn prop_expansion_covers_cross_product(actions in 1usize..6, resources in 1usize..6) {
            let directory = Directory::default();
            let action_ids: Vec<String> = (0..actions).map(|i| format!("a{i}")).collect();
            let resource_ids: Vec<String> = (0..resources).map(|j| format!("r{j}")).collect();
            let none: Conditions = Arc::from(Vec::new());

            let rules = expander(&directory).expand("s", &action_ids, &resource_ids, &none, &none);

            prop_assert_eq!(rules.len(), actions * resources);
            let pairs: HashSet<_> = rules
                .iter()
                .map(|r| (r.action.name.clone(), r.object.target_type.clone()))
                .collect();
            prop_assert_eq!(pairs.len(), actions * resources);
            let rule_ids: HashSet<_> = rules.iter().map(|r| r.id.clone()).collect();
            prop_assert_eq!(rule_ids.len(), rules.len());
            for a in &action_ids {
                for r in &resource_ids {
                    prop_assert!(pairs.contains(&(a.clone(), r.clone())));
                }
            }
        }
    }
}
