//! Hydration of a selection from a persisted policy document
//!
//! The edit flow rebuilds the wizard state from the stored document, never
//! from the rendered sentence. Compiled documents repeat the same subject and
//! condition lists on every rule (and the same list on every attachment), so
//! only the first rule and the first attachment are read.
//!
//! Condition names are matched against the catalog by name, then by id. A name the
//! catalog no longer knows is kept, keyed by the raw name, so that nothing is
//! lost when an attribute was deleted after the policy was saved.

use log::{debug, warn};

use crate::catalog::AttributeCatalog;
use crate::selection::{ConditionSelection, SelectionState};
use crate::types::{AttributeCondition, PolicyDocument};

pub fn hydrate_selection(document: &PolicyDocument, catalog: &AttributeCatalog) -> SelectionState {
    let first_rule = document.rules.first();
    if document.rules.len() > 1 {
        debug!(
            "Hydrating '{}' from the first of {} rules",
            document.name,
            document.rules.len()
        );
    }

    let subject_id = first_rule
        .map(|rule| rule.subject.target_type.clone())
        .or_else(|| {
            warn!(
                "Policy '{}' has no rules; taking the subject from the subjects list",
                document.name
            );
            document.subjects.first().cloned()
        });

    let subject_conditions = first_rule
        .map(|rule| restore_conditions(catalog, &rule.subject.attributes))
        .unwrap_or_default();
    let resource_conditions = first_rule
        .map(|rule| restore_conditions(catalog, &rule.object.attributes))
        .unwrap_or_default();

    let additional_resource_conditions = document
        .additional_resources
        .first()
        .map(|attachment| restore_conditions(catalog, &attachment.attributes))
        .unwrap_or_default();

    SelectionState {
        name: document.name.clone(),
        description: document.description.clone(),
        effect: document.effect,
        status: document.status,
        subject_id,
        action_ids: document.actions.clone(),
        resource_ids: document.resources.clone(),
        subject_conditions,
        resource_conditions,
        additional_resource_ids: document
            .additional_resources
            .iter()
            .map(|attachment| attachment.id.clone())
            .collect(),
        additional_resource_conditions,
    }
}

/// Rebuild value and operator maps keyed by attribute id (or raw name when unknown).
fn restore_conditions(
    catalog: &AttributeCatalog,
    conditions: &[AttributeCondition],
) -> ConditionSelection {
    let mut selection = ConditionSelection::default();
    for condition in conditions {
        let key = match catalog.by_name_or_id(&condition.name) {
            Some(attribute) => attribute.id.clone(),
            None => {
                warn!(
                    "Attribute '{}' is not in the catalog; keeping it by name",
                    condition.name
                );
                condition.name.clone()
            }
        };
        selection
            .operators
            .insert(key.clone(), condition.operator.as_str().to_string());
        selection.values.insert(key, condition.value.clone());
    }
    selection
}
