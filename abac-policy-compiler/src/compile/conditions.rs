//! Attribute condition construction shared by rules and attachments

use log::debug;

use crate::catalog::AttributeCatalog;
use crate::operator::resolve_operator;
use crate::selection::ConditionSelection;
use crate::types::{AttributeCondition, Conditions};

/// Build the condition list for one side of a policy.
///
/// Only filled values take part. Attribute ids that are no longer in the
/// catalog are skipped.
pub fn build_conditions(catalog: &AttributeCatalog, selection: &ConditionSelection) -> Conditions {
    selection
        .filled_values()
        .filter_map(|(attribute_id, value)| {
            let Some(attribute) = catalog.by_id(attribute_id) else {
                debug!("Skipping condition on unknown attribute id {}", attribute_id);
                return None;
            };
            let operator =
                resolve_operator(attribute, value, selection.operator_choice(attribute_id));
            Some(AttributeCondition {
                name: attribute.name.clone(),
                operator,
                value: value.clone(),
            })
        })
        .collect()
}
