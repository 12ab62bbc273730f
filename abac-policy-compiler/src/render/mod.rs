//! Natural-language rendering of a selection
//!
//! Produces the read-only review sentence shown before a policy is saved:
//!
//! ```text
//! This policy ALLOWS Finance Team (when department is Finance) to perform
//! Read and Export actions on Invoices if Archive and Backup
//! (when retention is greater than 30).
//! ```
//!
//! Parenthetical clauses appear only when they have content. The sentence is
//! for display; the edit flow always hydrates from the structured document.

mod join;

pub use join::join_list;

use log::debug;
use serde_json::Value;

use crate::catalog::AttributeCatalog;
use crate::directory::{Directory, EntityKind};
use crate::operator::resolve_operator;
use crate::selection::{ConditionSelection, SelectionState};
use crate::types::Effect;

/// Shown in place of a part of the selection that has not been made yet
const SUBJECT_PLACEHOLDER: &str = "[subject]";
const ACTIONS_PLACEHOLDER: &str = "[actions]";
const RESOURCES_PLACEHOLDER: &str = "[resources]";

/// Render a selection as a single English sentence.
pub fn render_sentence(
    selection: &SelectionState,
    catalog: &AttributeCatalog,
    directory: &Directory,
) -> String {
    let verb = match selection.effect {
        Effect::Allow => "ALLOWS",
        Effect::Deny => "DENIES",
    };
    let subject = selection
        .subject()
        .map_or(SUBJECT_PLACEHOLDER, |id| directory.label(EntityKind::Subject, id));

    let mut sentence = format!("This policy {verb} {subject}");

    let subject_conditions = condition_phrases(catalog, &selection.subject_conditions);
    if !subject_conditions.is_empty() {
        sentence.push_str(&format!(" (when {})", join_text(&subject_conditions)));
    }

    let actions = join_list(&selection.action_ids, |id| {
        directory.label(EntityKind::Action, id).to_string()
    });
    let resources = join_list(&selection.resource_ids, |id| {
        directory.label(EntityKind::Resource, id).to_string()
    });
    sentence.push_str(&format!(
        " to perform {} actions on {}",
        or_placeholder(actions, ACTIONS_PLACEHOLDER),
        or_placeholder(resources, RESOURCES_PLACEHOLDER)
    ));

    let resource_conditions = condition_phrases(catalog, &selection.resource_conditions);
    if !resource_conditions.is_empty() {
        sentence.push_str(&format!(" (where {})", join_text(&resource_conditions)));
    }

    let additional = selection.valid_additional_resource_ids();
    if !additional.is_empty() {
        let labels = join_list(&additional, |id| {
            directory.label(EntityKind::AdditionalResource, id).to_string()
        });
        sentence.push_str(&format!(" if {labels}"));

        let shared = condition_phrases(catalog, &selection.additional_resource_conditions);
        if !shared.is_empty() {
            sentence.push_str(&format!(" (when {})", join_text(&shared)));
        }
    }

    sentence.push('.');
    sentence
}

fn or_placeholder(text: String, placeholder: &str) -> String {
    if text.is_empty() {
        placeholder.to_string()
    } else {
        text
    }
}

fn join_text(items: &[String]) -> String {
    join_list(items, String::clone)
}

/// `<display name, lowercased> <operator phrase> <value>` for every filled condition.
///
/// Attributes missing from the catalog have no display name and are left out.
fn condition_phrases(catalog: &AttributeCatalog, selection: &ConditionSelection) -> Vec<String> {
    selection
        .filled_values()
        .filter_map(|(attribute_id, value)| {
            let Some(attribute) = catalog.by_id(attribute_id) else {
                debug!("Not rendering condition on unknown attribute {}", attribute_id);
                return None;
            };
            let operator =
                resolve_operator(attribute, value, selection.operator_choice(attribute_id));
            Some(format!(
                "{} {} {}",
                attribute.label().to_lowercase(),
                operator.phrase(),
                render_value(value)
            ))
        })
        .collect()
}

/// Lists are joined with "or"; strings are shown without quotes.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(render_value)
            .collect::<Vec<_>>()
            .join(" or "),
        other => other.to_string(),
    }
}
