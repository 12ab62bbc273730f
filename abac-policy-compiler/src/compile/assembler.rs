//! Policy document assembly

use crate::selection::SelectionState;
use crate::types::{AdditionalResourceAttachment, PolicyDocument, Rule};

/// Merge selection metadata, rules and attachments into a document.
///
/// Name and description are trimmed; a blank description is replaced with
/// `default_description`. Nothing else is validated here.
pub fn assemble_document(
    selection: &SelectionState,
    subject_id: &str,
    rules: Vec<Rule>,
    additional_resources: Vec<AdditionalResourceAttachment>,
    default_description: &str,
) -> PolicyDocument {
    let description = match selection.description.trim() {
        "" => default_description.trim().to_string(),
        trimmed => trimmed.to_string(),
    };

    PolicyDocument {
        name: selection.name.trim().to_string(),
        description,
        effect: selection.effect,
        status: selection.status,
        subjects: vec![subject_id.to_string()],
        resources: selection.resource_ids.clone(),
        actions: selection.action_ids.clone(),
        rules,
        additional_resources,
        conditions: Vec::new(),
    }
}
