//! Additional-resource attachments
//!
//! Every selected additional resource receives the same condition list. An
//! attachment with no conditions is still emitted: its presence means the
//! resource becomes available whenever the base policy matches.

use std::sync::Arc;

use crate::catalog::AttributeCatalog;
use crate::selection::SelectionState;
use crate::types::AdditionalResourceAttachment;

use super::conditions::build_conditions;

pub fn attach_additional_resources(
    catalog: &AttributeCatalog,
    selection: &SelectionState,
) -> Vec<AdditionalResourceAttachment> {
    let ids = selection.valid_additional_resource_ids();
    if ids.is_empty() {
        return Vec::new();
    }

    let attributes = build_conditions(catalog, &selection.additional_resource_conditions);
    ids.into_iter()
        .map(|id| AdditionalResourceAttachment {
            id: id.to_string(),
            attributes: Arc::clone(&attributes),
        })
        .collect()
}
