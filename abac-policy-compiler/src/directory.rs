//! Display names for the entities a policy refers to.
//!
//! Subjects, actions, resources and additional resources are selected by id.
//! The directory maps those ids to the labels shown in rule payloads and in
//! the rendered sentence. Ids without an entry are shown verbatim.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{PolicyCompilerError, PolicyCompilerResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Subject,
    Action,
    Resource,
    AdditionalResource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NamedEntity {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl NamedEntity {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            display_name: Some(display_name.into()),
        }
    }

    fn label(&self) -> &str {
        [self.display_name.as_deref(), self.name.as_deref()]
            .into_iter()
            .flatten()
            .find(|label| !label.trim().is_empty())
            .unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Directory {
    #[serde(default)]
    pub subjects: Vec<NamedEntity>,
    #[serde(default)]
    pub actions: Vec<NamedEntity>,
    #[serde(default)]
    pub resources: Vec<NamedEntity>,
    #[serde(default)]
    pub additional_resources: Vec<NamedEntity>,
}

impl Directory {
    pub fn from_json(json: &str) -> PolicyCompilerResult<Self> {
        serde_json::from_str(json).map_err(|e| PolicyCompilerError::json("entity directory", e))
    }

    fn entries(&self, kind: EntityKind) -> &[NamedEntity] {
        match kind {
            EntityKind::Subject => &self.subjects,
            EntityKind::Action => &self.actions,
            EntityKind::Resource => &self.resources,
            EntityKind::AdditionalResource => &self.additional_resources,
        }
    }

    /// Display label for an id, or the id itself when unknown.
    pub fn label<'a>(&'a self, kind: EntityKind, id: &'a str) -> &'a str {
        self.entries(kind)
            .iter()
            .find(|entity| entity.id == id)
            .map_or(id, NamedEntity::label)
    }
}
