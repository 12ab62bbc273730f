//! Attribute catalog
//!
//! The catalog is the read-only set of attribute definitions the authoring
//! wizard offers. It is loaded once per session by the embedding application
//! and handed to the compiler, renderer and hydrator by reference.
//!
//! Older catalog payloads tag each definition with a single `category` string
//! instead of a `categories` set. That field is folded into the set here, at
//! the loading boundary, so the rest of the crate only ever asks
//! [`AttributeDefinition::has_category`].

use std::collections::BTreeSet;

use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PolicyCompilerError, PolicyCompilerResult};

/// Where an attribute may be used in a policy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum AttributeCategory {
    Subject,
    Resource,
    #[serde(alias = "additional_resource", alias = "additionalResource")]
    AdditionalResource,
    Environment,
}

/// Declared value type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    #[default]
    String,
    Number,
    Boolean,
    Date,
    Array,
    Object,
    /// Any type name this crate does not know about
    #[serde(other)]
    Unknown,
}

/// Optional value constraints carried by a definition.
///
/// The compiler does not enforce these; they travel with the catalog so
/// that callers validating input have them at hand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttributeConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// A single attribute definition from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub categories: BTreeSet<AttributeCategory>,
    /// Legacy singular category, merged into `categories` on load
    #[serde(default, rename = "category", skip_serializing)]
    legacy_category: Option<AttributeCategory>,
    #[serde(default)]
    pub data_type: DataType,
    #[serde(default)]
    pub is_multi_value: bool,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub constraints: AttributeConstraints,
}

impl AttributeDefinition {
    /// Create a definition with no categories and default flags
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            display_name: String::new(),
            categories: BTreeSet::new(),
            legacy_category: None,
            data_type,
            is_multi_value: false,
            is_required: false,
            constraints: AttributeConstraints::default(),
        }
    }

    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: AttributeCategory) -> Self {
        self.categories.insert(category);
        self
    }

    #[must_use]
    pub fn multi_value(mut self) -> Self {
        self.is_multi_value = true;
        self
    }

    pub fn has_category(&self, category: AttributeCategory) -> bool {
        self.categories.contains(&category)
    }

    /// Human label for the attribute; falls back to `name` when no display name is set.
    pub fn label(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }

    fn normalize(mut self) -> Self {
        if let Some(category) = self.legacy_category.take() {
            self.categories.insert(category);
        }
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogPayload {
    List(Vec<AttributeDefinition>),
    Wrapped { attributes: Vec<AttributeDefinition> },
}

/// Read-only lookup over attribute definitions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeCatalog {
    attributes: Vec<AttributeDefinition>,
}

impl AttributeCatalog {
    #[must_use]
    pub fn new(attributes: Vec<AttributeDefinition>) -> Self {
        Self {
            attributes: attributes
                .into_iter()
                .map(AttributeDefinition::normalize)
                .collect(),
        }
    }

    /// Parse a catalog from either a bare JSON array or `{ "attributes": [...] }`.
    pub fn from_json(json: &str) -> PolicyCompilerResult<Self> {
        let payload: CatalogPayload = serde_json::from_str(json)
            .map_err(|e| PolicyCompilerError::json("attribute catalog", e))?;
        let attributes = match payload {
            CatalogPayload::List(attributes) | CatalogPayload::Wrapped { attributes } => attributes,
        };
        debug!("Loaded attribute catalog with {} definitions", attributes.len());
        Ok(Self::new(attributes))
    }

    pub fn attributes(&self) -> &[AttributeDefinition] {
        &self.attributes
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn by_id(&self, id: &str) -> Option<&AttributeDefinition> {
        self.attributes.iter().find(|attribute| attribute.id == id)
    }

    /// Look up by name first, then by id.
    ///
    /// Stored conditions carry the attribute name, so a name match is
    /// preferred even when another attribute's id happens to be equal.
    pub fn by_name_or_id(&self, key: &str) -> Option<&AttributeDefinition> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name == key)
            .or_else(|| self.by_id(key))
    }

    pub fn with_category(
        &self,
        category: AttributeCategory,
    ) -> impl Iterator<Item = &AttributeDefinition> + '_ {
        self.attributes
            .iter()
            .filter(move |attribute| attribute.has_category(category))
    }
}
