//! Authoring-time selection state
//!
//! A [`SelectionState`] is what the wizard has collected so far: one subject,
//! the chosen actions and resources, and per-side attribute values and
//! operator choices keyed by attribute id. It is consumed by the compiler and
//! the renderer, and produced by hydration for the edit flow.

use std::collections::BTreeMap;

use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{PolicyCompilerError, PolicyCompilerResult};
use crate::types::{Effect, PolicyStatus};

/// Attribute values and operator choices for one side of a policy.
///
/// Operators are kept as the raw strings the UI produced; they are only
/// interpreted by the operator resolver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConditionSelection {
    #[serde(default)]
    pub values: BTreeMap<String, Value>,
    #[serde(default)]
    pub operators: BTreeMap<String, String>,
}

impl ConditionSelection {
    /// Set a value for an attribute id.
    #[must_use]
    pub fn with_value(mut self, attribute_id: impl Into<String>, value: Value) -> Self {
        self.values.insert(attribute_id.into(), value);
        self
    }

    /// Set both a value and an operator choice for an attribute id.
    #[must_use]
    pub fn with_condition(
        mut self,
        attribute_id: impl Into<String>,
        operator: impl Into<String>,
        value: Value,
    ) -> Self {
        let attribute_id = attribute_id.into();
        self.operators.insert(attribute_id.clone(), operator.into());
        self.values.insert(attribute_id, value);
        self
    }

    pub fn operator_choice(&self, attribute_id: &str) -> Option<&str> {
        self.operators.get(attribute_id).map(String::as_str)
    }

    /// Values that take part in compilation and rendering, in key order.
    pub fn filled_values(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.values
            .iter()
            .filter(|(_, value)| has_value(value))
            .map(|(id, value)| (id.as_str(), value))
    }
}

/// Whether a configured value counts as filled in.
///
/// `null`, blank strings and empty lists are treated as "not set".
pub fn has_value(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Bool(_) | Value::Number(_) | Value::Object(_) => true,
    }
}

/// Everything the wizard has collected for one policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub effect: Effect,
    #[serde(default)]
    pub status: PolicyStatus,
    #[serde(default)]
    pub subject_id: Option<String>,
    #[serde(default)]
    pub action_ids: Vec<String>,
    #[serde(default)]
    pub resource_ids: Vec<String>,
    #[serde(default)]
    pub subject_conditions: ConditionSelection,
    #[serde(default)]
    pub resource_conditions: ConditionSelection,
    #[serde(default, deserialize_with = "string_ids")]
    #[schemars(with = "Vec<String>")]
    pub additional_resource_ids: Vec<String>,
    /// One condition set shared by every additional resource
    #[serde(default)]
    pub additional_resource_conditions: ConditionSelection,
}

impl SelectionState {
    pub fn from_json(json: &str) -> PolicyCompilerResult<Self> {
        serde_json::from_str(json).map_err(|e| PolicyCompilerError::json("selection state", e))
    }

    /// Subject id if one is chosen and not blank
    pub fn subject(&self) -> Option<&str> {
        self.subject_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Additional resource ids with blank entries removed
    pub fn valid_additional_resource_ids(&self) -> Vec<&str> {
        self.additional_resource_ids
            .iter()
            .map(String::as_str)
            .filter(|id| {
                let keep = !id.trim().is_empty();
                if !keep {
                    debug!("Dropping blank additional resource id");
                }
                keep
            })
            .collect()
    }
}

/// Keep only string entries; anything else the UI may have left behind is dropped.
fn string_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|entry| match entry {
            Value::String(id) => Some(id),
            other => {
                debug!("Dropping non-string additional resource id: {}", other);
                None
            }
        })
        .collect())
}
