//! Policy document model
//!
//! These types are the exact JSON contract handed to the external create and
//! update calls, and read back for the edit flow.

use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PolicyCompilerError, PolicyCompilerResult};
use crate::operator::Operator;

/// Shared, immutable list of attribute conditions.
///
/// One list is built per compile and every rule (or attachment) produced by
/// that compile points at the same allocation.
pub type Conditions = Arc<[AttributeCondition]>;

fn no_conditions() -> Conditions {
    Arc::from(Vec::new())
}

/// Outcome of a policy when its conditions match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum Effect {
    #[default]
    Allow,
    Deny,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum PolicyStatus {
    #[default]
    Active,
    Inactive,
    Draft,
}

/// One `{name, operator, value}` condition attached to a rule side or an attachment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AttributeCondition {
    /// Attribute name (not id) from the catalog
    pub name: String,
    pub operator: Operator,
    pub value: Value,
}

/// Subject or object side of a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleTarget {
    #[serde(rename = "type")]
    pub target_type: String,
    #[serde(default = "no_conditions")]
    pub attributes: Conditions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RuleAction {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
}

/// One (action, resource) pairing of a policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Rule {
    pub id: String,
    pub subject: RuleTarget,
    pub action: RuleAction,
    pub object: RuleTarget,
    #[serde(default)]
    pub conditions: Vec<Value>,
}

/// A resource exposed only when the base policy matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AdditionalResourceAttachment {
    pub id: String,
    #[serde(default = "no_conditions")]
    pub attributes: Conditions,
}

/// The compiled policy payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDocument {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub effect: Effect,
    #[serde(default)]
    pub status: PolicyStatus,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub additional_resources: Vec<AdditionalResourceAttachment>,
    #[serde(default)]
    pub conditions: Vec<Value>,
}

impl PolicyDocument {
    pub fn from_json(json: &str) -> PolicyCompilerResult<Self> {
        serde_json::from_str(json).map_err(|e| PolicyCompilerError::json("policy document", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_wire_shape() {
        let condition = AttributeCondition {
            name: "department".to_string(),
            operator: Operator::Equals,
            value: json!("Finance"),
        };
        let shared: Conditions = Arc::from(vec![condition]);
        let document = PolicyDocument {
            name: "Finance read".to_string(),
            description: String::new(),
            effect: Effect::Deny,
            status: PolicyStatus::Draft,
            subjects: vec!["finance-team".to_string()],
            resources: vec!["invoices".to_string()],
            actions: vec!["read".to_string()],
            rules: vec![Rule {
                id: "rule-1-0".to_string(),
                subject: RuleTarget {
                    target_type: "finance-team".to_string(),
                    attributes: Arc::clone(&shared),
                },
                action: RuleAction {
                    name: "read".to_string(),
                    display_name: "Read".to_string(),
                },
                object: RuleTarget {
                    target_type: "invoices".to_string(),
                    attributes: no_conditions(),
                },
                conditions: vec![],
            }],
            additional_resources: vec![AdditionalResourceAttachment {
                id: "archive".to_string(),
                attributes: shared,
            }],
            conditions: vec![],
        };

        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(value["effect"], "Deny");
        assert_eq!(value["status"], "Draft");
        assert_eq!(value["rules"][0]["subject"]["type"], "finance-team");
        assert_eq!(value["rules"][0]["action"]["displayName"], "Read");
        assert_eq!(
            value["rules"][0]["subject"]["attributes"][0],
            json!({"name": "department", "operator": "equals", "value": "Finance"})
        );
        assert_eq!(value["additionalResources"][0]["id"], "archive");
        assert_eq!(value["conditions"], json!([]));
    }

    #[test]
    fn test_document_tolerates_missing_optional_sections() {
        let document = PolicyDocument::from_json(
            r#"{
                "name": "Legacy",
                "effect": "Allow",
                "status": "Inactive",
                "subjects": ["s"],
                "resources": ["r"],
                "actions": ["a"],
                "rules": [{
                    "id": "rule-1-0",
                    "subject": { "type": "s" },
                    "action": { "name": "a" },
                    "object": { "type": "r", "attributes": [] }
                }]
            }"#,
        )
        .unwrap();
        assert_eq!(document.status, PolicyStatus::Inactive);
        assert!(document.rules[0].subject.attributes.is_empty());
        assert!(document.additional_resources.is_empty());
        assert_eq!(document.description, "");
    }

    #[test]
    fn test_document_with_unknown_effect_is_rejected() {
        let result = PolicyDocument::from_json(r#"{"name": "x", "effect": "Maybe"}"#);
        assert!(result.is_err());
    }
}
