//! Operator resolution
//!
//! Every attribute condition carries a comparison operator. Which operators
//! are allowed depends on the attribute's data type, whether it is
//! multi-valued, and whether the configured value is itself a list. This
//! module is the single place that decision is made; compilation, rendering
//! and hydration all go through [`resolve_operator`].

use std::fmt;
use std::str::FromStr;

use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::catalog::{AttributeDefinition, DataType};

/// Canonical comparison operators, serialized in snake_case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    Includes,
    NotIncludes,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    In,
}

impl Operator {
    pub const ALL: [Self; 10] = [
        Self::Equals,
        Self::NotEquals,
        Self::Contains,
        Self::Includes,
        Self::NotIncludes,
        Self::GreaterThan,
        Self::LessThan,
        Self::GreaterThanOrEqual,
        Self::LessThanOrEqual,
        Self::In,
    ];

    /// Wire name, identical to the serde representation
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::Contains => "contains",
            Self::Includes => "includes",
            Self::NotIncludes => "not_includes",
            Self::GreaterThan => "greater_than",
            Self::LessThan => "less_than",
            Self::GreaterThanOrEqual => "greater_than_or_equal",
            Self::LessThanOrEqual => "less_than_or_equal",
            Self::In => "in",
        }
    }

    /// English phrase used by the sentence renderer
    pub const fn phrase(self) -> &'static str {
        match self {
            Self::Equals => "is",
            Self::NotEquals => "is not",
            Self::Contains => "contains",
            Self::Includes => "includes",
            Self::NotIncludes => "does not include",
            Self::GreaterThan => "is greater than",
            Self::LessThan => "is less than",
            Self::GreaterThanOrEqual => "is greater than or equal to",
            Self::LessThanOrEqual => "is less than or equal to",
            Self::In => "is one of",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown operator: {0}")]
pub struct UnknownOperator(pub String);

impl FromStr for Operator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|operator| operator.as_str() == s)
            .ok_or_else(|| UnknownOperator(s.to_string()))
    }
}

/// Set of operators allowed for one condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorDomain {
    /// Array-typed attributes, and multi-value string or number attributes given a list
    Array,
    Number,
    String,
    /// Boolean, date and object attributes, and any list-valued condition
    Membership,
    /// Data type not understood by this crate
    Unrecognized,
}

impl OperatorDomain {
    /// Pick the domain for an attribute and the value configured for it.
    ///
    /// Boolean, date and object attributes always use membership. A list value
    /// on a multi-value string or number attribute uses the array domain; on
    /// any other attribute it means membership.
    pub fn for_condition(attribute: &AttributeDefinition, value: &Value) -> Self {
        match attribute.data_type {
            DataType::Array => Self::Array,
            DataType::Boolean | DataType::Date | DataType::Object => Self::Membership,
            DataType::String | DataType::Number
                if value.is_array() && attribute.is_multi_value =>
            {
                Self::Array
            }
            _ if value.is_array() => Self::Membership,
            DataType::Number => Self::Number,
            DataType::String => Self::String,
            DataType::Unknown => Self::Unrecognized,
        }
    }

    pub const fn operators(self) -> &'static [Operator] {
        match self {
            Self::Array => &[Operator::Includes, Operator::NotIncludes],
            Self::Number => &[
                Operator::Equals,
                Operator::NotEquals,
                Operator::GreaterThan,
                Operator::LessThan,
                Operator::GreaterThanOrEqual,
                Operator::LessThanOrEqual,
            ],
            Self::String => &[Operator::Equals, Operator::NotEquals, Operator::Contains],
            Self::Membership => &[Operator::In],
            Self::Unrecognized => &[Operator::Equals],
        }
    }

    pub fn contains(self, operator: Operator) -> bool {
        self.operators().contains(&operator)
    }

    pub const fn default_operator(self) -> Operator {
        match self {
            Self::Array => Operator::Includes,
            Self::Number | Self::String | Self::Unrecognized => Operator::Equals,
            Self::Membership => Operator::In,
        }
    }

    /// Accept the user's choice when it belongs to this domain, otherwise use the default.
    pub fn resolve(self, choice: Option<&str>) -> Operator {
        let Some(raw) = choice.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return self.default_operator();
        };
        match raw.parse::<Operator>() {
            Ok(operator) if self.contains(operator) => operator,
            Ok(operator) => {
                debug!(
                    "Operator {} is not valid for {:?}; using {}",
                    operator,
                    self,
                    self.default_operator()
                );
                self.default_operator()
            }
            Err(e) => {
                debug!("{}; using {}", e, self.default_operator());
                self.default_operator()
            }
        }
    }
}

/// Resolve the canonical operator for one condition.
pub fn resolve_operator(
    attribute: &AttributeDefinition,
    value: &Value,
    choice: Option<&str>,
) -> Operator {
    OperatorDomain::for_condition(attribute, value).resolve(choice)
}
