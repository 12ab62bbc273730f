//! Compiler configuration

use chrono::Utc;
use uuid::Uuid;

/// How the per-compile component of rule ids is produced.
///
/// Rule ids have the form `rule-<token>-<index>`. The token is generated once
/// per compile and shared by every rule of that compile.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RuleIdScheme {
    /// Unix time in milliseconds. Two compiles within the same millisecond
    /// produce the same ids.
    #[default]
    Timestamp,
    /// A random v4 uuid, unique across compiles
    Uuid,
    /// A caller-provided token, for reproducible output
    Fixed(String),
}

impl RuleIdScheme {
    pub(crate) fn batch_token(&self) -> String {
        match self {
            Self::Timestamp => Utc::now().timestamp_millis().to_string(),
            Self::Uuid => Uuid::new_v4().to_string(),
            Self::Fixed(token) => token.clone(),
        }
    }
}

/// Description given to documents compiled from a selection without one
pub const DEFAULT_DESCRIPTION: &str = "No description provided";

/// Options for [`super::PolicyCompiler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    pub rule_ids: RuleIdScheme,
    /// Used when the selection's description is blank
    pub default_description: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            rule_ids: RuleIdScheme::default(),
            default_description: DEFAULT_DESCRIPTION.to_string(),
        }
    }
}

impl CompileOptions {
    #[must_use]
    pub fn with_rule_ids(mut self, rule_ids: RuleIdScheme) -> Self {
        self.rule_ids = rule_ids;
        self
    }

    #[must_use]
    pub fn with_default_description(mut self, description: impl Into<String>) -> Self {
        self.default_description = description.into();
        self
    }
}
