//! Error types for policy compilation

use std::fmt;

use thiserror::Error;

/// The part of a selection that is missing when a policy cannot be compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncompleteSelection {
    /// No subject was chosen.
    MissingSubject,
    /// No action was chosen, so the rule set would be empty.
    NoActions,
    /// No resource was chosen, so the rule set would be empty.
    NoResources,
}

impl fmt::Display for IncompleteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::MissingSubject => "no subject selected",
            Self::NoActions => "no actions selected",
            Self::NoResources => "no resources selected",
        };
        f.write_str(reason)
    }
}

/// Errors surfaced by the policy compiler.
///
/// Stale catalog references, out-of-domain operators and blank additional
/// resource ids are resolved in place and never reach this type.
#[derive(Debug, Error)]
pub enum PolicyCompilerError {
    /// The selection would produce an empty rule set or has no subject.
    #[error("Incomplete selection: {0}")]
    IncompleteSelection(IncompleteSelection),

    /// A JSON payload could not be parsed.
    #[error("Failed to parse {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl PolicyCompilerError {
    pub(crate) fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }

    /// Returns the missing part of the selection if this is an incomplete-selection failure.
    pub fn incomplete_selection(&self) -> Option<IncompleteSelection> {
        match self {
            Self::IncompleteSelection(reason) => Some(*reason),
            Self::Json { .. } => None,
        }
    }
}

impl From<IncompleteSelection> for PolicyCompilerError {
    fn from(reason: IncompleteSelection) -> Self {
        Self::IncompleteSelection(reason)
    }
}

pub type PolicyCompilerResult<T> = Result<T, PolicyCompilerError>;
