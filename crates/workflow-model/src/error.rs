//! Error types for the workflow model

use thiserror::Error;

/// Result type alias using WorkflowModelError
pub type Result<T> = std::result::Result<T, WorkflowModelError>;

/// Reasons a proposed identifier is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// Identifier is empty
    #[error("ID must be set")]
    Empty,

    /// Identifier contains characters outside `[A-Za-z0-9_]`
    #[error("ID contains illegal characters")]
    IllegalCharacters,

    /// Another node already uses this identifier
    #[error("ID already exists on graph")]
    Duplicate,
}

/// Errors that can occur while editing a workflow model
#[derive(Debug, Error)]
pub enum WorkflowModelError {
    /// Invalid or colliding identifier
    #[error("Invalid identifier '{id}': {reason}")]
    Identifier { id: String, reason: IdentifierError },

    /// An edge or reference named something that is not in the graph
    #[error("Unresolved reference: {0}")]
    UnresolvedReference(String),

    /// An argument was not the kind of entity the operation requires
    #[error("Expected {argument} to be instanceof {expected}")]
    InvalidArgument {
        argument: &'static str,
        expected: &'static str,
    },

    /// Removal target is not present
    #[error("Node not found: {0}")]
    NotFound(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl WorkflowModelError {
    /// Create an identifier error for `id`
    pub fn identifier(id: impl Into<String>, reason: IdentifierError) -> Self {
        Self::Identifier {
            id: id.into(),
            reason,
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(argument: &'static str, expected: &'static str) -> Self {
        Self::InvalidArgument { argument, expected }
    }

    /// The identifier rejection reason, if this is an identifier error
    pub fn identifier_reason(&self) -> Option<IdentifierError> {
        match self {
            Self::Identifier { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}
