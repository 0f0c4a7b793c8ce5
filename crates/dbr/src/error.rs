//! Error types for dbr

use thiserror::Error;

/// Result type alias for dbr operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for statement building and execution
#[derive(Debug, Error)]
pub enum OrmError {
    /// Invalid input: malformed identifier, invalid UTF-8, mismatched
    /// counts, unbalanced parenthesis markers, ...
    #[error("Validation error: {0}")]
    Validation(String),

    /// A required piece of the statement is missing.
    #[error("Empty: {0}")]
    Empty(String),

    /// Row or metadata lookup found nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failure reported by the execution collaborator
    #[error("Execution error: {0}")]
    Execution(String),

    /// A collaborator error wrapped with the statement it belongs to
    #[error("{operation} on `{table}`: {source}")]
    Statement {
        operation: &'static str,
        table: String,
        #[source]
        source: Box<OrmError>,
    },

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl OrmError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an empty error
    pub fn empty(message: impl Into<String>) -> Self {
        Self::Empty(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Wrap a collaborator error with the statement context.
    pub fn in_statement(self, operation: &'static str, table: impl Into<String>) -> Self {
        Self::Statement {
            operation,
            table: table.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through statement context wrappers.
    pub fn root(&self) -> &OrmError {
        match self {
            Self::Statement { source, .. } => source.root(),
            other => other,
        }
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self.root(), Self::Validation(_))
    }

    /// Check if this is an empty error
    pub fn is_empty(&self) -> bool {
        matches!(self.root(), Self::Empty(_))
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), Self::NotFound(_))
    }
}
