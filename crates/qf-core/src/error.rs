//! Error types for qforum

use std::fmt;
use thiserror::Error;

/// Which kind of storage constraint rejected a write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// Unique column or primary key collision
    Unique,
    /// Referenced row missing, or a row that others still depend on
    ForeignKey,
    /// Required column left empty
    NotNull,
    /// Check constraint (length limits)
    Check,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConstraintKind::Unique => "unique",
            ConstraintKind::ForeignKey => "foreign key",
            ConstraintKind::NotNull => "not null",
            ConstraintKind::Check => "check",
        };
        f.write_str(s)
    }
}

/// Main error type for qforum
#[derive(Debug, Error)]
pub enum ForumError {
    /// A write was rejected by a schema constraint
    #[error("Constraint violation ({kind}): {detail}")]
    ConstraintViolation { kind: ConstraintKind, detail: String },

    /// Read/update/delete addressed a row that does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i32 },

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ForumError>,
    },
}

impl ForumError {
    pub fn constraint(kind: ConstraintKind, detail: impl Into<String>) -> Self {
        ForumError::ConstraintViolation {
            kind,
            detail: detail.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: i32) -> Self {
        ForumError::NotFound { entity, id }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ForumError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Strip any context wrappers
    pub fn root(&self) -> &ForumError {
        match self {
            ForumError::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    /// The constraint kind, if this is a constraint violation
    pub fn constraint_kind(&self) -> Option<ConstraintKind> {
        match self.root() {
            ForumError::ConstraintViolation { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_constraint_violation(&self) -> bool {
        self.constraint_kind().is_some()
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), ForumError::NotFound { .. })
    }
}

/// Result type alias for qforum
pub type Result<T> = std::result::Result<T, ForumError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ForumError::not_found("question", 42);
        assert_eq!(err.to_string(), "question not found: 42");

        let err = ForumError::constraint(ConstraintKind::Unique, "user.email");
        assert_eq!(
            err.to_string(),
            "Constraint violation (unique): user.email"
        );
    }

    #[test]
    fn test_error_with_context() {
        let err = ForumError::constraint(ConstraintKind::Check, "ck_user_username");
        let err = err.with_context("Failed to register user");
        assert!(err.to_string().contains("Failed to register user"));
        assert_eq!(err.constraint_kind(), Some(ConstraintKind::Check));
    }

    #[test]
    fn test_classification_helpers() {
        assert!(ForumError::not_found("user", 1).is_not_found());
        assert!(!ForumError::not_found("user", 1).is_constraint_violation());
        assert!(ForumError::constraint(ConstraintKind::ForeignKey, "x").is_constraint_violation());
        assert!(!ForumError::Database("locked".into()).is_constraint_violation());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ForumError = io_err.into();
        assert!(matches!(err, ForumError::Io(_)));
    }
}
