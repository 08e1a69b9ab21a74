//! Error types for the ContentCraft system.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CraftError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Permission denied: {reason}")]
    PermissionDenied { reason: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Backend failure: {0}")]
    Backend(String),

    /// No tenant exists at all. Needs an administrator, retrying won't help.
    #[error("No tenant available")]
    NoTenantAvailable,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CraftError {
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn permission_denied(reason: impl Into<String>) -> Self {
        Self::PermissionDenied {
            reason: reason.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }

    /// Whether the UI may offer a retry for this failure.
    ///
    /// `PermissionDenied` and `ValidationFailed` are terminal for the
    /// action that produced them.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Backend(_))
    }
}

pub type CraftResult<T> = Result<T, CraftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_lookup_and_backend_failures_are_retryable() {
        assert!(CraftError::not_found("brand", 3).is_retryable());
        assert!(CraftError::Backend("socket closed".into()).is_retryable());
        assert!(!CraftError::permission_denied("default brand").is_retryable());
        assert!(!CraftError::validation("name is required").is_retryable());
        assert!(!CraftError::NoTenantAvailable.is_retryable());
    }

    #[test]
    fn not_found_message_names_entity_and_id() {
        let err = CraftError::not_found("tenant", 42);
        assert_eq!(err.to_string(), "Entity not found: tenant with id 42");
    }
}
