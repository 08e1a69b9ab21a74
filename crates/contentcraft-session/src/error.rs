//! Session error types.

use contentcraft_core::error::CraftError;
use contentcraft_core::models::{BrandId, TenantId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("{action} is not valid while the session is {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: &'static str,
    },

    #[error("tenant {0} is not available")]
    UnknownTenant(TenantId),

    #[error("brand {0} is not in the current brand collection")]
    UnknownBrand(BrandId),

    #[error("no tenant is available")]
    NoTenant,

    #[error("there is no failed load to retry")]
    NothingToRetry,

    #[error("session has shut down")]
    Shutdown,

    #[error(transparent)]
    Store(#[from] CraftError),
}

impl From<SessionError> for CraftError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidTransition { .. } | SessionError::NothingToRetry => {
                CraftError::validation(err.to_string())
            }
            SessionError::UnknownTenant(id) => CraftError::not_found("tenant", id),
            SessionError::UnknownBrand(id) => CraftError::not_found("brand", id),
            SessionError::NoTenant => CraftError::NoTenantAvailable,
            SessionError::Shutdown => CraftError::Internal(err.to_string()),
            SessionError::Store(inner) => inner,
        }
    }
}
