//! Reset extension errors.

use crate::config::ConfigError;
use baseline_core::CoreError;
use baseline_store::StoreError;

/// Reset result type
pub type ResetResult<T> = Result<T, ResetError>;

/// Reset extension error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResetError {
    /// Malformed configuration
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The captured state is not a mapping
    #[error("Root state must be a mapping")]
    RootNotMapping,

    /// The root namespace cannot be added to or removed from the baseline
    #[error("The root namespace cannot be {operation}")]
    RootNamespace {
        /// Attempted operation
        operation: String,
    },

    /// The baseline is already borrowed by an in-flight operation
    #[error("Baseline is busy")]
    BaselineBusy,

    /// Host store error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Core error (clone failure, malformed namespace)
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<ResetError> for StoreError {
    fn from(err: ResetError) -> Self {
        match err {
            ResetError::Store(inner) => inner,
            other => StoreError::Subscriber {
                message: other.to_string(),
            },
        }
    }
}
