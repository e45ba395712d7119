//! Host store errors.

use baseline_core::CoreError;

/// Store result type
pub type StoreResult<T> = Result<T, StoreError>;

/// Store error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No handler is registered for the committed type
    #[error("Unknown mutation type: {mutation}")]
    UnknownMutation {
        /// Committed mutation type
        mutation: String,
    },

    /// A module is already registered at this path
    #[error("Module already registered: {namespace}")]
    ModuleExists {
        /// Module path
        namespace: String,
    },

    /// No module is registered at this path
    #[error("Module not registered: {namespace}")]
    ModuleNotFound {
        /// Module path
        namespace: String,
    },

    /// The parent of a nested module is not registered
    #[error("Parent module not registered for {namespace}")]
    ParentNotFound {
        /// Module path
        namespace: String,
    },

    /// The root module cannot be registered or removed
    #[error("The root module cannot be {operation}")]
    RootModule {
        /// Attempted operation
        operation: String,
    },

    /// A module's local state vanished from the tree
    #[error("Module state missing at {namespace}")]
    MissingModuleState {
        /// Module path
        namespace: String,
    },

    /// A subscriber reported a failure
    #[error("Subscriber failed: {message}")]
    Subscriber {
        /// Subscriber's message
        message: String,
    },

    /// Core error
    #[error(transparent)]
    Core(#[from] CoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::UnknownMutation {
            mutation: "song/nope".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown mutation type: song/nope");

        let err = StoreError::RootModule {
            operation: "unregistered".to_string(),
        };
        assert_eq!(err.to_string(), "The root module cannot be unregistered");
    }

    #[test]
    fn test_from_core_error() {
        let err: StoreError = CoreError::NotAMapping { path: "a".to_string() }.into();
        assert_eq!(err.to_string(), "Not a mapping at 'a'");
    }
}
