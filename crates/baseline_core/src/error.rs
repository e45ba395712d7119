//! Core error types for BASELINE.

/// Core result type
pub type CoreResult<T> = Result<T, CoreError>;

/// Core error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A value could not be copied into a state tree
    #[error("Clone failed: {reason}")]
    Clone {
        /// Why the copy failed
        reason: String,
    },

    /// Tree nesting exceeds the supported depth
    #[error("State tree depth {depth} exceeds maximum {max}")]
    TooDeep {
        /// Depth of the offending tree
        depth: usize,
        /// Supported maximum
        max: usize,
    },

    /// Malformed namespace path
    #[error("Invalid namespace '{namespace}': {reason}")]
    InvalidNamespace {
        /// Namespace as given
        namespace: String,
        /// What is wrong with it
        reason: String,
    },

    /// Malformed mutation type
    #[error("Invalid mutation type '{mutation}': {reason}")]
    InvalidMutationType {
        /// Mutation type as given
        mutation: String,
        /// What is wrong with it
        reason: String,
    },

    /// A path step landed on something that is not a mapping
    #[error("Not a mapping at '{path}'")]
    NotAMapping {
        /// Path of the offending value
        path: String,
    },
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Clone {
            reason: err.to_string(),
        }
    }
}
