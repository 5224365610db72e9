//! Error types

/// Result alias for fallible lazy-load operations
pub type Result<T> = std::result::Result<T, LazyError>;

/// Lazy-load errors
///
/// Only configuration problems reach callers. Selector failures are raised
/// by hosts and absorbed by the grouping pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LazyError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid scroll container selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },
}

impl LazyError {
    /// Wrap a host selector failure
    pub fn selector(selector: &str, reason: impl std::fmt::Display) -> Self {
        Self::Selector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }
}
