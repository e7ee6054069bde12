//! Error type shared by every edit-script engine.

use thiserror::Error;

/// Result type for edit-script operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by [`DiffEngine::compute`](crate::DiffEngine::compute).
///
/// A call either returns a complete, ordered operation sequence or one of
/// these; partial scripts are never produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A required input sequence was absent (as opposed to empty).
    #[error("invalid argument: `{0}` must be present")]
    InvalidArgument(&'static str),

    /// An engine was configured with values it cannot run with.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The wavefront protocol could not make progress within its liveness bound.
    #[error("internal consistency: {0}")]
    InternalConsistency(String),

    /// The dedicated worker pool could not be created.
    #[error("thread pool: {0}")]
    ThreadPool(String),
}

impl Error {
    /// Creates an invalid configuration error
    pub fn invalid_configuration<S: Into<String>>(msg: S) -> Self {
        Error::InvalidConfiguration(msg.into())
    }

    /// Creates an internal consistency error
    pub fn internal_consistency<S: Into<String>>(msg: S) -> Self {
        Error::InternalConsistency(msg.into())
    }
}

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        Error::ThreadPool(err.to_string())
    }
}
