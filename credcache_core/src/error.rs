//! Error types for the credential cache
//!
//! Errors are grouped by where they originate: the file system, a storage
//! backend, or caller supplied configuration.

use thiserror::Error;

pub mod backend;
pub mod io;
pub mod validation;

pub use self::backend::BackendError;
pub use self::io::{IoError, IoErrorKind};
pub use self::validation::ValidationError;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the credential cache
///
/// Absent arguments are never reported through this type; the facade turns
/// them into a miss or a no-op before any backend is touched.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O related errors
    #[error(transparent)]
    Io(#[from] IoError),

    /// Backend related errors
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Validation related errors
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl Error {
    /// Whether this error means the backend could not be initialised at all
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Backend(BackendError::Unavailable { .. }))
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Io(IoError::from_std(source))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Backend(BackendError::serialization(err.to_string()))
    }
}
