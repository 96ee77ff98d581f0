//! Error types for Brook.
//!
//! Every stream operation reports failure through [`StreamError`]:
//!
//! - configuration errors raised while a behavior table is assembled
//! - missing operations on a dispatch stream
//! - capability violations (seeking a seek-restricted stream, writing a
//!   read-only resource)
//! - I/O errors of the underlying resource
//! - custom errors raised by user-supplied behaviors

use crate::operation::Operation;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used by every [`Stream`](crate::Stream) operation.
pub type StreamResult<T> = Result<T, StreamError>;

/// Errors that can occur while building or operating a stream.
#[derive(Error, Debug)]
pub enum StreamError {
    /// A behavior table was assembled with an unknown or mismatched key.
    #[error("invalid stream configuration: {0}")]
    InvalidConfiguration(String),

    /// The operation has no behavior attached.
    #[error("{operation}() is not implemented in the {type_name}")]
    NotImplemented {
        /// The operation that was invoked.
        operation: Operation,
        /// The stream type that lacks it.
        type_name: &'static str,
    },

    /// The stream refuses to seek.
    #[error("Cannot seek a {type_name}")]
    SeekDisallowed {
        /// The decorator type that forbids seeking.
        type_name: &'static str,
    },

    /// An instance was about to be rebuilt from its serialized form.
    #[error("{type_name} should never be deserialized")]
    ReconstructionForbidden {
        /// The type that cannot be reconstructed.
        type_name: &'static str,
    },

    /// The stream lacks the capability the operation needs.
    #[error("{0}")]
    Unsupported(&'static str),

    /// The underlying resource has been detached or closed.
    #[error("stream is detached")]
    Detached,

    /// A shared stream was re-entered while an operation still held it.
    #[error("stream is busy with another operation")]
    Busy,

    /// The underlying resource failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A custom error raised by a stream behavior.
    #[error(transparent)]
    Custom(BoxError),
}

impl StreamError {
    /// Wrap any error (or message) raised by a user behavior.
    pub fn custom(error: impl Into<BoxError>) -> Self {
        StreamError::Custom(error.into())
    }

    /// Returns the operation of a [`StreamError::NotImplemented`] error.
    pub fn missing_operation(&self) -> Option<Operation> {
        match self {
            StreamError::NotImplemented { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}

impl From<BoxError> for StreamError {
    fn from(err: BoxError) -> Self {
        StreamError::Custom(err)
    }
}
