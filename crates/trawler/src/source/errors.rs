use thiserror::Error;

use crate::http::HttpError;

/// Errors that can occur while fetching from a remote source.
///
/// All variants are fatal for the current run; the only recovered failure is
/// the application-level error payload inside a page response, which the
/// paginated cursor absorbs as end-of-listing (see `source::page`).
#[derive(Debug, Error)]
pub enum SourceError {
    /// Connection failure or a status code with no finer meaning.
    /// Not retried.
    #[error("transport error: {message}")]
    Transport { message: String },

    /// Well-formed "does not exist" answer for a named remote resource.
    #[error("not found: {resource}")]
    NotFound { resource: String },

    /// Credentials were rejected by the platform.
    #[error("authentication rejected")]
    AuthRejected,

    /// The platform refused the request (typically rate limiting).
    #[error("forbidden: {message}")]
    Forbidden { message: String },

    /// A payload fragment could not be translated into an entity.
    #[error("malformed payload for {context}: {message}")]
    Translation { context: String, message: String },
}

impl SourceError {
    /// Create a transport error.
    #[inline]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a not found error for a named resource.
    #[inline]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a forbidden error.
    #[inline]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Create a translation error carrying the owning-entity context.
    #[inline]
    pub fn translation(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Translation {
            context: context.into(),
            message: message.into(),
        }
    }
}

impl From<HttpError> for SourceError {
    fn from(err: HttpError) -> Self {
        SourceError::transport(err.to_string())
    }
}

/// Result type for source operations.
pub type Result<T> = std::result::Result<T, SourceError>;
