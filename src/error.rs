//! Error types for the hourly rate client.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the client can surface: transport failures, server
//! rejections, local validation and configuration loading.

use thiserror::Error;

/// The main error type for the hourly rate client.
///
/// Local validation failures are reported before any request is sent;
/// network and server failures are propagated to the caller unchanged.
///
/// # Example
///
/// ```
/// use hourly_rates::error::RateError;
///
/// let error = RateError::Api {
///     status: 409,
///     message: "Rate already approved".to_string(),
/// };
/// assert_eq!(error.to_string(), "API error (409): Rate already approved");
/// ```
#[derive(Debug, Error)]
pub enum RateError {
    /// The request could not reach the server.
    #[error("Network error: {message}")]
    Network {
        /// A description of the transport failure.
        message: String,
    },

    /// The server answered with a non-2xx status.
    #[error("API error ({status}): {message}")]
    Api {
        /// The HTTP status code returned by the server.
        status: u16,
        /// The server-provided message, or a generic status message.
        message: String,
    },

    /// A single resource was requested but does not exist.
    #[error("{resource} not found: {id}")]
    NotFound {
        /// The kind of resource (e.g. "hourly rate").
        resource: String,
        /// The identifier that was requested.
        id: String,
    },

    /// Local input was rejected before any request was made.
    #[error("Invalid {field}: {reason}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A human-readable reason.
        reason: String,
    },

    /// The response body did not have the expected shape.
    #[error("Failed to decode response: {message}")]
    Decode {
        /// A description of the decode failure.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl RateError {
    /// Returns true for a missing resource, whether reported as
    /// [`RateError::NotFound`] or as a raw 404.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RateError::NotFound { .. } | RateError::Api { status: 404, .. }
        )
    }

    /// Returns true if retrying the same request may succeed.
    ///
    /// Transport failures and 5xx responses are retryable; client errors and
    /// local validation failures are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            RateError::Network { .. } => true,
            RateError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for RateError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            RateError::Decode {
                message: error.to_string(),
            }
        } else {
            RateError::Network {
                message: error.to_string(),
            }
        }
    }
}

/// A type alias for Results that return RateError.
pub type RateResult<T> = Result<T, RateError>;
