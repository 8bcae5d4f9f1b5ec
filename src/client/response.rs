//! Response decoding for the rate service.
//!
//! The service answers either with a bare JSON value or with the value
//! wrapped as `{"data": ...}`; both are accepted. Error bodies carry a
//! `message` (or `error`) field that is surfaced to the caller.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{RateError, RateResult};

/// Error body returned by the rate service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error code for programmatic handling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Human-readable error message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Alternative message field used by some endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorBody {
    /// The most specific non-blank message in the body.
    pub fn best_message(&self) -> Option<&str> {
        [self.message.as_deref(), self.error.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|m| !m.is_empty())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(value) => value,
        }
    }
}

/// Decodes a successful response body, unwrapping a `data` envelope.
pub(crate) fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> RateResult<T> {
    serde_json::from_slice::<Envelope<T>>(bytes)
        .map(Envelope::into_inner)
        .map_err(|e| RateError::Decode {
            message: e.to_string(),
        })
}

/// Decodes a body that may legitimately hold nothing: `null`, an empty body
/// or `{"data": null}` yield `None`.
///
/// Kept separate from [`decode_body`] because an `Option` payload would make
/// every object look like an envelope with a missing `data` field.
pub(crate) fn decode_optional_body<T: DeserializeOwned>(bytes: &[u8]) -> RateResult<Option<T>> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let value: serde_json::Value = serde_json::from_slice(bytes).map_err(|e| RateError::Decode {
        message: e.to_string(),
    })?;
    if value.is_null() || value.get("data").is_some_and(serde_json::Value::is_null) {
        return Ok(None);
    }
    decode_body(bytes).map(Some)
}

/// Builds the error for a non-2xx response.
///
/// Uses the server's message when the body carries one, otherwise a generic
/// status message.
pub(crate) fn error_from_body(status: u16, bytes: &[u8]) -> RateError {
    let message = serde_json::from_slice::<ErrorBody>(bytes)
        .ok()
        .and_then(|body| body.best_message().map(str::to_string))
        .unwrap_or_else(|| format!("Request failed with status {}", status));

    RateError::Api { status, message }
}
