//! Raw transport failures.
//!
//! These never reach callers directly: terminal operations hand them to
//! [`crate::outcome::ResponseHandler::interpret_failure`].

use thiserror::Error;

use super::RawResponse;

/// Symbolic codes attached to [`TransportError`].
pub mod codes {
    /// Request exceeded its timeout.
    pub const TIMED_OUT: &str = "ECONNABORTED";
    /// Connection could not be established.
    pub const CONNECTION_REFUSED: &str = "ECONNREFUSED";
    /// Redirect policy gave up.
    pub const TOO_MANY_REDIRECTS: &str = "ERR_FR_TOO_MANY_REDIRECTS";
    /// Server answered with a 4xx status.
    pub const BAD_REQUEST: &str = "ERR_BAD_REQUEST";
    /// Server answered with a 5xx status, or the body could not be read.
    pub const BAD_RESPONSE: &str = "ERR_BAD_RESPONSE";
    /// Target URL could not be parsed.
    pub const INVALID_URL: &str = "ERR_INVALID_URL";
    /// A header name or value is not valid HTTP.
    pub const INVALID_HEADER: &str = "ERR_INVALID_HEADER";
    /// Any other transport failure.
    pub const NETWORK: &str = "ERR_NETWORK";
}

/// Failure reported by a [`super::Transport`].
///
/// Carries a partial response when the exchange completed with a non-2xx
/// status, and a symbolic code when one is known.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    code: Option<String>,
    response: Option<Box<RawResponse>>,
}

impl TransportError {
    /// Creates a failure without a response (connection, timeout, setup).
    pub fn network(message: impl Into<String>, code: Option<String>) -> Self {
        Self {
            message: message.into(),
            code,
            response: None,
        }
    }

    /// Creates a failure for a completed exchange with a non-2xx status.
    ///
    /// The code is [`codes::BAD_REQUEST`] for 4xx and [`codes::BAD_RESPONSE`]
    /// otherwise.
    pub fn status(response: RawResponse) -> Self {
        let code = if (400..500).contains(&response.status) {
            codes::BAD_REQUEST
        } else {
            codes::BAD_RESPONSE
        };
        Self {
            message: format!("Request failed with status code {}", response.status),
            code: Some(code.to_string()),
            response: Some(Box::new(response)),
        }
    }

    /// Creates a failure from a `reqwest` error, classifying its code.
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        let code = if error.is_timeout() {
            codes::TIMED_OUT
        } else if error.is_connect() {
            codes::CONNECTION_REFUSED
        } else if error.is_redirect() {
            codes::TOO_MANY_REDIRECTS
        } else if error.is_body() || error.is_decode() {
            codes::BAD_RESPONSE
        } else {
            codes::NETWORK
        };
        Self::network(error.to_string(), Some(code.to_string()))
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    #[must_use]
    pub fn response(&self) -> Option<&RawResponse> {
        self.response.as_deref()
    }

    /// Splits the error into message, code and response.
    #[must_use]
    pub fn into_parts(self) -> (String, Option<String>, Option<Box<RawResponse>>) {
        (self.message, self.code, self.response)
    }
}
