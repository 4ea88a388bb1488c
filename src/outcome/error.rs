//! Normalized error types returned to callers.
//!
//! Every failure leaving a terminal operation is one of these variants. The
//! transport's own error value is consumed during normalization and never
//! reachable through [`std::error::Error::source`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Diagnostic code attached to a normalized error.
///
/// Mirrors the two sources a code can come from: the HTTP status of a
/// completed exchange, or a symbolic code reported by the transport.
/// Serializes as a bare number or string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorCode {
    /// HTTP status of the response that triggered the failure.
    Status(u16),
    /// Symbolic transport code such as `ECONNREFUSED`.
    Transport(String),
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => write!(f, "{status}"),
            Self::Transport(code) => f.write_str(code),
        }
    }
}

/// Discriminant of a [`RequestError`], also used to tag rejections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// JSON was requested but the body is not a structured value.
    InvalidShape,
    /// The exchange succeeded but the body carries an application error.
    SemanticError,
    /// Transport failure or non-2xx status.
    NetworkOrProtocol,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidShape => "invalid shape",
            Self::SemanticError => "semantic error",
            Self::NetworkOrProtocol => "network or protocol error",
        };
        f.write_str(name)
    }
}

/// Normalized failure of a request.
///
/// `message` is already composed for display (`"<base> (<reason>)"` when a
/// reason was found), so `to_string()` yields the full diagnostic.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequestError {
    /// The body of a JSON request did not decode to a structured value.
    #[error("{message}")]
    InvalidShape {
        /// Composed diagnostic message.
        message: String,
        /// Bounded excerpt of the offending body.
        excerpt: String,
        /// Status of the offending response, when known.
        code: Option<ErrorCode>,
    },

    /// The body signalled an application error despite a successful status.
    #[error("{message}")]
    SemanticError {
        /// Composed diagnostic message.
        message: String,
        /// Error text extracted from the body.
        reason: String,
        /// Code, when the rejection carried a response or transport code.
        code: Option<ErrorCode>,
    },

    /// Network failure, timeout, or non-2xx status.
    #[error("{message}")]
    NetworkOrProtocol {
        /// Composed diagnostic message.
        message: String,
        /// First diagnostic candidate found, if any.
        reason: Option<String>,
        /// Response status, or the transport code when no response exists.
        code: Option<ErrorCode>,
    },
}

impl RequestError {
    /// Creates an invalid-shape error.
    pub fn invalid_shape(
        message: impl Into<String>,
        excerpt: impl Into<String>,
        code: Option<ErrorCode>,
    ) -> Self {
        Self::InvalidShape {
            message: message.into(),
            excerpt: excerpt.into(),
            code,
        }
    }

    /// Creates a semantic error.
    pub fn semantic(
        message: impl Into<String>,
        reason: impl Into<String>,
        code: Option<ErrorCode>,
    ) -> Self {
        Self::SemanticError {
            message: message.into(),
            reason: reason.into(),
            code,
        }
    }

    /// Creates a network or protocol error.
    pub fn network_or_protocol(
        message: impl Into<String>,
        reason: Option<String>,
        code: Option<ErrorCode>,
    ) -> Self {
        Self::NetworkOrProtocol {
            message: message.into(),
            reason,
            code,
        }
    }

    /// Returns the variant's kind.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidShape { .. } => ErrorKind::InvalidShape,
            Self::SemanticError { .. } => ErrorKind::SemanticError,
            Self::NetworkOrProtocol { .. } => ErrorKind::NetworkOrProtocol,
        }
    }

    /// Returns the composed message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidShape { message, .. }
            | Self::SemanticError { message, .. }
            | Self::NetworkOrProtocol { message, .. } => message,
        }
    }

    /// Returns the diagnostic reason, if one was found.
    ///
    /// For [`RequestError::InvalidShape`] this is the body excerpt.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::InvalidShape { excerpt, .. } => Some(excerpt),
            Self::SemanticError { reason, .. } => Some(reason),
            Self::NetworkOrProtocol { reason, .. } => reason.as_deref(),
        }
    }

    /// Returns the diagnostic code, if any.
    #[must_use]
    pub fn code(&self) -> Option<&ErrorCode> {
        match self {
            Self::InvalidShape { code, .. }
            | Self::SemanticError { code, .. }
            | Self::NetworkOrProtocol { code, .. } => code.as_ref(),
        }
    }

    /// Returns the HTTP status carried in the code, if the code is a status.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self.code() {
            Some(ErrorCode::Status(status)) => Some(*status),
            _ => None,
        }
    }
}
