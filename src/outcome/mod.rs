//! Outcome normalization for transport results.
//!
//! Transports report failure in two unrelated ways: the exchange itself fails
//! (network error, timeout, non-2xx status), or it succeeds while the body
//! describes an application error. This module collapses both into
//! [`RequestError`] and passes valid successes through as [`Payload`].
//!
//! # Architecture
//!
//! - [`ResponseHandler`] - Pluggable success/failure interpretation
//! - [`DefaultHandler`] - Built-in interpretation ([`normalize_success`], [`normalize_failure`])
//! - [`Rejection`] / [`Failure`] - Inputs flowing from the success path to the failure path
//! - [`RequestError`] - Normalized error returned to callers
//! - [`body_excerpt`] - Bounded body excerpt used in diagnostics

mod error;
mod excerpt;
mod handler;
mod payload;

pub use error::{ErrorCode, ErrorKind, RequestError};
pub use excerpt::{EXCERPT_EDGE_CHARS, body_excerpt};
pub use handler::{
    DefaultHandler, Failure, INVALID_JSON_MESSAGE, RESPONSE_ERROR_MESSAGE, Rejection,
    ResponseHandler, normalize_failure, normalize_success,
};
pub use payload::Payload;
