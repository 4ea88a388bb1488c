//! Defaults and header values for request construction.

use std::time::Duration;

/// Default per-request timeout (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// `Accept` value for text terminal operations.
pub const ACCEPT_TEXT: &str = "text/html";

/// `Accept` value for JSON terminal operations, also the explicit
/// `Content-Type` of GET JSON bodies.
pub const APPLICATION_JSON: &str = "application/json";

pub const ACCEPT_HEADER: &str = "Accept";

pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
