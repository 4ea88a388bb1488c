//! Per-call options for the verb builders.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use super::constants::DEFAULT_TIMEOUT;
use super::pacing::Pacing;
use crate::outcome::{DefaultHandler, ResponseHandler};

/// Options recognized by [`crate::Client::get`], [`crate::Client::post`] and
/// [`crate::Client::delete`].
///
/// ```
/// use std::time::Duration;
/// use request_layer::RequestOptions;
///
/// let options = RequestOptions::default()
///     .with_header("Authorization", "Bearer abc")
///     .with_timeout(Duration::from_secs(5))
///     .with_requests_per_second(2.0);
/// assert_eq!(options.timeout, Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub headers: BTreeMap<String, String>,
    /// JSON body for GET requests. Ignored by POST and DELETE, which take
    /// their body from `data`.
    pub body: Option<Value>,
    pub timeout: Duration,
    /// Pacing rate for `as_json`. Missing, zero, negative or NaN disables it.
    pub requests_per_second: Option<f64>,
    /// Result interpretation. `None` selects [`DefaultHandler`].
    pub handler: Option<Arc<dyn ResponseHandler>>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            headers: BTreeMap::new(),
            body: None,
            timeout: DEFAULT_TIMEOUT,
            requests_per_second: None,
            handler: None,
        }
    }
}

impl RequestOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a header, replacing any earlier value whose name matches
    /// ignoring case.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|key, _| !key.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
        self
    }

    /// Sets several headers in order, with [`Self::with_header`] semantics.
    #[must_use]
    pub fn with_headers<I, K, V>(self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        headers
            .into_iter()
            .fold(self, |options, (name, value)| options.with_header(name, value))
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_timeout_millis(self, millis: u64) -> Self {
        self.with_timeout(Duration::from_millis(millis))
    }

    #[must_use]
    pub fn with_requests_per_second(mut self, requests_per_second: f64) -> Self {
        self.requests_per_second = Some(requests_per_second);
        self
    }

    #[must_use]
    pub fn with_handler(mut self, handler: Arc<dyn ResponseHandler>) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Returns the selected handler, falling back to [`DefaultHandler`].
    #[must_use]
    pub fn resolved_handler(&self) -> Arc<dyn ResponseHandler> {
        self.handler
            .clone()
            .unwrap_or_else(|| Arc::new(DefaultHandler))
    }

    #[must_use]
    pub fn pacing(&self) -> Option<Pacing> {
        self.requests_per_second
            .and_then(Pacing::from_requests_per_second)
    }
}
