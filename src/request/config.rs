//! The fully resolved description of one HTTP call.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::Method;
use serde_json::Value;

use super::constants::{ACCEPT_HEADER, ACCEPT_TEXT, APPLICATION_JSON, DEFAULT_TIMEOUT};

/// How the response body should be decoded and interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResponseShape {
    /// Text or markup.
    Text,
    /// Structured JSON (object, array or `null`).
    #[default]
    Json,
    /// Raw bytes.
    Binary,
}

/// Request body in one of the two supported encodings.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Serialized by the transport's default JSON encoding.
    Json(Value),
    /// Canonical `application/x-www-form-urlencoded` string, sent verbatim.
    Form(String),
}

/// Everything a [`crate::transport::Transport`] needs to perform one call.
///
/// Each terminal operation builds its own copy, so a config is never shared
/// between in-flight calls.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestConfig {
    pub url: String,
    pub method: Method,
    /// Request headers. Names are compared ASCII case-insensitively by
    /// [`header`](Self::header) and [`set_header`](Self::set_header).
    pub headers: BTreeMap<String, String>,
    pub timeout: Duration,
    pub body: Option<RequestBody>,
    /// Query pairs appended to the URL, in order.
    pub query: Option<Vec<(String, String)>>,
    pub response_shape: ResponseShape,
}

impl RequestConfig {
    /// Creates a config with no headers, body or query and the default timeout.
    #[must_use]
    pub fn new(url: impl Into<String>, method: Method) -> Self {
        Self {
            url: url.into(),
            method,
            headers: BTreeMap::new(),
            timeout: DEFAULT_TIMEOUT,
            body: None,
            query: None,
            response_shape: ResponseShape::default(),
        }
    }

    /// Looks up a header value by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Sets a header, replacing any existing entry with the same name in any case.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers.retain(|key, _| !key.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
    }

    /// Applies a response shape and its `Accept` header.
    ///
    /// Binary leaves `Accept` as configured by the caller.
    #[must_use]
    pub fn with_shape(mut self, shape: ResponseShape) -> Self {
        self.response_shape = shape;
        match shape {
            ResponseShape::Text => self.set_header(ACCEPT_HEADER, ACCEPT_TEXT),
            ResponseShape::Json => self.set_header(ACCEPT_HEADER, APPLICATION_JSON),
            ResponseShape::Binary => {}
        }
        self
    }
}
