//! HTTP transport seam.
//!
//! A [`Transport`] performs one HTTP exchange for a [`RequestConfig`] and
//! reports either a [`RawResponse`] (2xx) or a [`TransportError`]. The request
//! layer treats it as a black box; [`ReqwestTransport`] is the bundled
//! implementation.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use request_layer::Client;
//! use request_layer::transport::{ReqwestTransport, TransportConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = ReqwestTransport::with_config(&TransportConfig::default())?;
//! let client = Client::with_transport(Arc::new(transport));
//! # let _ = client;
//! # Ok(())
//! # }
//! ```

mod error;
mod http;

pub use error::{TransportError, codes};
pub use http::{DEFAULT_CONNECT_TIMEOUT, ReqwestTransport, TransportConfig};

use std::fmt;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;

use crate::outcome::Payload;
use crate::request::RequestConfig;

/// Executes a single HTTP exchange.
///
/// Implementations must resolve to `Ok` only for 2xx statuses. Any other
/// completed exchange is reported as [`TransportError::status`] so the
/// response stays available for diagnostics.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Performs the request described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] on network failure, timeout, invalid
    /// request setup, or a non-2xx status.
    async fn execute(&self, config: RequestConfig) -> Result<RawResponse, TransportError>;
}

/// A completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Body decoded according to `config.response_shape`.
    pub data: Payload,
    pub status: u16,
    pub status_text: String,
    pub headers: HeaderMap,
    /// The request that produced this response.
    pub config: RequestConfig,
}

impl RawResponse {
    /// Creates a response with the canonical status text and no headers.
    #[must_use]
    pub fn new(config: RequestConfig, status: u16, data: Payload) -> Self {
        let status_text = StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or_default()
            .to_string();
        Self {
            data,
            status,
            status_text,
            headers: HeaderMap::new(),
            config,
        }
    }

    #[must_use]
    pub fn with_status_text(mut self, status_text: impl Into<String>) -> Self {
        self.status_text = status_text.into();
        self
    }

    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Whether the status is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
