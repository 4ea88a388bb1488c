//! `reqwest`-backed transport.

use std::collections::BTreeMap;
use std::panic::{AssertUnwindSafe, catch_unwind, set_hook, take_hook};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, ClientBuilder, Proxy};
use tracing::{debug, instrument, trace, warn};
use url::Url;

use super::error::codes;
use super::{RawResponse, Transport, TransportError};
use crate::outcome::Payload;
use crate::request::{RequestBody, RequestConfig, ResponseShape};
use crate::user_agent;

/// Default TCP connect timeout. The overall per-request timeout comes from
/// [`RequestConfig::timeout`].
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Client-level settings for [`ReqwestTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub connect_timeout: Duration,
    pub user_agent: String,
    /// Accept and transparently decode gzip responses.
    pub gzip: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: user_agent::default_user_agent(),
            gzip: true,
        }
    }
}

/// Transport backed by a pooled [`reqwest::Client`].
///
/// Create once and share; cloning is cheap.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestTransport {
    /// Creates a transport with [`TransportConfig::default`].
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built from the static default
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self::with_config(&TransportConfig::default())
            .expect("failed to build HTTP client with static configuration")
    }

    /// Creates a transport with explicit client settings.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the underlying client cannot be built.
    pub fn with_config(config: &TransportConfig) -> Result<Self, TransportError> {
        build_client(config).map(|client| Self { client })
    }

    /// Wraps an already configured client.
    #[must_use]
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Returns the underlying reqwest client.
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(
        level = "debug",
        skip_all,
        fields(method = %config.method, url = %config.url, shape = ?config.response_shape)
    )]
    async fn execute(&self, config: RequestConfig) -> Result<RawResponse, TransportError> {
        let url = build_url(&config)?;
        let headers = build_headers(&config.headers)?;
        trace!(
            header_count = headers.len(),
            timeout_ms = config.timeout.as_millis(),
            "request prepared"
        );

        let mut request = self
            .client
            .request(config.method.clone(), url)
            .headers(headers)
            .timeout(config.timeout);

        match &config.body {
            Some(RequestBody::Json(value)) => {
                request = request.json(value);
            }
            Some(RequestBody::Form(encoded)) => {
                if config.header(CONTENT_TYPE.as_str()).is_none() {
                    request = request.header(CONTENT_TYPE, FORM_CONTENT_TYPE);
                }
                request = request.body(encoded.clone());
            }
            None => {}
        }

        debug!("sending request");
        let response = request
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(&e))?;

        let status = response.status();
        let response_headers = response.headers().clone();
        let data = decode_body(response, config.response_shape)
            .await
            .map_err(|e| TransportError::from_reqwest(&e))?;
        debug!(status = status.as_u16(), "response received");

        let raw = RawResponse::new(config, status.as_u16(), data).with_headers(response_headers);
        if status.is_success() {
            Ok(raw)
        } else {
            Err(TransportError::status(raw))
        }
    }
}

fn build_url(config: &RequestConfig) -> Result<Url, TransportError> {
    let mut url = Url::parse(&config.url).map_err(|e| {
        TransportError::network(
            format!("Invalid URL {}: {e}", config.url),
            Some(codes::INVALID_URL.to_string()),
        )
    })?;

    if let Some(query) = config.query.as_ref().filter(|query| !query.is_empty()) {
        url.query_pairs_mut().extend_pairs(query.iter());
    }

    Ok(url)
}

fn build_headers(headers: &BTreeMap<String, String>) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid_header(name))?;
        let header_value = HeaderValue::from_str(value).map_err(|_| invalid_header(name))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

fn invalid_header(name: &str) -> TransportError {
    TransportError::network(
        format!("Invalid header {name:?}"),
        Some(codes::INVALID_HEADER.to_string()),
    )
}

/// Decodes the body for the requested shape.
///
/// A JSON body that fails to parse (including an empty one) is kept as text
/// so the success path can report it as an invalid shape.
async fn decode_body(
    response: reqwest::Response,
    shape: ResponseShape,
) -> Result<Payload, reqwest::Error> {
    let bytes = response.bytes().await?;
    let payload = match shape {
        ResponseShape::Binary => Payload::Binary(bytes.to_vec()),
        ResponseShape::Text => Payload::Text(String::from_utf8_lossy(&bytes).into_owned()),
        ResponseShape::Json => match serde_json::from_slice(&bytes) {
            Ok(value) => Payload::Json(value),
            Err(error) => {
                trace!(%error, "response body is not JSON");
                Payload::Text(String::from_utf8_lossy(&bytes).into_owned())
            }
        },
    };
    Ok(payload)
}

enum BuildClientFailure {
    Panic,
    Build(reqwest::Error),
}

fn build_client(config: &TransportConfig) -> Result<Client, TransportError> {
    match try_build_client(config, false) {
        Ok(client) => Ok(client),
        Err(BuildClientFailure::Panic) => {
            // Some sandboxed macOS environments panic while reading system
            // proxy settings. Env proxies still apply on the fallback path.
            warn!(
                "HTTP client builder panicked while loading system proxy settings; retrying with env-proxy fallback"
            );
            try_build_client(config, true).map_err(client_build_error)
        }
        Err(failure) => Err(client_build_error(failure)),
    }
}

fn client_build_error(failure: BuildClientFailure) -> TransportError {
    let message = match failure {
        BuildClientFailure::Panic => {
            "HTTP client construction panicked while loading proxy settings".to_string()
        }
        BuildClientFailure::Build(error) => format!("HTTP client construction failed: {error}"),
    };
    TransportError::network(message, None)
}

// `catch_unwind` does not silence the panic hook, so the hook is swapped out
// for the duration of the build. The lock keeps concurrent builds from
// restoring each other's hooks.
static CLIENT_BUILD_PANIC_HOOK_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

fn try_build_client(
    config: &TransportConfig,
    disable_system_proxy_lookup: bool,
) -> Result<Client, BuildClientFailure> {
    let builder_config = config.clone();
    let _hook_guard = CLIENT_BUILD_PANIC_HOOK_LOCK
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    let previous_hook = take_hook();
    set_hook(Box::new(|_| {}));
    let outcome = catch_unwind(AssertUnwindSafe(move || {
        #[cfg(test)]
        maybe_inject_client_build_panic(disable_system_proxy_lookup);

        let mut builder = base_client_builder(&builder_config);
        if disable_system_proxy_lookup {
            builder = apply_env_proxy_fallback(builder.no_proxy());
        }
        builder.build()
    }));
    set_hook(previous_hook);

    match outcome {
        Ok(Ok(client)) => Ok(client),
        Ok(Err(error)) => Err(BuildClientFailure::Build(error)),
        Err(_) => Err(BuildClientFailure::Panic),
    }
}

#[cfg(test)]
static CLIENT_BUILD_PANIC_INJECTION_COUNT: std::sync::atomic::AtomicUsize =
    std::sync::atomic::AtomicUsize::new(0);

#[cfg(test)]
fn inject_client_build_panics(count: usize) {
    CLIENT_BUILD_PANIC_INJECTION_COUNT.store(count, std::sync::atomic::Ordering::SeqCst);
}

#[cfg(test)]
fn maybe_inject_client_build_panic(disable_system_proxy_lookup: bool) {
    use std::sync::atomic::Ordering;

    if disable_system_proxy_lookup {
        return;
    }

    if CLIENT_BUILD_PANIC_INJECTION_COUNT
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| {
            if count > 0 { Some(count - 1) } else { None }
        })
        .is_ok()
    {
        panic!("injected HTTP client builder panic");
    }
}

fn base_client_builder(config: &TransportConfig) -> ClientBuilder {
    Client::builder()
        .connect_timeout(config.connect_timeout)
        .user_agent(config.user_agent.clone())
        .gzip(config.gzip)
}

fn apply_env_proxy_fallback(mut builder: ClientBuilder) -> ClientBuilder {
    for (scheme, names) in [
        ("https", ["HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"]),
        ("http", ["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"]),
    ] {
        let Some(proxy_url) = find_first_env_var(&names) else {
            continue;
        };
        let proxy = if scheme == "https" {
            Proxy::https(&proxy_url)
        } else {
            Proxy::http(&proxy_url)
        };
        match proxy {
            Ok(proxy) => builder = builder.proxy(proxy),
            Err(error) => debug!(scheme, %error, "ignoring unparsable proxy variable"),
        }
    }
    builder
}

fn find_first_env_var(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| {
        std::env::var(name)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}
