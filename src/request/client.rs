//! Verb builders and their terminal operations.
//!
//! [`Client::get`], [`Client::post`] and [`Client::delete`] capture the request
//! intent without touching the network. Each terminal operation (`as_text`,
//! `as_json`, `as_binary`) then builds a fresh [`RequestConfig`] from that
//! intent and performs exactly one transport call. Because the intent is never
//! mutated, a request value can run several terminal operations, in sequence
//! or concurrently.

use std::sync::{Arc, OnceLock};

use reqwest::Method;
use serde_json::Value;
use tracing::{debug, instrument};

use super::config::{RequestBody, RequestConfig, ResponseShape};
use super::constants::{APPLICATION_JSON, CONTENT_TYPE_HEADER};
use super::data::{RequestData, indexed_query_pairs, is_non_empty_mapping, query_pairs};
use super::options::RequestOptions;
use super::pacing::{Pacing, paced};
use crate::outcome::{Failure, Payload, RequestError, ResponseHandler};
use crate::transport::{ReqwestTransport, Transport};

/// Entry point for building requests over a shared [`Transport`].
///
/// Cloning is cheap; clones share the transport.
///
/// # Example
///
/// ```no_run
/// use request_layer::{Client, RequestOptions};
/// use serde_json::json;
///
/// # async fn example() -> Result<(), request_layer::RequestError> {
/// let client = Client::new();
/// let created = client
///     .post(
///         "https://api.example.com/items",
///         json!({"name": "widget"}),
///         RequestOptions::default().with_header("Authorization", "my-token"),
///     )
///     .as_json()
///     .await?;
/// println!("{created:?}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Creates a client over a default [`ReqwestTransport`].
    ///
    /// # Panics
    ///
    /// Panics if the default HTTP client cannot be built. See
    /// [`ReqwestTransport::new`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_transport(Arc::new(ReqwestTransport::new()))
    }

    /// Creates a client over a caller-supplied transport.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Builds a GET request.
    ///
    /// A non-empty object (or form) in `data` becomes query parameters; a
    /// non-empty array becomes index-keyed parameters (`0=a&1=b`). A
    /// non-empty `options.body` is sent as JSON with an explicit
    /// `Content-Type: application/json`.
    #[must_use]
    pub fn get(
        &self,
        url: impl Into<String>,
        data: impl Into<RequestData>,
        options: RequestOptions,
    ) -> GetRequest {
        let mut intent =
            RequestIntent::new(Arc::clone(&self.transport), Method::GET, url, &options);

        match data.into() {
            RequestData::Json(Value::Object(fields)) if !fields.is_empty() => {
                intent.config.query = Some(query_pairs(&fields));
            }
            RequestData::Json(Value::Array(items)) if !items.is_empty() => {
                intent.config.query = Some(indexed_query_pairs(&items));
            }
            RequestData::Form(form) if !form.is_empty() => {
                intent.config.query = Some(form.pairs().to_vec());
            }
            _ => {}
        }

        if let Some(body) = options.body.filter(is_non_empty_mapping) {
            intent.config.body = Some(RequestBody::Json(body));
            intent
                .config
                .set_header(CONTENT_TYPE_HEADER, APPLICATION_JSON);
        }

        GetRequest { intent }
    }

    /// Builds a POST request.
    ///
    /// Form data is sent as its canonical encoded string. A non-empty JSON
    /// mapping is handed to the transport's JSON encoding without forcing a
    /// `Content-Type` header.
    #[must_use]
    pub fn post(
        &self,
        url: impl Into<String>,
        data: impl Into<RequestData>,
        options: RequestOptions,
    ) -> PostRequest {
        let mut intent =
            RequestIntent::new(Arc::clone(&self.transport), Method::POST, url, &options);

        match data.into() {
            RequestData::Form(form) => {
                intent.config.body = Some(RequestBody::Form(form.encode()));
            }
            RequestData::Json(value) if is_non_empty_mapping(&value) => {
                intent.config.body = Some(RequestBody::Json(value));
            }
            _ => {}
        }

        PostRequest { intent }
    }

    /// Builds a DELETE request.
    ///
    /// A non-empty mapping (or form) in `data` becomes the request body.
    #[must_use]
    pub fn delete(
        &self,
        url: impl Into<String>,
        data: impl Into<RequestData>,
        options: RequestOptions,
    ) -> DeleteRequest {
        let mut intent =
            RequestIntent::new(Arc::clone(&self.transport), Method::DELETE, url, &options);

        match data.into() {
            RequestData::Json(value) if is_non_empty_mapping(&value) => {
                intent.config.body = Some(RequestBody::Json(value));
            }
            RequestData::Form(form) if !form.is_empty() => {
                intent.config.body = Some(RequestBody::Form(form.encode()));
            }
            _ => {}
        }

        DeleteRequest { intent }
    }
}

fn default_client() -> &'static Client {
    static DEFAULT_CLIENT: OnceLock<Client> = OnceLock::new();
    DEFAULT_CLIENT.get_or_init(Client::new)
}

/// Builds a GET request on the process-wide default [`Client`].
#[must_use]
pub fn get(
    url: impl Into<String>,
    data: impl Into<RequestData>,
    options: RequestOptions,
) -> GetRequest {
    default_client().get(url, data, options)
}

/// Builds a POST request on the process-wide default [`Client`].
#[must_use]
pub fn post(
    url: impl Into<String>,
    data: impl Into<RequestData>,
    options: RequestOptions,
) -> PostRequest {
    default_client().post(url, data, options)
}

/// Builds a DELETE request on the process-wide default [`Client`].
///
/// `options` is mandatory.
#[must_use]
pub fn delete(
    url: impl Into<String>,
    data: impl Into<RequestData>,
    options: RequestOptions,
) -> DeleteRequest {
    default_client().delete(url, data, options)
}

/// Immutable request intent shared by the per-verb request types.
#[derive(Debug, Clone)]
struct RequestIntent {
    config: RequestConfig,
    pacing: Option<Pacing>,
    handler: Arc<dyn ResponseHandler>,
    transport: Arc<dyn Transport>,
}

impl RequestIntent {
    fn new(
        transport: Arc<dyn Transport>,
        method: Method,
        url: impl Into<String>,
        options: &RequestOptions,
    ) -> Self {
        let mut config = RequestConfig::new(url, method);
        config.timeout = options.timeout;
        for (name, value) in &options.headers {
            config.set_header(name.clone(), value.clone());
        }

        Self {
            config,
            pacing: options.pacing(),
            handler: options.resolved_handler(),
            transport,
        }
    }

    /// Runs one call for `shape`. Only JSON calls are paced.
    #[instrument(
        level = "debug",
        skip(self),
        fields(method = %self.config.method, url = %self.config.url)
    )]
    async fn run(&self, shape: ResponseShape) -> Result<Payload, RequestError> {
        let config = self.config.clone().with_shape(shape);
        let pacing = if shape == ResponseShape::Json {
            self.pacing
        } else {
            None
        };
        paced(pacing, self.exchange(config)).await
    }

    async fn exchange(&self, config: RequestConfig) -> Result<Payload, RequestError> {
        match self.transport.execute(config).await {
            Ok(response) => {
                debug!(status = response.status, "exchange completed");
                self.handler.interpret_success(response).map_err(|rejection| {
                    self.handler
                        .interpret_failure(Failure::Rejected(rejection))
                })
            }
            Err(error) => Err(self.handler.interpret_failure(Failure::Transport(error))),
        }
    }
}

/// GET request returned by [`Client::get`].
#[derive(Debug, Clone)]
pub struct GetRequest {
    intent: RequestIntent,
}

impl GetRequest {
    /// Returns the base configuration shared by every terminal operation.
    #[must_use]
    pub fn config(&self) -> &RequestConfig {
        &self.intent.config
    }

    /// Performs the request with `Accept: text/html` and returns the body as text.
    ///
    /// # Errors
    ///
    /// Returns the [`RequestError`] produced by the request's handler.
    pub async fn as_text(&self) -> Result<Payload, RequestError> {
        self.intent.run(ResponseShape::Text).await
    }

    /// Performs the request with `Accept: application/json`, applying pacing.
    ///
    /// # Errors
    ///
    /// Returns the [`RequestError`] produced by the request's handler.
    pub async fn as_json(&self) -> Result<Payload, RequestError> {
        self.intent.run(ResponseShape::Json).await
    }

    /// Performs the request and returns the raw body bytes.
    ///
    /// # Errors
    ///
    /// Returns the [`RequestError`] produced by the request's handler.
    pub async fn as_binary(&self) -> Result<Payload, RequestError> {
        self.intent.run(ResponseShape::Binary).await
    }
}

/// POST request returned by [`Client::post`].
#[derive(Debug, Clone)]
pub struct PostRequest {
    intent: RequestIntent,
}

impl PostRequest {
    #[must_use]
    pub fn config(&self) -> &RequestConfig {
        &self.intent.config
    }

    /// Performs the request with `Accept: application/json`, applying pacing.
    ///
    /// # Errors
    ///
    /// Returns the [`RequestError`] produced by the request's handler.
    pub async fn as_json(&self) -> Result<Payload, RequestError> {
        self.intent.run(ResponseShape::Json).await
    }
}

/// DELETE request returned by [`Client::delete`].
#[derive(Debug, Clone)]
pub struct DeleteRequest {
    intent: RequestIntent,
}

impl DeleteRequest {
    #[must_use]
    pub fn config(&self) -> &RequestConfig {
        &self.intent.config
    }

    /// Performs the request with `Accept: application/json`, applying pacing.
    ///
    /// # Errors
    ///
    /// Returns the [`RequestError`] produced by the request's handler.
    pub async fn as_json(&self) -> Result<Payload, RequestError> {
        self.intent.run(ResponseShape::Json).await
    }
}
