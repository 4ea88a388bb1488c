//! Success and failure interpretation of transport results.
//!
//! A terminal operation feeds every transport result through a
//! [`ResponseHandler`]. A completed exchange goes to
//! [`ResponseHandler::interpret_success`], which may refuse it with a
//! [`Rejection`]. Rejections and transport errors then go to
//! [`ResponseHandler::interpret_failure`], which always yields a
//! [`RequestError`].

use std::fmt;

use serde_json::Value;

use super::error::{ErrorCode, ErrorKind, RequestError};
use super::excerpt::body_excerpt;
use super::payload::Payload;
use crate::request::ResponseShape;
use crate::transport::{RawResponse, TransportError};

/// Base message for bodies that are not structured JSON.
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON";

/// Base message for bodies carrying an embedded application error.
pub const RESPONSE_ERROR_MESSAGE: &str = "Response error";

/// Body fields consulted, in order, for a failed response's reason.
const FAILURE_REASON_FIELDS: [&str; 3] = ["message", "description", "error_description"];

/// Pluggable interpretation of transport results.
///
/// Both methods default to the built-in normalization, so an implementation
/// can override just one of them.
///
/// # Example
///
/// ```
/// use request_layer::outcome::{Payload, Rejection, ResponseHandler};
/// use request_layer::transport::RawResponse;
///
/// /// Treats any 2xx as success and returns the body untouched.
/// #[derive(Debug)]
/// struct Lenient;
///
/// impl ResponseHandler for Lenient {
///     fn interpret_success(&self, response: RawResponse) -> Result<Payload, Rejection> {
///         Ok(response.data)
///     }
/// }
/// ```
pub trait ResponseHandler: Send + Sync + fmt::Debug {
    /// Interprets a completed exchange.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] when the response must be treated as a failure.
    fn interpret_success(&self, response: RawResponse) -> Result<Payload, Rejection> {
        normalize_success(response)
    }

    /// Converts a failure into the error returned to the caller.
    fn interpret_failure(&self, failure: Failure) -> RequestError {
        normalize_failure(failure)
    }
}

/// The built-in handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHandler;

impl ResponseHandler for DefaultHandler {}

/// A completed exchange refused by [`ResponseHandler::interpret_success`].
#[derive(Debug, Clone)]
pub struct Rejection {
    kind: ErrorKind,
    message: String,
    reason: Option<String>,
    response: Option<Box<RawResponse>>,
}

impl Rejection {
    /// Creates a rejection of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>, reason: Option<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            reason,
            response: None,
        }
    }

    /// Rejects a JSON response whose body is not structured.
    ///
    /// The response stays attached so its status becomes the error code.
    pub fn invalid_shape(excerpt: impl Into<String>, response: RawResponse) -> Self {
        Self::new(
            ErrorKind::InvalidShape,
            INVALID_JSON_MESSAGE,
            Some(excerpt.into()),
        )
        .with_response(response)
    }

    /// Rejects a response whose body carries an application error.
    pub fn semantic(reason: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::SemanticError,
            RESPONSE_ERROR_MESSAGE,
            Some(reason.into()),
        )
    }

    /// Attaches the refused response.
    #[must_use]
    pub fn with_response(mut self, response: RawResponse) -> Self {
        self.response = Some(Box::new(response));
        self
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    #[must_use]
    pub fn response(&self) -> Option<&RawResponse> {
        self.response.as_deref()
    }
}

/// Input of [`ResponseHandler::interpret_failure`].
#[derive(Debug)]
pub enum Failure {
    /// The transport failed or the status was not 2xx.
    Transport(TransportError),
    /// The success path refused the response.
    Rejected(Rejection),
}

/// Default success interpretation.
///
/// # Errors
///
/// - [`ErrorKind::InvalidShape`] when JSON was requested and the body is not
///   an object, array or `null`.
/// - [`ErrorKind::SemanticError`] when the body carries `errorText`,
///   `error_description`, `error` + `message`, or `error.message`.
pub fn normalize_success(response: RawResponse) -> Result<Payload, Rejection> {
    if response.config.response_shape == ResponseShape::Json && !response.data.is_structured() {
        let excerpt = body_excerpt(&response.data.diagnostic_text());
        return Err(Rejection::invalid_shape(excerpt, response));
    }

    if let Payload::Json(body) = &response.data
        && let Some(reason) = embedded_error(body)
    {
        return Err(Rejection::semantic(reason));
    }

    Ok(response.data)
}

/// Default failure interpretation.
///
/// The reason is the first truthy candidate among the attached reason, the
/// response body's `message`, `description` and `error_description`, the
/// status text, and the transport code. The code is the response status, else
/// the transport code.
#[must_use]
pub fn normalize_failure(failure: Failure) -> RequestError {
    let (kind, base_message, attached_reason, response, transport_code) = match failure {
        Failure::Transport(error) => {
            let (message, code, response) = error.into_parts();
            (ErrorKind::NetworkOrProtocol, message, None, response, code)
        }
        Failure::Rejected(rejection) => (
            rejection.kind,
            rejection.message,
            rejection.reason,
            rejection.response,
            None,
        ),
    };

    let reason = attached_reason
        .clone()
        .filter(|reason| !reason.is_empty())
        .or_else(|| response.as_deref().and_then(response_reason))
        .or_else(|| transport_code.clone());

    let message = match &reason {
        Some(reason) => format!("{base_message} ({reason})"),
        None => base_message,
    };

    let code = response
        .as_deref()
        .map(|response| response.status)
        .filter(|status| *status != 0)
        .map(ErrorCode::Status)
        .or_else(|| transport_code.map(ErrorCode::Transport));

    match kind {
        ErrorKind::InvalidShape => {
            RequestError::invalid_shape(message, attached_reason.unwrap_or_default(), code)
        }
        ErrorKind::SemanticError => {
            RequestError::semantic(message, attached_reason.or(reason).unwrap_or_default(), code)
        }
        ErrorKind::NetworkOrProtocol => RequestError::network_or_protocol(message, reason, code),
    }
}

fn embedded_error(body: &Value) -> Option<String> {
    truthy_field(body, "errorText")
        .or_else(|| truthy_field(body, "error_description"))
        .or_else(|| truthy_field(body, "error").and_then(|_| truthy_field(body, "message")))
        .or_else(|| body.get("error").and_then(|error| truthy_field(error, "message")))
        .map(reason_text)
}

fn response_reason(response: &RawResponse) -> Option<String> {
    let body_reason = response.data.as_json().and_then(|body| {
        FAILURE_REASON_FIELDS
            .iter()
            .find_map(|field| truthy_field(body, field))
            .map(reason_text)
    });

    body_reason.or_else(|| {
        Some(response.status_text.clone()).filter(|status_text| !status_text.is_empty())
    })
}

fn truthy_field<'a>(value: &'a Value, field: &str) -> Option<&'a Value> {
    value.get(field).filter(|candidate| is_truthy(candidate))
}

/// Loose truthiness as used by the JSON APIs this layer talks to.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn reason_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use reqwest::Method;
    use serde_json::json;

    use super::*;
    use crate::request::RequestConfig;
    use crate::transport::codes;

    fn response(shape: ResponseShape, status: u16, data: Payload) -> RawResponse {
        let mut config = RequestConfig::new("https://api.example.com/items", Method::GET);
        config.response_shape = shape;
        RawResponse::new(config, status, data)
    }

    fn json_response(body: Value) -> RawResponse {
        response(ResponseShape::Json, 200, Payload::Json(body))
    }

    // ==================== success path ====================

    #[test]
    fn test_structured_json_passes_through() {
        let body = json!({"items": [1, 2, 3]});
        let payload = normalize_success(json_response(body.clone())).unwrap();
        assert_eq!(payload, Payload::Json(body));
    }

    #[test]
    fn test_null_json_passes_through() {
        let payload = normalize_success(json_response(Value::Null)).unwrap();
        assert_eq!(payload, Payload::Json(Value::Null));
    }

    #[test]
    fn test_string_body_for_json_is_invalid_shape() {
        let rejection = normalize_success(response(
            ResponseShape::Json,
            200,
            Payload::Text("<html>maintenance</html>".to_string()),
        ))
        .unwrap_err();

        assert_eq!(rejection.kind(), ErrorKind::InvalidShape);
        assert_eq!(rejection.message(), INVALID_JSON_MESSAGE);
        assert_eq!(rejection.reason(), Some("<html>maintenance</html>"));
        assert_eq!(rejection.response().map(|r| r.status), Some(200));
    }

    #[test]
    fn test_json_string_literal_is_invalid_shape() {
        let rejection = normalize_success(json_response(json!("just text"))).unwrap_err();
        assert_eq!(rejection.kind(), ErrorKind::InvalidShape);
        assert_eq!(rejection.reason(), Some("just text"));
    }

    #[test]
    fn test_long_string_body_excerpt() {
        let body = "a".repeat(200) + &"z".repeat(300) + &"b".repeat(200);
        let rejection =
            normalize_success(response(ResponseShape::Json, 200, Payload::Text(body))).unwrap_err();
        let expected = format!("{}<...> {} [700]", "a".repeat(200), "b".repeat(200));
        assert_eq!(rejection.reason(), Some(expected.as_str()));
    }

    #[test]
    fn test_text_shape_is_not_shape_checked() {
        let payload = normalize_success(response(
            ResponseShape::Text,
            200,
            Payload::Text("<p>hello</p>".to_string()),
        ))
        .unwrap();
        assert_eq!(payload, Payload::Text("<p>hello</p>".to_string()));
    }

    #[test]
    fn test_binary_shape_passes_through() {
        let payload = normalize_success(response(
            ResponseShape::Binary,
            200,
            Payload::Binary(vec![0xde, 0xad]),
        ))
        .unwrap();
        assert_eq!(payload, Payload::Binary(vec![0xde, 0xad]));
    }

    #[test]
    fn test_error_text_wins_over_other_fields() {
        let rejection = normalize_success(json_response(json!({
            "errorText": "quota exceeded",
            "error_description": "ignored",
            "error": {"message": "also ignored"},
            "message": "nope",
        })))
        .unwrap_err();
        assert_eq!(rejection.kind(), ErrorKind::SemanticError);
        assert_eq!(rejection.reason(), Some("quota exceeded"));
        assert!(rejection.response().is_none());
    }

    #[test]
    fn test_error_description_signal() {
        let rejection = normalize_success(json_response(json!({
            "error": "invalid_grant",
            "error_description": "token expired",
        })))
        .unwrap_err();
        assert_eq!(rejection.reason(), Some("token expired"));
    }

    #[test]
    fn test_error_flag_with_message_signal() {
        let rejection =
            normalize_success(json_response(json!({"error": true, "message": "bad input"})))
                .unwrap_err();
        assert_eq!(rejection.reason(), Some("bad input"));
    }

    #[test]
    fn test_nested_error_message_signal() {
        let rejection =
            normalize_success(json_response(json!({"error": {"code": 7, "message": "locked"}})))
                .unwrap_err();
        assert_eq!(rejection.reason(), Some("locked"));
    }

    #[test]
    fn test_message_without_error_flag_is_success() {
        let body = json!({"error": false, "message": "created"});
        assert_eq!(
            normalize_success(json_response(body.clone())).unwrap(),
            Payload::Json(body)
        );
    }

    #[test]
    fn test_empty_error_text_is_ignored() {
        let body = json!({"errorText": "", "data": 1});
        assert!(normalize_success(json_response(body)).is_ok());
    }

    #[test]
    fn test_non_string_reason_rendered_as_json() {
        let rejection = normalize_success(json_response(json!({"errorText": 42}))).unwrap_err();
        assert_eq!(rejection.reason(), Some("42"));
    }

    // ==================== failure path ====================

    #[test]
    fn test_transport_failure_uses_body_message() {
        let failed = response(
            ResponseShape::Json,
            400,
            Payload::Json(json!({"message": "X", "description": "ignored"})),
        );
        let error = normalize_failure(Failure::Transport(TransportError::status(failed)));

        assert_eq!(error.kind(), ErrorKind::NetworkOrProtocol);
        assert!(error.message().contains("(X)"), "got: {}", error.message());
        assert_eq!(error.message(), "Request failed with status code 400 (X)");
        assert_eq!(error.code(), Some(&ErrorCode::Status(400)));
    }

    #[test]
    fn test_failure_reason_priority() {
        let description = response(
            ResponseShape::Json,
            500,
            Payload::Json(json!({"description": "db down", "error_description": "later"})),
        );
        let error = normalize_failure(Failure::Transport(TransportError::status(description)));
        assert_eq!(error.reason(), Some("db down"));

        let oauth = response(
            ResponseShape::Json,
            401,
            Payload::Json(json!({"error_description": "invalid token"})),
        );
        let error = normalize_failure(Failure::Transport(TransportError::status(oauth)));
        assert_eq!(error.reason(), Some("invalid token"));
    }

    #[test]
    fn test_failure_falls_back_to_status_text() {
        let failed = response(ResponseShape::Text, 404, Payload::Text(String::new()));
        let error = normalize_failure(Failure::Transport(TransportError::status(failed)));
        assert_eq!(error.message(), "Request failed with status code 404 (Not Found)");
        assert_eq!(error.status(), Some(404));
    }

    #[test]
    fn test_failure_without_response_uses_transport_code() {
        let error = normalize_failure(Failure::Transport(TransportError::network(
            "connect ECONNREFUSED 127.0.0.1:9",
            Some(codes::CONNECTION_REFUSED.to_string()),
        )));
        assert_eq!(
            error.message(),
            "connect ECONNREFUSED 127.0.0.1:9 (ECONNREFUSED)"
        );
        assert_eq!(
            error.code(),
            Some(&ErrorCode::Transport("ECONNREFUSED".to_string()))
        );
    }

    #[test]
    fn test_failure_without_any_reason_keeps_base_message() {
        let error =
            normalize_failure(Failure::Transport(TransportError::network("socket hang up", None)));
        assert_eq!(error.message(), "socket hang up");
        assert!(error.reason().is_none());
        assert!(error.code().is_none());
    }

    #[test]
    fn test_rejected_invalid_shape_keeps_kind_and_status() {
        let rejection = normalize_success(response(
            ResponseShape::Json,
            200,
            Payload::Text("oops".to_string()),
        ))
        .unwrap_err();
        let error = normalize_failure(Failure::Rejected(rejection));

        assert_eq!(error.kind(), ErrorKind::InvalidShape);
        assert_eq!(error.message(), "Invalid JSON (oops)");
        assert_eq!(error.reason(), Some("oops"));
        assert_eq!(error.status(), Some(200));
    }

    #[test]
    fn test_rejected_empty_body_falls_back_to_status_text() {
        let rejection = normalize_success(response(
            ResponseShape::Json,
            200,
            Payload::Text(String::new()),
        ))
        .unwrap_err();
        let error = normalize_failure(Failure::Rejected(rejection));
        assert_eq!(error.kind(), ErrorKind::InvalidShape);
        assert_eq!(error.message(), "Invalid JSON (OK)");
        assert_eq!(error.reason(), Some(""));
    }

    #[test]
    fn test_rejected_semantic_has_no_code() {
        let error = normalize_failure(Failure::Rejected(Rejection::semantic("token expired")));
        assert_eq!(error.kind(), ErrorKind::SemanticError);
        assert_eq!(error.message(), "Response error (token expired)");
        assert_eq!(error.reason(), Some("token expired"));
        assert!(error.code().is_none());
    }

    #[test]
    fn test_default_handler_delegates() {
        let handler = DefaultHandler;
        let payload = handler
            .interpret_success(json_response(json!({"ok": true})))
            .unwrap();
        assert_eq!(payload, Payload::Json(json!({"ok": true})));

        let error = handler.interpret_failure(Failure::Rejected(Rejection::semantic("nope")));
        assert_eq!(error.kind(), ErrorKind::SemanticError);
    }
}
