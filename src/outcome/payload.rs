//! Decoded response bodies.

use serde_json::Value;

use crate::request::ResponseShape;

/// Body of a response, decoded according to the requested shape.
///
/// The transport produces it, and the default handler passes it through
/// unchanged on success.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Text or markup.
    Text(String),
    /// Decoded JSON.
    Json(Value),
    /// Raw bytes.
    Binary(Vec<u8>),
}

impl Payload {
    /// Returns the shape this payload was decoded as.
    ///
    /// A JSON request whose body failed to decode yields [`ResponseShape::Text`].
    #[must_use]
    pub fn shape(&self) -> ResponseShape {
        match self {
            Self::Text(_) => ResponseShape::Text,
            Self::Json(_) => ResponseShape::Json,
            Self::Binary(_) => ResponseShape::Binary,
        }
    }

    /// Whether the payload is an object, array or `null`.
    #[must_use]
    pub fn is_structured(&self) -> bool {
        matches!(
            self,
            Self::Json(Value::Object(_) | Value::Array(_) | Value::Null)
        )
    }

    #[must_use]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(bytes) => Some(bytes),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Self::Binary(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Renders the payload as text for diagnostics.
    ///
    /// JSON strings yield their content, other JSON values their serialized
    /// form, and bytes are decoded lossily.
    #[must_use]
    pub fn diagnostic_text(&self) -> String {
        match self {
            Self::Text(text) | Self::Json(Value::String(text)) => text.clone(),
            Self::Json(value) => value.to_string(),
            Self::Binary(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        }
    }
}
