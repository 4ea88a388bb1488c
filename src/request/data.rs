//! The `data` argument of the verb builders.

use std::fmt;

use serde_json::{Map, Value};

/// Payload handed to a verb builder.
///
/// GET turns it into query parameters. POST and DELETE turn it into the
/// request body.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestData {
    #[default]
    None,
    /// JSON-capable value. Only non-empty objects and arrays are used.
    Json(Value),
    /// URL-encoded form.
    Form(FormData),
}

impl RequestData {
    /// Returns the JSON value when it is a non-empty mapping.
    #[must_use]
    pub fn non_empty_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) if is_non_empty_mapping(value) => Some(value),
            _ => None,
        }
    }

    /// Whether the data would contribute nothing to a request.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::Json(value) => !is_non_empty_mapping(value),
            Self::Form(form) => form.is_empty(),
        }
    }
}

impl From<Value> for RequestData {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<Map<String, Value>> for RequestData {
    fn from(fields: Map<String, Value>) -> Self {
        Self::Json(Value::Object(fields))
    }
}

impl From<FormData> for RequestData {
    fn from(form: FormData) -> Self {
        Self::Form(form)
    }
}

impl From<Option<Value>> for RequestData {
    fn from(value: Option<Value>) -> Self {
        value.map_or(Self::None, Self::Json)
    }
}

/// Whether `value` is an object with at least one key or an array with at
/// least one element.
#[must_use]
pub fn is_non_empty_mapping(value: &Value) -> bool {
    match value {
        Value::Object(fields) => !fields.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => false,
    }
}

/// Ordered `application/x-www-form-urlencoded` pairs.
///
/// ```
/// use request_layer::FormData;
///
/// let form = FormData::new().with("grant_type", "refresh_token").with("scope", "read write");
/// assert_eq!(form.encode(), "grant_type=refresh_token&scope=read+write");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    pairs: Vec<(String, String)>,
}

impl FormData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pair. Repeated keys are kept.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(key, value);
        self
    }

    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns the canonical encoded string.
    #[must_use]
    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.pairs)
            .finish()
    }
}

impl fmt::Display for FormData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// Flattens an object into query pairs.
///
/// Strings are used verbatim, other scalars in their JSON text, `null` is
/// skipped, and arrays expand to repeated `key[]` entries.
#[must_use]
pub fn query_pairs(fields: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(fields.len());
    for (key, value) in fields {
        if let Value::Array(items) = value {
            let array_key = format!("{key}[]");
            pairs.extend(
                items
                    .iter()
                    .filter_map(query_text)
                    .map(|text| (array_key.clone(), text)),
            );
        } else if let Some(text) = query_text(value) {
            pairs.push((key.clone(), text));
        }
    }
    pairs
}

/// Flattens a top-level array into index-keyed query pairs (`0=a&1=b`).
///
/// Elements follow the same rendering as [`query_pairs`] values.
#[must_use]
pub fn indexed_query_pairs(items: &[Value]) -> Vec<(String, String)> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| query_text(item).map(|text| (index.to_string(), text)))
        .collect()
}

fn query_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
