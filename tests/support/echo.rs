//! httpbin-style echo responder for wiremock.

use serde_json::{Map, Value, json};
use wiremock::{Request, Respond, ResponseTemplate};

/// Answers every request with a JSON description of what it received:
/// `method`, `query` (raw string or null), `args`, `headers` (lowercase
/// names), `data` (raw body text) and `json` (parsed body or null).
pub struct EchoResponder;

impl Respond for EchoResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut args = Map::new();
        for (key, value) in request.url.query_pairs() {
            let value = Value::String(value.into_owned());
            match args.get_mut(key.as_ref()) {
                Some(Value::Array(values)) => values.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
                None => {
                    args.insert(key.into_owned(), value);
                }
            }
        }

        let headers: Map<String, Value> = request
            .headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_ascii_lowercase(),
                    Value::String(value.to_str().unwrap_or_default().to_string()),
                )
            })
            .collect();

        let data = String::from_utf8_lossy(&request.body).into_owned();
        let parsed = serde_json::from_slice::<Value>(&request.body).unwrap_or(Value::Null);

        ResponseTemplate::new(200).set_body_json(json!({
            "method": request.method.as_str(),
            "query": request.url.query(),
            "args": args,
            "headers": headers,
            "data": data,
            "json": parsed,
        }))
    }
}
