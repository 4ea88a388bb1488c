//! Request construction and execution.
//!
//! # Overview
//!
//! A verb builder ([`Client::get`], [`Client::post`], [`Client::delete`])
//! turns a URL, a [`RequestData`] payload and [`RequestOptions`] into a request
//! value. Nothing is sent until a terminal operation runs:
//!
//! | Verb   | Terminal operations                  |
//! |--------|--------------------------------------|
//! | GET    | `as_text`, `as_json`, `as_binary`    |
//! | POST   | `as_json`                            |
//! | DELETE | `as_json`                            |
//!
//! Each terminal operation performs one transport call and feeds the result
//! through the request's [`crate::outcome::ResponseHandler`]. `as_json` also
//! honours [`RequestOptions::requests_per_second`] through [`Pacing`].
//!
//! # Example
//!
//! ```no_run
//! use request_layer::{RequestOptions, get};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), request_layer::RequestError> {
//! let page = get("https://api.example.com/items", json!({"page": 2}), RequestOptions::default())
//!     .as_json()
//!     .await?;
//! # let _ = page;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
pub mod constants;
mod data;
mod options;
mod pacing;

pub use client::{Client, DeleteRequest, GetRequest, PostRequest, delete, get, post};
pub use config::{RequestBody, RequestConfig, ResponseShape};
pub use data::{FormData, RequestData, indexed_query_pairs, is_non_empty_mapping, query_pairs};
pub use options::RequestOptions;
pub use pacing::{Pacing, paced};
