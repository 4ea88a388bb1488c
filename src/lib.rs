//! Request Layer Library
//!
//! A thin HTTP request layer: verb builders that send GET, POST and DELETE
//! requests, decode the response as text, JSON or bytes, and fold every
//! failure into one uniform [`RequestError`].
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`request`] - Verb builders, request options, body encoding and pacing
//! - [`outcome`] - Success and failure normalization into [`Payload`] / [`RequestError`]
//! - [`transport`] - The HTTP exchange seam and its `reqwest` implementation
//!
//! # Example
//!
//! ```no_run
//! use request_layer::{FormData, RequestOptions, post};
//!
//! # async fn example() -> Result<(), request_layer::RequestError> {
//! let form = FormData::new().with("grant_type", "client_credentials");
//! let token = post("https://auth.example.com/token", form, RequestOptions::default())
//!     .as_json()
//!     .await?;
//! # let _ = token;
//! # Ok(())
//! # }
//! ```
//!
//! Failures keep the server's own words where it offers them:
//!
//! ```no_run
//! use request_layer::outcome::ErrorKind;
//! use request_layer::{RequestData, RequestOptions, get};
//!
//! # async fn example() {
//! match get("https://api.example.com/me", RequestData::None, RequestOptions::default())
//!     .as_json()
//!     .await
//! {
//!     Ok(profile) => println!("{profile:?}"),
//!     Err(error) if error.kind() == ErrorKind::SemanticError => eprintln!("api: {error}"),
//!     Err(error) => eprintln!("request failed: {error}"),
//! }
//! # }
//! ```

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod outcome;
pub mod request;
pub mod transport;
mod user_agent;

// Re-export commonly used types
pub use outcome::{
    DefaultHandler, ErrorCode, ErrorKind, Failure, Payload, Rejection, RequestError,
    ResponseHandler,
};
pub use request::{
    Client, DeleteRequest, FormData, GetRequest, Pacing, PostRequest, RequestBody, RequestConfig,
    RequestData, RequestOptions, ResponseShape, delete, get, post,
};
