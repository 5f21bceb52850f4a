//! Thin HTTP client for JSON and multipart APIs.
//!
//! # Overview
//! GET and DELETE send a URL-encoded query string. POST, PUT and PATCH send
//! either a JSON object or, when files are attached, a `multipart/form-data`
//! body. A bearer token is attached when one is given. Every response is
//! normalized into an `Outcome`: the decoded JSON (or raw text) on the
//! verb's success status, a `{status_code, message}` failure otherwise.
//!
//! # Design
//! - `Client` is stateless; it holds only a `ClientConfig` and a transport.
//! - Each verb is split into `build_*` (produces an `HttpRequest`) and
//!   `parse_response` (consumes an `HttpResponse`), so the I/O boundary is
//!   explicit and any `Transport` can sit between them.
//! - Only local pre-flight problems (an unreadable attachment) are `Err`;
//!   remote and transport failures are `Outcome::Failure` values.
//! - `ExtendedClient` wraps a `Client` and adds convenience posts with
//!   optional deletion of uploaded files.

pub mod client;
pub mod config;
pub mod error;
pub mod extended;
pub mod http;
pub mod json;
pub mod multipart;
pub mod outcome;
pub mod query;
#[cfg(feature = "ureq")]
pub mod transport;

/// Body fields for POST, PUT and PATCH.
pub type Fields = serde_json::Map<String, serde_json::Value>;

pub use client::Client;
pub use config::{ClientConfig, SuccessPolicy};
pub use error::ClientError;
pub use extended::{ExtendedClient, PostOptions};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use multipart::{Attachment, Boundary};
pub use outcome::{Outcome, Payload};
pub use query::QueryParams;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
