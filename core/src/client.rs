//! Stateless base client for the five HTTP verbs.
//!
//! # Design
//! `Client` holds only its configuration and a transport, and carries no
//! mutable state between calls. Every verb is split into a `build_*` method
//! that produces an `HttpRequest` and a shared `parse_response` that turns an
//! `HttpResponse` into an `Outcome`. The verb methods (`get`, `post`, ...)
//! chain build, `Transport::execute` and parse; callers that run their own
//! I/O use the two halves directly.

use std::path::Path;

use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
use crate::json::encode_json_fields;
use crate::multipart::{encode_multipart, load_attachments, Boundary};
use crate::outcome::{Outcome, Payload};
use crate::query::{append_query, QueryParams};
use crate::Fields;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Base client: query strings for GET/DELETE, JSON or multipart bodies for
/// POST/PUT/PATCH, optional bearer token on every verb.
#[derive(Debug, Clone)]
pub struct Client<T> {
    config: ClientConfig,
    transport: T,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    pub fn with_config(transport: T, config: ClientConfig) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn get(&self, url: &str, query: &QueryParams, token: Option<&str>) -> Result<Outcome, ClientError> {
        let request = self.build_get(url, query, token)?;
        Ok(self.send(request))
    }

    pub fn delete(&self, url: &str, query: &QueryParams, token: Option<&str>) -> Result<Outcome, ClientError> {
        let request = self.build_delete(url, query, token)?;
        Ok(self.send(request))
    }

    pub fn post<P: AsRef<Path>>(
        &self,
        url: &str,
        fields: &Fields,
        file_paths: &[P],
        token: Option<&str>,
    ) -> Result<Outcome, ClientError> {
        let request = self.build_post(url, fields, file_paths, token)?;
        Ok(self.send(request))
    }

    pub fn put<P: AsRef<Path>>(
        &self,
        url: &str,
        fields: &Fields,
        file_paths: &[P],
        token: Option<&str>,
    ) -> Result<Outcome, ClientError> {
        let request = self.build_put(url, fields, file_paths, token)?;
        Ok(self.send(request))
    }

    pub fn patch<P: AsRef<Path>>(
        &self,
        url: &str,
        fields: &Fields,
        file_paths: &[P],
        token: Option<&str>,
    ) -> Result<Outcome, ClientError> {
        let request = self.build_patch(url, fields, file_paths, token)?;
        Ok(self.send(request))
    }

    /// Execute a built request and normalize whatever comes back.
    pub fn send(&self, request: HttpRequest) -> Outcome {
        debug!(method = %request.method, url = %request.url, "sending request");
        match self.transport.execute(&request) {
            Ok(response) => self.parse_response(request.method, response),
            Err(err) => {
                warn!(method = %request.method, url = %request.url, error = %err, "transport failed");
                transport_failure(err)
            }
        }
    }
}

impl<T> Client<T> {
    pub fn build_get(&self, url: &str, query: &QueryParams, token: Option<&str>) -> Result<HttpRequest, ClientError> {
        self.build_bodyless(HttpMethod::Get, url, query, token)
    }

    pub fn build_delete(&self, url: &str, query: &QueryParams, token: Option<&str>) -> Result<HttpRequest, ClientError> {
        self.build_bodyless(HttpMethod::Delete, url, query, token)
    }

    pub fn build_post<P: AsRef<Path>>(
        &self,
        url: &str,
        fields: &Fields,
        file_paths: &[P],
        token: Option<&str>,
    ) -> Result<HttpRequest, ClientError> {
        self.build_with_body(HttpMethod::Post, url, fields, file_paths, token)
    }

    pub fn build_put<P: AsRef<Path>>(
        &self,
        url: &str,
        fields: &Fields,
        file_paths: &[P],
        token: Option<&str>,
    ) -> Result<HttpRequest, ClientError> {
        self.build_with_body(HttpMethod::Put, url, fields, file_paths, token)
    }

    pub fn build_patch<P: AsRef<Path>>(
        &self,
        url: &str,
        fields: &Fields,
        file_paths: &[P],
        token: Option<&str>,
    ) -> Result<HttpRequest, ClientError> {
        self.build_with_body(HttpMethod::Patch, url, fields, file_paths, token)
    }

    /// Success iff the status equals the method's configured success code.
    pub fn parse_response(&self, method: HttpMethod, response: HttpResponse) -> Outcome {
        let outcome = if self.config.success.is_success(method, response.status) {
            Outcome::Success(Payload::from_body(response.body))
        } else {
            Outcome::Failure {
                status_code: response.status,
                message: response.body,
            }
        };
        debug!(%method, success = outcome.is_success(), "parsed response");
        outcome
    }

    fn build_bodyless(
        &self,
        method: HttpMethod,
        url: &str,
        query: &QueryParams,
        token: Option<&str>,
    ) -> Result<HttpRequest, ClientError> {
        Ok(HttpRequest {
            method,
            url: append_query(url, query)?,
            headers: headers(JSON_CONTENT_TYPE.to_string(), token),
            body: None,
            max_redirects: self.config.max_redirects,
            timeout: self.config.timeout,
        })
    }

    fn build_with_body<P: AsRef<Path>>(
        &self,
        method: HttpMethod,
        url: &str,
        fields: &Fields,
        file_paths: &[P],
        token: Option<&str>,
    ) -> Result<HttpRequest, ClientError> {
        let attachments = load_attachments(file_paths)?;
        let (content_type, body) = if attachments.is_empty() {
            (JSON_CONTENT_TYPE.to_string(), encode_json_fields(fields)?)
        } else {
            let boundary = Boundary::generate();
            let body = encode_multipart(&boundary, fields, &attachments);
            (boundary.content_type(), body)
        };
        Ok(HttpRequest {
            method,
            url: url.to_string(),
            headers: headers(content_type, token),
            body: Some(body),
            max_redirects: self.config.max_redirects,
            timeout: self.config.timeout,
        })
    }
}

fn headers(content_type: String, token: Option<&str>) -> Vec<(String, String)> {
    let mut headers = vec![("Content-Type".to_string(), content_type)];
    if let Some(token) = token.filter(|t| !t.is_empty()) {
        headers.push(("Authorization".to_string(), format!("Bearer {token}")));
    }
    headers
}

fn transport_failure(err: TransportError) -> Outcome {
    Outcome::Failure {
        status_code: err.status_code,
        message: err.message,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;

    struct Unreachable;

    impl Transport for Unreachable {
        fn execute(&self, _request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            Err(TransportError::new("Connection refused"))
        }
    }

    fn client() -> Client<Unreachable> {
        Client::new(Unreachable)
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn query(pairs: &[(&str, &str)]) -> QueryParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    const NO_FILES: &[&str] = &[];

    #[test]
    fn build_get_produces_correct_request() {
        let req = client()
            .build_get("http://localhost:3000/items", &query(&[("page", "2")]), None)
            .unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/items?page=2");
        assert_eq!(
            req.headers,
            vec![("Content-Type".to_string(), "application/json".to_string())]
        );
        assert!(req.body.is_none());
        assert_eq!(req.max_redirects, 10);
        assert_eq!(req.timeout, Duration::from_secs(30));
    }

    #[test]
    fn build_delete_without_query_keeps_url() {
        let req = client()
            .build_delete("http://localhost:3000/items/7", &QueryParams::new(), Some("abc"))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, "http://localhost:3000/items/7");
        assert_eq!(req.header("Authorization"), Some("Bearer abc"));
    }

    #[test]
    fn empty_token_omits_authorization() {
        let req = client()
            .build_get("http://localhost", &QueryParams::new(), Some(""))
            .unwrap();
        assert!(req.header("Authorization").is_none());
    }

    #[test]
    fn build_post_without_files_sends_json() {
        let fields = json!({"title": "Buy milk", "qty": "2"}).as_object().cloned().unwrap();
        let req = client()
            .build_post("http://localhost/todos", &fields, NO_FILES, Some("abc"))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        assert_eq!(req.header("Authorization"), Some("Bearer abc"));
        let body: serde_json::Value = serde_json::from_slice(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"title": "Buy milk", "qty": 2}));
    }

    #[test]
    fn build_patch_with_files_sends_multipart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        let fields = json!({"kind": "note"}).as_object().cloned().unwrap();
        let req = client()
            .build_patch("http://localhost/notes/1", &fields, &[&path], None)
            .unwrap();
        assert_eq!(req.method, HttpMethod::Patch);

        let content_type = req.header("Content-Type").unwrap();
        let delimiter = content_type
            .strip_prefix("multipart/form-data; boundary=")
            .unwrap();
        let body = String::from_utf8(req.body.clone().unwrap()).unwrap();
        assert_eq!(body.matches(&format!("--{delimiter}\r\n")).count(), 2);
        assert!(body.ends_with(&format!("--{delimiter}--\r\n")));
        assert!(body.contains("name=\"notes.txt\"; filename=\"notes.txt\""));
    }

    #[test]
    fn unreadable_file_fails_before_sending() {
        let err = client()
            .put("http://localhost", &Fields::new(), &["/no/such/file"], None)
            .unwrap_err();
        assert!(matches!(err, ClientError::Attachment { .. }));
    }

    #[test]
    fn parse_success_decodes_json() {
        let outcome = client().parse_response(HttpMethod::Get, response(200, r#"{"a":1}"#));
        assert_eq!(outcome, Outcome::Success(Payload::Json(json!({"a": 1}))));
    }

    #[test]
    fn parse_success_falls_back_to_text() {
        let outcome = client().parse_response(HttpMethod::Put, response(200, "plain text"));
        assert_eq!(outcome, Outcome::Success(Payload::Text("plain text".to_string())));
    }

    #[test]
    fn parse_post_requires_created() {
        let c = client();
        assert!(c.parse_response(HttpMethod::Post, response(201, "{}")).is_success());
        assert_eq!(
            c.parse_response(HttpMethod::Post, response(200, "ok")),
            Outcome::Failure {
                status_code: 200,
                message: "ok".to_string()
            }
        );
    }

    #[test]
    fn parse_not_found_is_failure() {
        let outcome = client().parse_response(HttpMethod::Delete, response(404, "not found"));
        assert_eq!(
            outcome,
            Outcome::Failure {
                status_code: 404,
                message: "not found".to_string()
            }
        );
    }

    #[test]
    fn transport_error_becomes_failure() {
        let outcome = client()
            .get("http://localhost:1", &QueryParams::new(), None)
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::Failure {
                status_code: 0,
                message: "Connection refused".to_string()
            }
        );
    }
}
