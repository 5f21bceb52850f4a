//! Blocking `Transport` backed by ureq.
//!
//! # Design
//! An agent is configured per request from the request's own redirect cap
//! and timeout, so `UreqTransport` itself holds nothing and is freely shared
//! across threads. ureq's status-code-as-error behavior is disabled: 4xx/5xx
//! responses come back as data and the client decides what they mean.

use ureq::http;

use crate::http::{HttpRequest, HttpResponse, Transport, TransportError};

#[derive(Debug, Clone, Copy, Default)]
pub struct UreqTransport;

impl UreqTransport {
    pub fn new() -> Self {
        Self
    }

    fn agent(request: &HttpRequest) -> ureq::Agent {
        ureq::Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(request.max_redirects)
            .timeout_global(Some(request.timeout))
            .build()
            .new_agent()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = Self::agent(request);

        let mut builder = http::Request::builder()
            .method(request.method.as_str())
            .uri(request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let result = match &request.body {
            Some(body) => builder
                .body(body.clone())
                .map_err(|e| TransportError::new(e.to_string()))
                .and_then(|req| agent.run(req).map_err(TransportError::from)),
            None => builder
                .body(())
                .map_err(|e| TransportError::new(e.to_string()))
                .and_then(|req| agent.run(req).map_err(TransportError::from)),
        };
        let mut response = result?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        // ureq caps bodies at 10 MiB unless told otherwise.
        let bytes = response.body_mut().with_config().limit(u64::MAX).read_to_vec()?;
        let body = String::from_utf8_lossy(&bytes).into_owned();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

impl From<ureq::Error> for TransportError {
    fn from(err: ureq::Error) -> Self {
        TransportError::new(err.to_string())
    }
}
