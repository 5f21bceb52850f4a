//! Normalized result of a request.

use serde::Serialize;
use serde_json::Value;

/// Body of a successful response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// The body decoded as JSON.
    Json(Value),
    /// The body as received, when it was not valid JSON.
    Text(String),
}

impl Payload {
    pub fn from_body(body: String) -> Self {
        match serde_json::from_str(&body) {
            Ok(value) => Payload::Json(value),
            Err(_) => Payload::Text(body),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(v) => Some(v),
            Payload::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Json(_) => None,
            Payload::Text(s) => Some(s),
        }
    }
}

/// Either the decoded payload or a failure record. Remote failures are data,
/// not errors, so callers branch on this without `?`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success(Payload),
    Failure { status_code: u16, message: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn payload(&self) -> Option<&Payload> {
        match self {
            Outcome::Success(p) => Some(p),
            Outcome::Failure { .. } => None,
        }
    }

    /// `Ok(payload)` on success, `Err((status_code, message))` otherwise.
    pub fn into_result(self) -> Result<Payload, (u16, String)> {
        match self {
            Outcome::Success(p) => Ok(p),
            Outcome::Failure {
                status_code,
                message,
            } => Err((status_code, message)),
        }
    }
}
