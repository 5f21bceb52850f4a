//! Client configuration and the per-verb success policy.
//!
//! Both structs deserialize with per-field defaults, so a host application
//! can embed them in its own configuration file and override only what it
//! needs.

use std::time::Duration;

use serde::Deserialize;

use crate::http::HttpMethod;

pub const DEFAULT_MAX_REDIRECTS: u32 = 10;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The one status code each verb treats as success.
///
/// POST defaults to 201 (created); every other verb to 200. Any other
/// status, including other 2xx codes, is a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SuccessPolicy {
    pub get: u16,
    pub delete: u16,
    pub post: u16,
    pub put: u16,
    pub patch: u16,
}

impl Default for SuccessPolicy {
    fn default() -> Self {
        Self {
            get: 200,
            delete: 200,
            post: 201,
            put: 200,
            patch: 200,
        }
    }
}

impl SuccessPolicy {
    pub fn status_for(&self, method: HttpMethod) -> u16 {
        match method {
            HttpMethod::Get => self.get,
            HttpMethod::Delete => self.delete,
            HttpMethod::Post => self.post,
            HttpMethod::Put => self.put,
            HttpMethod::Patch => self.patch,
        }
    }

    pub fn is_success(&self, method: HttpMethod, status: u16) -> bool {
        self.status_for(method) == status
    }
}

/// Limits applied to every request plus the success policy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub max_redirects: u32,
    #[serde(rename = "timeout_secs", deserialize_with = "deserialize_secs")]
    pub timeout: Duration,
    pub success: SuccessPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            max_redirects: DEFAULT_MAX_REDIRECTS,
            timeout: DEFAULT_TIMEOUT,
            success: SuccessPolicy::default(),
        }
    }
}

fn deserialize_secs<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_secs)
}
