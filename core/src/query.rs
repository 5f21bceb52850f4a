//! Query-string encoding for bodyless verbs.

use std::collections::BTreeMap;

use crate::error::ClientError;

/// Query parameters for GET and DELETE. Ordering carries no meaning; the
/// map keeps the encoded form deterministic.
pub type QueryParams = BTreeMap<String, String>;

/// Encode `params` as `application/x-www-form-urlencoded`.
pub fn encode_query(params: &QueryParams) -> Result<String, ClientError> {
    Ok(serde_urlencoded::to_string(params)?)
}

/// Append the encoded `params` to `url`. An empty map leaves `url` as is.
pub fn append_query(url: &str, params: &QueryParams) -> Result<String, ClientError> {
    if params.is_empty() {
        return Ok(url.to_string());
    }
    let query = encode_query(params)?;
    let separator = if url.contains('?') { '&' } else { '?' };
    Ok(format!("{url}{separator}{query}"))
}
