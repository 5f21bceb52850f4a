//! Local errors raised before a request reaches the network.
//!
//! # Design
//! Remote failures (non-success statuses, transport errors) are never
//! errors here; they come back as `Outcome::Failure`. `ClientError` only
//! covers what stops a request from being built, so a caller that sees `Err`
//! knows nothing was sent.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors returned while building a request.
#[derive(Debug, Error)]
pub enum ClientError {
    /// An attachment path could not be read.
    #[error("failed to read attachment {}: {source}", .path.display())]
    Attachment {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The JSON body could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The query parameters could not be URL-encoded.
    #[error("query encoding failed: {0}")]
    Query(#[from] serde_urlencoded::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_error_names_the_path() {
        let err = ClientError::Attachment {
            path: PathBuf::from("/tmp/missing.bin"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/missing.bin"), "{msg}");
        assert!(msg.contains("no such file"), "{msg}");
    }
}
