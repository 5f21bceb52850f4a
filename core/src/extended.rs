//! Convenience posts with optional cleanup of uploaded files.
//!
//! `ExtendedClient` owns a base `Client` and adds three narrower POST entry
//! points. When asked to, it deletes the uploaded files once the server has
//! accepted them. A failed deletion is logged and never replaces the
//! outcome of the POST itself.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::client::Client;
use crate::error::ClientError;
use crate::http::Transport;
use crate::outcome::Outcome;
use crate::Fields;

/// Per-call options for `ExtendedClient::post_multi`.
///
/// Defaults: no fields, no files, no token, files kept after upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostOptions {
    pub fields: Fields,
    pub file_paths: Vec<PathBuf>,
    pub token: Option<String>,
    pub delete_after_post: bool,
}

impl PostOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_paths.push(path.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn delete_after_post(mut self, delete: bool) -> Self {
        self.delete_after_post = delete;
        self
    }
}

#[derive(Debug, Clone)]
pub struct ExtendedClient<T> {
    inner: Client<T>,
}

impl<T: Transport> ExtendedClient<T> {
    pub fn new(inner: Client<T>) -> Self {
        Self { inner }
    }

    pub fn client(&self) -> &Client<T> {
        &self.inner
    }

    pub fn into_inner(self) -> Client<T> {
        self.inner
    }

    /// POST `fields` as JSON.
    pub fn post_data(&self, url: &str, fields: &Fields, token: Option<&str>) -> Result<Outcome, ClientError> {
        let no_files: &[PathBuf] = &[];
        self.inner.post(url, fields, no_files, token)
    }

    /// POST only files; remove them afterwards on success if requested.
    pub fn post_files<P: AsRef<Path>>(
        &self,
        url: &str,
        file_paths: &[P],
        token: Option<&str>,
        delete_after_post: bool,
    ) -> Result<Outcome, ClientError> {
        let outcome = self.inner.post(url, &Fields::new(), file_paths, token)?;
        if outcome.is_success() && delete_after_post {
            delete_local_files(file_paths);
        }
        Ok(outcome)
    }

    /// POST fields and files together; remove the files afterwards on
    /// success if `options.delete_after_post` is set.
    pub fn post_multi(&self, url: &str, options: &PostOptions) -> Result<Outcome, ClientError> {
        let outcome = self.inner.post(
            url,
            &options.fields,
            options.file_paths.as_slice(),
            options.token.as_deref(),
        )?;
        if outcome.is_success() && options.delete_after_post {
            delete_local_files(options.file_paths.as_slice());
        }
        Ok(outcome)
    }
}

fn delete_local_files<P: AsRef<Path>>(paths: &[P]) {
    for path in paths {
        let path = path.as_ref();
        match fs::remove_file(path) {
            Ok(()) => debug!(path = %path.display(), "deleted uploaded file"),
            Err(err) => warn!(path = %path.display(), error = %err, "failed to delete uploaded file"),
        }
    }
}
