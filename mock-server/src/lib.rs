use std::collections::BTreeMap;

use axum::{
    extract::{Multipart, Path, Query},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::debug;

/// What `/echo` saw of the incoming request.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Echo {
    pub method: String,
    pub query: BTreeMap<String, String>,
    pub content_type: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

/// What `/upload` parsed out of a multipart body.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Upload {
    pub fields: BTreeMap<String, String>,
    /// File name to size in bytes.
    pub files: BTreeMap<String, usize>,
    pub authorization: Option<String>,
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/upload", post(upload).put(upload).patch(upload))
        .route("/status/{code}", any(status))
        .route("/text", get(text))
        .route("/redirect/{n}", get(redirect))
        .route("/large/{len}", get(large))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// POST answers 201, every other method 200.
fn success_status(method: &Method) -> StatusCode {
    if *method == Method::POST {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    }
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn echo(
    method: Method,
    headers: HeaderMap,
    Query(query): Query<BTreeMap<String, String>>,
    body: String,
) -> (StatusCode, Json<Echo>) {
    debug!(%method, "echo");
    let echo = Echo {
        method: method.to_string(),
        query,
        content_type: header_value(&headers, header::CONTENT_TYPE),
        authorization: header_value(&headers, header::AUTHORIZATION),
        body,
    };
    (success_status(&method), Json(echo))
}

async fn upload(
    method: Method,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Upload>), StatusCode> {
    let mut upload = Upload {
        authorization: header_value(&headers, header::AUTHORIZATION),
        ..Upload::default()
    };
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        let name = field.name().unwrap_or_default().to_string();
        let is_file = field.file_name().is_some();
        let bytes = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
        if is_file {
            upload.files.insert(name, bytes.len());
        } else {
            upload
                .fields
                .insert(name, String::from_utf8_lossy(&bytes).into_owned());
        }
    }
    debug!(%method, files = upload.files.len(), fields = upload.fields.len(), "upload");
    Ok((success_status(&method), Json(upload)))
}

async fn status(Path(code): Path<u16>) -> Result<(StatusCode, String), StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((status, format!("status {code}")))
}

async fn text() -> &'static str {
    "plain text"
}

/// `len` bytes of `a`, served as plain text.
async fn large(Path(len): Path<usize>) -> String {
    "a".repeat(len)
}

async fn redirect(Path(n): Path<u32>) -> Response {
    if n == 0 {
        return "done".into_response();
    }
    let location = format!("/redirect/{}", n - 1);
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}
