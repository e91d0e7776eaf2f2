//! HTTP backend seam for the remote API client.
//!
//! [`MinecraftClient`](super::MinecraftClient) shapes payloads and interprets
//! responses; a [`MinecraftBackend`] only moves bytes. Every method returns
//! the raw body text of a 2xx response and maps everything else to
//! [`ApiError`].

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::error::{ApiError, ApiResult};

/// A binary file upload plus its accompanying text form fields.
#[derive(Debug, Clone)]
pub struct StructureUpload {
    /// Name of the form part carrying the file.
    pub field: &'static str,
    pub filename: String,
    pub bytes: Vec<u8>,
    /// Plain text form fields, sent in order.
    pub fields: Vec<(&'static str, String)>,
}

/// Transport used by the remote API client.
#[async_trait]
pub trait MinecraftBackend: Send + Sync {
    /// Issue a GET request.
    async fn get(&self, path: &str, timeout: Duration) -> ApiResult<String>;

    /// Issue a POST request with a JSON body.
    async fn post_json(&self, path: &str, body: &Value, timeout: Duration) -> ApiResult<String>;

    /// Issue a multipart form POST.
    async fn post_multipart(
        &self,
        path: &str,
        upload: StructureUpload,
        timeout: Duration,
    ) -> ApiResult<String>;
}

/// Production backend built on a pooled `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestBackend {
    http: reqwest::Client,
    base_url: String,
}

impl ReqwestBackend {
    /// Create a backend targeting `base_url` (e.g. `http://localhost:7070`).
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("minecraft-mcp-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder, timeout: Duration) -> ApiResult<String> {
        let response = request
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(e, timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::from_reqwest(e, timeout))?;

        if !status.is_success() {
            return Err(ApiError::status(status.as_u16(), &body));
        }

        Ok(body)
    }
}

#[async_trait]
impl MinecraftBackend for ReqwestBackend {
    async fn get(&self, path: &str, timeout: Duration) -> ApiResult<String> {
        debug!(path, ?timeout, "GET");
        self.send(self.http.get(self.url(path)), timeout).await
    }

    async fn post_json(&self, path: &str, body: &Value, timeout: Duration) -> ApiResult<String> {
        debug!(path, ?timeout, "POST");
        self.send(self.http.post(self.url(path)).json(body), timeout)
            .await
    }

    async fn post_multipart(
        &self,
        path: &str,
        upload: StructureUpload,
        timeout: Duration,
    ) -> ApiResult<String> {
        debug!(path, ?timeout, bytes = upload.bytes.len(), "POST multipart");

        let part = Part::bytes(upload.bytes)
            .file_name(upload.filename)
            .mime_str("application/octet-stream")
            .map_err(|e| ApiError::Client(e.to_string()))?;

        let form = upload
            .fields
            .into_iter()
            .fold(Form::new().part(upload.field, part), |form, (name, value)| {
                form.text(name, value)
            });

        self.send(self.http.post(self.url(path)).multipart(form), timeout)
            .await
    }
}
