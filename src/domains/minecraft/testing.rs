//! In-memory backend for unit tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use super::backend::{MinecraftBackend, StructureUpload};
use super::error::{ApiError, ApiResult};

type Responder = Box<dyn Fn(Option<&Value>) -> Value + Send + Sync>;

enum Canned {
    Text(String),
    Fail(ApiError),
    With(Responder),
}

/// A request seen by [`RecordingBackend`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
    pub upload: Option<StructureUpload>,
    pub timeout: Duration,
}

/// Records every request and answers from a queue of canned responses.
#[derive(Default)]
pub struct RecordingBackend {
    requests: Mutex<Vec<RecordedRequest>>,
    responses: Mutex<VecDeque<Canned>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_text(self, text: impl Into<String>) -> Self {
        self.push(Canned::Text(text.into()))
    }

    pub fn respond_json(self, value: Value) -> Self {
        self.push(Canned::Text(value.to_string()))
    }

    pub fn respond_err(self, err: ApiError) -> Self {
        self.push(Canned::Fail(err))
    }

    /// Answer with a value computed from the JSON request body.
    pub fn respond_with<F>(self, f: F) -> Self
    where
        F: Fn(Option<&Value>) -> Value + Send + Sync + 'static,
    {
        self.push(Canned::With(Box::new(f)))
    }

    fn push(self, canned: Canned) -> Self {
        self.responses.lock().unwrap().push_back(canned);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn answer(&self, request: RecordedRequest) -> ApiResult<String> {
        let canned = self.responses.lock().unwrap().pop_front();
        let reply = match canned {
            Some(Canned::Text(text)) => Ok(text),
            Some(Canned::Fail(err)) => Err(err),
            Some(Canned::With(f)) => Ok(f(request.body.as_ref()).to_string()),
            None => Err(ApiError::Request(format!("no response queued for {}", request.path))),
        };
        self.requests.lock().unwrap().push(request);
        reply
    }
}

#[async_trait]
impl MinecraftBackend for RecordingBackend {
    async fn get(&self, path: &str, timeout: Duration) -> ApiResult<String> {
        self.answer(RecordedRequest {
            method: "GET",
            path: path.to_string(),
            body: None,
            upload: None,
            timeout,
        })
    }

    async fn post_json(&self, path: &str, body: &Value, timeout: Duration) -> ApiResult<String> {
        self.answer(RecordedRequest {
            method: "POST",
            path: path.to_string(),
            body: Some(body.clone()),
            upload: None,
            timeout,
        })
    }

    async fn post_multipart(
        &self,
        path: &str,
        upload: StructureUpload,
        timeout: Duration,
    ) -> ApiResult<String> {
        self.answer(RecordedRequest {
            method: "POST",
            path: path.to_string(),
            body: None,
            upload: Some(upload),
            timeout,
        })
    }
}
