use axum::body::Bytes;
use axum::http::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 由平台事件轉換出的 HTTP 請求描述
#[derive(Debug, Clone)]
pub struct RequestScope {
    pub method: Method,
    /// Percent-decoded path with the API Gateway base path already removed.
    pub path: String,
    /// Already url-encoded, without the leading `?`.
    pub query_string: String,
    /// Lowercased names, in event order. Repeated names are allowed.
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
    pub scheme: String,
    pub server: (String, u16),
    pub client: Option<(String, u16)>,
}

impl RequestScope {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// The application's response with its body fully collected.
#[derive(Debug, Clone)]
pub struct BufferedResponse {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl BufferedResponse {
    pub fn internal_server_error() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            headers: vec![(
                "content-type".to_string(),
                "text/plain; charset=utf-8".to_string(),
            )],
            body: Bytes::from_static(b"Internal Server Error"),
        }
    }

    pub fn content_type(&self) -> &str {
        self.headers
            .iter()
            .find(|(key, _)| key == "content-type")
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationContext {
    pub request_id: String,
    pub invoked_function_arn: String,
    /// Milliseconds since the epoch, 0 when unknown.
    pub deadline_ms: u64,
    pub trace_id: Option<String>,
}

impl InvocationContext {
    pub fn local(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            ..Default::default()
        }
    }
}

/// Inserted into every request's extensions so the application can see the raw invocation.
#[derive(Debug, Clone)]
pub struct EventContext {
    pub event: Arc<serde_json::Value>,
    pub invocation: InvocationContext,
    pub handler: &'static str,
    pub scheme: String,
    pub server: (String, u16),
    pub client: Option<(String, u16)>,
}
