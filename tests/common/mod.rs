#![allow(dead_code)]

use axum::body::Bytes;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::routing::any;
use axum::{Extension, Json, Router};
use lambda_bridge::EventContext;
use serde_json::{json, Value};
use std::collections::BTreeMap;

pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// Test application: `/binary`, `/cookies`, and an echo fallback for every other path.
pub fn test_app() -> Router {
    Router::new()
        .route("/binary", any(binary))
        .route("/cookies", any(cookies))
        .fallback(echo)
}

async fn echo(
    Extension(context): Extension<EventContext>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Value> {
    let mut header_map: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers.iter() {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        header_map
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    Json(json!({
        "method": method.as_str(),
        "path": uri.path(),
        "query": uri.query().unwrap_or(""),
        "headers": header_map,
        "body": String::from_utf8_lossy(&body),
        "handler": context.handler,
        "scheme": context.scheme,
        "server": context.server.0,
        "port": context.server.1,
        "client": context.client.map(|(ip, _)| ip),
        "request_id": context.invocation.request_id,
    }))
}

async fn binary() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "image/png")],
        Bytes::from_static(PNG_BYTES),
    )
}

async fn cookies() -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    headers.append(header::SET_COOKIE, "session=abc; Path=/".parse().unwrap());
    headers.append(header::SET_COOKIE, "theme=dark".parse().unwrap());
    headers.insert(header::CONTENT_TYPE, "text/plain; charset=utf-8".parse().unwrap());
    headers.insert("x-powered-by", "axum".parse().unwrap());
    (headers, "cookies set")
}

/// Parse a text response body produced by the echo route.
pub fn echoed(response: &Value) -> Value {
    let body = response["body"].as_str().expect("expected text body");
    serde_json::from_str(body).expect("expected echo json")
}
