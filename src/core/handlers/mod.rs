pub mod alb;
pub mod api_gateway;
pub mod http_gateway;
pub mod lambda_at_edge;
pub mod vercel;

pub use alb::AlbHandler;
pub use api_gateway::ApiGatewayHandler;
pub use http_gateway::HttpGatewayHandler;
pub use lambda_at_edge::LambdaAtEdgeHandler;
pub use vercel::VercelHandler;

use crate::config::AdapterConfig;
use crate::domain::model::{BufferedResponse, RequestScope};
use crate::domain::ports::EventHandler;
use crate::utils::encoding::{
    decode_body, encode_query_params, encode_response_body, exclude_headers, find_header,
    server_and_port, split_multi_value_headers, strip_api_gateway_path,
};
use crate::utils::error::{AdapterError, Result};
use axum::http::Method;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// Built-in handlers, in the order they are tried.
pub fn default_handlers() -> Vec<Box<dyn EventHandler>> {
    vec![
        Box::new(AlbHandler),
        Box::new(HttpGatewayHandler),
        Box::new(ApiGatewayHandler),
        Box::new(LambdaAtEdgeHandler),
        Box::new(VercelHandler),
    ]
}

pub(crate) fn str_at<'a>(event: &'a Value, pointer: &str) -> Option<&'a str> {
    event.pointer(pointer).and_then(Value::as_str)
}

pub(crate) fn required_str<'a>(
    event: &'a Value,
    pointer: &str,
    source_name: &'static str,
) -> Result<&'a str> {
    str_at(event, pointer)
        .ok_or_else(|| AdapterError::invalid_event(source_name, format!("missing '{}'", pointer)))
}

pub(crate) fn parse_method(method: &str, source_name: &'static str) -> Result<Method> {
    Method::from_bytes(method.as_bytes())
        .map_err(|_| AdapterError::invalid_event(source_name, format!("bad method '{}'", method)))
}

pub(crate) fn object_at<'a>(event: &'a Value, key: &str) -> Option<&'a Map<String, Value>> {
    event.get(key).and_then(Value::as_object).filter(|m| !m.is_empty())
}

/// `{name: "value"}` 轉為小寫名稱的 header 列表
pub(crate) fn lowercase_headers(headers: Option<&Value>) -> Vec<(String, String)> {
    headers
        .and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .filter_map(|(k, v)| v.as_str().map(|v| (k.to_ascii_lowercase(), v.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

/// `headers` overlaid with `multiValueHeaders`, lists joined with ", ".
pub(crate) fn merged_request_headers(event: &Value) -> Vec<(String, String)> {
    let mut merged: BTreeMap<String, String> =
        lowercase_headers(event.get("headers")).into_iter().collect();

    if let Some(multi) = object_at(event, "multiValueHeaders") {
        for (key, value) in multi {
            let joined = match value {
                Value::Array(values) => values
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
                _ => String::new(),
            };
            merged.insert(key.to_ascii_lowercase(), joined);
        }
    }

    merged.into_iter().collect()
}

/// Multi-value parameters win, single-value ones are the fallback.
pub(crate) fn api_gateway_query_string(event: &Value) -> String {
    object_at(event, "multiValueQueryStringParameters")
        .or_else(|| object_at(event, "queryStringParameters"))
        .map(encode_query_params)
        .unwrap_or_default()
}

pub(crate) fn scheme_from(headers: &[(String, String)]) -> String {
    find_header(headers, "x-forwarded-proto")
        .unwrap_or("https")
        .to_string()
}

/// Scope for REST API events and HTTP API payload version 1.0, which share a layout.
pub(crate) fn rest_style_scope(
    event: &Value,
    config: &AdapterConfig,
    source_name: &'static str,
) -> Result<RequestScope> {
    let headers = merged_request_headers(event);
    let method = parse_method(required_str(event, "/httpMethod", source_name)?, source_name)?;
    let path = str_at(event, "/path").unwrap_or_default();
    let client = str_at(event, "/requestContext/identity/sourceIp").map(|ip| (ip.to_string(), 0));
    let body = decode_body(
        str_at(event, "/body"),
        event
            .get("isBase64Encoded")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    )?;

    Ok(RequestScope {
        method,
        path: strip_api_gateway_path(path, &config.api_gateway_base_path),
        query_string: api_gateway_query_string(event),
        scheme: scheme_from(&headers),
        server: server_and_port(&headers),
        client,
        headers,
        body,
    })
}

/// `statusCode` / `headers` / `multiValueHeaders` / `body` / `isBase64Encoded`
pub(crate) fn rest_style_response(response: &BufferedResponse, config: &AdapterConfig) -> Value {
    let (headers, multi_value_headers) = split_multi_value_headers(&response.headers);
    let (body, is_base64_encoded) =
        encode_response_body(&response.body, response.content_type(), config);

    json!({
        "statusCode": response.status.as_u16(),
        "headers": exclude_headers(headers, config),
        "multiValueHeaders": exclude_headers(multi_value_headers, config),
        "body": body,
        "isBase64Encoded": is_base64_encoded,
    })
}
