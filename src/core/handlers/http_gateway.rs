use super::{
    lowercase_headers, parse_method, required_str, rest_style_response, rest_style_scope,
    scheme_from, str_at,
};
use crate::config::AdapterConfig;
use crate::domain::model::{BufferedResponse, RequestScope};
use crate::domain::ports::EventHandler;
use crate::utils::encoding::{
    decode_body, encode_response_body, exclude_headers, server_and_port, strip_api_gateway_path,
};
use crate::utils::error::{AdapterError, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// API Gateway HTTP API, payload format 1.0 and 2.0.
pub struct HttpGatewayHandler;

impl HttpGatewayHandler {
    fn version(event: &Value) -> Option<&str> {
        str_at(event, "/version")
    }

    fn scope_v2(&self, event: &Value, config: &AdapterConfig) -> Result<RequestScope> {
        let mut headers = lowercase_headers(event.get("headers"));

        // Cookies arrive in their own array for 2.0
        if let Some(cookies) = event.get("cookies").and_then(Value::as_array) {
            let joined = cookies
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("; ");
            if !joined.is_empty() {
                headers.retain(|(key, _)| key != "cookie");
                headers.push(("cookie".to_string(), joined));
            }
        }

        let method = parse_method(
            required_str(event, "/requestContext/http/method", self.name())?,
            self.name(),
        )?;
        let path = required_str(event, "/requestContext/http/path", self.name())?;
        let client = str_at(event, "/requestContext/http/sourceIp").map(|ip| (ip.to_string(), 0));
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
            query_string: str_at(event, "/rawQueryString").unwrap_or_default().to_string(),
            scheme: scheme_from(&headers),
            server: server_and_port(&headers),
            client,
            headers,
            body,
        })
    }

    fn respond_v2(&self, response: &BufferedResponse, config: &AdapterConfig) -> Value {
        let mut cookies = Vec::new();
        let mut headers: BTreeMap<String, String> = BTreeMap::new();

        for (key, value) in &response.headers {
            let key = key.to_ascii_lowercase();
            if key == "set-cookie" {
                cookies.push(Value::String(value.clone()));
                continue;
            }
            headers
                .entry(key)
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(value);
                })
                .or_insert_with(|| value.clone());
        }

        if !response.body.is_empty() && !headers.contains_key("content-type") {
            headers.insert("content-type".to_string(), "application/json".to_string());
        }

        let content_type = headers.get("content-type").cloned().unwrap_or_default();
        let (body, is_base64_encoded) = encode_response_body(&response.body, &content_type, config);
        let headers = exclude_headers(headers, config);

        let mut out = Map::new();
        out.insert("statusCode".to_string(), response.status.as_u16().into());
        out.insert("body".to_string(), body.into());
        out.insert("isBase64Encoded".to_string(), is_base64_encoded.into());
        if !headers.is_empty() {
            out.insert(
                "headers".to_string(),
                Value::Object(headers.into_iter().map(|(k, v)| (k, v.into())).collect()),
            );
        }
        if !cookies.is_empty() && !config.is_excluded_header("set-cookie") {
            out.insert("cookies".to_string(), Value::Array(cookies));
        }
        Value::Object(out)
    }
}

impl EventHandler for HttpGatewayHandler {
    fn name(&self) -> &'static str {
        "aws_http_gateway"
    }

    fn infer(&self, event: &Value, _config: &AdapterConfig) -> bool {
        event.get("requestContext").is_some()
            && matches!(Self::version(event), Some("1.0") | Some("2.0"))
    }

    fn scope(&self, event: &Value, config: &AdapterConfig) -> Result<RequestScope> {
        match Self::version(event) {
            Some("1.0") => rest_style_scope(event, config, self.name()),
            Some("2.0") => self.scope_v2(event, config),
            other => Err(AdapterError::invalid_event(
                self.name(),
                format!("unsupported payload version {:?}", other),
            )),
        }
    }

    fn respond(
        &self,
        event: &Value,
        response: BufferedResponse,
        config: &AdapterConfig,
    ) -> Result<Value> {
        match Self::version(event) {
            Some("2.0") => Ok(self.respond_v2(&response, config)),
            _ => Ok(rest_style_response(&response, config)),
        }
    }
}
