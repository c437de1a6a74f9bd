use super::{parse_method, required_str, str_at};
use crate::config::AdapterConfig;
use crate::domain::model::{BufferedResponse, RequestScope};
use crate::domain::ports::EventHandler;
use crate::utils::encoding::{
    decode_body, encode_response_body, exclude_headers, group_headers, strip_api_gateway_path,
    DEFAULT_SERVER_NAME,
};
use crate::utils::error::{AdapterError, Result};
use serde_json::{json, Value};

/// CloudFront Lambda@Edge origin-request events.
pub struct LambdaAtEdgeHandler;

impl LambdaAtEdgeHandler {
    fn cf_request<'a>(&self, event: &'a Value) -> Result<&'a Value> {
        event
            .pointer("/Records/0/cf/request")
            .ok_or_else(|| AdapterError::invalid_event(self.name(), "missing 'cf.request'"))
    }

    /// CloudFront header 格式：`{"name": [{"key": "Name", "value": "..."}]}`
    fn first_value<'a>(cf_request: &'a Value, name: &str) -> Option<&'a str> {
        cf_request
            .get("headers")
            .and_then(|h| h.get(name))
            .and_then(|entries| entries.get(0))
            .and_then(|entry| entry.get("value"))
            .and_then(Value::as_str)
    }
}

impl EventHandler for LambdaAtEdgeHandler {
    fn name(&self) -> &'static str {
        "aws_cf_lambda_at_edge"
    }

    fn infer(&self, event: &Value, _config: &AdapterConfig) -> bool {
        event.pointer("/Records/0/cf").is_some()
    }

    fn scope(&self, event: &Value, config: &AdapterConfig) -> Result<RequestScope> {
        let cf_request = self.cf_request(event)?;

        let scheme = Self::first_value(cf_request, "cloudfront-forwarded-proto")
            .unwrap_or("https")
            .to_string();
        let host = Self::first_value(cf_request, "host").unwrap_or(DEFAULT_SERVER_NAME);
        let server = match host.split_once(':') {
            Some((name, port)) => (name.to_string(), port.parse().unwrap_or(80)),
            None => (
                host.to_string(),
                Self::first_value(cf_request, "x-forwarded-port")
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(80),
            ),
        };

        let headers: Vec<(String, String)> = cf_request
            .get("headers")
            .and_then(Value::as_object)
            .map(|map| {
                map.iter()
                    .filter_map(|(key, entries)| {
                        entries
                            .get(0)
                            .and_then(|entry| entry.get("value"))
                            .and_then(Value::as_str)
                            .map(|value| (key.to_ascii_lowercase(), value.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let method = parse_method(required_str(cf_request, "/method", self.name())?, self.name())?;
        let path = str_at(cf_request, "/uri").unwrap_or_default();
        let body = decode_body(
            str_at(cf_request, "/body/data"),
            str_at(cf_request, "/body/encoding") == Some("base64"),
        )?;

        Ok(RequestScope {
            method,
            path: strip_api_gateway_path(path, &config.api_gateway_base_path),
            query_string: str_at(cf_request, "/querystring")
                .unwrap_or_default()
                .to_string(),
            scheme,
            server,
            client: str_at(cf_request, "/clientIp").map(|ip| (ip.to_string(), 0)),
            headers,
            body,
        })
    }

    fn respond(
        &self,
        _event: &Value,
        response: BufferedResponse,
        config: &AdapterConfig,
    ) -> Result<Value> {
        let (body, is_base64_encoded) =
            encode_response_body(&response.body, response.content_type(), config);

        let headers: serde_json::Map<String, Value> =
            exclude_headers(group_headers(&response.headers), config)
                .into_iter()
                .map(|(key, values)| {
                    let entries = values
                        .into_iter()
                        .map(|value| json!({"key": key, "value": value}))
                        .collect();
                    (key, Value::Array(entries))
                })
                .collect();

        Ok(json!({
            "status": response.status.as_u16(),
            "headers": headers,
            "body": body,
            "isBase64Encoded": is_base64_encoded,
        }))
    }
}
