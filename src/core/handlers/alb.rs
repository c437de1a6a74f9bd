use super::{object_at, parse_method, required_str, scheme_from, str_at};
use crate::config::AdapterConfig;
use crate::domain::model::{BufferedResponse, RequestScope};
use crate::domain::ports::EventHandler;
use crate::utils::encoding::{
    all_casings, decode_body, encode_raw_query_params, encode_response_body, exclude_headers,
    find_header, group_headers, server_and_port, strip_api_gateway_path,
};
use crate::utils::error::Result;
use serde_json::{json, Map, Value};

/// Application Load Balancer target group events.
pub struct AlbHandler;

impl AlbHandler {
    fn uses_multi_value_headers(event: &Value) -> bool {
        event
            .get("multiValueHeaders")
            .is_some_and(|headers| !headers.is_null())
    }

    fn request_headers(event: &Value) -> Vec<(String, String)> {
        let mut headers = Vec::new();

        if Self::uses_multi_value_headers(event) {
            if let Some(map) = event.get("multiValueHeaders").and_then(Value::as_object) {
                for (key, values) in map {
                    for value in values.as_array().into_iter().flatten() {
                        if let Some(value) = value.as_str() {
                            headers.push((key.to_ascii_lowercase(), value.to_string()));
                        }
                    }
                }
            }
        } else if let Some(map) = event.get("headers").and_then(Value::as_object) {
            for (key, value) in map {
                if let Some(value) = value.as_str() {
                    headers.push((key.to_ascii_lowercase(), value.to_string()));
                }
            }
        }

        headers
    }
}

impl EventHandler for AlbHandler {
    fn name(&self) -> &'static str {
        "aws_alb"
    }

    fn infer(&self, event: &Value, _config: &AdapterConfig) -> bool {
        event.pointer("/requestContext/elb").is_some()
    }

    fn scope(&self, event: &Value, config: &AdapterConfig) -> Result<RequestScope> {
        let headers = Self::request_headers(event);
        let method = parse_method(required_str(event, "/httpMethod", self.name())?, self.name())?;
        let path = str_at(event, "/path").unwrap_or_default();

        let query_string = object_at(event, "multiValueQueryStringParameters")
            .or_else(|| object_at(event, "queryStringParameters"))
            .map(encode_raw_query_params)
            .unwrap_or_default();

        // ALB 不提供來源 IP 欄位，取 x-forwarded-for 的第一個位址
        let client = find_header(&headers, "x-forwarded-for")
            .and_then(|forwarded| forwarded.split(',').next())
            .map(|ip| (ip.trim().to_string(), 0));

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
            query_string,
            scheme: scheme_from(&headers),
            server: server_and_port(&headers),
            client,
            headers,
            body,
        })
    }

    fn respond(
        &self,
        event: &Value,
        response: BufferedResponse,
        config: &AdapterConfig,
    ) -> Result<Value> {
        let grouped = exclude_headers(group_headers(&response.headers), config);
        let (body, is_base64_encoded) =
            encode_response_body(&response.body, response.content_type(), config);

        let status = response.status;
        let mut out = json!({
            "statusCode": status.as_u16(),
            "statusDescription": format!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            ),
            "body": body,
            "isBase64Encoded": is_base64_encoded,
        });

        if Self::uses_multi_value_headers(event) {
            out["multiValueHeaders"] = json!(grouped);
        } else {
            // Single-value mode: repeated headers are told apart by letter casing
            let mut headers = Map::new();
            for (key, values) in grouped {
                for (casing, value) in all_casings(&key).zip(values) {
                    headers.insert(casing, Value::String(value));
                }
            }
            out["headers"] = Value::Object(headers);
        }

        Ok(out)
    }
}
