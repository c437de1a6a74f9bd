use super::{parse_method, scheme_from, str_at};
use crate::config::AdapterConfig;
use crate::domain::model::{BufferedResponse, RequestScope};
use crate::domain::ports::EventHandler;
use crate::utils::encoding::{
    decode_body, encode_base64, exclude_headers, find_header, group_headers, server_and_port,
    strip_api_gateway_path,
};
use crate::utils::error::{AdapterError, Result};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;

/// Vercel serverless function invocations (`{"Action": "Invoke", "body": "<json>"}`).
pub struct VercelHandler;

#[derive(Debug, Deserialize)]
struct InvokePayload {
    method: String,
    #[serde(default)]
    path: String,
    #[serde(default)]
    headers: HashMap<String, HeaderValue>,
    body: Option<String>,
    encoding: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HeaderValue {
    One(String),
    Many(Vec<String>),
}

impl VercelHandler {
    fn payload(&self, event: &Value) -> Result<InvokePayload> {
        let raw = str_at(event, "/body")
            .ok_or_else(|| AdapterError::invalid_event(self.name(), "missing 'body'"))?;
        Ok(serde_json::from_str(raw)?)
    }
}

impl EventHandler for VercelHandler {
    fn name(&self) -> &'static str {
        "vercel"
    }

    fn infer(&self, event: &Value, _config: &AdapterConfig) -> bool {
        str_at(event, "/Action") == Some("Invoke") && str_at(event, "/body").is_some()
    }

    fn scope(&self, event: &Value, config: &AdapterConfig) -> Result<RequestScope> {
        let payload = self.payload(event)?;

        let mut headers = Vec::new();
        for (key, value) in payload.headers {
            let key = key.to_ascii_lowercase();
            match value {
                HeaderValue::One(v) => headers.push((key, v)),
                HeaderValue::Many(vs) => headers.extend(vs.into_iter().map(|v| (key.clone(), v))),
            }
        }
        headers.sort_by(|a, b| a.0.cmp(&b.0));

        let (path, query_string) = match payload.path.split_once('?') {
            Some((path, query)) => (path.to_string(), query.to_string()),
            None => (payload.path.clone(), String::new()),
        };

        let client = find_header(&headers, "x-real-ip")
            .or_else(|| {
                find_header(&headers, "x-forwarded-for")
                    .and_then(|forwarded| forwarded.split(',').next())
            })
            .map(|ip| (ip.trim().to_string(), 0));

        Ok(RequestScope {
            method: parse_method(&payload.method, self.name())?,
            path: strip_api_gateway_path(&path, &config.api_gateway_base_path),
            query_string,
            scheme: scheme_from(&headers),
            server: server_and_port(&headers),
            client,
            body: decode_body(
                payload.body.as_deref(),
                payload.encoding.as_deref() == Some("base64"),
            )?,
            headers,
        })
    }

    fn respond(
        &self,
        _event: &Value,
        response: BufferedResponse,
        config: &AdapterConfig,
    ) -> Result<Value> {
        let headers: Map<String, Value> = exclude_headers(group_headers(&response.headers), config)
            .into_iter()
            .map(|(key, mut values)| {
                let value = if values.len() == 1 {
                    Value::String(values.remove(0))
                } else {
                    json!(values)
                };
                (key, value)
            })
            .collect();

        Ok(json!({
            "statusCode": response.status.as_u16(),
            "headers": headers,
            "body": encode_base64(&response.body),
            "encoding": "base64",
        }))
    }
}
