mod common;

use common::{echoed, test_app};
use lambda_bridge::utils::encoding::encode_base64;
use lambda_bridge::{Adapter, AdapterConfig, InvocationContext, LifespanMode};
use serde_json::{json, Value};

fn edge_event(uri: &str, body: Option<Value>) -> Value {
    let mut request = json!({
        "clientIp": "203.0.113.178",
        "method": "POST",
        "uri": uri,
        "querystring": "lang=en",
        "headers": {
            "host": [{"key": "Host", "value": "d111111abcdef8.cloudfront.net"}],
            "cloudfront-forwarded-proto": [{"key": "CloudFront-Forwarded-Proto", "value": "https"}],
            "user-agent": [{"key": "User-Agent", "value": "curl/8.0"}]
        }
    });
    if let Some(body) = body {
        request["body"] = body;
    }

    json!({
        "Records": [{
            "cf": {
                "config": {"distributionId": "EDFDVBD6EXAMPLE", "eventType": "origin-request"},
                "request": request
            }
        }]
    })
}

fn adapter() -> Adapter<axum::Router> {
    Adapter::new(
        test_app(),
        AdapterConfig::default()
            .with_lifespan(LifespanMode::Off)
            .with_exclude_headers(["content-length"]),
    )
    .unwrap()
}

#[tokio::test]
async fn test_edge_request_is_forwarded() {
    let body = json!({"data": encode_base64(b"payload"), "encoding": "base64"});
    let response = adapter()
        .handle(edge_event("/submit", Some(body)), InvocationContext::default())
        .await
        .unwrap();

    assert_eq!(response["status"], 200);
    assert_eq!(
        response["headers"]["content-type"],
        json!([{"key": "content-type", "value": "application/json"}])
    );
    assert!(response["headers"].get("content-length").is_none());

    let echo = echoed(&response);
    assert_eq!(echo["handler"], "aws_cf_lambda_at_edge");
    assert_eq!(echo["method"], "POST");
    assert_eq!(echo["path"], "/submit");
    assert_eq!(echo["query"], "lang=en");
    assert_eq!(echo["body"], "payload");
    assert_eq!(echo["server"], "d111111abcdef8.cloudfront.net");
    assert_eq!(echo["port"], 80);
    assert_eq!(echo["scheme"], "https");
    assert_eq!(echo["client"], "203.0.113.178");
    assert_eq!(echo["headers"]["user-agent"], "curl/8.0");
}

#[tokio::test]
async fn test_edge_text_body_without_encoding() {
    let body = json!({"data": "plain text", "encoding": "text"});
    let response = adapter()
        .handle(edge_event("/submit", Some(body)), InvocationContext::default())
        .await
        .unwrap();

    assert_eq!(echoed(&response)["body"], "plain text");
}

#[tokio::test]
async fn test_edge_repeated_headers_keep_every_value() {
    let response = adapter()
        .handle(edge_event("/cookies", None), InvocationContext::default())
        .await
        .unwrap();

    let cookies = response["headers"]["set-cookie"].as_array().unwrap();
    assert_eq!(cookies.len(), 2);
    assert_eq!(cookies[1]["value"], "theme=dark");
}

#[tokio::test]
async fn test_edge_without_host_uses_localhost() {
    let mut event = edge_event("/submit", None);
    event["Records"][0]["cf"]["request"]["headers"]
        .as_object_mut()
        .unwrap()
        .remove("host");

    let response = adapter()
        .handle(event, InvocationContext::default())
        .await
        .unwrap();

    let echo = echoed(&response);
    assert_eq!(echo["server"], "localhost");
    assert_eq!(echo["port"], 80);
}

#[tokio::test]
async fn test_edge_event_without_request_is_invalid() {
    let event = json!({"Records": [{"cf": {"config": {"eventType": "origin-request"}}}]});
    let err = tokio_test::assert_err!(adapter().handle(event, InvocationContext::default()).await);

    assert!(err.to_string().contains("cf.request"));
}
