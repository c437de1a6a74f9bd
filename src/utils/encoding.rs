use crate::config::AdapterConfig;
use crate::utils::error::Result;
use axum::body::Bytes;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use url::form_urlencoded;

/// Server name used when the event carries no `host` header.
pub const DEFAULT_SERVER_NAME: &str = "localhost";

/// Characters that must be escaped in a URI path.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'|')
    .add(b'\\')
    .add(b'^')
    .add(b'[')
    .add(b']');

pub fn decode_body(body: Option<&str>, is_base64: bool) -> Result<Bytes> {
    let body = body.unwrap_or_default();
    if is_base64 {
        Ok(Bytes::from(STANDARD.decode(body)?))
    } else {
        Ok(Bytes::copy_from_slice(body.as_bytes()))
    }
}

pub fn encode_base64(body: &[u8]) -> String {
    STANDARD.encode(body)
}

pub fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// Server name and port from the `host` header, falling back to `x-forwarded-port` then 80.
pub fn server_and_port(headers: &[(String, String)]) -> (String, u16) {
    let host = find_header(headers, "host").unwrap_or(DEFAULT_SERVER_NAME);

    match host.split_once(':') {
        Some((name, port)) => (name.to_string(), port.parse().unwrap_or(80)),
        None => {
            let port = find_header(headers, "x-forwarded-port")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(80);
            (host.to_string(), port)
        }
    }
}

/// 移除 API Gateway 的 base path 並做 URL 解碼
pub fn strip_api_gateway_path(path: &str, api_gateway_base_path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }

    let mut path = path;
    let base_path;
    if !api_gateway_base_path.is_empty() && api_gateway_base_path != "/" {
        base_path = if api_gateway_base_path.starts_with('/') {
            api_gateway_base_path.to_string()
        } else {
            format!("/{}", api_gateway_base_path)
        };
        // 只在路徑片段邊界上移除，`/prod` 不會吃掉 `/production`
        if let Some(stripped) = path.strip_prefix(base_path.trim_end_matches('/')) {
            if stripped.is_empty() || stripped.starts_with('/') {
                path = stripped;
            }
        }
    }

    let decoded = unquote(path);
    if decoded.is_empty() {
        "/".to_string()
    } else {
        decoded
    }
}

pub fn unquote(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}

pub fn unquote_plus(value: &str) -> String {
    unquote(&value.replace('+', " "))
}

/// Re-escape a decoded path so it can sit in a request URI.
pub fn encode_path(decoded_path: &str) -> String {
    utf8_percent_encode(decoded_path, PATH_SEGMENT).to_string()
}

/// Encode `{key: value}` or `{key: [values]}` query parameters as a form-urlencoded string.
///
/// Keys and values are taken literally; every value of a list becomes its own pair.
pub fn encode_query_params(params: &Map<String, Value>) -> String {
    encode_pairs(params, |s| s.to_string())
}

/// Same as [`encode_query_params`], but keys and values still carry `+` and `%XX` escapes
/// (ALB forwards the raw query) and are decoded first.
pub fn encode_raw_query_params(params: &Map<String, Value>) -> String {
    encode_pairs(params, unquote_plus)
}

fn encode_pairs(params: &Map<String, Value>, decode: impl Fn(&str) -> String) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());

    for (key, value) in params {
        let key = decode(key);
        match value {
            Value::Array(values) => {
                for element in values {
                    if let Some(s) = value_as_string(element) {
                        serializer.append_pair(&key, &decode(&s));
                    }
                }
            }
            other => {
                if let Some(s) = value_as_string(other) {
                    serializer.append_pair(&key, &decode(&s));
                }
            }
        }
    }

    serializer.finish()
}

fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// 單值 header 與重複出現的 header 分開
pub fn split_multi_value_headers(
    headers: &[(String, String)],
) -> (BTreeMap<String, String>, BTreeMap<String, Vec<String>>) {
    let mut single: BTreeMap<String, String> = BTreeMap::new();
    let mut multi: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for (key, value) in headers {
        let key = key.to_ascii_lowercase();
        if let Some(values) = multi.get_mut(&key) {
            values.push(value.clone());
        } else if let Some(first) = single.remove(&key) {
            multi.insert(key, vec![first, value.clone()]);
        } else {
            single.insert(key, value.clone());
        }
    }

    (single, multi)
}

pub fn group_headers(headers: &[(String, String)]) -> BTreeMap<String, Vec<String>> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, value) in headers {
        grouped
            .entry(key.to_ascii_lowercase())
            .or_default()
            .push(value.clone());
    }
    grouped
}

/// Returns the body as text when its content type is textual, otherwise base64 with the flag set.
pub fn encode_response_body(body: &[u8], content_type: &str, config: &AdapterConfig) -> (String, bool) {
    if body.is_empty() {
        return (String::new(), false);
    }

    if config.is_text_mime_type(content_type) {
        if let Ok(text) = std::str::from_utf8(body) {
            return (text.to_string(), false);
        }
    }

    (encode_base64(body), true)
}

pub fn exclude_headers<V>(headers: BTreeMap<String, V>, config: &AdapterConfig) -> BTreeMap<String, V> {
    headers
        .into_iter()
        .filter(|(key, _)| !config.is_excluded_header(key))
        .collect()
}

/// Every upper/lower casing of `name`, starting with all-lowercase. The first letter toggles fastest.
pub fn all_casings(name: &str) -> impl Iterator<Item = String> + '_ {
    let letters = name.chars().filter(|c| c.is_alphabetic()).count() as u32;
    let total: u64 = if letters >= 64 { u64::MAX } else { 1u64 << letters };

    (0..total).map(move |mask| {
        let mut bit = 0;
        name.chars()
            .map(|c| {
                if !c.is_alphabetic() {
                    return c.to_string();
                }
                let upper = bit < 64 && mask & (1u64 << bit) != 0;
                bit += 1;
                if upper {
                    c.to_uppercase().to_string()
                } else {
                    c.to_lowercase().to_string()
                }
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn headers(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body(None, false).unwrap(), Bytes::new());
        assert_eq!(decode_body(Some("hi"), false).unwrap(), Bytes::from("hi"));
        assert_eq!(decode_body(Some("aGk="), true).unwrap(), Bytes::from("hi"));
        assert!(decode_body(Some("not base64!"), true).is_err());
    }

    #[test]
    fn test_server_and_port() {
        assert_eq!(
            server_and_port(&headers(&[("host", "example.com:8080")])),
            ("example.com".to_string(), 8080)
        );
        assert_eq!(
            server_and_port(&headers(&[("host", "example.com"), ("x-forwarded-port", "443")])),
            ("example.com".to_string(), 443)
        );
        assert_eq!(server_and_port(&[]), (DEFAULT_SERVER_NAME.to_string(), 80));
    }

    #[test]
    fn test_strip_api_gateway_path() {
        assert_eq!(strip_api_gateway_path("", "/"), "/");
        assert_eq!(strip_api_gateway_path("/prod/items", "/prod"), "/items");
        assert_eq!(strip_api_gateway_path("/prod/items", "prod"), "/items");
        assert_eq!(strip_api_gateway_path("/other/items", "/prod"), "/other/items");
        assert_eq!(strip_api_gateway_path("/prod", "/prod"), "/");
        assert_eq!(strip_api_gateway_path("/a%20b", "/"), "/a b");
        assert_eq!(strip_api_gateway_path("/production/items", "/prod"), "/production/items");
        assert_eq!(strip_api_gateway_path("/prod/items", "/prod/"), "/items");
    }

    #[test]
    fn test_encode_path() {
        assert_eq!(encode_path("/a b/c"), "/a%20b/c");
        assert_eq!(encode_path("/100%"), "/100%25");
        assert_eq!(encode_path("/plain/path"), "/plain/path");
    }

    #[test]
    fn test_encode_query_params() {
        let params = json!({"name": "me", "tags": ["a", "b c"]});
        let encoded = encode_query_params(params.as_object().unwrap());
        assert_eq!(encoded, "name=me&tags=a&tags=b+c");

        let literal = json!({"q": "c++", "pct": "50%25"});
        assert_eq!(
            encode_query_params(literal.as_object().unwrap()),
            "pct=50%2525&q=c%2B%2B"
        );
    }

    #[test]
    fn test_encode_raw_query_params() {
        let escaped = json!({"q": "hello%20world+again"});
        assert_eq!(
            encode_raw_query_params(escaped.as_object().unwrap()),
            "q=hello+world+again"
        );
    }

    #[test]
    fn test_split_multi_value_headers() {
        let (single, multi) = split_multi_value_headers(&headers(&[
            ("content-type", "text/plain"),
            ("set-cookie", "a=1"),
            ("Set-Cookie", "b=2"),
            ("set-cookie", "c=3"),
        ]));

        assert_eq!(single.get("content-type").unwrap(), "text/plain");
        assert!(!single.contains_key("set-cookie"));
        assert_eq!(multi.get("set-cookie").unwrap(), &vec!["a=1", "b=2", "c=3"]);
    }

    #[test]
    fn test_encode_response_body() {
        let config = AdapterConfig::default();
        assert_eq!(encode_response_body(b"", "image/png", &config), (String::new(), false));
        assert_eq!(
            encode_response_body(b"{}", "application/json", &config),
            ("{}".to_string(), false)
        );
        assert_eq!(
            encode_response_body(b"\x89PNG", "image/png", &config),
            ("iVBORw==".to_string(), true)
        );
        // 宣告為文字但不是合法 UTF-8
        assert_eq!(
            encode_response_body(&[0xff, 0xfe], "text/plain", &config),
            ("//4=".to_string(), true)
        );
    }

    #[test]
    fn test_all_casings() {
        let casings: Vec<String> = all_casings("set-cookie").take(3).collect();
        assert_eq!(casings, vec!["set-cookie", "Set-cookie", "sEt-cookie"]);
        assert_eq!(all_casings("a-b").count(), 4);
    }
}
