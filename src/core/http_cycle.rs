use crate::domain::model::{BufferedResponse, EventContext, RequestScope};
use crate::utils::encoding::encode_path;
use crate::utils::error::Result;
use axum::body::{to_bytes, Body, Bytes, HttpBody};
use axum::http::{HeaderName, HeaderValue, Request, Response};
use axum::BoxError;
use tower::{Service, ServiceExt};

/// 將 RequestScope 組成 http::Request
pub fn build_request(scope: RequestScope, context: EventContext) -> Result<Request<Body>> {
    let mut uri = encode_path(&scope.path);
    if !scope.query_string.is_empty() {
        uri.push('?');
        uri.push_str(&scope.query_string);
    }

    let mut request = Request::builder()
        .method(scope.method)
        .uri(uri)
        .body(Body::from(scope.body))?;

    let headers = request.headers_mut();
    for (key, value) in scope.headers {
        match (
            HeaderName::from_bytes(key.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.append(name, value);
            }
            _ => tracing::warn!(header = %key, "Skipping header that is not valid HTTP"),
        }
    }

    request.extensions_mut().insert(context);
    Ok(request)
}

/// Calls the application once and buffers the full response.
///
/// Never fails: service and body errors turn into a plain-text 500.
pub async fn run<S, B>(app: S, request: Request<Body>) -> BufferedResponse
where
    S: Service<Request<Body>, Response = Response<B>>,
    S::Error: Into<BoxError>,
    B: HttpBody<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    let response = match app.oneshot(request).await {
        Ok(response) => response,
        Err(e) => {
            let e: BoxError = e.into();
            tracing::error!("An error occurred running the application: {}", e);
            return BufferedResponse::internal_server_error();
        }
    };

    let (parts, body) = response.into_parts();
    let body = match to_bytes(Body::new(body), usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!("An error occurred reading the response body: {}", e);
            return BufferedResponse::internal_server_error();
        }
    };

    let headers = parts
        .headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    BufferedResponse {
        status: parts.status,
        headers,
        body,
    }
}
