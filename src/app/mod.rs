//! Stand-in for the backend application the binaries wrap.
//!
//! The deployed backend is an external crate; the adapter only needs something that is a
//! tower `Service`. Swap `router()` for the real application's router when linking it in.

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

pub fn router() -> Router {
    Router::new().route("/health", get(health))
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_returns_ok_status() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .expect("expected request to build");

        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("expected response body");
        let payload: Value = serde_json::from_slice(&body).expect("expected json body");
        assert_eq!(payload["status"], "ok");
    }
}
