use crate::core::adapter::Adapter;
use crate::domain::model::InvocationContext;
use axum::body::{Body, Bytes, HttpBody};
use axum::http::{Request, Response};
use axum::BoxError;
use lambda_runtime::{service_fn, Context, Error, LambdaEvent};
use serde_json::Value;
use std::sync::Arc;
use tower::Service;

impl From<&Context> for InvocationContext {
    fn from(context: &Context) -> Self {
        Self {
            request_id: context.request_id.clone(),
            invoked_function_arn: context.invoked_function_arn.clone(),
            deadline_ms: context.deadline,
            trace_id: context.xray_trace_id.clone(),
        }
    }
}

/// 在 Lambda runtime 迴圈中服務 adapter，直到行程結束
pub async fn run_adapter<S, B>(adapter: Adapter<S>) -> Result<(), Error>
where
    S: Service<Request<Body>, Response = Response<B>> + Clone + Send + Sync + 'static,
    S::Future: Send,
    S::Error: Into<BoxError>,
    B: HttpBody<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    let adapter = Arc::new(adapter);

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let adapter = Arc::clone(&adapter);
        async move {
            let context = InvocationContext::from(&event.context);
            let response = adapter.handle(event.payload, context).await?;
            Ok::<Value, Error>(response)
        }
    }))
    .await
}
