use crate::config::AdapterConfig;
use crate::core::handlers::default_handlers;
use crate::core::http_cycle;
use crate::core::lifespan::LifespanCycle;
use crate::domain::model::{EventContext, InvocationContext};
use crate::domain::ports::{EventHandler, Lifespan};
use crate::utils::error::{AdapterError, Result};
use crate::utils::validation::Validate;
use axum::body::{Body, Bytes, HttpBody};
use axum::http::{Request, Response};
use axum::BoxError;
use serde_json::Value;
use std::sync::Arc;
use tower::Service;

/// Wraps an HTTP service so it can be driven by serverless platform events.
pub struct Adapter<S> {
    app: S,
    config: AdapterConfig,
    custom_handlers: Vec<Box<dyn EventHandler>>,
    handlers: Vec<Box<dyn EventHandler>>,
    lifespan_hooks: Option<Arc<dyn Lifespan>>,
}

impl<S> Adapter<S> {
    pub fn new(app: S, config: AdapterConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            app,
            config,
            custom_handlers: Vec::new(),
            handlers: default_handlers(),
            lifespan_hooks: None,
        })
    }

    pub fn with_lifespan_hooks(mut self, hooks: Arc<dyn Lifespan>) -> Self {
        self.lifespan_hooks = Some(hooks);
        self
    }

    /// 自訂 handler 會在內建 handler 之前依註冊順序嘗試
    pub fn with_custom_handler(mut self, handler: Box<dyn EventHandler>) -> Self {
        self.custom_handlers.push(handler);
        self
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn infer(&self, event: &Value) -> Result<&dyn EventHandler> {
        self.custom_handlers
            .iter()
            .chain(self.handlers.iter())
            .find(|handler| handler.infer(event, &self.config))
            .map(|handler| handler.as_ref())
            .ok_or(AdapterError::UnsupportedEvent)
    }
}

impl<S, B> Adapter<S>
where
    S: Service<Request<Body>, Response = Response<B>> + Clone + Send + 'static,
    S::Future: Send,
    S::Error: Into<BoxError>,
    B: HttpBody<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    /// Handle one platform invocation and return the platform-shaped response.
    pub async fn handle(&self, event: Value, context: InvocationContext) -> Result<Value> {
        let handler = self.infer(&event)?;
        let scope = handler.scope(&event, &self.config)?;

        tracing::info!(
            handler = handler.name(),
            method = %scope.method,
            path = %scope.path,
            user_agent = scope.header("user-agent").unwrap_or("-"),
            request_id = %context.request_id,
            "Handling invocation"
        );

        let mut lifespan = LifespanCycle::new(self.config.lifespan, self.lifespan_hooks.clone());
        lifespan.startup().await?;

        let event = Arc::new(event);
        let event_context = EventContext {
            event: Arc::clone(&event),
            invocation: context,
            handler: handler.name(),
            scheme: scope.scheme.clone(),
            server: scope.server.clone(),
            client: scope.client.clone(),
        };

        let response = match http_cycle::build_request(scope, event_context) {
            Ok(request) => http_cycle::run(self.app.clone(), request).await,
            Err(e) => {
                lifespan.shutdown().await?;
                return Err(e);
            }
        };

        lifespan.shutdown().await?;

        tracing::info!(
            handler = handler.name(),
            status = response.status.as_u16(),
            "Invocation complete"
        );

        handler.respond(&event, response, &self.config)
    }
}
