use crate::config::AdapterConfig;
use crate::domain::model::{BufferedResponse, RequestScope};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// One platform event shape: recognises it, turns it into a request and encodes the reply.
pub trait EventHandler: Send + Sync {
    fn name(&self) -> &'static str;

    fn infer(&self, event: &Value, config: &AdapterConfig) -> bool;

    fn scope(&self, event: &Value, config: &AdapterConfig) -> Result<RequestScope>;

    fn respond(
        &self,
        event: &Value,
        response: BufferedResponse,
        config: &AdapterConfig,
    ) -> Result<Value>;
}

/// Application startup/shutdown hooks.
#[async_trait]
pub trait Lifespan: Send + Sync {
    async fn startup(&self) -> anyhow::Result<()>;

    async fn shutdown(&self) -> anyhow::Result<()>;
}
