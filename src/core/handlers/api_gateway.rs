use super::{rest_style_response, rest_style_scope};
use crate::config::AdapterConfig;
use crate::domain::model::{BufferedResponse, RequestScope};
use crate::domain::ports::EventHandler;
use crate::utils::error::Result;
use serde_json::Value;

/// API Gateway REST API (payload v1) proxy integration.
pub struct ApiGatewayHandler;

impl EventHandler for ApiGatewayHandler {
    fn name(&self) -> &'static str {
        "aws_api_gateway"
    }

    fn infer(&self, event: &Value, _config: &AdapterConfig) -> bool {
        event.get("resource").is_some() && event.get("requestContext").is_some()
    }

    fn scope(&self, event: &Value, config: &AdapterConfig) -> Result<RequestScope> {
        rest_style_scope(event, config, self.name())
    }

    fn respond(
        &self,
        _event: &Value,
        response: BufferedResponse,
        config: &AdapterConfig,
    ) -> Result<Value> {
        Ok(rest_style_response(&response, config))
    }
}
