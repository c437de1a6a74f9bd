use crate::config::{AdapterConfig, LifespanMode};
use crate::domain::model::InvocationContext;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "lambda-bridge")]
#[command(about = "Invoke the bundled application with a serverless event, locally")]
pub struct CliConfig {
    #[arg(long, help = "Path to the event JSON file")]
    pub event: PathBuf,

    #[arg(long, help = "TOML file with an [adapter] table")]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub lifespan: Option<LifespanMode>,

    #[arg(long)]
    pub api_gateway_base_path: Option<String>,

    #[arg(long, default_value = "local-invoke")]
    pub request_id: String,

    #[arg(long, help = "Pretty-print the response")]
    pub pretty: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 合併順序：環境變數 < TOML 檔案 < 命令列參數
    pub fn adapter_config(&self) -> Result<AdapterConfig> {
        let mut config = AdapterConfig::from_env()?;

        if let Some(path) = &self.config {
            config = crate::config::toml_config::TomlConfig::from_file(path)?.apply_to(config)?;
        }
        if let Some(lifespan) = self.lifespan {
            config = config.with_lifespan(lifespan);
        }
        if let Some(base_path) = &self.api_gateway_base_path {
            config = config.with_api_gateway_base_path(base_path.clone());
        }

        Ok(config)
    }

    pub fn invocation_context(&self) -> InvocationContext {
        InvocationContext::local(self.request_id.clone())
    }

    pub fn read_event(&self) -> Result<serde_json::Value> {
        let content = std::fs::read_to_string(&self.event)?;
        Ok(serde_json::from_str(&content)?)
    }
}
