use crate::config::{AdapterConfig, LifespanMode};
use crate::utils::error::{AdapterError, Result};
use crate::utils::validation::{validate_required_field, Validate};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub adapter: Option<AdapterSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdapterSection {
    pub lifespan: Option<LifespanMode>,
    pub api_gateway_base_path: Option<String>,
    pub text_mime_types: Option<Vec<String>>,
    pub exclude_headers: Option<Vec<String>>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${STAGE})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AdapterError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    /// 疊加到既有配置上，檔案中未出現的欄位保留原值
    pub fn apply_to(&self, base: AdapterConfig) -> Result<AdapterConfig> {
        let section = validate_required_field("adapter", &self.adapter)?;

        let mut config = base;
        if let Some(lifespan) = section.lifespan {
            config = config.with_lifespan(lifespan);
        }
        if let Some(base_path) = &section.api_gateway_base_path {
            config = config.with_api_gateway_base_path(base_path.clone());
        }
        if let Some(mime_types) = &section.text_mime_types {
            config = config.with_text_mime_types(mime_types.iter().cloned());
        }
        if let Some(headers) = &section.exclude_headers {
            config = config.with_exclude_headers(headers.iter().cloned());
        }

        config.validate()?;
        Ok(config)
    }
}

impl AdapterConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        TomlConfig::from_toml_str(content)?.apply_to(Self::default())
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        TomlConfig::from_file(path)?.apply_to(Self::default())
    }
}
