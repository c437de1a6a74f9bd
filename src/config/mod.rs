#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod toml_config;

use crate::utils::error::{AdapterError, Result};
use crate::utils::validation::{
    validate_base_path, validate_header_names, validate_mime_fragments, Validate,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_TEXT_MIME_TYPES: &[&str] = &[
    "text/",
    "application/json",
    "application/javascript",
    "application/xml",
    "application/vnd.api+json",
    "application/vnd.oai.openapi",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LifespanMode {
    #[default]
    Auto,
    On,
    Off,
}

impl FromStr for LifespanMode {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "auto" => Ok(Self::Auto),
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            _ => Err(AdapterError::ConfigError {
                message: "Invalid argument supplied for `lifespan`. Choices are: auto|on|off"
                    .to_string(),
            }),
        }
    }
}

impl fmt::Display for LifespanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Auto => "auto",
            Self::On => "on",
            Self::Off => "off",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    pub lifespan: LifespanMode,
    pub api_gateway_base_path: String,
    pub text_mime_types: Vec<String>,
    /// Always lowercase.
    pub exclude_headers: Vec<String>,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            lifespan: LifespanMode::default(),
            api_gateway_base_path: "/".to_string(),
            text_mime_types: DEFAULT_TEXT_MIME_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            exclude_headers: Vec::new(),
        }
    }
}

impl AdapterConfig {
    /// 從環境變數載入，未設定的欄位使用預設值
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(lifespan) = env::var("ADAPTER_LIFESPAN") {
            config.lifespan = lifespan.parse()?;
        }
        if let Ok(base_path) = env::var("ADAPTER_API_GATEWAY_BASE_PATH") {
            config.api_gateway_base_path = base_path;
        }
        if let Ok(mime_types) = env::var("ADAPTER_TEXT_MIME_TYPES") {
            config = config.with_text_mime_types(split_list(&mime_types));
        }
        if let Ok(headers) = env::var("ADAPTER_EXCLUDE_HEADERS") {
            config = config.with_exclude_headers(split_list(&headers));
        }

        Ok(config)
    }

    pub fn with_lifespan(mut self, lifespan: LifespanMode) -> Self {
        self.lifespan = lifespan;
        self
    }

    pub fn with_api_gateway_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.api_gateway_base_path = base_path.into();
        self
    }

    /// Replaces the default list rather than extending it.
    pub fn with_text_mime_types<I, T>(mut self, mime_types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.text_mime_types = mime_types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_exclude_headers<I, T>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.exclude_headers = headers
            .into_iter()
            .map(|h| h.into().to_ascii_lowercase())
            .collect();
        self
    }

    pub fn is_text_mime_type(&self, content_type: &str) -> bool {
        self.text_mime_types
            .iter()
            .any(|fragment| content_type.contains(fragment.as_str()))
    }

    pub fn is_excluded_header(&self, name: &str) -> bool {
        self.exclude_headers.iter().any(|h| h == name)
    }
}

impl Validate for AdapterConfig {
    fn validate(&self) -> Result<()> {
        validate_base_path("api_gateway_base_path", &self.api_gateway_base_path)?;
        validate_mime_fragments("text_mime_types", &self.text_mime_types)?;
        validate_header_names("exclude_headers", &self.exclude_headers)?;

        tracing::debug!(lifespan = %self.lifespan, "Adapter configuration validation passed");
        Ok(())
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
