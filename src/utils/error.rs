use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(
        "The adapter was unable to infer a handler to use for the event. This is likely related \
         to how the function was invoked. (Are you testing locally? Make sure the request payload \
         is valid for a supported handler.)"
    )]
    UnsupportedEvent,

    #[error("Invalid {source_name} event: {message}")]
    InvalidEvent {
        source_name: &'static str,
        message: String,
    },

    #[error("Base64 decoding failed: {0}")]
    Base64Error(#[from] base64::DecodeError),

    #[error("{message}")]
    LifespanFailure { message: String },

    #[error("HTTP error: {0}")]
    HttpError(#[from] axum::http::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Event,
    Lifespan,
    System,
}

impl AdapterError {
    pub fn invalid_event(source_name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidEvent {
            source_name,
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::TomlError(_) => ErrorCategory::Configuration,
            Self::UnsupportedEvent | Self::InvalidEvent { .. } | Self::Base64Error(_) => {
                ErrorCategory::Event
            }
            Self::LifespanFailure { .. } => ErrorCategory::Lifespan,
            Self::HttpError(_) | Self::SerializationError(_) | Self::IoError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Adapter configuration is invalid: {}", self),
            ErrorCategory::Event => format!("The event could not be handled: {}", self),
            ErrorCategory::Lifespan => format!("Application lifespan failed: {}", self),
            ErrorCategory::System => format!("Unexpected failure: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::UnsupportedEvent => {
                "Send an ALB, API Gateway (REST or HTTP), Lambda@Edge or Vercel shaped event"
            }
            Self::InvalidEvent { .. } | Self::Base64Error(_) => {
                "Check that the event payload contains every field its event source requires"
            }
            Self::LifespanFailure { .. } => {
                "Check the application's startup/shutdown hooks, or set lifespan to 'off'"
            }
            Self::TomlError(_) => "Check the TOML syntax of the [adapter] table",
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => {
                "Review the ADAPTER_* environment variables or the config file"
            }
            Self::IoError(_) => "Check that the file exists and is readable",
            Self::HttpError(_) | Self::SerializationError(_) => {
                "Re-run with --verbose and inspect the logs"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AdapterError>;
