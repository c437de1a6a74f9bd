pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;

#[cfg(feature = "lambda")]
pub use crate::config::lambda::run_adapter;

pub use crate::config::{AdapterConfig, LifespanMode};
pub use crate::core::{adapter::Adapter, lifespan::LifespanCycle};
pub use crate::domain::model::{BufferedResponse, EventContext, InvocationContext, RequestScope};
pub use crate::domain::ports::{EventHandler, Lifespan};
pub use crate::utils::error::{AdapterError, Result};
