use crate::config::LifespanMode;
use crate::domain::ports::Lifespan;
use crate::utils::error::{AdapterError, Result};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifespanState {
    Connecting,
    Startup,
    Shutdown,
    Failed,
    Unsupported,
}

/// Runs the application's startup/shutdown hooks around a single invocation.
pub struct LifespanCycle {
    mode: LifespanMode,
    hooks: Option<Arc<dyn Lifespan>>,
    state: LifespanState,
}

impl LifespanCycle {
    pub fn new(mode: LifespanMode, hooks: Option<Arc<dyn Lifespan>>) -> Self {
        Self {
            mode,
            hooks,
            state: LifespanState::Connecting,
        }
    }

    pub fn state(&self) -> LifespanState {
        self.state
    }

    pub async fn startup(&mut self) -> Result<()> {
        if self.mode == LifespanMode::Off {
            return Ok(());
        }

        let Some(hooks) = self.hooks.clone() else {
            if self.mode == LifespanMode::On {
                self.state = LifespanState::Failed;
                return Err(AdapterError::LifespanFailure {
                    message: "Lifespan connection failed during startup and lifespan is 'on'."
                        .to_string(),
                });
            }
            self.state = LifespanState::Unsupported;
            tracing::info!("Lifespan protocol appears unsupported.");
            return Ok(());
        };

        tracing::info!("Waiting for application startup.");
        match hooks.startup().await {
            Ok(()) => {
                self.state = LifespanState::Startup;
                tracing::info!("Application startup complete.");
                Ok(())
            }
            Err(e) => {
                self.state = LifespanState::Failed;
                tracing::error!("Application startup failed: {:#}", e);
                Err(AdapterError::LifespanFailure {
                    message: format!("Lifespan startup failure. {:#}", e),
                })
            }
        }
    }

    /// No-op unless startup completed.
    pub async fn shutdown(&mut self) -> Result<()> {
        if self.state != LifespanState::Startup {
            return Ok(());
        }
        let Some(hooks) = self.hooks.clone() else {
            return Ok(());
        };

        tracing::info!("Waiting for application shutdown.");
        match hooks.shutdown().await {
            Ok(()) => {
                self.state = LifespanState::Shutdown;
                tracing::info!("Application shutdown complete.");
                Ok(())
            }
            Err(e) => {
                self.state = LifespanState::Failed;
                tracing::error!("Application shutdown failed: {:#}", e);
                Err(AdapterError::LifespanFailure {
                    message: format!("Lifespan shutdown failure. {:#}", e),
                })
            }
        }
    }
}
