#[cfg(feature = "lambda")]
use lambda_bridge::utils::logger;
#[cfg(feature = "lambda")]
use lambda_bridge::{app, run_adapter, Adapter, AdapterConfig, LifespanMode};
#[cfg(feature = "lambda")]
use lambda_runtime::Error;

/// Platform entry point: the bundled application behind the adapter, lifespan hooks disabled.
#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    // 平台不保證行程常駐，startup/shutdown hooks 一律關閉
    let config = AdapterConfig::from_env()?.with_lifespan(LifespanMode::Off);
    let handler = Adapter::new(app::router(), config)?;

    tracing::info!("Serverless handler ready");
    run_adapter(handler).await
}
