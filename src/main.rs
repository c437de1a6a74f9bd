use clap::Parser;
use lambda_bridge::utils::error::{AdapterError, ErrorCategory};
use lambda_bridge::utils::logger;
use lambda_bridge::{app, Adapter, CliConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting lambda-bridge local invoke");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    match invoke(&config).await {
        Ok(response) => {
            let output = if config.pretty {
                serde_json::to_string_pretty(&response)?
            } else {
                serde_json::to_string(&response)?
            };
            println!("{}", output);
        }
        Err(e) => {
            tracing::error!("❌ Invocation failed: {} (Category: {:?})", e, e.category());
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.category() {
                ErrorCategory::Configuration => 2,
                ErrorCategory::Event => 3,
                ErrorCategory::Lifespan => 4,
                ErrorCategory::System => 1,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn invoke(config: &CliConfig) -> Result<serde_json::Value, AdapterError> {
    let adapter_config = config.adapter_config()?;
    let event = config.read_event()?;

    let adapter = Adapter::new(app::router(), adapter_config)?;
    tracing::debug!(
        lifespan = %adapter.config().lifespan,
        api_gateway_base_path = %adapter.config().api_gateway_base_path,
        "Adapter configured"
    );
    adapter.handle(event, config.invocation_context()).await
}
