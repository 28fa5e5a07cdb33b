use service_core::error::AppError;
use service_core::observability::{init_metrics, init_tracing};
use thoughts_service::config::ThoughtsConfig;
use thoughts_service::startup::Application;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load configuration - fail fast if invalid
    let config = ThoughtsConfig::load()?;

    init_tracing(
        "thoughts-service",
        &config.common.log_level,
        config
            .common
            .otlp_endpoint
            .as_deref()
            .filter(|endpoint| !endpoint.is_empty()),
    );

    // Must run before any metric is recorded
    init_metrics();

    tracing::info!(
        environment = %config.common.environment,
        store = ?config.store,
        version = env!("CARGO_PKG_VERSION"),
        "Starting thoughts service"
    );

    let app = Application::build(config).await?;
    app.run_until_stopped().await?;

    Ok(())
}
