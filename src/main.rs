use anyhow::Result;
use applepay_relay::{
    client::api,
    config::Config,
    handlers::{router, AppState},
    platform::SimulatedPlatform,
    services::{JsonPayloadEncoder, PaymentService},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    tracing::info!("Starting Apple Pay relay bridge v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {:?}", config.environment);

    // Shared API client lives for the whole process
    let api = api::install(&config.api_base_url)?;

    let platform = Arc::new(SimulatedPlatform::new(config.simulator_can_make_payments));
    let payments = Arc::new(PaymentService::with_encoder(
        platform,
        JsonPayloadEncoder {
            pretty: config.payload_pretty,
        },
    ));

    let app = router(AppState::new(payments, api));

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Bridge listening on http://{}", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl+c: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down gracefully...");
}
