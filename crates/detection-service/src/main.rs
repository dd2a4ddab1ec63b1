use anyhow::Result;
use detection_service::{
    api,
    config::DetectionServiceConfig,
    detector::mobilenet_ssd::{MobileNetSsd, MobileNetSsdConfig},
    detector::ObjectDetector,
    normalize::DetectionNormalizer,
    plates::PlatePool,
    state::AppState,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize telemetry (logging and metrics)
    telemetry::init_with_service("detection-service");

    info!("Starting detection service...");

    // Load configuration from environment
    let config = DetectionServiceConfig::from_env()?;
    info!(
        "Detection service configuration: bind={}, node_id={}",
        config.bind_addr, config.node_id
    );

    // Load the detector; a missing model artifact degrades the service to
    // detection-unavailable instead of aborting startup.
    let detector: Option<Arc<dyn ObjectDetector>> = match MobileNetSsd::load(MobileNetSsdConfig {
        model_path: config.model_path.clone(),
        ..MobileNetSsdConfig::default()
    }) {
        Ok(detector) => Some(Arc::new(detector)),
        Err(e) => {
            warn!(
                "Model artifact unavailable, running without detection: {}",
                e
            );
            None
        }
    };

    if config.salesforce.is_none() {
        info!("Record store credentials not configured; sync requests will report Credentials Missing");
    }

    // Create application state
    let normalizer = DetectionNormalizer::new(PlatePool::simulated());
    let state = AppState::new(
        config.node_id.clone(),
        detector,
        normalizer,
        config.salesforce.clone(),
    );

    // Build HTTP router
    let app = api::router(state);

    // Bind and serve
    info!("Binding to {}", config.bind_addr);
    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!("Detection service listening on {}", config.bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }

    info!("Shutting down gracefully...");
}
