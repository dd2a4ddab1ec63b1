use crate::decode::{decode_embedded_image, DecodeError};
use crate::error::ApiError;
use crate::state::AppState;
use crate::sync::sync_detections;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use common::detections::{DetectRequest, DetectResponse, SyncStatus};
use serde_json::json;
use tracing::info;

/// Run the detection pipeline over one embedded image.
pub async fn detect(
    State(state): State<AppState>,
    Json(request): Json<DetectRequest>,
) -> Result<Json<DetectResponse>, ApiError> {
    let Some(detector) = state.detector() else {
        telemetry::metrics::DETECT_REQUESTS
            .with_label_values(&["model_unavailable"])
            .inc();
        return Err(ApiError::internal(
            "Model not loaded. Please check server logs.",
        ));
    };

    let image = match request.image.as_deref() {
        Some(image) if !image.is_empty() => image,
        _ => {
            telemetry::metrics::DETECT_REQUESTS
                .with_label_values(&["bad_request"])
                .inc();
            return Err(ApiError::bad_request("No image provided"));
        }
    };

    let frame = decode_embedded_image(image).map_err(|e| {
        telemetry::metrics::DETECT_REQUESTS
            .with_label_values(&["bad_request"])
            .inc();
        match e {
            DecodeError::InvalidFormat => ApiError::bad_request("Invalid image format"),
            DecodeError::DecodeFailure(_) => ApiError::bad_request("Could not decode image"),
        }
    })?;

    let width = frame.width();
    let height = frame.height();

    let raw = detector.infer(&frame).await.map_err(|e| {
        telemetry::metrics::DETECT_REQUESTS
            .with_label_values(&["error"])
            .inc();
        ApiError::internal(format!("Inference failed: {}", e))
    })?;

    let detections = state
        .normalizer()
        .normalize(&raw, width, height)
        .map_err(|e| {
            telemetry::metrics::DETECT_REQUESTS
                .with_label_values(&["error"])
                .inc();
            ApiError::internal(e.to_string())
        })?;

    for detection in &detections {
        telemetry::metrics::DETECTIONS_EMITTED
            .with_label_values(&[&detection.label])
            .inc();
    }

    let salesforce_status = if request.save_to_salesforce {
        match state.record_store() {
            Some(store) => SyncStatus::Completed(sync_detections(&detections, &store).await),
            None => SyncStatus::CredentialsMissing,
        }
    } else {
        SyncStatus::Skipped
    };

    info!(
        detections = detections.len(),
        width, height, "Processed detect request"
    );
    telemetry::metrics::DETECT_REQUESTS
        .with_label_values(&["success"])
        .inc();

    Ok(Json(DetectResponse {
        detections,
        salesforce_status,
    }))
}

/// Online banner; mirrors the health payload with a usage hint.
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "online",
        "message": "Vehicle Detection API is running. Use /detect endpoint to process images.",
        "model_loaded": state.model_loaded(),
    }))
}

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "model_loaded": state.model_loaded(),
    }))
}

/// Readiness check endpoint; the service only serves detections once the
/// model handle initialized.
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    if state.model_loaded() {
        (StatusCode::OK, Json(json!({ "status": "ready" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not ready",
                "model_loaded": false,
            })),
        )
    }
}

/// Metrics endpoint (Prometheus format)
pub async fn metrics() -> impl IntoResponse {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = telemetry::metrics::REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to encode metrics",
        )
            .into_response();
    }

    match String::from_utf8(buffer) {
        Ok(s) => s.into_response(),
        Err(e) => {
            tracing::error!("Failed to convert metrics to UTF-8: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to convert metrics",
            )
                .into_response()
        }
    }
}
