//! HTTP surface and per-request orchestration. The predict handler is the
//! only place that touches the validator, the store, and the inference
//! client, and it sequences them strictly: validate, store, forward,
//! clean up, respond.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use tracing::{info, warn};

use cellscan_common::{Envelope, HealthReport, RelayError};
use inference_client::{InferenceError, Prediction};

use crate::store::StoredArtifact;
use crate::{validate, AppState};

pub fn app(state: Arc<AppState>) -> Router {
    // Leave headroom above the upload limit so an oversize body reaches the
    // validator and gets a well-formed envelope instead of a bare 413.
    let body_limit = (state.config.max_upload_bytes as usize).saturating_mul(2);

    Router::new()
        .route("/", get(service_descriptor))
        .route("/api/health", get(health))
        .route("/api/predict", post(predict))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
        .layer(tower_http::cors::CorsLayer::permissive())
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}

// --- Handlers ---

async fn service_descriptor() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "CellScan upload relay",
        "status": "running",
        "endpoints": {
            "health": "/api/health",
            "predict": "POST /api/predict",
        }
    }))
}

/// Composite health, recomputed on every query. A recovered (or newly
/// failed) upstream shows up on the very next call; nothing is cached.
async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthReport>) {
    let probe = state
        .inference
        .liveness(Duration::from_secs(state.config.health_timeout_secs))
        .await;

    match probe {
        Ok(()) => (StatusCode::OK, Json(HealthReport::healthy())),
        Err(e) => {
            warn!(error = %e, "Upstream liveness probe failed");
            (StatusCode::SERVICE_UNAVAILABLE, Json(HealthReport::degraded()))
        }
    }
}

async fn predict(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> (StatusCode, Json<Envelope<Prediction>>) {
    match run_prediction(&state, multipart).await {
        Ok(prediction) => {
            info!(prediction = %prediction.prediction, "Predict request served");
            (StatusCode::OK, Json(Envelope::ok(prediction)))
        }
        Err(err) => {
            if err.status_code() >= 500 {
                warn!(
                    error = %err,
                    detail = err.detail().unwrap_or_default(),
                    "Predict request failed"
                );
            } else {
                info!(error = %err, "Predict request rejected");
            }
            let status = StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(Envelope::fail(err.to_string())))
        }
    }
}

// --- Orchestration ---

/// One request's lifecycle: extract the image field, validate, persist,
/// forward to the backend, then delete the artifact before the response
/// is built. Cleanup runs on the failure path exactly as on success; the
/// artifact's drop guard additionally covers cancellation.
async fn run_prediction(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<Prediction, RelayError> {
    let mut upload: Option<(String, Option<String>, axum::body::Bytes)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            // Malformed multipart body: from the client's view there is no
            // usable upload in the request.
            Err(_) => break,
        };

        if field.file_name().is_none() && field.name() != Some("image") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| map_body_error(e, state.config.max_upload_bytes))?;

        upload = Some((file_name, content_type, data));
        break;
    }

    let Some((file_name, content_type, data)) = upload else {
        return Err(RelayError::MissingUpload);
    };

    // Validation happens before anything touches disk.
    validate::validate_upload(content_type.as_deref(), data.len() as u64, &state.config)?;

    let artifact = state
        .store
        .put(
            &file_name,
            content_type.as_deref().unwrap_or("application/octet-stream"),
            &data,
        )
        .await
        .map_err(|e| RelayError::Storage { detail: e.to_string() })?;

    let outcome = forward(state, &artifact).await;

    // Exactly one explicit deletion attempt per artifact, on every path.
    // A cleanup failure is an operator signal, never a client error.
    if let Err(e) = state.store.remove(&artifact).await {
        warn!(
            path = %artifact.path.display(),
            error = %e,
            "Failed to remove temp artifact"
        );
    }

    outcome
}

async fn forward(state: &AppState, artifact: &StoredArtifact) -> Result<Prediction, RelayError> {
    let bytes = tokio::fs::read(&artifact.path)
        .await
        .map_err(|e| RelayError::Storage { detail: e.to_string() })?;

    state
        .inference
        .predict(&artifact.file_name, &artifact.content_type, bytes)
        .await
        .map_err(map_inference_error)
}

fn map_inference_error(err: InferenceError) -> RelayError {
    match err {
        InferenceError::Timeout => RelayError::UpstreamTimeout,
        InferenceError::Unreachable(detail) => RelayError::UpstreamUnreachable { detail },
        InferenceError::Api { status, message } => RelayError::UpstreamRejected {
            status,
            detail: format!("status {status}: {message}"),
        },
        InferenceError::Parse(detail) => RelayError::UpstreamRejected {
            status: 200,
            detail: format!("malformed prediction body: {detail}"),
        },
    }
}

fn map_body_error(err: MultipartError, max: u64) -> RelayError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        // Body exceeded the transport limit; the exact size is unknown, so
        // report the limit itself as the lower bound.
        RelayError::PayloadTooLarge { size: max.saturating_mul(2), max }
    } else {
        RelayError::Storage { detail: err.to_string() }
    }
}
