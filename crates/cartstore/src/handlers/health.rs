//! Health check endpoints for Kubernetes-style probes.
//!
//! - `/livez` - Basic liveness probe (immediate 200, no checks)
//! - `/readyz` - Readiness probe (pings the cart store)

use axum::{extract::State, http::StatusCode};
use serde::Serialize;

use super::json::PrettyJson;
use crate::state::AppState;

/// Readiness probe body.
#[derive(Debug, Serialize)]
pub struct ReadinessStatus {
    pub store: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /livez - Basic liveness probe.
///
/// Returns 200 immediately. Does NOT touch the store.
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}

/// GET /readyz - Readiness probe.
///
/// Returns 200 when the store answers `PING`, 503 otherwise.
#[axum::debug_handler]
pub async fn readyz(State(state): State<AppState>) -> PrettyJson<ReadinessStatus> {
    match state.store.ping().await {
        Ok(()) => PrettyJson(
            StatusCode::OK,
            ReadinessStatus {
                store: "ok",
                error: None,
            },
        ),
        Err(err) => {
            tracing::warn!(error = %err, "Readiness check failed");
            PrettyJson(
                StatusCode::SERVICE_UNAVAILABLE,
                ReadinessStatus {
                    store: "unavailable",
                    error: Some(err.to_string()),
                },
            )
        }
    }
}
