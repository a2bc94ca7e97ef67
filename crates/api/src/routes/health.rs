//! Liveness endpoint.

use axum::Json;
use chrono::Utc;
use tire_disciples_core::HealthResponse;

/// Service name reported by `/health`.
pub const SERVICE_NAME: &str = "Tire Disciples Payment API";

/// GET /health
///
/// Returns `ok` while the process is up. Does not call the processor.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
        service: SERVICE_NAME.to_string(),
    })
}
