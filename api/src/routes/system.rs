use axum::Json;
use chrono::Utc;
use shared::system::HealthResponse;

/// GET /api/health: liveness plus the server's current time.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now(),
    })
}
