//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckResult, HealthChecks, HealthResponse, ServiceState};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Database reachable and seeded
/// - **503 Service Unavailable**: Database check failed
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let response = HealthResponse::from_checks(HealthChecks {
        database: check_database(&state).await,
    });

    match response.status {
        ServiceState::Healthy => Ok(Json(response)),
        ServiceState::Degraded => Err((StatusCode::SERVICE_UNAVAILABLE, Json(response))),
    }
}

/// Checks the store by resolving a seeded structure type.
async fn check_database(state: &AppState) -> CheckResult {
    match state.course_service.check_store().await {
        Ok(()) => CheckResult::ok("Connected"),
        Err(e) => {
            tracing::warn!(error = %e, "Health check: database unavailable");
            CheckResult::error(format!("Database error: {}", e))
        }
    }
}
