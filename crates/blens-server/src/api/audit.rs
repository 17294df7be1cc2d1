use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use blens_audit::{run_audit, AuditReport, AuditRequest};

use super::{ApiError, AppState};

/// `POST /api/v1/audit` — runs the full audit pipeline.
pub async fn run_audit_handler(
    State(state): State<AppState>,
    payload: Result<Json<AuditRequest>, JsonRejection>,
) -> Result<Json<AuditReport>, ApiError> {
    let Json(request) = payload.map_err(|_| ApiError::bad_request("invalid JSON body"))?;

    let report = run_audit(&state.deps, &request).await?;
    Ok(Json(report))
}
