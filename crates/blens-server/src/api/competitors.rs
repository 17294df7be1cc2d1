use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

use blens_audit::{run_suggestion, SuggestRequest};
use blens_llm::types::CompetitorSuggestion;

use super::{ApiError, AppState};

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub competitors: Vec<CompetitorSuggestion>,
}

/// `POST /api/v1/competitors/suggest` — LLM-suggested competitors for a
/// company, 0 to 3 entries.
pub async fn suggest_handler(
    State(state): State<AppState>,
    payload: Result<Json<SuggestRequest>, JsonRejection>,
) -> Result<Json<SuggestResponse>, ApiError> {
    let Json(request) = payload.map_err(|_| ApiError::bad_request("invalid JSON body"))?;

    let competitors = run_suggestion(&state.deps, &request).await?;
    Ok(Json(SuggestResponse { competitors }))
}
