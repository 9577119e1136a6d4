// src/api/eligibility.rs

use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::error;

#[derive(Debug, Deserialize)]
pub struct EligibilityPath {
    pub address: String,
}

// The handler function for the GET /eligibility/{address} endpoint.
pub async fn get_eligibility_handler(
    State(state): State<AppState>,
    Path(path): Path<EligibilityPath>,
) -> impl IntoResponse {
    match state.agent.checker().check_eligibility(&path.address).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => {
            error!("Eligibility check failed for {}: {:?}", path.address, e);
            (StatusCode::BAD_GATEWAY, e.to_string()).into_response()
        }
    }
}
