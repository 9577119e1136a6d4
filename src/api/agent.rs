// src/api/agent.rs

use crate::{
    agent::{AgentError, AgentReply},
    AppState,
};
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use tracing::error;

#[derive(Debug, Deserialize)]
pub struct AgentRequest {
    pub prompt: String,
}

/// Runs the full pipeline on free-form text: extract address, check, format.
pub async fn agent_handler(
    State(state): State<AppState>,
    Json(req): Json<AgentRequest>,
) -> Result<Json<AgentReply>, (StatusCode, String)> {
    state
        .agent
        .run(&req.prompt)
        .await
        .map(Json)
        .map_err(|e| {
            let status = match e {
                AgentError::AddressNotFound => StatusCode::UNPROCESSABLE_ENTITY,
                AgentError::Eligibility(_) | AgentError::Model(_) => {
                    error!("Agent pipeline failed: {:?}", e);
                    StatusCode::BAD_GATEWAY
                }
            };
            (status, e.to_string())
        })
}
