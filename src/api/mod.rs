//! # API Module
//!
//! HTTP handlers for the airdrop eligibility service.
//!
//! ## Available Endpoints
//!
//! - `GET /health` - Liveness check
//! - `GET /eligibility/:address` - Eligibility report for a wallet address
//! - `POST /agent` - Full pipeline on free-form text (`{"prompt": "..."}`)
//! - `POST /rpc` - MCP JSON-RPC over HTTP

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::{
    mcp::{
        handler::handle_mcp_request,
        protocol::{error_codes, Request, Response},
    },
    AppState,
};

pub mod agent;
pub mod eligibility;
pub mod health;

/// Routes served under `/api`.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/eligibility/:address", get(eligibility::get_eligibility_handler))
        .route("/agent", post(agent::agent_handler))
        // JSON-RPC endpoint for MCP tool calls
        .route("/rpc", post(rpc_handler))
}

// Forward JSON-RPC requests over HTTP to the MCP handler
async fn rpc_handler(State(state): State<AppState>, Json(req): Json<Request>) -> Json<Response> {
    match handle_mcp_request(req, state).await {
        Some(resp) => Json(resp),
        None => Json(Response::error(
            serde_json::Value::Null,
            error_codes::INVALID_REQUEST,
            "Notifications are not supported over HTTP".into(),
        )),
    }
}
