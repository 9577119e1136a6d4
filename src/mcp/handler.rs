//! # MCP Handler Module
//!
//! Implements the Model Context Protocol (MCP) surface of the airdrop service.
//!
//! ## Supported Tools
//!
//! - `check_airdrop_eligibility` - Query every configured contract for a wallet address
//! - `extract_wallet_address` - Find the wallet address in free-form text
//! - `airdrop_report` - Full pipeline: extract, check and render a Markdown report

use crate::{
    agent::AgentError,
    mcp::protocol::{error_codes, text_result, Request, Response},
    utils, AppState,
};
use serde_json::{json, Value};
use tracing::{error, info};

/// This is the main dispatcher for all incoming MCP requests.
pub async fn handle_mcp_request(req: Request, state: AppState) -> Option<Response> {
    info!("Handling MCP request for method: {}", req.method);

    if req.is_notification() {
        return None;
    }

    let response = match req.method.as_str() {
        "initialize" => handle_initialize(&req),
        "tools/list" => handle_tools_list(&req),
        "tools/call" => handle_tool_call(req, state).await,
        // Direct method calls are rewritten into tools/call to reuse the same logic
        "check_airdrop_eligibility" | "extract_wallet_address" | "airdrop_report" => {
            let name = req.method.clone();
            let wrapped = Request {
                jsonrpc: req.jsonrpc.clone(),
                id: req.id.clone(),
                method: "tools/call".to_string(),
                params: Some(json!({
                    "name": name,
                    "arguments": req.params.clone().unwrap_or_else(|| json!({}))
                })),
            };
            handle_tool_call(wrapped, state).await
        }
        _ => Response::error(
            req.id,
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", req.method),
        ),
    };

    Some(response)
}

/// Handles a 'tools/call' request by dispatching it to the correct tool logic.
async fn handle_tool_call(req: Request, state: AppState) -> Response {
    let params = match req.params.as_ref() {
        Some(p) => p,
        None => {
            return Response::error(
                req.id,
                error_codes::INVALID_PARAMS,
                "Missing 'params' object".into(),
            )
        }
    };

    let tool_name = match params.get("name").and_then(|n| n.as_str()) {
        Some(name) => name,
        None => {
            return Response::error(
                req.id,
                error_codes::INVALID_PARAMS,
                "Missing 'name' field in params".into(),
            )
        }
    };

    let empty_args = json!({});
    let args = params.get("arguments").unwrap_or(&empty_args);
    let req_id = &req.id;

    let res: Result<Response, Response> = match tool_name {
        "check_airdrop_eligibility" => {
            (async {
                let address = utils::get_required_arg::<String>(args, "address", req_id)?;
                let report = state
                    .agent
                    .checker()
                    .check_eligibility(&address)
                    .await
                    .map_err(|e| {
                        error!("Eligibility check failed: {:?}", e);
                        Response::error(req_id.clone(), error_codes::UPSTREAM_ERROR, e.to_string())
                    })?;
                let summary = format!(
                    "{} eligible contract(s) for {}",
                    report.results.len(),
                    report.wallet
                );
                let payload = serde_json::to_value(&report).map_err(|e| {
                    Response::error(req_id.clone(), error_codes::INTERNAL_ERROR, e.to_string())
                })?;
                Ok::<_, Response>(Response::success(req_id.clone(), text_result(summary, payload)))
            })
            .await
        }
        "extract_wallet_address" => {
            (async {
                let prompt = utils::get_required_arg::<String>(args, "prompt", req_id)?;
                let address = state
                    .agent
                    .extractor()
                    .extract(&prompt)
                    .await
                    .map_err(|e| {
                        Response::error(req_id.clone(), error_codes::UPSTREAM_ERROR, e.to_string())
                    })?;
                let summary = match &address {
                    Some(a) => format!("Found wallet address {}", a),
                    None => "No wallet address found".to_string(),
                };
                Ok::<_, Response>(Response::success(
                    req_id.clone(),
                    text_result(summary, json!({ "address": address })),
                ))
            })
            .await
        }
        "airdrop_report" => {
            (async {
                let prompt = utils::get_required_arg::<String>(args, "prompt", req_id)?;
                let reply = state.agent.run(&prompt).await.map_err(|e| {
                    let code = match e {
                        AgentError::AddressNotFound => error_codes::ADDRESS_NOT_FOUND,
                        _ => error_codes::UPSTREAM_ERROR,
                    };
                    Response::error(req_id.clone(), code, e.to_string())
                })?;
                let payload = serde_json::to_value(&reply.report).map_err(|e| {
                    Response::error(req_id.clone(), error_codes::INTERNAL_ERROR, e.to_string())
                })?;
                Ok::<_, Response>(Response::success(req_id.clone(), text_result(reply.markdown, payload)))
            })
            .await
        }
        _ => Err(Response::error(
            req_id.clone(),
            error_codes::METHOD_NOT_FOUND,
            format!("Unknown tool: {}", tool_name),
        )),
    };

    res.unwrap_or_else(|err_resp| err_resp)
}

fn handle_initialize(req: &Request) -> Response {
    let server_info = json!({
        "name": "airdrop_agent",
        "version": env!("CARGO_PKG_VERSION")
    });
    let capabilities = json!({ "tools": { "listChanged": false } });
    let instructions =
        "Airdrop eligibility checker: finds a wallet address in text, queries the configured airdrop contracts and renders a Markdown report.";

    Response::success(
        req.id.clone(),
        json!({
            "serverInfo": server_info,
            "protocolVersion": "2025-06-18",
            "capabilities": capabilities,
            "instructions": instructions
        }),
    )
}

/// Handles the 'tools/list' request by returning a JSON definition of all available tools.
fn handle_tools_list(req: &Request) -> Response {
    let tools: Value = json!([
        {
            "name": "check_airdrop_eligibility",
            "description": "Check an EVM wallet against every configured airdrop contract. Returns only contracts with a non-empty answer.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "address": {"type": "string", "description": "The 0x... EVM wallet address to check."}
                },
                "required": ["address"]
            }
        },
        {
            "name": "extract_wallet_address",
            "description": "Extract the wallet address mentioned in a free-form message.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "prompt": {"type": "string", "description": "The user's message."}
                },
                "required": ["prompt"]
            }
        },
        {
            "name": "airdrop_report",
            "description": "Find the wallet in a message, check its airdrop eligibility and return a Markdown report.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "prompt": {"type": "string", "description": "The user's message containing a wallet address."}
                },
                "required": ["prompt"]
            }
        }
    ]);

    Response::success(req.id.clone(), json!({ "tools": tools }))
}
