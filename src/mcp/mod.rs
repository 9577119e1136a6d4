// MCP (JSON-RPC 2.0) surface for the eligibility tools
pub mod handler;
pub mod protocol;
