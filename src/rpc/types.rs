//! JSON-RPC envelopes and daemon reply types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outgoing JSON-RPC 2.0 request.
#[derive(Debug, Serialize)]
pub struct JsonRpcRequest<'a, P> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: P,
}

impl<'a, P: Serialize> JsonRpcRequest<'a, P> {
    pub fn new(method: &'a str, params: P) -> Self {
        Self {
            jsonrpc: "2.0",
            id: 0,
            method,
            params,
        }
    }
}

/// Raw daemon response. `result` and `error` are `None` when absent or null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl JsonRpcResponse {
    /// Message of the `error` object, if the daemon reported one.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|error| {
            error
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned)
                .unwrap_or_else(|| error.to_string())
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetBlockTemplateReply {
    pub difficulty: u64,
    pub height: u64,
    #[serde(rename = "blocktemplate_blob")]
    pub blob: String,
    pub reserved_offset: u32,
    pub prev_hash: String,
    pub expected_reward: u64,
}

/// Node status as reported by `get_info`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetInfoReply {
    #[serde(rename = "incoming_connections_count")]
    pub incoming_connections: u64,
    #[serde(rename = "outgoing_connections_count")]
    pub outgoing_connections: u64,
    pub height: u64,
    pub tx_pool_size: u64,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetBlockCountReply {
    pub count: u64,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockHeader {
    pub block_size: u64,
    pub depth: u64,
    pub difficulty: u64,
    pub hash: String,
    pub height: u64,
    pub major_version: u32,
    pub minor_version: u32,
    pub nonce: u32,
    pub num_txes: u32,
    pub orphan_status: bool,
    pub prev_hash: String,
    pub reward: u64,
    pub timestamp: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetBlockHeaderReply {
    pub block_header: BlockHeader,
    pub status: String,
    pub untrusted: bool,
}
