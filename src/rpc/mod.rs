//! Daemon RPC subsystem.
//!
//! # Data Flow
//! ```text
//! typed call (get_block_template, get_info, ...)
//!     → client.rs call() builds the JSON-RPC 2.0 envelope
//!     → HTTP POST http://{host}:{port}/json_rpc
//!     → error.rs classification (transport / decode / application)
//!     → health state on failure
//!     → types.rs typed reply, or None for a null result
//!
//! refresh_info()
//!     → get_info
//!     → cache.rs atomic swap of the snapshot
//! ```

pub mod cache;
pub mod client;
pub mod error;
pub mod types;

pub use cache::InfoCache;
pub use client::{build_clients, RpcClient};
pub use error::{RpcError, RpcResult};
pub use types::{
    BlockHeader, GetBlockCountReply, GetBlockHeaderReply, GetBlockTemplateReply, GetInfoReply,
    JsonRpcRequest, JsonRpcResponse,
};
