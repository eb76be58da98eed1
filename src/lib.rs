//! JSON-RPC client for a mining pool's blockchain daemon upstreams.
//!
//! # Architecture Overview
//!
//! ```text
//!   coordinator ──typed call──▶ RpcClient ──HTTP POST /json_rpc──▶ daemon
//!                                  │
//!                                  ├─ health::state     Alive ←→ Sick (streak threshold 5)
//!                                  ├─ health::counters  accepts / rejects / fails
//!                                  └─ rpc::cache        latest get_info snapshot
//!
//!   health::monitor ──check + refresh_info every interval──▶ each RpcClient
//! ```
//!
//! Choosing between upstreams is left to the caller, which reads
//! [`RpcClient::is_sick`] and [`RpcClient::current_info`].

pub mod config;
pub mod health;
pub mod observability;
pub mod rpc;

pub use config::{RpcConfig, UpstreamConfig};
pub use health::{HealthSnapshot, UpstreamMonitor};
pub use rpc::{RpcClient, RpcError, RpcResult};
