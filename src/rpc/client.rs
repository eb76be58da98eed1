//! Daemon JSON-RPC client with health tracking.
//!
//! # Responsibilities
//! - Wrap each call in a JSON-RPC 2.0 envelope and POST it to the upstream
//! - Classify transport, decode and application errors
//! - Feed failures into the health state machine
//! - Keep the latest node info for lock-free reads
//!
//! # Design Decisions
//! - No retries: every error goes straight back to the caller
//! - Only `check` counts as a success for the health state machine
//! - Lifetime counters are updated after the health lock is released

use std::sync::Arc;
use std::time::Instant;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use url::Url;

use crate::config::UpstreamConfig;
use crate::health::counters::UpstreamCounters;
use crate::health::state::{HealthSnapshot, HealthState, Transition};
use crate::observability::metrics;
use crate::rpc::cache::InfoCache;
use crate::rpc::error::{RpcError, RpcResult};
use crate::rpc::types::{
    GetBlockCountReply, GetBlockHeaderReply, GetBlockTemplateReply, GetInfoReply, JsonRpcRequest,
    JsonRpcResponse,
};

/// Client for a single daemon upstream.
pub struct RpcClient {
    name: String,
    url: Url,
    http: reqwest::Client,
    status_errors_mark_sick: bool,
    health: HealthState,
    counters: UpstreamCounters,
    info: InfoCache,
}

impl RpcClient {
    /// Create a client for the given upstream descriptor.
    ///
    /// A zero timeout disables the request timeout.
    pub fn new(config: &UpstreamConfig) -> RpcResult<Self> {
        let timeout = config
            .request_timeout()
            .map_err(|source| RpcError::InvalidDuration {
                value: config.timeout.clone(),
                source,
            })?;

        let mut builder = reqwest::Client::builder();
        if !timeout.is_zero() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(RpcError::HttpClient)?;

        Self::with_http_client(config, http)
    }

    /// Create a client that sends through a prebuilt HTTP client.
    ///
    /// The descriptor's timeout is ignored; the given client's settings apply.
    pub fn with_http_client(config: &UpstreamConfig, http: reqwest::Client) -> RpcResult<Self> {
        let raw = config.endpoint();
        let url = Url::parse(&raw).map_err(|source| RpcError::InvalidUrl { url: raw, source })?;

        tracing::debug!(upstream = %config.name, url = %url, "RPC client created");

        Ok(Self {
            name: config.name.clone(),
            url,
            http,
            status_errors_mark_sick: config.status_errors_mark_sick,
            health: HealthState::new(),
            counters: UpstreamCounters::new(),
            info: InfoCache::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Whether callers should route work away from this upstream.
    pub fn is_sick(&self) -> bool {
        self.health.is_sick()
    }

    /// Consistent copy of the health record.
    pub fn health(&self) -> HealthSnapshot {
        self.health.snapshot()
    }

    pub fn counters(&self) -> &UpstreamCounters {
        &self.counters
    }

    /// Latest node info from a successful refresh, if any.
    pub fn current_info(&self) -> Option<Arc<GetInfoReply>> {
        self.info.load()
    }

    /// Perform one JSON-RPC call and return the raw response envelope.
    pub async fn call<P: Serialize>(&self, method: &str, params: P) -> RpcResult<JsonRpcResponse> {
        let start = Instant::now();
        let result = self.round_trip(method, params).await;

        match &result {
            Ok(_) => metrics::record_request(&self.name, method, "ok", start),
            Err(e) => {
                metrics::record_request(&self.name, method, e.kind(), start);
                tracing::warn!(upstream = %self.name, method, error = %e, "RPC call failed");
                if e.marks_sick(self.status_errors_mark_sick) {
                    self.mark_sick();
                }
            }
        }

        result
    }

    async fn round_trip<P: Serialize>(&self, method: &str, params: P) -> RpcResult<JsonRpcResponse> {
        let body = serde_json::to_vec(&JsonRpcRequest::new(method, params)).map_err(RpcError::Encode)?;

        tracing::debug!(upstream = %self.name, method, bytes = body.len(), "Sending RPC request");

        let response = self
            .http
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(RpcError::Transport)?;

        let status = response.status();
        if status.as_u16() < 200 || status.as_u16() >= 400 {
            return Err(RpcError::HttpStatus(status));
        }

        let bytes = response.bytes().await.map_err(RpcError::Transport)?;
        let envelope: JsonRpcResponse = serde_json::from_slice(&bytes).map_err(RpcError::Decode)?;

        if let Some(message) = envelope.error_message() {
            return Err(RpcError::Application { message });
        }

        Ok(envelope)
    }

    async fn call_typed<T, P>(&self, method: &str, params: P) -> RpcResult<Option<T>>
    where
        T: DeserializeOwned,
        P: Serialize,
    {
        let response = self.call(method, params).await?;
        response
            .result
            .map(|result| serde_json::from_value(result).map_err(RpcError::Reply))
            .transpose()
    }

    pub async fn get_block_template(
        &self,
        reserve_size: u32,
        wallet_address: &str,
    ) -> RpcResult<Option<GetBlockTemplateReply>> {
        let params = json!({ "reserve_size": reserve_size, "wallet_address": wallet_address });
        self.call_typed("getblocktemplate", params).await
    }

    pub async fn get_info(&self) -> RpcResult<Option<GetInfoReply>> {
        self.call_typed("get_info", json!({})).await
    }

    pub async fn get_block_count(&self) -> RpcResult<Option<GetBlockCountReply>> {
        self.call_typed("getblockcount", json!({})).await
    }

    /// Submit a hex-encoded block. The raw envelope is returned untouched.
    pub async fn submit_block(&self, blob_hex: &str) -> RpcResult<JsonRpcResponse> {
        self.call("submitblock", [blob_hex]).await
    }

    pub async fn get_block_header_by_height(&self, height: u64) -> RpcResult<Option<GetBlockHeaderReply>> {
        self.call_typed("getblockheaderbyheight", json!({ "height": height })).await
    }

    /// Probe the upstream with a block template request.
    ///
    /// A successful probe counts towards recovery. Returns whether the
    /// upstream is alive after the probe.
    pub async fn check(&self, reserve_size: u32, wallet_address: &str) -> RpcResult<bool> {
        self.get_block_template(reserve_size, wallet_address).await?;
        self.mark_alive();
        Ok(!self.is_sick())
    }

    /// Fetch node info and publish it to the cache.
    ///
    /// On error the previous snapshot is kept.
    pub async fn refresh_info(&self) -> RpcResult<Option<Arc<GetInfoReply>>> {
        let info = self.get_info().await?.map(Arc::new);
        self.info.store(info.clone());
        Ok(info)
    }

    fn mark_sick(&self) {
        let outcome = self.health.record_failure();

        if outcome.streak_started {
            self.counters.record_fail();
            metrics::record_failure_streak(&self.name);
        }

        if outcome.transition == Some(Transition::BecameSick) {
            tracing::warn!(upstream = %self.name, "Upstream marked sick");
            metrics::record_upstream_health(&self.name, false);
        }
    }

    fn mark_alive(&self) {
        if self.health.record_success() == Some(Transition::Recovered) {
            tracing::info!(upstream = %self.name, "Upstream recovered");
            metrics::record_upstream_health(&self.name, true);
        }
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("name", &self.name)
            .field("url", &self.url.as_str())
            .field("health", &self.health.snapshot())
            .finish()
    }
}

/// Build one shared client per upstream descriptor.
pub fn build_clients(configs: &[UpstreamConfig]) -> RpcResult<Vec<Arc<RpcClient>>> {
    configs
        .iter()
        .map(|config| RpcClient::new(config).map(Arc::new))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = UpstreamConfig::new("main", "127.0.0.1", 18081);
        let client = RpcClient::new(&config).unwrap();

        assert_eq!(client.name(), "main");
        assert_eq!(client.url().as_str(), "http://127.0.0.1:18081/json_rpc");
        assert!(!client.is_sick());
        assert!(client.current_info().is_none());
        assert_eq!(client.counters().fails(), 0);
    }

    #[test]
    fn test_invalid_host_is_construction_error() {
        let config = UpstreamConfig::new("bad", "not a host", 18081);
        let err = RpcClient::new(&config).unwrap_err();
        assert!(matches!(err, RpcError::InvalidUrl { .. }));
    }

    #[test]
    fn test_invalid_timeout_is_construction_error() {
        let mut config = UpstreamConfig::new("main", "127.0.0.1", 18081);
        config.timeout = "ten seconds".into();
        let err = RpcClient::new(&config).unwrap_err();
        assert!(matches!(err, RpcError::InvalidDuration { .. }));
        assert!(err.to_string().contains("ten seconds"));
    }

    #[test]
    fn test_zero_timeout_is_accepted() {
        let mut config = UpstreamConfig::new("main", "127.0.0.1", 18081);
        config.timeout = "0s".into();
        assert!(RpcClient::new(&config).is_ok());
    }

    #[test]
    fn test_build_clients_fails_on_first_bad_upstream() {
        let good = UpstreamConfig::new("a", "127.0.0.1", 18081);
        let bad = UpstreamConfig::new("b", "bad host", 18081);

        assert_eq!(build_clients(&[good.clone()]).unwrap().len(), 1);
        assert!(build_clients(&[good, bad]).is_err());
    }
}
