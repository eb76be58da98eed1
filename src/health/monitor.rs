//! Periodic upstream probing.
//!
//! # Responsibilities
//! - Periodically run the liveness check against every upstream
//! - Refresh the cached node info after each probe
//!
//! Selection between upstreams is left to the caller; this only keeps
//! each client's health flag and info snapshot current.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time;

use crate::config::MonitorConfig;
use crate::rpc::{RpcClient, RpcError, RpcResult};

pub struct UpstreamMonitor {
    clients: Vec<Arc<RpcClient>>,
    config: MonitorConfig,
    interval: Duration,
}

impl UpstreamMonitor {
    pub fn new(clients: Vec<Arc<RpcClient>>, config: MonitorConfig) -> RpcResult<Self> {
        let interval = config
            .probe_interval()
            .map_err(|source| RpcError::InvalidDuration {
                value: config.interval.clone(),
                source,
            })?;

        Ok(Self {
            clients,
            config,
            interval,
        })
    }

    /// Probe loop; returns when the shutdown channel fires or closes.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        if !self.config.enabled {
            tracing::info!("Upstream monitor disabled");
            return;
        }

        tracing::info!(
            interval = ?self.interval,
            upstreams = self.clients.len(),
            "Upstream monitor starting"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.check_all().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Upstream monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Probe every upstream once, concurrently.
    pub async fn check_all(&self) {
        join_all(self.clients.iter().map(|client| self.check_one(client))).await;
    }

    async fn check_one(&self, client: &RpcClient) {
        match client
            .check(self.config.reserve_size, &self.config.wallet_address)
            .await
        {
            Ok(alive) => {
                tracing::debug!(upstream = %client.name(), alive, "Liveness check passed");
            }
            Err(e) => {
                tracing::warn!(
                    upstream = %client.name(),
                    sick = client.is_sick(),
                    error = %e,
                    "Liveness check failed"
                );
            }
        }

        match client.refresh_info().await {
            Ok(Some(info)) => {
                tracing::debug!(upstream = %client.name(), height = info.height, "Node info refreshed");
            }
            Ok(None) => {
                tracing::debug!(upstream = %client.name(), "Node info refresh returned no data");
            }
            Err(e) => {
                tracing::warn!(upstream = %client.name(), error = %e, "Node info refresh failed");
            }
        }
    }

    /// Run the loop on a background task.
    pub fn spawn(self) -> MonitorHandle {
        let (tx, rx) = broadcast::channel(1);
        let task = tokio::spawn(self.run(rx));
        MonitorHandle { tx, task }
    }
}

/// Handle to a spawned monitor loop.
pub struct MonitorHandle {
    tx: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    /// Signal the loop to stop and wait for it.
    pub async fn shutdown(self) {
        let _ = self.tx.send(());
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Upstream monitor task failed");
        }
    }
}
