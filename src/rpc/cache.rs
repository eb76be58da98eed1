//! Cached node-info snapshot.
//!
//! # Design Decisions
//! - Copy-on-write pointer swap, readers never lock
//! - A refresh replaces the whole snapshot; there are no partial updates

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::rpc::types::GetInfoReply;

/// Last node status installed by a successful refresh.
#[derive(Debug, Default)]
pub struct InfoCache {
    current: ArcSwapOption<GetInfoReply>,
}

impl InfoCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The installed snapshot, if any.
    pub fn load(&self) -> Option<Arc<GetInfoReply>> {
        self.current.load_full()
    }

    /// Publish a new snapshot, replacing the previous one.
    pub fn store(&self, info: Option<Arc<GetInfoReply>>) {
        self.current.store(info);
    }
}
