//! Upstream health subsystem.
//!
//! # Data Flow
//! ```text
//! Failure observed (rpc client):
//!     transport / decode / application error
//!     → state.rs record_failure
//!     → counters.rs record_fail (once per streak)
//!
//! Liveness check (monitor.rs or any caller):
//!     block template probe succeeds
//!     → state.rs record_success
//!
//! State machine (state.rs):
//!     Alive ←→ Sick
//!     With a streak threshold to prevent flapping
//! ```
//!
//! # Design Decisions
//! - Health state is per-upstream
//! - Ordinary successful calls do not count as liveness
//! - Counters are telemetry, never consulted for transitions

pub mod counters;
pub mod monitor;
pub mod state;

pub use counters::{CountersSnapshot, UpstreamCounters};
pub use monitor::{MonitorHandle, UpstreamMonitor};
pub use state::{HealthSnapshot, HealthState, Transition, STREAK_THRESHOLD};
