//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! rpc client, health state, monitor produce:
//!     → tracing events (structured fields: upstream, method, error)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers (installed by the host process):
//!     → logging.rs subscriber (stdout, text or JSON)
//!     → any `metrics` recorder/exporter
//! ```

pub mod logging;
pub mod metrics;
