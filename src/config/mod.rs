//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! coordinator config (already parsed) or TOML file
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RpcConfig (validated, immutable)
//!     → one RpcClient per UpstreamConfig
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; a reload builds fresh clients
//! - Optional fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{MonitorConfig, ObservabilityConfig, RpcConfig, UpstreamConfig};
pub use validation::{validate_config, ValidationError};
