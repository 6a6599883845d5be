//! Shared error type across routemetrics crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, RouteMetricsError>;

/// Unified error type used by core and the axum adapter.
#[derive(Debug, Error)]
pub enum RouteMetricsError {
    /// Histogram bucket bounds could not be parsed or are not strictly increasing.
    #[error("invalid latency buckets: {0}")]
    InvalidBuckets(String),
    /// Registration attempted on an instance that was never constructed with `new`.
    #[error("collectors must be set")]
    CollectorsUnset,
    /// The prometheus registry rejected a collector.
    #[error("registration failed: {0}")]
    Registration(#[from] prometheus::Error),
    /// Config file did not parse or failed validation.
    #[error("invalid config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl RouteMetricsError {
    /// True for errors caused by operator input (env var or config file).
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            RouteMetricsError::InvalidBuckets(_) | RouteMetricsError::Config(_)
        )
    }
}
