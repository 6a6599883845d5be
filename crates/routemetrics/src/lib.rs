//! Top-level facade crate for routemetrics.
//!
//! Re-exports the core aggregates and the axum adapter so users can depend on a
//! single crate.

pub mod core {
    pub use routemetrics_core::*;
}

pub mod axum {
    pub use routemetrics_axum::*;
}

pub use routemetrics_axum::{HttpMetricsExt, MetricsLayer};
pub use routemetrics_core::{HttpMetrics, Result, RouteMetricsError};
