//! routemetrics axum adapter.
//!
//! Wires the core aggregates into an axum stack: the tower layer that observes
//! every routed request, the `/metrics` exposition endpoint, strict YAML
//! configuration, and the demo router used by the `routemetrics-demo` binary
//! and integration tests.

pub mod app_state;
pub mod config;
pub mod handlers;
pub mod obs;
pub mod ops;
pub mod router;

pub use obs::{HttpMetricsExt, MetricsLayer, MetricsService};
