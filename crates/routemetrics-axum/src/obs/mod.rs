//! Request observation.
//!
//! `MetricsLayer` decorates any tower service; when added with
//! `Router::layer` it runs per route, after axum has resolved `MatchedPath`.

pub mod layer;

pub use layer::{HttpMetricsExt, MetricsLayer, MetricsService};
