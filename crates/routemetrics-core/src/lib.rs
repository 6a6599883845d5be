//! routemetrics core: request metric aggregates, bucket configuration and the
//! shared error type.
//!
//! This crate owns the two Prometheus aggregates (`chi_requests_total` and
//! `chi_request_duration_milliseconds`) and their registration. It carries no
//! HTTP or runtime dependencies; the axum adapter lives in `routemetrics-axum`.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. The only exception is
//! [`HttpMetrics::must_register_default`], whose contract is to abort on
//! misuse.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod buckets;
pub mod error;
pub mod instruments;

pub use buckets::{Buckets, DEFAULT_BUCKETS_MS, ENV_LATENCY_BUCKETS};
/// Shared result type.
pub use error::{Result, RouteMetricsError};
pub use instruments::{HttpMetrics, LABEL_NAMES, LATENCY_COLLECTOR_NAME, REQUESTS_COLLECTOR_NAME};
