//! Shared application state for the demo server.

use std::sync::Arc;

use prometheus::Registry;
use routemetrics_core::error::Result;
use routemetrics_core::HttpMetrics;

use crate::config::{AppConfig, RegistryKind};

#[derive(Clone)]
pub struct AppState {
    cfg: Arc<AppConfig>,
    metrics: HttpMetrics,
    registry: Registry,
}

impl AppState {
    /// Build the aggregates and register them with the configured registry.
    /// Errors here are startup errors (bad buckets, duplicate registration).
    pub fn new(cfg: AppConfig) -> Result<Self> {
        let buckets = cfg.metrics.resolve_buckets()?;
        let metrics = HttpMetrics::with_buckets(cfg.metrics.service.clone(), buckets)?;

        let registry = match cfg.metrics.registry {
            RegistryKind::Owned => {
                let registry = Registry::new();
                metrics.register(&registry)?;
                registry
            }
            RegistryKind::Default => {
                metrics.register_default()?;
                prometheus::default_registry().clone()
            }
        };
        tracing::info!(registry = ?cfg.metrics.registry, "metrics collectors registered");

        Ok(Self {
            cfg: Arc::new(cfg),
            metrics,
            registry,
        })
    }

    pub fn cfg(&self) -> &AppConfig {
        &self.cfg
    }

    pub fn metrics(&self) -> &HttpMetrics {
        &self.metrics
    }

    /// Registry rendered by `/metrics`.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
