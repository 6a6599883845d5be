use std::net::SocketAddr;

use serde::Deserialize;
use routemetrics_core::error::{Result, RouteMetricsError};
use routemetrics_core::Buckets;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    pub metrics: MetricsSection,
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(RouteMetricsError::Config(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.server.validate()?;
        self.metrics.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen.parse::<SocketAddr>().map_err(|e| {
            RouteMetricsError::Config(format!("server.listen must be a socket address: {e}"))
        })?;
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}

/// Which prometheus registry the demo server exposes.
#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RegistryKind {
    /// A registry owned by the app state.
    #[default]
    Owned,
    /// The process-wide `prometheus::default_registry()`.
    Default,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    /// Value of the constant `service` label.
    pub service: String,

    #[serde(default)]
    pub registry: RegistryKind,

    /// Histogram upper bounds in ms. Overridden by `CHI_PROMETHEUS_LATENCY_BUCKETS`.
    #[serde(default)]
    pub latency_buckets_ms: Option<Vec<f64>>,
}

impl MetricsSection {
    pub fn validate(&self) -> Result<()> {
        if self.service.trim().is_empty() {
            return Err(RouteMetricsError::Config(
                "metrics.service must not be empty".into(),
            ));
        }
        if let Some(b) = &self.latency_buckets_ms {
            Buckets::new(b.clone())?;
        }
        Ok(())
    }

    /// Env override (when non-empty), else the configured list, else defaults.
    pub fn resolve_buckets(&self) -> Result<Buckets> {
        if Buckets::env_override_present() {
            tracing::info!("latency buckets taken from environment");
            return Buckets::from_env();
        }
        match &self.latency_buckets_ms {
            Some(b) => Buckets::new(b.clone()),
            None => Ok(Buckets::default()),
        }
    }
}
