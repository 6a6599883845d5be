//! Demo server config loader (strict parsing).

pub mod schema;

use std::fs;

use routemetrics_core::error::{Result, RouteMetricsError};

pub use schema::{AppConfig, MetricsSection, RegistryKind, ServerSection};

/// Used by the binary when no path is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "routemetrics.yaml";

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| RouteMetricsError::Internal(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<AppConfig> {
    let cfg: AppConfig = serde_yaml::from_str(s)
        .map_err(|e| RouteMetricsError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
