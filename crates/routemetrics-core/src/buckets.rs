//! Latency histogram bucket bounds (milliseconds).
//!
//! Bounds are validated once, at construction: non-empty, finite, positive and
//! strictly increasing. The `+Inf` bucket is implicit and added by prometheus.

use std::env;

use crate::error::{Result, RouteMetricsError};

/// Environment variable overriding the latency buckets, e.g. `"101,201"`.
pub const ENV_LATENCY_BUCKETS: &str = "CHI_PROMETHEUS_LATENCY_BUCKETS";

/// Coarse three-bucket default: 300ms, 1.2s, 5s.
pub const DEFAULT_BUCKETS_MS: [f64; 3] = [300.0, 1200.0, 5000.0];

#[derive(Debug, Clone, PartialEq)]
pub struct Buckets(Vec<f64>);

impl Default for Buckets {
    fn default() -> Self {
        Self(DEFAULT_BUCKETS_MS.to_vec())
    }
}

impl Buckets {
    /// Validate an explicit list of upper bounds.
    pub fn new(bounds: Vec<f64>) -> Result<Self> {
        if bounds.is_empty() {
            return Err(RouteMetricsError::InvalidBuckets(
                "at least one bound is required".into(),
            ));
        }
        for (i, &b) in bounds.iter().enumerate() {
            if !b.is_finite() || b <= 0.0 {
                return Err(RouteMetricsError::InvalidBuckets(format!(
                    "bound {b} must be a positive finite number"
                )));
            }
            if i > 0 && bounds[i - 1] >= b {
                return Err(RouteMetricsError::InvalidBuckets(format!(
                    "bounds must be strictly increasing ({} >= {b})",
                    bounds[i - 1]
                )));
            }
        }
        Ok(Self(bounds))
    }

    /// Parse a comma-separated list such as `"101, 201"`.
    ///
    /// An empty (or all-whitespace) string yields the defaults.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::default());
        }
        let bounds = s
            .split(',')
            .map(|item| {
                let item = item.trim();
                item.parse::<f64>().map_err(|e| {
                    RouteMetricsError::InvalidBuckets(format!("{item:?}: {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(bounds)
    }

    /// Read [`ENV_LATENCY_BUCKETS`]; absent or empty means defaults.
    pub fn from_env() -> Result<Self> {
        match env::var(ENV_LATENCY_BUCKETS) {
            Ok(v) => Self::parse(&v),
            Err(env::VarError::NotPresent) => Ok(Self::default()),
            Err(e) => Err(RouteMetricsError::InvalidBuckets(format!(
                "{ENV_LATENCY_BUCKETS}: {e}"
            ))),
        }
    }

    /// True when the env override is set to something other than whitespace.
    pub fn env_override_present() -> bool {
        env::var_os(ENV_LATENCY_BUCKETS)
            .map(|v| !v.to_string_lossy().trim().is_empty())
            .unwrap_or(false)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.0
    }
}
