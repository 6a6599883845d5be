//! Request counter + latency histogram, partitioned by status text, method and
//! route pattern.
//!
//! Both aggregates are created together and always updated together through
//! [`HttpMetrics::observe`], so they share label dimensions and values for
//! every request. Thread safety is delegated to `prometheus` (atomics inside
//! each child metric).

use std::time::Duration;

use prometheus::core::Collector;
use prometheus::{CounterVec, HistogramOpts, HistogramVec, Opts, Registry};

use crate::buckets::Buckets;
use crate::error::{Result, RouteMetricsError};

/// Request counter name. Fixed for dashboard/alert compatibility.
pub const REQUESTS_COLLECTOR_NAME: &str = "chi_requests_total";
/// Latency histogram name (milliseconds).
pub const LATENCY_COLLECTOR_NAME: &str = "chi_request_duration_milliseconds";

/// Variable labels, in the order `observe` passes values.
pub const LABEL_NAMES: [&str; 3] = ["code", "method", "path"];

const SERVICE_LABEL: &str = "service";

#[derive(Clone)]
struct Instruments {
    service: String,
    buckets: Buckets,
    requests: CounterVec,
    latency: HistogramVec,
}

/// Request metric aggregates for one service.
///
/// `Default` yields the uninitialised instance (no aggregates); registering it
/// fails. Use [`HttpMetrics::new`] or [`HttpMetrics::with_buckets`].
#[derive(Clone, Default)]
pub struct HttpMetrics {
    inner: Option<Instruments>,
}

impl std::fmt::Debug for HttpMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            Some(i) => f
                .debug_struct("HttpMetrics")
                .field("service", &i.service)
                .field("buckets", &i.buckets)
                .finish(),
            None => f.write_str("HttpMetrics(unset)"),
        }
    }
}

impl HttpMetrics {
    /// Build the aggregates for `service`, taking bucket bounds from
    /// `CHI_PROMETHEUS_LATENCY_BUCKETS` when set.
    ///
    /// A malformed override is an error, never a silent fallback; callers are
    /// expected to abort startup on it.
    pub fn new(service: impl Into<String>) -> Result<Self> {
        let buckets = Buckets::from_env()?;
        Self::with_buckets(service, buckets)
    }

    /// Build the aggregates with explicit bucket bounds.
    pub fn with_buckets(service: impl Into<String>, buckets: Buckets) -> Result<Self> {
        let service = service.into();

        let requests = CounterVec::new(
            Opts::new(
                REQUESTS_COLLECTOR_NAME,
                "Number of HTTP requests partitioned by status code, method and HTTP path.",
            )
            .const_label(SERVICE_LABEL, service.as_str()),
            &LABEL_NAMES,
        )?;

        let latency = HistogramVec::new(
            HistogramOpts::new(
                LATENCY_COLLECTOR_NAME,
                "Time spent on the request partitioned by status code, method and HTTP path.",
            )
            .const_label(SERVICE_LABEL, service.as_str())
            .buckets(buckets.as_slice().to_vec()),
            &LABEL_NAMES,
        )?;

        tracing::info!(%service, buckets = ?buckets.as_slice(), "http metrics initialised");

        Ok(Self {
            inner: Some(Instruments {
                service,
                buckets,
                requests,
                latency,
            }),
        })
    }

    /// Whether the aggregates exist (false for `HttpMetrics::default()`).
    pub fn is_initialized(&self) -> bool {
        self.inner.is_some()
    }

    pub fn service(&self) -> Option<&str> {
        self.inner.as_ref().map(|i| i.service.as_str())
    }

    pub fn bucket_bounds(&self) -> Option<&[f64]> {
        self.inner.as_ref().map(|i| i.buckets.as_slice())
    }

    /// Record one finished request. Elapsed time is truncated to whole ms.
    pub fn observe(&self, code: &str, method: &str, path: &str, elapsed: Duration) {
        let Some(i) = &self.inner else {
            return;
        };
        let ms = elapsed.as_millis() as f64;
        let labels = [code, method, path];
        i.requests.with_label_values(&labels).inc();
        i.latency.with_label_values(&labels).observe(ms);
        tracing::debug!(code, method, path, elapsed_ms = ms, "request observed");
    }

    /// Collectors for a caller-owned registry: `[requests, latency]`.
    pub fn collectors(&self) -> Vec<Box<dyn Collector>> {
        match &self.inner {
            Some(i) => vec![Box::new(i.requests.clone()), Box::new(i.latency.clone())],
            None => Vec::new(),
        }
    }

    /// Register both collectors with `registry`. Either both end up
    /// registered or neither does.
    pub fn register(&self, registry: &Registry) -> Result<()> {
        let Some(i) = &self.inner else {
            return Err(RouteMetricsError::CollectorsUnset);
        };
        registry.register(Box::new(i.requests.clone()))?;
        if let Err(e) = registry.register(Box::new(i.latency.clone())) {
            if let Err(rollback) = registry.unregister(Box::new(i.requests.clone())) {
                tracing::warn!(
                    service = %i.service,
                    error = %rollback,
                    "counter rollback after failed registration failed"
                );
            }
            return Err(e.into());
        }
        Ok(())
    }

    /// Remove both collectors from `registry`.
    pub fn unregister(&self, registry: &Registry) -> Result<()> {
        if self.inner.is_none() {
            return Err(RouteMetricsError::CollectorsUnset);
        }
        for c in self.collectors() {
            registry.unregister(c)?;
        }
        Ok(())
    }

    /// Register with the process-wide default registry.
    pub fn register_default(&self) -> Result<()> {
        self.register(prometheus::default_registry())
    }

    /// Like [`HttpMetrics::register_default`] but panics on failure, including
    /// on an uninitialised instance.
    #[allow(clippy::panic)]
    pub fn must_register_default(&self) {
        if let Err(e) = self.register_default() {
            panic!("{e}");
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]
    #![allow(clippy::panic)]

    use super::*;
    use prometheus::proto::MetricFamily;

    fn family<'a>(families: &'a [MetricFamily], name: &str) -> &'a MetricFamily {
        families
            .iter()
            .find(|f| f.get_name() == name)
            .unwrap_or_else(|| panic!("family {name} missing"))
    }

    fn label<'a>(m: &'a prometheus::proto::Metric, name: &str) -> &'a str {
        m.get_label()
            .iter()
            .find(|l| l.get_name() == name)
            .map(|l| l.get_value())
            .unwrap_or_else(|| panic!("label {name} missing"))
    }

    #[test]
    fn collectors_returns_two_when_constructed() {
        let m = HttpMetrics::with_buckets("test", Buckets::default()).unwrap();
        let collectors = m.collectors();
        assert_eq!(collectors.len(), 2);

        let names: Vec<_> = collectors
            .iter()
            .map(|c| c.desc()[0].fq_name.clone())
            .collect();
        assert_eq!(names, [REQUESTS_COLLECTOR_NAME, LATENCY_COLLECTOR_NAME]);
    }

    #[test]
    fn uninitialized_has_no_collectors_and_refuses_registration() {
        let m = HttpMetrics::default();
        assert!(!m.is_initialized());
        assert!(m.collectors().is_empty());

        let reg = Registry::new();
        let err = m.register(&reg).expect_err("must fail");
        assert!(matches!(err, RouteMetricsError::CollectorsUnset));

        // observe on an unset instance is a no-op
        m.observe("OK", "GET", "/", Duration::from_millis(3));
    }

    #[test]
    #[should_panic(expected = "collectors must be set")]
    fn must_register_default_panics_when_unset() {
        HttpMetrics::default().must_register_default();
    }

    #[test]
    fn must_register_default_succeeds_when_constructed() {
        let m = HttpMetrics::with_buckets("core-must-register", Buckets::default()).unwrap();
        m.must_register_default();
        m.unregister(prometheus::default_registry()).unwrap();
    }

    #[test]
    fn double_registration_is_rejected() {
        let m = HttpMetrics::with_buckets("test", Buckets::default()).unwrap();
        let reg = Registry::new();
        m.register(&reg).unwrap();
        let err = m.register(&reg).expect_err("must fail");
        assert!(matches!(err, RouteMetricsError::Registration(_)));
    }

    #[test]
    fn failed_registration_leaves_nothing_behind() {
        let reg = Registry::new();
        // occupies only the latency histogram's slot
        let blocker = HttpMetrics::with_buckets("test", Buckets::default()).unwrap();
        reg.register(blocker.collectors().remove(1)).unwrap();

        let m = HttpMetrics::with_buckets("test", Buckets::default()).unwrap();
        let err = m.register(&reg).expect_err("must fail");
        assert!(matches!(err, RouteMetricsError::Registration(_)));

        // the counter was rolled back, so it can be registered on its own
        reg.register(m.collectors().remove(0)).unwrap();
    }

    #[test]
    fn observe_updates_both_aggregates_with_same_labels() {
        let m = HttpMetrics::with_buckets("test", Buckets::default()).unwrap();
        let reg = Registry::new();
        m.register(&reg).unwrap();

        m.observe("OK", "GET", "/users/:name", Duration::from_millis(12));
        m.observe("OK", "GET", "/users/:name", Duration::from_millis(400));
        m.observe("Not Found", "GET", "", Duration::from_micros(900));

        let families = reg.gather();

        let requests = family(&families, REQUESTS_COLLECTOR_NAME);
        let latency = family(&families, LATENCY_COLLECTOR_NAME);
        assert_eq!(requests.get_metric().len(), 2);
        assert_eq!(latency.get_metric().len(), 2);

        for (c, h) in requests.get_metric().iter().zip(latency.get_metric()) {
            assert_eq!(c.get_label(), h.get_label());
            assert_eq!(label(c, "service"), "test");
            assert_eq!(
                c.get_counter().get_value() as u64,
                h.get_histogram().get_sample_count()
            );
        }

        let users = latency
            .get_metric()
            .iter()
            .find(|m| label(m, "path") == "/users/:name")
            .unwrap();
        let h = users.get_histogram();
        assert_eq!(h.get_sample_count(), 2);
        assert_eq!(h.get_sample_sum(), 412.0);
        // cumulative: 12 <= 300; 400 <= 1200
        let counts: Vec<_> = h.get_bucket().iter().map(|b| b.get_cumulative_count()).collect();
        assert_eq!(counts, [1, 2, 2]);

        let unmatched = latency
            .get_metric()
            .iter()
            .find(|m| label(m, "path").is_empty())
            .unwrap();
        // sub-millisecond durations truncate to zero
        assert_eq!(unmatched.get_histogram().get_sample_sum(), 0.0);
        assert_eq!(label(unmatched, "code"), "Not Found");
    }

    #[test]
    fn custom_buckets_replace_defaults() {
        let buckets = Buckets::parse("101,201").unwrap();
        let m = HttpMetrics::with_buckets("test", buckets).unwrap();
        assert_eq!(m.bucket_bounds(), Some(&[101.0, 201.0][..]));

        let reg = Registry::new();
        m.register(&reg).unwrap();
        m.observe("OK", "GET", "/healthz", Duration::from_millis(1));

        let families = reg.gather();
        let latency = family(&families, LATENCY_COLLECTOR_NAME);
        let bounds: Vec<_> = latency.get_metric()[0]
            .get_histogram()
            .get_bucket()
            .iter()
            .map(|b| b.get_upper_bound())
            .collect();
        assert_eq!(bounds, [101.0, 201.0]);
    }
}
