use std::task::{Context, Poll};
use std::time::Instant;

use axum::extract::MatchedPath;
use axum::http::{Request, Response};
use futures_util::future::BoxFuture;
use tower::{Layer, Service};

use routemetrics_core::HttpMetrics;

/// Tower layer recording `chi_requests_total` and
/// `chi_request_duration_milliseconds` for every request it wraps.
///
/// Labels:
/// - `code`: canonical status text of the final response (`"OK"`), empty for
///   unregistered codes
/// - `method`: request method
/// - `path`: the route pattern (`/users/:name`), empty when the router matched
///   nothing (fallback)
///
/// The duration covers the inner service up to the moment it yields its
/// `Response`. Time spent streaming the body afterwards is not included.
#[derive(Clone, Debug)]
pub struct MetricsLayer {
    metrics: HttpMetrics,
}

impl MetricsLayer {
    pub fn new(metrics: HttpMetrics) -> Self {
        Self { metrics }
    }
}

impl From<HttpMetrics> for MetricsLayer {
    fn from(metrics: HttpMetrics) -> Self {
        Self::new(metrics)
    }
}

/// Builds a [`MetricsLayer`] straight from the aggregates.
pub trait HttpMetricsExt {
    fn layer(&self) -> MetricsLayer;
}

impl HttpMetricsExt for HttpMetrics {
    fn layer(&self) -> MetricsLayer {
        MetricsLayer::new(self.clone())
    }
}

impl<S> Layer<S> for MetricsLayer {
    type Service = MetricsService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MetricsService {
            inner,
            metrics: self.metrics.clone(),
        }
    }
}

/// Service produced by [`MetricsLayer`].
#[derive(Clone, Debug)]
pub struct MetricsService<S> {
    inner: S,
    metrics: HttpMetrics,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for MetricsService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let start = Instant::now();
        let method = req.method().clone();
        // Routing has already happened for route-level layers.
        let pattern = req
            .extensions()
            .get::<MatchedPath>()
            .map(|p| p.as_str().to_owned())
            .unwrap_or_default();

        let fut = self.inner.call(req);
        let metrics = self.metrics.clone();

        Box::pin(async move {
            let result = fut.await;

            // Err and panics from the inner service are not recorded.
            if let Ok(response) = &result {
                let code = response.status().canonical_reason().unwrap_or("");
                metrics.observe(code, method.as_str(), &pattern, start.elapsed());
            }

            result
        })
    }
}
