//! Prometheus metrics collection and exposition endpoint.

use std::sync::OnceLock;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
    core::Collector,
};
use salvo::{
    Request, Response, handler,
    http::{
        StatusCode,
        header::{CONTENT_TYPE, HeaderValue},
    },
};
use tracing::error;

const DURATION_BUCKETS: [f64; 13] = [
    0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

#[derive(Debug)]
struct Metrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    requests_in_flight: IntGauge,
    cart_operations_total: IntCounterVec,
}

static METRICS: OnceLock<Option<Metrics>> = OnceLock::new();

#[derive(Debug)]
pub(super) struct InFlightRequestGuard {
    tracked: bool,
}

impl InFlightRequestGuard {
    pub(super) fn track() -> Self {
        let Some(metrics) = metrics() else {
            return Self { tracked: false };
        };

        metrics.requests_in_flight.inc();

        Self { tracked: true }
    }
}

impl Drop for InFlightRequestGuard {
    fn drop(&mut self) {
        if self.tracked
            && let Some(metrics) = metrics()
        {
            metrics.requests_in_flight.dec();
        }
    }
}

pub(super) fn observe_request(method: &str, route: &str, status_code: u16, duration_seconds: f64) {
    let Some(metrics) = metrics() else {
        return;
    };

    let status_code_label = status_code.to_string();

    metrics
        .requests_total
        .with_label_values(&[
            method,
            route,
            status_class(status_code),
            status_code_label.as_str(),
        ])
        .inc();

    metrics
        .request_duration_seconds
        .with_label_values(&[method, route])
        .observe(duration_seconds);
}

/// Count a finished cart operation. `outcome` is `ok` or the error kind.
pub(crate) fn record_cart_operation(operation: &str, outcome: &str) {
    if let Some(metrics) = metrics() {
        metrics
            .cart_operations_total
            .with_label_values(&[operation, outcome])
            .inc();
    }
}

#[handler]
pub(crate) async fn metrics_handler(_req: &mut Request, res: &mut Response) {
    let Some(metrics) = metrics() else {
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        return;
    };

    let encoder = TextEncoder::new();
    let mut encoded = Vec::new();

    if let Err(source) = encoder.encode(&metrics.registry.gather(), &mut encoded) {
        error!("failed to encode metrics response: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return;
    }

    match HeaderValue::from_str(encoder.format_type()) {
        Ok(content_type) => {
            res.headers_mut().insert(CONTENT_TYPE, content_type);
            res.render(String::from_utf8_lossy(&encoded).into_owned());
        }
        Err(source) => {
            error!("failed to encode metrics content type header: {source}");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}

fn metrics() -> Option<&'static Metrics> {
    METRICS.get_or_init(build_metrics).as_ref()
}

fn register<C>(registry: &Registry, name: &str, metric: prometheus::Result<C>) -> Option<C>
where
    C: Collector + Clone + 'static,
{
    let metric = match metric {
        Ok(metric) => metric,
        Err(source) => {
            error!("failed to create {name} metric: {source}");
            return None;
        }
    };

    if let Err(source) = registry.register(Box::new(metric.clone())) {
        error!("failed to register {name} metric: {source}");
        return None;
    }

    Some(metric)
}

fn build_metrics() -> Option<Metrics> {
    let registry = Registry::new();

    let requests_total = register(
        &registry,
        "requests_total",
        IntCounterVec::new(
            Opts::new(
                "trolley_json_http_requests_total",
                "Total HTTP requests partitioned by method, route, status class, and status code.",
            ),
            &["method", "route", "status_class", "status_code"],
        ),
    )?;

    let request_duration_seconds = register(
        &registry,
        "request_duration",
        HistogramVec::new(
            HistogramOpts::new(
                "trolley_json_http_request_duration_seconds",
                "HTTP request duration in seconds partitioned by method and route.",
            )
            .buckets(DURATION_BUCKETS.to_vec()),
            &["method", "route"],
        ),
    )?;

    let requests_in_flight = register(
        &registry,
        "in-flight gauge",
        IntGauge::with_opts(Opts::new(
            "trolley_json_http_requests_in_flight",
            "Current number of in-flight HTTP requests.",
        )),
    )?;

    let cart_operations_total = register(
        &registry,
        "cart_operations_total",
        IntCounterVec::new(
            Opts::new(
                "trolley_json_cart_operations_total",
                "Cart operations partitioned by operation and outcome.",
            ),
            &["operation", "outcome"],
        ),
    )?;

    Some(Metrics {
        registry,
        requests_total,
        request_duration_seconds,
        requests_in_flight,
        cart_operations_total,
    })
}

fn status_class(status_code: u16) -> &'static str {
    match status_code {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}
