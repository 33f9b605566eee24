//! Prometheus metrics: HTTP traffic plus per-operation cart outcomes.

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

fn register<M>(registry: &Registry, metric: M) -> prometheus::Result<M>
where
    M: Collector + Clone + 'static,
{
    registry.register(Box::new(metric.clone()))?;

    Ok(metric)
}

impl Metrics {
    fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let requests_total = register(
            &registry,
            IntCounterVec::new(
                Opts::new(
                    "dishpatch_json_http_requests_total",
                    "HTTP requests by method, route, status class and status code.",
                ),
                &["method", "route", "status_class", "status_code"],
            )?,
        )?;

        let request_duration_seconds = register(
            &registry,
            HistogramVec::new(
                HistogramOpts::new(
                    "dishpatch_json_http_request_duration_seconds",
                    "HTTP request duration in seconds by method and route.",
                )
                .buckets(DURATION_BUCKETS.to_vec()),
                &["method", "route"],
            )?,
        )?;

        let requests_in_flight = register(
            &registry,
            IntGauge::with_opts(Opts::new(
                "dishpatch_json_http_requests_in_flight",
                "HTTP requests currently being served.",
            ))?,
        )?;

        let cart_operations_total = register(
            &registry,
            IntCounterVec::new(
                Opts::new(
                    "dishpatch_json_cart_operations_total",
                    "Cart operations by name and outcome (ok, rejected, failed).",
                ),
                &["operation", "outcome"],
            )?,
        )?;

        Ok(Self {
            registry,
            requests_total,
            request_duration_seconds,
            requests_in_flight,
            cart_operations_total,
        })
    }
}

fn metrics() -> Option<&'static Metrics> {
    METRICS
        .get_or_init(|| {
            Metrics::new()
                .inspect_err(|source| error!("failed to register metrics: {source}"))
                .ok()
        })
        .as_ref()
}

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

    let status = status_code.to_string();

    metrics
        .requests_total
        .with_label_values(&[method, route, status_class(status_code), status.as_str()])
        .inc();

    metrics
        .request_duration_seconds
        .with_label_values(&[method, route])
        .observe(duration_seconds);

    if let Some(operation) = cart_operation(method, route) {
        metrics
            .cart_operations_total
            .with_label_values(&[operation, outcome(status_code)])
            .inc();
    }
}

/// Name of the cart operation served by `method` on the labelled `route`.
fn cart_operation(method: &str, route: &str) -> Option<&'static str> {
    match (method, route) {
        ("GET", "/cart") => Some("get_cart"),
        ("DELETE", "/cart") => Some("clear_cart"),
        ("POST", "/cart/items") => Some("add_item"),
        ("PUT", "/cart/items/{uuid}") => Some("update_item"),
        ("DELETE", "/cart/items/{uuid}") => Some("remove_item"),
        _ => None,
    }
}

fn outcome(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "ok",
        400..=499 => "rejected",
        _ => "failed",
    }
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

#[handler]
pub(crate) async fn metrics_handler(_req: &mut Request, res: &mut Response) {
    let Some(metrics) = metrics() else {
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        return;
    };

    let encoder = TextEncoder::new();
    let mut encoded = Vec::new();

    if let Err(source) = encoder.encode(&metrics.registry.gather(), &mut encoded) {
        error!("failed to encode metrics: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return;
    }

    match HeaderValue::from_str(encoder.format_type()) {
        Ok(content_type) => {
            res.headers_mut().insert(CONTENT_TYPE, content_type);
            res.render(String::from_utf8_lossy(&encoded).into_owned());
        }
        Err(source) => {
            error!("invalid metrics content type: {source}");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
