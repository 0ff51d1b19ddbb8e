//! Prometheus metrics on the default registry.

use actix_web::{HttpResponse, Responder};
use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, HistogramVec,
    IntCounter, IntCounterVec,
};
use std::time::Duration;

pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "feedgen_http_requests_total",
        "HTTP requests by method, path and status",
        &["method", "path", "status"]
    )
    .expect("register feedgen_http_requests_total")
});

pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "feedgen_http_request_duration_seconds",
        "HTTP request latency by method and path",
        &["method", "path"]
    )
    .expect("register feedgen_http_request_duration_seconds")
});

pub static FETCHES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "feedgen_author_feed_fetches_total",
        "Author-feed fetches issued to the content source"
    )
    .expect("register feedgen_author_feed_fetches_total")
});

pub static FETCH_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "feedgen_author_feed_fetch_failures_total",
        "Author-feed fetches that resolved to an empty batch"
    )
    .expect("register feedgen_author_feed_fetch_failures_total")
});

pub fn observe_http_request(method: &str, path: &str, status: u16, elapsed: Duration) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();
    HTTP_REQUEST_DURATION
        .with_label_values(&[method, path])
        .observe(elapsed.as_secs_f64());
}

/// Text-format exposition handler for `/metrics`.
pub async fn serve_metrics() -> impl Responder {
    use prometheus::{Encoder, TextEncoder};

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => HttpResponse::Ok()
            .content_type(encoder.format_type())
            .body(buffer),
        Err(err) => HttpResponse::InternalServerError().body(err.to_string()),
    }
}
