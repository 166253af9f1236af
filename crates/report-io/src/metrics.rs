//! Prometheus metrics for the simulator.

use prometheus::{Encoder, Gauge, Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};
use route_core::{fields, Report};
use std::io::Cursor;
use std::sync::LazyLock;
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tiny_http::{Header, Response, Server};

/// Global metrics registry
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// Delivery Metrics
// ============================================================================

/// Reports delivered to a sink
pub static REPORTS_SENT: LazyLock<IntCounter> = LazyLock::new(|| {
    let counter =
        IntCounter::new("gpssim_reports_sent_total", "Reports delivered to the sink").unwrap();
    REGISTRY.register(Box::new(counter.clone())).unwrap();
    counter
});

/// Reports carrying an SOS alarm
pub static ALARMS_SENT: LazyLock<IntCounter> = LazyLock::new(|| {
    let counter =
        IntCounter::new("gpssim_alarms_sent_total", "Reports carrying an SOS alarm").unwrap();
    REGISTRY.register(Box::new(counter.clone())).unwrap();
    counter
});

/// Round trip of one report request
pub static SEND_LATENCY_SECONDS: LazyLock<Histogram> = LazyLock::new(|| {
    let histogram = Histogram::with_opts(
        HistogramOpts::new(
            "gpssim_send_latency_seconds",
            "Time from request write to fully drained response",
        )
        .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
    )
    .unwrap();
    REGISTRY.register(Box::new(histogram.clone())).unwrap();
    histogram
});

/// Status code of the last tracking server response
pub static LAST_RESPONSE_STATUS: LazyLock<Gauge> = LazyLock::new(|| {
    let gauge = Gauge::new(
        "gpssim_last_response_status",
        "HTTP status of the last tracking server response",
    )
    .unwrap();
    REGISTRY.register(Box::new(gauge.clone())).unwrap();
    gauge
});

// ============================================================================
// Simulated Device State
// ============================================================================

fn device_gauge(field: fields::Field, help: &str) -> Gauge {
    let gauge = Gauge::new(field.metric, help).unwrap();
    REGISTRY.register(Box::new(gauge.clone())).unwrap();
    gauge
}

pub static LATITUDE: LazyLock<Gauge> =
    LazyLock::new(|| device_gauge(fields::LATITUDE, "Last reported latitude"));

pub static LONGITUDE: LazyLock<Gauge> =
    LazyLock::new(|| device_gauge(fields::LONGITUDE, "Last reported longitude"));

pub static BEARING: LazyLock<Gauge> =
    LazyLock::new(|| device_gauge(fields::BEARING, "Last reported bearing"));

pub static SPEED: LazyLock<Gauge> =
    LazyLock::new(|| device_gauge(fields::SPEED, "Last reported speed"));

pub static FUEL: LazyLock<Gauge> =
    LazyLock::new(|| device_gauge(fields::FUEL, "Last reported fuel level"));

/// Record a delivered report.
pub fn observe_report(report: &Report) {
    REPORTS_SENT.inc();
    if report.alarm.is_some() {
        ALARMS_SENT.inc();
    }
    LATITUDE.set(report.latitude);
    LONGITUDE.set(report.longitude);
    BEARING.set(report.bearing);
    SPEED.set(report.speed);
    FUEL.set(report.fuel);
}

/// Record one request round trip.
pub fn observe_send(elapsed: Duration, status: u16) {
    SEND_LATENCY_SECONDS.observe(elapsed.as_secs_f64());
    LAST_RESPONSE_STATUS.set(f64::from(status));
}

// ============================================================================
// Metrics HTTP Server
// ============================================================================

#[derive(Debug, Error)]
#[error("Failed to start metrics server on {addr}: {source}")]
pub struct MetricsServerError {
    pub addr: String,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

/// Bind the metrics endpoint on `bind_addr` and serve it from a background thread.
pub fn serve_metrics(bind_addr: &str) -> Result<thread::JoinHandle<()>, MetricsServerError> {
    let server = Server::http(bind_addr).map_err(|source| MetricsServerError {
        addr: bind_addr.to_string(),
        source,
    })?;
    tracing::info!(addr = %bind_addr, "Metrics server listening");

    Ok(thread::spawn(move || {
        for request in server.incoming_requests() {
            let response = route_request(request.url());
            let _ = request.respond(response);
        }
    }))
}

fn route_request(url: &str) -> Response<Cursor<Vec<u8>>> {
    match url {
        "/metrics" => {
            let mut buffer = Vec::new();
            if let Err(e) = TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer) {
                tracing::warn!(error = %e, "Failed to encode metrics");
                return Response::from_string("Internal Server Error").with_status_code(500);
            }
            let response = Response::from_data(buffer);
            match Header::from_bytes(&b"Content-Type"[..], &b"text/plain; version=0.0.4"[..]) {
                Ok(header) => response.with_header(header),
                Err(()) => response,
            }
        }
        "/health" => Response::from_string("OK"),
        // Ready once the first report went out
        "/ready" if REPORTS_SENT.get() > 0 => Response::from_string("Ready"),
        "/ready" => Response::from_string("Not Ready").with_status_code(503),
        _ => Response::from_string("Not Found").with_status_code(404),
    }
}

/// Initialize all metrics (forces lazy initialization)
pub fn init_metrics() {
    let _ = REPORTS_SENT.get();
    let _ = ALARMS_SENT.get();
    let _ = SEND_LATENCY_SECONDS.get_sample_count();
    let _ = LAST_RESPONSE_STATUS.get();
    let _ = LATITUDE.get();
    let _ = LONGITUDE.get();
    let _ = BEARING.get();
    let _ = SPEED.get();
    let _ = FUEL.get();
}
