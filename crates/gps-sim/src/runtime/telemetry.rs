use report_io::metrics::{init_metrics, serve_metrics, MetricsServerError};
use std::thread;
use tracing::info;

pub fn init() {
    init_metrics();
}

pub fn start_metrics_server(
    addr: Option<&str>,
) -> Result<Option<thread::JoinHandle<()>>, MetricsServerError> {
    let Some(addr) = addr else {
        return Ok(None);
    };
    info!(addr = %addr, "Starting metrics server");
    serve_metrics(addr).map(Some)
}
