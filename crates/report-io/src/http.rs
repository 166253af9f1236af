//! Report delivery to the tracking server over one pooled keep-alive connection.
//!
//! Response bodies are read to the end so the socket goes back to the pool.
//! The status is logged and recorded, but nothing acts on it: any complete
//! response counts as delivered.

use crate::metrics;
use crate::query::QueryEncoder;
use reqwest::blocking::Client;
use reqwest::Url;
use route_core::{Report, ReportSink};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("gps-sim/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Invalid tracking server address {server:?}: {reason}")]
    InvalidServer { server: String, reason: String },

    #[error("Request to tracking server failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Sends reports as GET requests against the server root.
pub struct HttpReportSink {
    client: Client,
    base: Url,
    encoder: QueryEncoder,
}

impl HttpReportSink {
    /// `server` is `host:port`. No socket is opened until the first report.
    pub fn new(server: &str, encoder: QueryEncoder) -> Result<Self, TransportError> {
        let base = Url::parse(&format!("http://{server}/")).map_err(|e| {
            TransportError::InvalidServer {
                server: server.to_string(),
                reason: e.to_string(),
            }
        })?;
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(1)
            .build()?;
        Ok(Self {
            client,
            base,
            encoder,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }
}

impl ReportSink for HttpReportSink {
    type Error = TransportError;

    fn send(&mut self, report: &Report) -> Result<(), TransportError> {
        let url = self.encoder.url(&self.base, report);
        let started = Instant::now();
        let response = self.client.get(url).send()?;
        let status = response.status();
        let body = response.bytes()?;

        metrics::observe_send(started.elapsed(), status.as_u16());
        metrics::observe_report(report);

        if status.is_success() {
            debug!(status = status.as_u16(), body_len = body.len(), "Report accepted");
        } else {
            warn!(status = status.as_u16(), "Tracking server answered with an error status");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use route_core::Alarm;
    use std::net::{SocketAddr, TcpListener};
    use std::thread;
    use tiny_http::{Response, Server};

    fn report() -> Report {
        Report {
            device_id: "dev 1".to_string(),
            timestamp: 1_700_000_000,
            latitude: 1.5,
            longitude: 2.0,
            bearing: 90.0,
            speed: 40.0,
            battery: 50,
            alarm: Some(Alarm::Sos),
            ignition: true,
            accuracy: 100.0,
            rpm: 800,
            fuel: 4.0,
            driver_unique_id: None,
        }
    }

    /// Answers each request with the next status and records target and peer.
    fn mock_server(statuses: Vec<u16>) -> (String, thread::JoinHandle<Vec<(String, SocketAddr)>>) {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap().to_string();
        let handle = thread::spawn(move || {
            statuses
                .into_iter()
                .map(|status| {
                    let request = server.recv().unwrap();
                    let seen = (request.url().to_string(), *request.remote_addr().unwrap());
                    let _ = request
                        .respond(Response::from_string("body text").with_status_code(status));
                    seen
                })
                .collect()
        });
        (addr, handle)
    }

    #[test]
    fn reuses_one_socket_across_reports() {
        let (addr, server) = mock_server(vec![200, 200, 200]);
        let mut sink = HttpReportSink::new(&addr, QueryEncoder::default()).unwrap();
        for _ in 0..3 {
            sink.send(&report()).unwrap();
        }

        let seen = server.join().unwrap();
        assert!(seen.iter().all(|(_, peer)| *peer == seen[0].1), "{seen:?}");
        assert!(seen[0].0.starts_with("/?id=dev+1&timestamp=1700000000&lat=1.5&lon=2&"));
        assert!(seen[0].0.contains("&alarm=sos&ignition=true&accuracy=100&rpm=800&fuel1=4"));
    }

    #[test]
    fn error_status_counts_as_delivered() {
        let (addr, server) = mock_server(vec![500, 404]);
        let mut sink = HttpReportSink::new(&addr, QueryEncoder::default()).unwrap();
        assert!(sink.send(&report()).is_ok());
        assert!(sink.send(&report()).is_ok());
        assert_eq!(server.join().unwrap().len(), 2);
    }

    #[test]
    fn refused_connection_is_request_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);
        let mut sink = HttpReportSink::new(&addr, QueryEncoder::default()).unwrap();
        assert!(matches!(
            sink.send(&report()),
            Err(TransportError::Request(_))
        ));
    }

    #[test]
    fn rejects_unparseable_server() {
        assert!(matches!(
            HttpReportSink::new("bad host:80", QueryEncoder::default()),
            Err(TransportError::InvalidServer { .. })
        ));
        let sink = HttpReportSink::new("tracker.local:5055", QueryEncoder::default()).unwrap();
        assert_eq!(sink.base_url().as_str(), "http://tracker.local:5055/");
    }
}
