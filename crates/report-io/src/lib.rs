pub mod http;
pub mod jsonl;
pub mod metrics;
pub mod query;

pub use http::{HttpReportSink, TransportError};
pub use jsonl::{JsonLinesError, JsonLinesSink};
pub use metrics::{init_metrics, serve_metrics, MetricsServerError};
pub use query::{QueryEncoder, ZeroFields};
