use crate::metrics;
use route_core::{Report, ReportSink};
use std::io::{self, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonLinesError {
    #[error("Failed to write report line: {0}")]
    Write(#[from] io::Error),

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Writes each report as one JSON line instead of sending it. Used for dry runs.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for JsonLinesSink<W> {
    type Error = JsonLinesError;

    fn send(&mut self, report: &Report) -> Result<(), JsonLinesError> {
        let mut line = serde_json::to_vec(report)?;
        line.push(b'\n');
        self.writer.write_all(&line)?;
        self.writer.flush()?;
        metrics::observe_report(report);
        Ok(())
    }
}
