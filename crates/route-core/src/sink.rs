use crate::report::Report;
use std::convert::Infallible;

/// Destination for outgoing reports.
pub trait ReportSink {
    type Error: std::error::Error + Send + Sync + 'static;

    fn send(&mut self, report: &Report) -> Result<(), Self::Error>;
}

/// Keeps every report in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    reports: Vec<Report>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn into_reports(self) -> Vec<Report> {
        self.reports
    }
}

impl ReportSink for RecordingSink {
    type Error = Infallible;

    fn send(&mut self, report: &Report) -> Result<(), Self::Error> {
        self.reports.push(report.clone());
        Ok(())
    }
}
