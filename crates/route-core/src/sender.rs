use crate::report::{DeviceProfile, Report};
use crate::route::Route;
use crate::sink::ReportSink;
use crate::timebase::TimeBase;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Clone, Debug)]
pub struct LoopConfig {
    /// Pause after every report. Not corrected for send time.
    pub period: Duration,
    /// Stop after this many reports instead of running forever.
    pub max_reports: Option<u64>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(240),
            max_reports: None,
        }
    }
}

#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct SenderStats {
    pub reports_sent: u64,
    pub alarms_raised: u64,
    pub laps_completed: u64,
}

/// Walks the route forever, one report per period.
pub struct ReportLoop<S: ReportSink, R: Rng> {
    route: Route,
    profile: DeviceProfile,
    sink: S,
    rng: R,
    config: LoopConfig,
    timebase: TimeBase,
    cursor: u64,
    stats: SenderStats,
}

impl<S: ReportSink, R: Rng> ReportLoop<S, R> {
    pub fn new(
        route: Route,
        profile: DeviceProfile,
        sink: S,
        rng: R,
        config: LoopConfig,
        timebase: TimeBase,
    ) -> Self {
        Self {
            route,
            profile,
            sink,
            rng,
            config,
            timebase,
            cursor: 0,
            stats: SenderStats::default(),
        }
    }

    /// Run until `stop` is raised, the report limit is hit, or the sink fails.
    ///
    /// `stop` is checked once per iteration; the sleep itself is not interrupted.
    pub fn run(&mut self, stop: &AtomicBool) -> Result<(), S::Error> {
        while !stop.load(Ordering::Relaxed) {
            self.send_current()?;
            if self.limit_reached() {
                info!(reports = self.stats.reports_sent, "Report limit reached");
                break;
            }
            thread::sleep(self.config.period);
            self.advance();
        }
        Ok(())
    }

    /// Synthesize and send the report for the current cursor.
    pub fn send_current(&mut self) -> Result<Report, S::Error> {
        let timestamp = self.timebase.unix_secs();
        let report = self
            .profile
            .report(&self.route, self.cursor, timestamp, &mut self.rng);

        self.sink.send(&report)?;

        self.stats.reports_sent += 1;
        if report.alarm.is_some() {
            self.stats.alarms_raised += 1;
        }
        info!(
            cursor = self.cursor,
            position = self.route.position(self.cursor),
            lat = report.latitude,
            lon = report.longitude,
            bearing = report.bearing,
            speed = report.speed,
            alarm = report.alarm.is_some(),
            "Report sent"
        );
        Ok(report)
    }

    pub fn advance(&mut self) {
        self.cursor += 1;
        if self.route.position(self.cursor) == 0 {
            self.stats.laps_completed += 1;
            debug!(
                laps = self.stats.laps_completed,
                uptime_ms = self.timebase.elapsed_ms(),
                "Route lap completed"
            );
        }
    }

    fn limit_reached(&self) -> bool {
        self.config
            .max_reports
            .is_some_and(|max| self.stats.reports_sent >= max)
    }

    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn stats(&self) -> &SenderStats {
        &self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
