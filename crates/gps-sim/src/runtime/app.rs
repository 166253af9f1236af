use crate::runtime::config::RuntimeConfig;
use crate::runtime::logging::init_tracing;
use crate::runtime::telemetry;
use report_io::{
    HttpReportSink, JsonLinesError, JsonLinesSink, MetricsServerError, TransportError,
};
use route_core::{
    load_waypoints, ParseError, ReportLoop, ReportSink, Route, RouteError, SenderStats, TimeBase,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{atomic::AtomicBool, Arc};
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to load route {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    DryRun(#[from] JsonLinesError),

    #[error(transparent)]
    Metrics(#[from] MetricsServerError),
}

pub fn run_from_args() -> ExitCode {
    let config = match RuntimeConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("gps-sim: {e}");
            return ExitCode::from(2);
        }
    };
    if config.show_help {
        RuntimeConfig::print_help();
        return ExitCode::SUCCESS;
    }

    init_tracing(config.json_logs);

    match run(config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Simulation halted");
            ExitCode::FAILURE
        }
    }
}

pub fn run(config: RuntimeConfig) -> Result<SenderStats, AppError> {
    telemetry::init();
    let _metrics_handle = telemetry::start_metrics_server(config.metrics_addr.as_deref())?;

    let waypoints = load_waypoints(&config.route_path).map_err(|source| AppError::Load {
        path: config.route_path.clone(),
        source,
    })?;
    let route = Route::interpolate(&waypoints, config.step)?;

    info!(
        path = %config.route_path.display(),
        waypoints = waypoints.len(),
        points = route.len(),
        step = config.step,
        "Route ready"
    );

    let stop = Arc::new(AtomicBool::new(false));
    if let Some(seconds) = config.run_seconds {
        info!(seconds, "Running for limited duration");
        let stop_timer = Arc::clone(&stop);
        thread::spawn(move || {
            thread::sleep(Duration::from_secs(seconds));
            stop_timer.store(true, std::sync::atomic::Ordering::Relaxed);
        });
    }

    let stats = if config.dry_run {
        info!("Dry run, writing reports to stdout");
        drive(route, &config, JsonLinesSink::new(std::io::stdout().lock()), &stop)?
    } else {
        info!(
            server = %config.server,
            device_id = %config.device_id,
            period_s = config.period.as_secs_f64(),
            "Reporting to tracking server"
        );
        let sink = HttpReportSink::new(&config.server, config.query_encoder())?;
        drive(route, &config, sink, &stop)?
    };

    info!(
        reports_sent = stats.reports_sent,
        alarms_raised = stats.alarms_raised,
        laps_completed = stats.laps_completed,
        "Run complete"
    );
    Ok(stats)
}

fn drive<S>(
    route: Route,
    config: &RuntimeConfig,
    sink: S,
    stop: &AtomicBool,
) -> Result<SenderStats, AppError>
where
    S: ReportSink,
    AppError: From<S::Error>,
{
    let mut sim = ReportLoop::new(
        route,
        config.device_profile(),
        sink,
        rand::rng(),
        config.loop_config(),
        TimeBase::new(),
    );
    sim.run(stop)?;
    Ok(sim.stats().clone())
}
