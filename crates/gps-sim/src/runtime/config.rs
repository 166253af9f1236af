use report_io::{QueryEncoder, ZeroFields};
use route_core::{DeviceProfile, LoopConfig};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} needs a value")]
    MissingValue(String),

    #[error("Invalid value for {flag}: {value:?} ({reason})")]
    InvalidValue {
        flag: String,
        value: String,
        reason: &'static str,
    },

    #[error("Unknown option: {0} (see --help)")]
    UnknownOption(String),
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub show_help: bool,
    pub route_path: PathBuf,
    pub server: String,
    pub device_id: String,
    pub driver_id: String,
    pub period: Duration,
    pub step: f64,
    pub device_speed: f64,
    pub max_reports: Option<u64>,
    pub run_seconds: Option<u64>,
    pub zero_fields: ZeroFields,
    pub dry_run: bool,
    pub json_logs: bool,
    pub metrics_addr: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            show_help: false,
            route_path: PathBuf::from("Route.csv"),
            server: "localhost:5055".to_string(),
            device_id: "123456789012345".to_string(),
            driver_id: "123456".to_string(),
            period: Duration::from_secs(240),
            step: 0.001,
            device_speed: 40.0,
            max_reports: None,
            run_seconds: None,
            zero_fields: ZeroFields::Omit,
            dry_run: false,
            json_logs: false,
            metrics_addr: None,
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let args: Vec<String> = std::env::args().collect();
        Self::from_args(&args)
    }

    pub fn from_args(args: &[String]) -> Result<Self, ConfigError> {
        let mut cfg = RuntimeConfig::default();
        let mut i = 1;
        while i < args.len() {
            let flag = args[i].as_str();
            match flag {
                "--route" => {
                    cfg.route_path = PathBuf::from(take_value(args, &mut i)?);
                }
                "--server" => {
                    cfg.server = take_value(args, &mut i)?.to_string();
                }
                "--device-id" => {
                    cfg.device_id = take_value(args, &mut i)?.to_string();
                }
                "--driver-id" => {
                    cfg.driver_id = take_value(args, &mut i)?.to_string();
                }
                "--period" => {
                    let raw = take_value(args, &mut i)?;
                    let secs: f64 = parse_number(flag, raw)?;
                    if !secs.is_finite() || secs < 0.0 {
                        return Err(invalid(flag, raw, "must be a non-negative number of seconds"));
                    }
                    cfg.period = Duration::try_from_secs_f64(secs)
                        .map_err(|_| invalid(flag, raw, "too large"))?;
                }
                "--step" => {
                    let raw = take_value(args, &mut i)?;
                    let step: f64 = parse_number(flag, raw)?;
                    if !step.is_finite() || step <= 0.0 {
                        return Err(invalid(flag, raw, "must be a positive number of degrees"));
                    }
                    cfg.step = step;
                }
                "--speed" => {
                    let raw = take_value(args, &mut i)?;
                    cfg.device_speed = parse_number(flag, raw)?;
                }
                "--max-reports" => {
                    let raw = take_value(args, &mut i)?;
                    cfg.max_reports = Some(parse_number(flag, raw)?);
                }
                "--run-seconds" => {
                    let raw = take_value(args, &mut i)?;
                    cfg.run_seconds = Some(parse_number(flag, raw)?);
                }
                "--send-zero-fields" => {
                    cfg.zero_fields = ZeroFields::Send;
                }
                "--dry-run" => {
                    cfg.dry_run = true;
                }
                "--json-logs" => {
                    cfg.json_logs = true;
                }
                "--metrics-addr" => {
                    cfg.metrics_addr = Some(take_value(args, &mut i)?.to_string());
                }
                "--help" | "-h" => {
                    cfg.show_help = true;
                    break;
                }
                other => return Err(ConfigError::UnknownOption(other.to_string())),
            }
            i += 1;
        }
        Ok(cfg)
    }

    pub fn device_profile(&self) -> DeviceProfile {
        DeviceProfile {
            device_id: self.device_id.clone(),
            driver_id: self.driver_id.clone(),
            speed: self.device_speed,
        }
    }

    pub fn loop_config(&self) -> LoopConfig {
        LoopConfig {
            period: self.period,
            max_reports: self.max_reports,
        }
    }

    pub fn query_encoder(&self) -> QueryEncoder {
        QueryEncoder::new(self.zero_fields)
    }

    pub fn print_help() {
        println!(
            r#"gps-sim - Simulated GPS tracker reporting along a closed route

USAGE:
    gps-sim [OPTIONS]

OPTIONS:
    --route <PATH>          Route CSV (header + latitude,longitude,fuelLevel) [default: Route.csv]
    --server <HOST:PORT>    Tracking server address [default: localhost:5055]
    --device-id <ID>        Device identifier sent as `id` [default: 123456789012345]
    --driver-id <ID>        Driver identifier sent at loop start [default: 123456]
    --period <SECS>         Pause between reports [default: 240]
    --step <DEG>            Interpolation step in degrees [default: 0.001]
    --speed <VALUE>         Reported speed while moving [default: 40]
    --max-reports <N>       Exit after N reports
    --run-seconds <SECS>    Stop after a fixed duration
    --send-zero-fields      Send accuracy/rpm/fuel1 even when zero
    --dry-run               Print reports as JSON lines instead of sending them
    --json-logs             Output logs in JSON format
    --metrics-addr <ADDR>   Enable Prometheus metrics server on address (e.g., 0.0.0.0:9090)
    -h, --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG                Set log filter (e.g., RUST_LOG=debug,report_io=trace)

EXAMPLES:
    # Report every 4 minutes to a local Traccar
    gps-sim --route Route.csv --server localhost:5055

    # Fast run against a test server
    gps-sim --period 1 --max-reports 20 --server 127.0.0.1:5055

    # Inspect the generated reports
    gps-sim --dry-run --period 0 --max-reports 10
"#
        );
    }
}

fn take_value<'a>(args: &'a [String], i: &mut usize) -> Result<&'a str, ConfigError> {
    let flag = &args[*i];
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| ConfigError::MissingValue(flag.clone()))
}

fn parse_number<T: FromStr>(flag: &str, raw: &str) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| invalid(flag, raw, "not a valid number"))
}

fn invalid(flag: &str, raw: &str, reason: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        flag: flag.to_string(),
        value: raw.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("gps-sim")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn defaults_match_reference_device() {
        let cfg = RuntimeConfig::from_args(&args(&[])).unwrap();
        assert_eq!(cfg.server, "localhost:5055");
        assert_eq!(cfg.device_id, "123456789012345");
        assert_eq!(cfg.driver_id, "123456");
        assert_eq!(cfg.period, Duration::from_secs(240));
        assert_eq!(cfg.step, 0.001);
        assert_eq!(cfg.device_speed, 40.0);
        assert_eq!(cfg.route_path, PathBuf::from("Route.csv"));
        assert_eq!(cfg.zero_fields, ZeroFields::Omit);
        assert!(cfg.max_reports.is_none());
    }

    #[test]
    fn parses_all_options() {
        let cfg = RuntimeConfig::from_args(&args(&[
            "--route",
            "/tmp/r.csv",
            "--server",
            "tracker:5055",
            "--device-id",
            "dev",
            "--driver-id",
            "drv",
            "--period",
            "0.5",
            "--step",
            "0.01",
            "--speed",
            "55",
            "--max-reports",
            "12",
            "--run-seconds",
            "30",
            "--send-zero-fields",
            "--dry-run",
            "--json-logs",
            "--metrics-addr",
            "127.0.0.1:9090",
        ]))
        .unwrap();
        assert_eq!(cfg.route_path, PathBuf::from("/tmp/r.csv"));
        assert_eq!(cfg.server, "tracker:5055");
        assert_eq!(cfg.period, Duration::from_millis(500));
        assert_eq!(cfg.step, 0.01);
        assert_eq!(cfg.device_speed, 55.0);
        assert_eq!(cfg.max_reports, Some(12));
        assert_eq!(cfg.run_seconds, Some(30));
        assert_eq!(cfg.zero_fields, ZeroFields::Send);
        assert!(cfg.dry_run && cfg.json_logs);
        assert_eq!(cfg.metrics_addr.as_deref(), Some("127.0.0.1:9090"));

        let profile = cfg.device_profile();
        assert_eq!(profile.device_id, "dev");
        assert_eq!(profile.driver_id, "drv");
        assert_eq!(cfg.loop_config().max_reports, Some(12));
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            RuntimeConfig::from_args(&args(&["--period"])).unwrap_err(),
            ConfigError::MissingValue("--period".to_string())
        );
        for bad in [
            ["--period", "-1"],
            ["--period", "soon"],
            ["--period", "1e30"],
            ["--step", "0"],
            ["--step", "NaN"],
            ["--max-reports", "-3"],
        ] {
            assert!(matches!(
                RuntimeConfig::from_args(&args(&bad)),
                Err(ConfigError::InvalidValue { .. })
            ));
        }
        assert_eq!(
            RuntimeConfig::from_args(&args(&["--bogus"])).unwrap_err(),
            ConfigError::UnknownOption("--bogus".to_string())
        );
    }

    #[test]
    fn help_stops_parsing() {
        let cfg = RuntimeConfig::from_args(&args(&["-h", "--bogus"])).unwrap();
        assert!(cfg.show_help);
    }
}
