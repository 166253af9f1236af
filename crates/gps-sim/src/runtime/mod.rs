mod app;
mod config;
mod logging;
mod telemetry;

pub use app::{run, run_from_args, AppError};
pub use config::{ConfigError, RuntimeConfig};
