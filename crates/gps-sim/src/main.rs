use std::process::ExitCode;

fn main() -> ExitCode {
    gps_sim::runtime::run_from_args()
}
