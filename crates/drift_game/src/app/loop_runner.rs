use std::process::ExitCode;

use drift_engine::{run_app, LoopConfig};
use tracing::error;

pub(crate) fn run(config: LoopConfig) -> ExitCode {
    if let Err(err) = run_app(config) {
        error!(error = %err, "startup_failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
