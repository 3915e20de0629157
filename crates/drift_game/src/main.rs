use std::process::ExitCode;

mod app;

fn main() -> ExitCode {
    match app::bootstrap::build_app() {
        Ok(config) => app::loop_runner::run(config),
        Err(error) => {
            tracing::error!(error = %error, "settings_load_failed");
            ExitCode::FAILURE
        }
    }
}
