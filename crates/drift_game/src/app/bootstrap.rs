use drift_engine::LoopConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::settings::load_settings_from_env;

/// Installs logging and resolves the loop configuration.
pub(crate) fn build_app() -> Result<LoopConfig, String> {
    init_tracing();
    info!("=== Drift Startup ===");

    let settings = load_settings_from_env()?;
    Ok(settings.apply_to(LoopConfig::default()))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
