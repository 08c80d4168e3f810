//! Server initialization and startup logic for VideoAgent.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use videoagent_api::{ApiServer, AppState, ServerSettings, VeoClient};
use videoagent_browser::FlowAutomator;
use videoagent_config::{Config, ConfigLoader, ConfigValidator};
use videoagent_flowqueue::{FlowTaskManager, QueueConfig};

/// Get the .videoagent directory path.
pub(crate) fn videoagent_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".videoagent"))
        .unwrap_or_else(|| PathBuf::from(".videoagent"))
}

/// Initialize tracing with console and file output.
///
/// Log files are written to ~/.videoagent/logs/ with daily rotation.
pub(crate) fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = videoagent_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("videoagent")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The guard flushes the file writer on drop.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Load and validate configuration. A missing file yields defaults.
pub(crate) fn load_config(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    let config = ConfigLoader::load_or_default(path)?;
    let warnings = ConfigValidator::validate(&config).into_result()?;
    for warning in warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }
    Ok(config)
}

/// Run the server in foreground.
pub(crate) async fn run_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting VideoAgent v{}", env!("CARGO_PKG_VERSION"));

    let automator = Arc::new(FlowAutomator::new(config.browser.clone()));
    let manager = Arc::new(FlowTaskManager::new(
        QueueConfig::from(&config.flow),
        automator,
    ));

    let outcome = manager.start_worker()?;
    info!("Flow worker running ({})", outcome.mode());

    let state = Arc::new(AppState::new(
        manager.clone(),
        VeoClient::new(config.veo.clone()),
    ));
    let server = ApiServer::new(ServerSettings::from(&config.server), state);
    info!("API listening on http://{}", server.addr());

    let result = server.run(shutdown_signal()).await;

    manager.shutdown();
    info!("VideoAgent stopped");
    result.map_err(|e| e as Box<dyn std::error::Error>)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
