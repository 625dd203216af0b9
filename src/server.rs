//! Logging setup and the HTTP server entry point.

use std::sync::Arc;

use tracing::info;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use mylist_api::{AppState, InterfaceConfig, InterfaceServer};
use mylist_config::{Config, LogFormat, LoggingConfig};

use crate::services::Services;

/// Initialize tracing with console and file output.
///
/// `RUST_LOG` wins over the configured level. The file layer writes daily
/// rotated logs into the configured directory when one can be created.
pub(crate) fn init_tracing(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let console = match config.format {
        LogFormat::Text => fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed(),
    };

    let file = match config.dir_or_default() {
        Some(log_dir) if std::fs::create_dir_all(&log_dir).is_ok() => {
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("mylist-register")
                .filename_suffix("log")
                .max_log_files(14)
                .build(&log_dir)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
        }
        _ => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(file)
        .init();

    Ok(())
}

/// Serve invocations until Ctrl+C.
pub(crate) async fn run_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting mylist-register v{}", env!("CARGO_PKG_VERSION"));

    let services = Services::from_config(&config);
    let state = Arc::new(AppState::new(
        services.chain(),
        services.registrar(),
        services.tracked_job(),
        services.codec.clone(),
    ));

    let server = InterfaceServer::new(InterfaceConfig::from(&config.server), state);
    server.run().await
}
