//! Reservation Warden - Main Entry Point
//! Runs the integrity monitor and a metrics reporter on the job scheduler

mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Import workspace crates
use warden_core::application::{IntegrityMonitor, JobSpec, Scheduler};
use warden_core::port::{Clock, SystemClock};
use warden_core::MetricsCollector;
use warden_infra_json::JsonFileSource;
use warden_infra_system::StdoutNotifier;

use config::{DaemonConfig, LogConfig, LogFormat};

const VERSION: &str = env!("CARGO_PKG_VERSION");
// Library crates log under `warden_*`, the binary under `reservation_warden`
const DEFAULT_LOG_FILTER: &str = "warden=info,reservation_warden=info";
const LOG_FILE_PREFIX: &str = "warden.log";
const INTEGRITY_JOB: &str = "integrity-monitor";
const METRICS_JOB: &str = "metrics-report";

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging (guard flushes the log file on exit)
    let _log_guard = init_logging(&LogConfig::from_env())?;

    info!("Reservation Warden v{} starting...", VERSION);

    // 2. Load configuration
    let config = DaemonConfig::from_env().context("Invalid configuration")?;
    info!(
        reservations_path = %config.reservations_path.display(),
        check_interval_secs = config.check_interval_secs,
        max_retries = config.max_retries,
        retry_backoff_secs = config.retry_backoff_secs,
        "Configuration loaded"
    );

    // 3. Setup dependencies (DI wiring)
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let metrics = Arc::new(MetricsCollector::new());
    let source = Arc::new(JsonFileSource::new(&config.reservations_path));
    let notifier = Arc::new(StdoutNotifier::new());
    let monitor = IntegrityMonitor::new(source, notifier, metrics.clone(), clock.clone());

    // 4. Register jobs
    let mut scheduler = Scheduler::new(clock).with_metrics(metrics.clone());
    scheduler
        .register(
            JobSpec::new(INTEGRITY_JOB, config.check_interval_secs)
                .max_retries(config.max_retries)
                .retry_backoff_secs(config.retry_backoff_secs)
                .action(monitor.into_action()),
        )
        .context("Failed to register integrity monitor")?;

    let reporter_metrics = metrics.clone();
    scheduler.every(config.metrics_interval_secs, METRICS_JOB, move || {
        report_metrics(&reporter_metrics);
        Ok(())
    });

    info!("System ready. Press Ctrl+C to shutdown");

    // 5. Run until Ctrl+C (the scheduler loop itself never returns)
    tokio::select! {
        _ = scheduler.run(config.loop_sleep) => {}
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for shutdown signal")?;
            info!("Shutdown signal received. Exiting...");
        }
    }

    report_metrics(&metrics);
    info!("Shutdown complete.");

    Ok(())
}

fn init_logging(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))
        .context("Failed to create env filter")?;

    // Log file is always JSON, whatever the console format
    let (file_layer, guard) = match &config.dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().json().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    match config.format {
        // Production: JSON structured logging
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        // Development: Pretty formatting with colors
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).init(),
    }

    Ok(guard)
}

fn report_metrics(metrics: &MetricsCollector) {
    let snapshot = metrics.snapshot();
    if snapshot.is_empty() {
        info!("No metrics recorded yet");
        return;
    }
    for (label, count) in &snapshot {
        info!(metric = %label, count = *count, "Metrics snapshot");
    }
}
