mod cli;

use orbita::config;

fn main() {
    let _log_guard = setup_logging();

    if let Err(e) = cli::run() {
        eprintln!("{:#}", e); // pretty anyhow chain
        std::process::exit(1);
    }
}

/// Initializes tracing with an env-filter and a daily-rolling log file
/// under `$ORBITA_HOME/logs/`.
///
/// Returns a guard that must stay alive for the process lifetime so the
/// non-blocking writer flushes on exit. Falls back to stderr-only logging
/// if the log directory cannot be created.
fn setup_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let log_dir = config::paths::logs_dir();

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!(
            "warn: could not create log directory '{}': {e} — logging to stderr",
            log_dir.display()
        );
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .compact()
            .init();
        return None;
    }

    let appender = tracing_appender::rolling::daily(&log_dir, "orbita.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
        .init();

    Some(guard)
}
