use crate::config::AppConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber.
///
/// Text mode logs to stdout and, when `log_dir` is set, to a rolling file.
/// JSON mode logs to the file only. `RUST_LOG` overrides `log_level`.
/// Keep the returned guard alive until exit so the file writer flushes.
pub fn init_logging(config: &AppConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let (writer, guard) = if config.log_dir.is_empty() {
        (None, None)
    } else {
        let appender = match config.rotation.as_str() {
            "hourly" => tracing_appender::rolling::hourly(&config.log_dir, &config.log_file),
            "daily" => tracing_appender::rolling::daily(&config.log_dir, &config.log_file),
            _ => tracing_appender::rolling::never(&config.log_dir, &config.log_file),
        };
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        (Some(non_blocking), Some(guard))
    };

    let registry = tracing_subscriber::registry().with(filter);

    if config.use_json {
        let file_layer = writer.map(|w| {
            fmt::layer()
                .json()
                .with_target(true)
                .with_writer(w)
                .with_ansi(false)
        });
        registry.with(file_layer).init();
    } else {
        let file_layer = writer.map(|w| {
            fmt::layer()
                .with_target(false)
                .with_writer(w)
                .with_ansi(false)
        });
        let stdout_layer = fmt::layer().with_target(false).with_ansi(true);
        registry.with(file_layer).with(stdout_layer).init();
    }

    guard
}
