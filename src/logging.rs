use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

const LOG_FILE_NAME: &str = "cat-agency.log";

/// Directives used when `RUST_LOG` is unset; the crate follows `logging.level`
fn default_directives(level: &str) -> String {
    format!("{level},sqlx=warn")
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

/// Install the global subscriber for the server.
///
/// `RUST_LOG` overrides `logging.level`. When `logging.dir` is set and
/// writable, logs are also written to a daily rolling file; the returned
/// guard must be held until shutdown so buffered lines get flushed.
pub fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let (file_layer, guard) = match config.dir.as_deref() {
        Some(dir) if is_writable_dir(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(guard))
        }
        Some(dir) => {
            eprintln!("Warning: Could not write to log directory {dir}, file logging disabled");
            (None, None)
        }
        None => (None, None),
    };

    let json_layer = config
        .json
        .then(|| tracing_subscriber::fmt::layer().json().with_target(true));
    let console_layer = (!config.json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
    });

    tracing_subscriber::registry()
        .with(env_filter(&config.level))
        .with(json_layer)
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}

// `rolling::daily` panics if it cannot create the first file, so check first
fn is_writable_dir(dir: &str) -> bool {
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }
    let marker = Path::new(dir).join(".cat_agency_write_test");
    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&marker)
    {
        Ok(_) => {
            let _ = std::fs::remove_file(&marker);
            true
        }
        Err(_) => false,
    }
}
