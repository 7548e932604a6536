//! Tracing setup: a console layer plus a daily log file.
//!
//! Slidev's own output is forwarded at debug level under the `slidev`
//! target, so raising the level to debug puts the child's log in the file
//! next to the supervisor's.

use std::path::{Path, PathBuf};

use studio_config::LogLevel;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
};

const LOG_FILE_PREFIX: &str = "slidev-studio";
const LOG_FILE_SUFFIX: &str = "log";
const MAX_LOG_FILES: usize = 7;

/// Install the global subscriber and return the file being written today.
///
/// `RUST_LOG` replaces the configured level when set.
pub fn setup_logging(
    logs_dir: &Path,
    level: LogLevel,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    std::fs::create_dir_all(logs_dir)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(daily_appender(logs_dir)?),
        )
        .try_init()?;

    Ok(current_log_path(logs_dir))
}

fn daily_appender(logs_dir: &Path) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(MAX_LOG_FILES)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .build(logs_dir)
}

/// Filter used when `RUST_LOG` is unset.
pub fn default_directives(level: LogLevel) -> String {
    format!("{},hyper_util=warn,reqwest=warn", level.as_directive())
}

/// File the daily appender writes to today.
pub fn current_log_path(logs_dir: &Path) -> PathBuf {
    let today = chrono::Local::now().format("%Y-%m-%d");
    logs_dir.join(format!("{LOG_FILE_PREFIX}.{today}.{LOG_FILE_SUFFIX}"))
}
