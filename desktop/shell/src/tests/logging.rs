use crate::logging::{current_log_path, default_directives, setup_logging};

use std::path::Path;

use studio_config::LogLevel;
use tempfile::TempDir;

#[test]
fn given_configured_level_when_default_directives_then_level_leads() {
    let directives = default_directives("debug".parse::<LogLevel>().unwrap());

    assert!(directives.starts_with("debug,"));
}

#[test]
fn given_logs_dir_when_current_log_path_then_prefixed_daily_file() {
    let path = current_log_path(Path::new("/var/log/studio"));

    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(path.starts_with("/var/log/studio"));
    assert!(name.starts_with("slidev-studio."));
    assert!(name.ends_with(".log"));
}

#[test]
fn given_missing_logs_dir_when_setup_then_dir_created_and_todays_file_reported() {
    // Only test in this binary that installs the global subscriber.
    let root = TempDir::new().unwrap();
    let logs_dir = root.path().join("logs");

    let log_file = setup_logging(&logs_dir, "info".parse::<LogLevel>().unwrap()).unwrap();

    assert!(logs_dir.is_dir());
    assert_eq!(log_file, current_log_path(&logs_dir));
}
