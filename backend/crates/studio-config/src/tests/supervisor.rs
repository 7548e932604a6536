use crate::SupervisorConfig;

use std::time::Duration;

use googletest::assert_that;
use googletest::prelude::{anything, err, ok};

// =========================================================================
// Validation Tests - Supervisor
// =========================================================================

#[test]
fn given_defaults_when_validate_then_ok() {
    let config = SupervisorConfig::default();

    assert_that!(config.validate(), ok(anything()));
    assert_eq!(config.startup_timeout(), Duration::from_secs(45));
}

#[test]
fn given_zero_timeout_when_validate_then_error() {
    let config = SupervisorConfig {
        startup_timeout_secs: 0,
        ..Default::default()
    };

    assert_that!(config.validate(), err(anything()));
}

#[test]
fn given_timeout_above_limit_when_validate_then_error() {
    let config = SupervisorConfig {
        startup_timeout_secs: crate::MAX_STARTUP_TIMEOUT_SECS + 1,
        ..Default::default()
    };

    assert_that!(config.validate(), err(anything()));
}

#[test]
fn given_zero_log_buffer_when_validate_then_error() {
    let config = SupervisorConfig {
        log_buffer_lines: 0,
        ..Default::default()
    };

    assert_that!(config.validate(), err(anything()));
}

#[test]
fn given_non_markdown_default_file_when_validate_then_error() {
    let config = SupervisorConfig {
        default_file: String::from("slides.txt"),
        ..Default::default()
    };

    assert_that!(config.validate(), err(anything()));
}

#[test]
fn given_empty_dev_command_when_validate_then_error() {
    let config = SupervisorConfig {
        dev_command: String::from("  "),
        ..Default::default()
    };

    assert_that!(config.validate(), err(anything()));
}

#[test]
fn given_bundled_cli_with_parent_component_when_validate_then_error() {
    let config = SupervisorConfig {
        bundled_cli: String::from("../outside/slidev.mjs"),
        ..Default::default()
    };

    assert_that!(config.validate(), err(anything()));
}

#[test]
fn given_absolute_resources_dir_when_validate_then_error() {
    let config = SupervisorConfig {
        resources_dir: String::from("/opt/resources"),
        ..Default::default()
    };

    assert_that!(config.validate(), err(anything()));
}
